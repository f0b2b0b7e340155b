//! Seams to the hosting shell: routing and toast notifications.

use callflow_core::navigation::NavigationIntent;

/// Performs route changes on behalf of the editor.
///
/// The editor only ever calls this with [`NavigationIntent::Allowed`]; the
/// intent is passed through so the host's own route-change hook can skip
/// the unsaved-changes guard for these navigations.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, intent: NavigationIntent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
