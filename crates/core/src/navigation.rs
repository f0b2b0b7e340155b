//! Route-change decision procedure for the agent editing page.
//!
//! Every navigation carries a [`NavigationIntent`]. Navigations the editor
//! issues itself after a discard or a successful save are `Allowed`; clicks
//! and other user-initiated route changes are `Guarded` and go through
//! [`decide`].

use crate::types::DbId;

/// How a navigation request should be treated by the unsaved-changes guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Issued by the editor itself; bypasses the guard.
    Allowed,
    /// Subject to the guard.
    Guarded,
}

/// Outcome of the route-change hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the router proceed.
    Proceed,
    /// Hold the navigation and ask the user what to do with their drafts.
    Intercept { target_path: String },
}

/// Path prefix of an agent's editing subtree.
pub fn agent_path(agent_id: DbId) -> String {
    format!("/agents/{agent_id}")
}

/// Whether `href` stays inside `/agents/{agent_id}`.
///
/// The prefix must end at a path segment, query, or fragment boundary, so
/// `/agents/12` does not claim `/agents/123`.
pub fn is_within_agent(href: &str, agent_id: DbId) -> bool {
    let prefix = agent_path(agent_id);
    match href.strip_prefix(prefix.as_str()) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

/// Whether `href` is an in-app path (as opposed to an external URL).
pub fn is_internal_path(href: &str) -> bool {
    href.starts_with('/')
}

/// Decide whether a route change may proceed.
///
/// 1. `Allowed` intents always proceed.
/// 2. A clean session never intercepts.
/// 3. No target (e.g. a click outside any link) proceeds.
/// 4. External targets proceed.
/// 5. Targets inside the current agent's subtree (tab switches) proceed.
/// 6. Anything else is intercepted.
pub fn decide(
    intent: NavigationIntent,
    is_dirty: bool,
    href: Option<&str>,
    current_agent_id: DbId,
) -> NavigationDecision {
    if intent == NavigationIntent::Allowed || !is_dirty {
        return NavigationDecision::Proceed;
    }

    let Some(href) = href else {
        return NavigationDecision::Proceed;
    };

    if !is_internal_path(href) || is_within_agent(href, current_agent_id) {
        return NavigationDecision::Proceed;
    }

    NavigationDecision::Intercept {
        target_path: href.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: DbId = 12;

    fn guarded(is_dirty: bool, href: Option<&str>) -> NavigationDecision {
        decide(NavigationIntent::Guarded, is_dirty, href, AGENT)
    }

    #[test]
    fn dirty_session_intercepts_other_internal_page() {
        assert_eq!(
            guarded(true, Some("/calls")),
            NavigationDecision::Intercept {
                target_path: "/calls".to_string()
            }
        );
    }

    #[test]
    fn allowed_intent_always_proceeds() {
        assert_eq!(
            decide(NavigationIntent::Allowed, true, Some("/calls"), AGENT),
            NavigationDecision::Proceed
        );
    }

    #[test]
    fn clean_session_proceeds() {
        assert_eq!(guarded(false, Some("/calls")), NavigationDecision::Proceed);
    }

    #[test]
    fn missing_target_proceeds() {
        assert_eq!(guarded(true, None), NavigationDecision::Proceed);
    }

    #[test]
    fn external_links_are_never_intercepted() {
        assert_eq!(
            guarded(true, Some("https://docs.example.com")),
            NavigationDecision::Proceed
        );
        assert_eq!(guarded(true, Some("mailto:ops@example.com")), NavigationDecision::Proceed);
    }

    #[test]
    fn tab_switch_within_agent_proceeds() {
        assert_eq!(guarded(true, Some("/agents/12")), NavigationDecision::Proceed);
        assert_eq!(
            guarded(true, Some("/agents/12/settings")),
            NavigationDecision::Proceed
        );
        assert_eq!(
            guarded(true, Some("/agents/12?tab=workflow")),
            NavigationDecision::Proceed
        );
    }

    #[test]
    fn other_agent_is_intercepted() {
        assert!(matches!(
            guarded(true, Some("/agents/123")),
            NavigationDecision::Intercept { .. }
        ));
        assert!(matches!(
            guarded(true, Some("/agents/7/settings")),
            NavigationDecision::Intercept { .. }
        ));
        assert!(matches!(
            guarded(true, Some("/agents")),
            NavigationDecision::Intercept { .. }
        ));
    }

    #[test]
    fn agent_path_format() {
        assert_eq!(agent_path(42), "/agents/42");
    }
}
