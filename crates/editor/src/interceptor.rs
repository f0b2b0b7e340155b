//! Route-change guard for one agent's editing page.

use callflow_core::draft::PendingNavigation;
use callflow_core::navigation::{self, NavigationDecision, NavigationIntent};
use callflow_core::types::DbId;

/// Holds back navigations away from the agent while drafts are dirty.
#[derive(Debug)]
pub struct NavigationInterceptor {
    agent_id: DbId,
    pending: Option<PendingNavigation>,
}

impl NavigationInterceptor {
    pub fn new(agent_id: DbId) -> Self {
        Self {
            agent_id,
            pending: None,
        }
    }

    /// Run the route-change decision and remember an intercepted target.
    ///
    /// A second interception while one is pending replaces it.
    pub fn before_route_change(
        &mut self,
        href: Option<&str>,
        intent: NavigationIntent,
        is_dirty: bool,
    ) -> NavigationDecision {
        let decision = navigation::decide(intent, is_dirty, href, self.agent_id);

        if let NavigationDecision::Intercept { target_path } = &decision {
            if let Some(previous) = &self.pending {
                tracing::debug!(
                    replaced = %previous.target_path,
                    target = %target_path,
                    "Replacing pending navigation"
                );
            }
            self.pending = Some(PendingNavigation {
                target_path: target_path.clone(),
            });
        }

        decision
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    /// Remove and return the pending navigation.
    pub fn take_pending(&mut self) -> Option<PendingNavigation> {
        self.pending.take()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }
}
