//! Tracks the agent's active version and keeps the draft store's base in step.

use std::sync::Arc;

use callflow_core::hashing::json_fingerprint;
use callflow_core::reconcile::CommittedConfig;
use callflow_core::types::DbId;

use crate::api::AgentDetail;
use crate::store::DraftStore;

/// What an observation of the server's active version did to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseChange {
    /// Same active version as before.
    Unchanged,
    /// The base was unknown (or there is no active version) and is now set.
    Initialized,
    /// A different version became active; drafts were invalidated.
    Switched { from: DbId, to: DbId },
}

/// The committed state drafts are reconciled against.
pub struct VersionResolver {
    store: Arc<DraftStore>,
    active_version_id: Option<DbId>,
    committed: CommittedConfig,
    committed_fingerprint: Option<String>,
}

impl VersionResolver {
    pub fn new(store: Arc<DraftStore>) -> Self {
        Self {
            store,
            active_version_id: None,
            committed: empty_committed(),
            committed_fingerprint: None,
        }
    }

    pub fn active_version_id(&self) -> Option<DbId> {
        self.active_version_id
    }

    /// Fields of the version drafts are built on; empty until the first
    /// observation of an active version.
    pub fn committed(&self) -> &CommittedConfig {
        &self.committed
    }

    /// Fingerprint of the committed `config_json`, for no-op edit detection.
    pub fn committed_fingerprint(&self) -> Option<&str> {
        self.committed_fingerprint.as_deref()
    }

    /// Take in a freshly fetched agent detail.
    ///
    /// This is the only place external activations are noticed: a stale base
    /// goes unnoticed until the next fetch.
    pub fn observe(&mut self, detail: &AgentDetail) -> BaseChange {
        let previous = self.active_version_id;
        let next = detail.active_version.as_ref().map(|v| v.id);

        match &detail.active_version {
            Some(version) => self.set_committed(version.id, version.committed_config()),
            None => {
                self.active_version_id = None;
                self.committed = empty_committed();
                self.committed_fingerprint = None;
            }
        }

        let was_dirty = self.store.is_dirty();
        self.store.set_base_version_id(next);

        match (previous, next) {
            (Some(from), Some(to)) if from != to => {
                if was_dirty {
                    tracing::warn!(
                        agent_id = detail.id,
                        from,
                        to,
                        "Active version changed underneath unsaved drafts, drafts discarded"
                    );
                }
                BaseChange::Switched { from, to }
            }
            (a, b) if a == b => BaseChange::Unchanged,
            _ => BaseChange::Initialized,
        }
    }

    /// Advance the base to a version this session just committed.
    pub fn record_commit(&mut self, version_id: DbId, committed: CommittedConfig) {
        self.set_committed(version_id, committed);
        self.store.set_base_version_id(Some(version_id));
    }

    fn set_committed(&mut self, version_id: DbId, committed: CommittedConfig) {
        self.committed_fingerprint = Some(json_fingerprint(&committed.config_json));
        self.committed = committed;
        self.active_version_id = Some(version_id);
    }
}

/// Baseline for an agent that has never had a version activated.
fn empty_committed() -> CommittedConfig {
    CommittedConfig {
        config_json: serde_json::json!({}),
        ..CommittedConfig::default()
    }
}
