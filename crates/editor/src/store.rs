//! The draft store shared by both editing surfaces.
//!
//! State lives in a [`tokio::sync::watch`] channel so surfaces can
//! [`subscribe`](DraftStore::subscribe) to changes; every mutation runs to
//! completion under the channel's lock and notifies subscribers only when
//! something actually changed.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use callflow_core::draft::{DraftSession, SaveKind, WorkflowDraft};
use callflow_core::hashing::json_fingerprint;
use callflow_core::settings::SettingsDraft;
use callflow_core::types::DbId;

/// Generic text for the close-tab warning. Browsers show their own wording,
/// so callers should only rely on a warning being present.
pub const UNLOAD_WARNING: &str = "You have unsaved changes. Are you sure you want to leave?";

/// Answer to a tab/window close request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnloadDecision {
    Allow,
    Warn { message: &'static str },
}

/// Holds at most one draft per editing surface plus the base version id.
pub struct DraftStore {
    state: watch::Sender<DraftSession>,
    /// Last id passed to [`DraftStore::set_base_version_id`], tracked apart
    /// from the published session.
    previous_base_id: Mutex<Option<DbId>>,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore {
    pub fn new() -> Self {
        let (state, _rx) = watch::channel(DraftSession::default());
        Self {
            state,
            previous_base_id: Mutex::new(None),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// A copy of the current session.
    pub fn snapshot(&self) -> DraftSession {
        self.state.borrow().clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().is_dirty()
    }

    pub fn base_version_id(&self) -> Option<DbId> {
        self.state.borrow().base_version_id
    }

    /// Receive every future change to the session.
    pub fn subscribe(&self) -> watch::Receiver<DraftSession> {
        self.state.subscribe()
    }

    // ── Draft setters ────────────────────────────────────────────────

    pub fn set_workflow_draft(&self, draft: Option<WorkflowDraft>) {
        self.modify(|s| replace(&mut s.workflow_draft, draft));
    }

    pub fn set_settings_draft(&self, draft: Option<SettingsDraft>) {
        self.modify(|s| replace(&mut s.settings_draft, draft));
    }

    pub fn set_is_workflow_dirty(&self, dirty: bool) {
        self.modify(|s| replace(&mut s.is_workflow_dirty, dirty));
    }

    pub fn set_is_settings_dirty(&self, dirty: bool) {
        self.modify(|s| replace(&mut s.is_settings_dirty, dirty));
    }

    pub fn clear_workflow_draft(&self) {
        self.modify(|s| {
            let changed = s.workflow_draft.is_some() || s.is_workflow_dirty;
            s.workflow_draft = None;
            s.is_workflow_dirty = false;
            changed
        });
    }

    pub fn clear_settings_draft(&self) {
        self.modify(|s| {
            let changed = s.settings_draft.is_some() || s.is_settings_dirty;
            s.settings_draft = None;
            s.is_settings_dirty = false;
            changed
        });
    }

    /// Drop both drafts and both dirty flags. The base version is kept.
    pub fn clear_all_drafts(&self) {
        self.modify(|s| {
            let changed = s.workflow_draft.is_some()
                || s.settings_draft.is_some()
                || s.is_dirty();
            s.clear_drafts();
            changed
        });
    }

    /// Clear only the drafts a save of `kind` committed.
    pub fn clear_for(&self, kind: SaveKind) {
        if kind.includes_workflow() {
            self.clear_workflow_draft();
        }
        if kind.includes_settings() {
            self.clear_settings_draft();
        }
    }

    // ── Base version ─────────────────────────────────────────────────

    /// Record the version the drafts are built on.
    ///
    /// A change from one non-null id to a different non-null id clears all
    /// drafts first. Transitions to or from `None`, and repeats of the same
    /// id, only update the stored value.
    pub fn set_base_version_id(&self, id: Option<DbId>) {
        let mut previous = self
            .previous_base_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let switched = matches!((*previous, id), (Some(old), Some(new)) if old != new);
        if switched {
            tracing::debug!(
                from = ?*previous,
                to = ?id,
                "Base version changed, clearing drafts"
            );
        }
        *previous = id;

        self.modify(|s| {
            let mut changed = false;
            if switched {
                changed = s.workflow_draft.is_some()
                    || s.settings_draft.is_some()
                    || s.is_dirty();
                s.clear_drafts();
            }
            changed | replace(&mut s.base_version_id, id)
        });
    }

    // ── Edit recording ───────────────────────────────────────────────

    /// Record an edit from the workflow surface.
    ///
    /// Edits that bring the graph back to the committed baseline clear the
    /// workflow draft; edits identical to the current draft are ignored.
    pub fn record_workflow_edit(
        &self,
        config: serde_json::Value,
        committed_fingerprint: Option<&str>,
    ) {
        let fingerprint = json_fingerprint(&config);

        if committed_fingerprint == Some(fingerprint.as_str()) {
            self.clear_workflow_draft();
            return;
        }

        self.modify(|s| {
            let unchanged = s.is_workflow_dirty
                && s.workflow_draft
                    .as_ref()
                    .is_some_and(|d| d.serialized_fingerprint == fingerprint);
            if unchanged {
                return false;
            }
            s.workflow_draft = Some(WorkflowDraft {
                config,
                serialized_fingerprint: fingerprint,
            });
            s.is_workflow_dirty = true;
            true
        });
    }

    /// Record an edit from the settings surface.
    pub fn record_settings_edit(&self, draft: SettingsDraft) {
        self.modify(|s| {
            let changed = s.settings_draft.as_ref() != Some(&draft) || !s.is_settings_dirty;
            s.settings_draft = Some(draft);
            s.is_settings_dirty = true;
            changed
        });
    }

    // ── Unload guard ─────────────────────────────────────────────────

    pub fn before_unload(&self) -> UnloadDecision {
        if self.is_dirty() {
            UnloadDecision::Warn {
                message: UNLOAD_WARNING,
            }
        } else {
            UnloadDecision::Allow
        }
    }

    fn modify(&self, f: impl FnOnce(&mut DraftSession) -> bool) {
        self.state.send_if_modified(f);
    }
}

/// Assign `value` to `slot`, reporting whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn graph(node: &str) -> serde_json::Value {
        json!({ "workflow": { "nodes": [{ "id": node }] } })
    }

    fn assert_dirty_invariant(store: &DraftStore) {
        let s = store.snapshot();
        assert_eq!(s.is_dirty(), s.is_workflow_dirty || s.is_settings_dirty);
        assert_eq!(store.is_dirty(), s.is_dirty());
    }

    fn seed_both(store: &DraftStore) {
        store.set_workflow_draft(Some(WorkflowDraft::new(graph("a"))));
        store.set_is_workflow_dirty(true);
        store.set_settings_draft(Some(SettingsDraft::default()));
        store.set_is_settings_dirty(true);
    }

    #[test]
    fn dirty_invariant_holds_after_every_operation() {
        let store = DraftStore::new();
        assert_dirty_invariant(&store);

        store.set_workflow_draft(Some(WorkflowDraft::new(graph("a"))));
        assert_dirty_invariant(&store);
        store.set_is_workflow_dirty(true);
        assert_dirty_invariant(&store);
        store.set_settings_draft(Some(SettingsDraft::default()));
        assert_dirty_invariant(&store);
        store.set_is_settings_dirty(true);
        assert_dirty_invariant(&store);
        store.clear_workflow_draft();
        assert_dirty_invariant(&store);
        assert!(store.is_dirty());
        store.clear_settings_draft();
        assert_dirty_invariant(&store);
        assert!(!store.is_dirty());

        seed_both(&store);
        store.clear_all_drafts();
        assert_dirty_invariant(&store);
        store.set_base_version_id(Some(1));
        assert_dirty_invariant(&store);
        store.set_base_version_id(None);
        assert_dirty_invariant(&store);
    }

    #[test]
    fn same_base_id_keeps_drafts() {
        let store = DraftStore::new();
        store.set_base_version_id(Some(1));
        seed_both(&store);

        store.set_base_version_id(Some(1));

        let s = store.snapshot();
        assert!(s.workflow_draft.is_some());
        assert!(s.settings_draft.is_some());
        assert!(s.is_workflow_dirty && s.is_settings_dirty);
    }

    #[test]
    fn different_base_id_clears_drafts() {
        let store = DraftStore::new();
        store.set_base_version_id(Some(1));
        seed_both(&store);

        store.set_base_version_id(Some(2));

        let s = store.snapshot();
        assert_eq!(s.workflow_draft, None);
        assert_eq!(s.settings_draft, None);
        assert!(!s.is_workflow_dirty && !s.is_settings_dirty);
        assert_eq!(s.base_version_id, Some(2));
    }

    #[test]
    fn transitions_through_none_do_not_clear() {
        let store = DraftStore::new();
        seed_both(&store);
        store.set_base_version_id(Some(1));
        assert!(store.is_dirty(), "None -> Some must not clear");

        store.set_base_version_id(None);
        assert!(store.is_dirty(), "Some -> None must not clear");

        store.set_base_version_id(Some(2));
        assert!(store.is_dirty(), "None -> Some must not clear");
        assert_eq!(store.base_version_id(), Some(2));
    }

    #[test]
    fn clear_for_scopes_to_kind() {
        let store = DraftStore::new();
        seed_both(&store);

        store.clear_for(SaveKind::Workflow);
        let s = store.snapshot();
        assert_eq!(s.workflow_draft, None);
        assert!(s.settings_draft.is_some() && s.is_settings_dirty);

        seed_both(&store);
        store.clear_for(SaveKind::Combined);
        assert!(!store.is_dirty());
    }

    #[test]
    fn workflow_edit_back_to_committed_clears_draft() {
        let store = DraftStore::new();
        let committed = graph("start");
        let committed_fp = json_fingerprint(&committed);

        store.record_workflow_edit(graph("changed"), Some(&committed_fp));
        assert!(store.snapshot().is_workflow_dirty);

        store.record_workflow_edit(committed, Some(&committed_fp));
        let s = store.snapshot();
        assert_eq!(s.workflow_draft, None);
        assert!(!s.is_workflow_dirty);
    }

    #[tokio::test]
    async fn repeated_identical_edit_does_not_notify() {
        let store = DraftStore::new();
        store.record_workflow_edit(graph("x"), None);

        let mut rx = store.subscribe();
        let _ = rx.borrow_and_update();

        store.record_workflow_edit(graph("x"), None);
        assert!(!rx.has_changed().unwrap());

        store.record_workflow_edit(graph("y"), None);
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().workflow_draft.as_ref().map(|d| d.config.clone()),
            Some(graph("y"))
        );
    }

    #[test]
    fn settings_edit_marks_dirty() {
        let store = DraftStore::new();
        store.record_settings_edit(SettingsDraft {
            llm_enabled: true,
            ..Default::default()
        });

        let s = store.snapshot();
        assert!(s.is_settings_dirty);
        assert!(s.settings_draft.unwrap().llm_enabled);
    }

    #[test]
    fn unload_warns_only_while_dirty() {
        let store = DraftStore::new();
        assert_eq!(store.before_unload(), UnloadDecision::Allow);

        store.record_settings_edit(SettingsDraft::default());
        assert_matches!(store.before_unload(), UnloadDecision::Warn { .. });

        store.clear_all_drafts();
        assert_eq!(store.before_unload(), UnloadDecision::Allow);
    }
}
