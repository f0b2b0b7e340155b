//! The agent editing page controller.
//!
//! One [`AgentEditor`] exists per mounted editing page. Methods take
//! `&mut self`, so a save cannot be re-entered while its commit is in
//! flight; the only `.await` points are the HTTP calls.

use std::sync::Arc;

use callflow_core::draft::{PendingNavigation, SaveKind};
use callflow_core::navigation::{NavigationDecision, NavigationIntent};
use callflow_core::reconcile::{self, SaveIntent};
use callflow_core::settings::SettingsDraft;
use callflow_core::types::DbId;

use crate::api::{AgentApi, AgentDetail, ApiError, CommittedVersion, ConfigVersion};
use crate::commit::{CommitError, CommitNotesDialog, CommitService};
use crate::dialog::{ConfirmAction, UnsavedChangesDialog};
use crate::export::{build_export_file, ExportError, ExportFile};
use crate::host::{Navigator, Notification, Notifier};
use crate::interceptor::NavigationInterceptor;
use crate::resolver::{BaseChange, VersionResolver};
use crate::store::{DraftStore, UnloadDecision};

pub struct AgentEditor {
    agent_id: DbId,
    agent_name: Option<String>,
    api: Arc<dyn AgentApi>,
    store: Arc<DraftStore>,
    resolver: VersionResolver,
    interceptor: NavigationInterceptor,
    unsaved_dialog: UnsavedChangesDialog,
    commit_dialog: CommitNotesDialog,
    commit_service: CommitService,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl AgentEditor {
    /// Create the controller with an empty draft session. Call
    /// [`AgentEditor::refresh`] to learn the active version.
    pub fn new(
        agent_id: DbId,
        api: Arc<dyn AgentApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = Arc::new(DraftStore::new());
        Self {
            agent_id,
            agent_name: None,
            resolver: VersionResolver::new(Arc::clone(&store)),
            interceptor: NavigationInterceptor::new(agent_id),
            unsaved_dialog: UnsavedChangesDialog::new(),
            commit_dialog: CommitNotesDialog::default(),
            commit_service: CommitService::new(Arc::clone(&api)),
            api,
            store,
            navigator,
            notifier,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn agent_id(&self) -> DbId {
        self.agent_id
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    /// The shared draft store handed to both editing surfaces.
    pub fn store(&self) -> Arc<DraftStore> {
        Arc::clone(&self.store)
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    pub fn unsaved_dialog(&self) -> &UnsavedChangesDialog {
        &self.unsaved_dialog
    }

    pub fn commit_dialog(&self) -> &CommitNotesDialog {
        &self.commit_dialog
    }

    pub fn pending_navigation(&self) -> Option<&PendingNavigation> {
        self.interceptor.pending()
    }

    /// Settings draft if one exists, otherwise the committed settings.
    pub fn settings_for_form(&self) -> SettingsDraft {
        self.store
            .snapshot()
            .settings_draft
            .unwrap_or_else(|| SettingsDraft::from_committed(self.resolver.committed()))
    }

    // ── Server state ─────────────────────────────────────────────────

    /// Re-fetch agent detail and reconcile the base version with it.
    pub async fn refresh(&mut self) -> Result<BaseChange, ApiError> {
        let detail: AgentDetail = self.api.get_agent(self.agent_id).await?;
        self.agent_name = Some(detail.name.clone());
        Ok(self.resolver.observe(&detail))
    }

    // ── Editing surfaces ─────────────────────────────────────────────

    pub fn edit_workflow(&self, config: serde_json::Value) {
        self.store
            .record_workflow_edit(config, self.resolver.committed_fingerprint());
    }

    pub fn edit_settings(&self, draft: SettingsDraft) {
        self.store.record_settings_edit(draft);
    }

    // ── Navigation guard ─────────────────────────────────────────────

    /// Route-change hook. An intercepted navigation opens the
    /// unsaved-changes prompt; the caller must not navigate.
    pub fn before_route_change(
        &mut self,
        href: Option<&str>,
        intent: NavigationIntent,
    ) -> NavigationDecision {
        let decision = self
            .interceptor
            .before_route_change(href, intent, self.store.is_dirty());

        if let NavigationDecision::Intercept { target_path } = &decision {
            tracing::debug!(agent_id = self.agent_id, target = %target_path, "Navigation intercepted");
            self.unsaved_dialog.open();
        }
        decision
    }

    pub fn before_unload(&self) -> UnloadDecision {
        self.store.before_unload()
    }

    /// Apply the user's answer to the unsaved-changes prompt.
    ///
    /// Ignored unless the prompt is open and idle. `Save` hands over to the
    /// commit-notes dialog and keeps the prompt busy until that save
    /// completes or is cancelled.
    pub fn confirm_unsaved(&mut self, action: ConfirmAction) -> Result<(), CommitError> {
        if !self.unsaved_dialog.accepts_actions() {
            return Ok(());
        }

        match action {
            ConfirmAction::Cancel => {
                self.unsaved_dialog.close();
                self.interceptor.clear_pending();
                Ok(())
            }
            ConfirmAction::Discard => {
                self.store.clear_all_drafts();
                self.unsaved_dialog.close();
                if let Some(pending) = self.interceptor.take_pending() {
                    self.navigator
                        .navigate(&pending.target_path, NavigationIntent::Allowed);
                }
                Ok(())
            }
            ConfirmAction::Save => {
                self.unsaved_dialog.close();
                let target = self.interceptor.take_pending().map(|p| p.target_path);
                match self.begin_save(None, target.clone()) {
                    Ok(_) => {
                        self.unsaved_dialog.set_saving(true);
                        Ok(())
                    }
                    // Drafts were dropped while the prompt was open; there is
                    // nothing left to protect.
                    Err(CommitError::NothingToSave) => {
                        tracing::debug!(agent_id = self.agent_id, "Nothing left to save, continuing");
                        if let Some(path) = target {
                            self.navigator.navigate(&path, NavigationIntent::Allowed);
                        }
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            }
        }
    }

    // ── Saving ───────────────────────────────────────────────────────

    /// Reconcile drafts and open the commit-notes dialog.
    ///
    /// `kind = None` saves every dirty surface. An explicit kind must cover
    /// at least one dirty surface.
    pub fn begin_save(
        &mut self,
        kind: Option<SaveKind>,
        navigate_after_save: Option<String>,
    ) -> Result<SaveKind, CommitError> {
        let session = self.store.snapshot();
        let dirty = session.dirty_kind().ok_or(CommitError::NothingToSave)?;

        let kind = match kind {
            None => dirty,
            Some(kind) => {
                let covers_dirty = (kind.includes_workflow() && session.is_workflow_dirty)
                    || (kind.includes_settings() && session.is_settings_dirty);
                if !covers_dirty {
                    return Err(CommitError::NothingToSave);
                }
                kind
            }
        };

        let payload = reconcile::reconcile_for(kind, self.resolver.committed(), &session);
        self.commit_dialog.open(SaveIntent {
            kind,
            payload,
            navigate_after_save,
        });
        Ok(kind)
    }

    /// Commit the open save with the user's notes.
    ///
    /// On success the committed drafts are cleared, a toast is shown, the
    /// dialog closes, the base advances, and only then does any deferred
    /// navigation run. On failure the dialog stays open and drafts are kept.
    pub async fn submit_commit(&mut self, notes: &str) -> Result<CommittedVersion, CommitError> {
        let intent = self.commit_dialog.begin_submit()?;

        let committed = match self
            .commit_service
            .commit(self.agent_id, &intent, notes)
            .await
        {
            Ok(committed) => committed,
            Err(err) => {
                self.commit_dialog.finish_failure();
                self.notifier.notify(Notification::error(err.full_message()));
                return Err(err);
            }
        };

        self.store.clear_for(intent.kind);
        self.unsaved_dialog.set_saving(false);
        self.notifier.notify(Notification::success(
            intent.kind.success_message(committed.version),
        ));
        self.commit_dialog.finish_success();
        self.resolver
            .record_commit(committed.id, intent.payload.into());

        if let Some(path) = intent.navigate_after_save {
            self.navigator.navigate(&path, NavigationIntent::Allowed);
        }

        Ok(committed)
    }

    /// Close the commit-notes dialog without saving. Drafts are untouched.
    pub fn close_commit_dialog(&mut self) {
        if self.commit_dialog.close().is_some() {
            self.unsaved_dialog.set_saving(false);
            tracing::debug!(agent_id = self.agent_id, "Save cancelled");
        }
    }

    // ── Version history ──────────────────────────────────────────────

    /// Activate an older (or newer) version, then re-fetch detail. Drafts
    /// built on the previous base are discarded by the resolver.
    pub async fn activate_version(&mut self, version_id: DbId) -> Result<ConfigVersion, ApiError> {
        let activated = match self.api.activate_version(self.agent_id, version_id).await {
            Ok(version) => version,
            Err(err) => {
                self.notifier.notify(Notification::error(err.full_message()));
                return Err(err);
            }
        };

        if let Err(err) = self.refresh().await {
            self.notifier.notify(Notification::error(err.full_message()));
            return Err(err);
        }

        self.notifier.notify(Notification::success(format!(
            "Version {} activated",
            activated.version
        )));
        Ok(activated)
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Fetch an export snapshot (active version unless `version` is given)
    /// and build the download file.
    pub async fn export(&self, version: Option<i32>) -> Result<ExportFile, ExportError> {
        let result = match self.api.export_agent(self.agent_id, version).await {
            Ok(export) => build_export_file(&export).map_err(ExportError::from),
            Err(err) => Err(ExportError::from(err)),
        };

        match &result {
            Ok(file) => self
                .notifier
                .notify(Notification::success(format!("Exported {}", file.file_name))),
            Err(err) => self.notifier.notify(Notification::error(format!(
                "Export failed: {}",
                err.full_message()
            ))),
        }
        result
    }
}
