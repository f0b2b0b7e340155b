//! Committing a reconciled save as a new configuration version.
//!
//! [`CommitNotesDialog`] holds the pending [`SaveIntent`] while the user
//! writes commit notes; [`CommitService`] turns the intent into a
//! `POST /agents/{id}/versions` call. Neither touches the draft store:
//! clearing drafts after success is the session's job.

use std::sync::Arc;

use callflow_core::agent_config::MAX_NOTES_LENGTH;
use callflow_core::reconcile::SaveIntent;
use callflow_core::types::DbId;

use crate::api::{AgentApi, ApiError, CommitVersionRequest, CommittedVersion};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// Submit was requested with no open commit dialog.
    #[error("No save is in progress")]
    NoSaveInProgress,

    /// A save was requested but no covered surface has changes.
    #[error("There are no unsaved changes to save")]
    NothingToSave,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CommitError {
    /// Message suitable for an error toast, including field-level details.
    pub fn full_message(&self) -> String {
        match self {
            CommitError::Api(err) => err.full_message(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commit-notes dialog
// ---------------------------------------------------------------------------

/// `Closed -> Open -> Submitting -> Closed` on success, back to `Open` on
/// failure, `Open -> Closed` on explicit close.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CommitNotesDialog {
    #[default]
    Closed,
    Open(SaveIntent),
    Submitting(SaveIntent),
}

impl CommitNotesDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, CommitNotesDialog::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, CommitNotesDialog::Submitting(_))
    }

    pub fn intent(&self) -> Option<&SaveIntent> {
        match self {
            CommitNotesDialog::Closed => None,
            CommitNotesDialog::Open(intent) | CommitNotesDialog::Submitting(intent) => {
                Some(intent)
            }
        }
    }

    /// Show the dialog for `intent`, replacing any intent not yet submitted.
    pub fn open(&mut self, intent: SaveIntent) {
        *self = CommitNotesDialog::Open(intent);
    }

    /// Close without committing, discarding the intent. Ignored while a
    /// submit is in flight.
    pub fn close(&mut self) -> Option<SaveIntent> {
        match std::mem::take(self) {
            CommitNotesDialog::Open(intent) => Some(intent),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Move `Open -> Submitting`, handing back a copy of the intent.
    pub fn begin_submit(&mut self) -> Result<SaveIntent, CommitError> {
        match std::mem::take(self) {
            CommitNotesDialog::Open(intent) => {
                *self = CommitNotesDialog::Submitting(intent.clone());
                Ok(intent)
            }
            other => {
                *self = other;
                Err(CommitError::NoSaveInProgress)
            }
        }
    }

    /// `Submitting -> Closed`.
    pub fn finish_success(&mut self) {
        *self = CommitNotesDialog::Closed;
    }

    /// `Submitting -> Open`, keeping the intent for a retry.
    pub fn finish_failure(&mut self) {
        if let CommitNotesDialog::Submitting(intent) = std::mem::take(self) {
            *self = CommitNotesDialog::Open(intent);
        }
    }
}

// ---------------------------------------------------------------------------
// Commit service
// ---------------------------------------------------------------------------

/// Submits reconciled payloads as new, auto-activated versions.
pub struct CommitService {
    api: Arc<dyn AgentApi>,
}

impl CommitService {
    pub fn new(api: Arc<dyn AgentApi>) -> Self {
        Self { api }
    }

    /// Commit `intent` for `agent_id`. Blank notes are sent as `null`; notes
    /// are cut to the server's length limit.
    pub async fn commit(
        &self,
        agent_id: DbId,
        intent: &SaveIntent,
        notes: &str,
    ) -> Result<CommittedVersion, CommitError> {
        let request = build_request(intent, notes);

        match self.api.commit_version(agent_id, &request).await {
            Ok(committed) => {
                tracing::info!(
                    agent_id,
                    version_id = committed.id,
                    version = committed.version,
                    kind = ?intent.kind,
                    "Committed configuration version"
                );
                Ok(committed)
            }
            Err(err) => {
                tracing::warn!(agent_id, kind = ?intent.kind, error = %err.full_message(), "Commit failed");
                Err(err.into())
            }
        }
    }
}

fn build_request(intent: &SaveIntent, notes: &str) -> CommitVersionRequest {
    let notes = notes.trim();
    let notes = (!notes.is_empty()).then(|| notes.chars().take(MAX_NOTES_LENGTH).collect());

    CommitVersionRequest {
        config_json: intent.payload.config_json.clone(),
        notes,
        global_prompt: intent.payload.global_prompt.clone(),
        rag_enabled: intent.payload.rag_enabled,
        rag_config_id: intent.payload.rag_config_id,
        voice_config_id: intent.payload.voice_config_id,
        auto_activate: true,
    }
}
