//! Save reconciliation: merge the dirty drafts onto the committed version.
//!
//! Pure and infallible. Ordering is fixed:
//!
//! 1. Start from the committed fields.
//! 2. A dirty workflow draft replaces `config_json` wholesale.
//! 3. A dirty settings draft is then projected into the (possibly replaced)
//!    payload, deprecated root-level blocks are nulled, and the four scalar
//!    fields are taken from the draft.
//!
//! Step 3 running after step 2 means settings blocks win over anything the
//! graph payload carries under the same keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent_config::DEPRECATED_ROOT_KEYS;
use crate::draft::{DraftSession, SaveKind};
use crate::settings;
use crate::types::DbId;

/// The fields of the last committed version that a save builds on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedConfig {
    pub config_json: Value,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
}

/// The single payload a save commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledPayload {
    pub config_json: Value,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
}

impl From<ReconciledPayload> for CommittedConfig {
    fn from(payload: ReconciledPayload) -> Self {
        Self {
            config_json: payload.config_json,
            global_prompt: payload.global_prompt,
            rag_enabled: payload.rag_enabled,
            rag_config_id: payload.rag_config_id,
            voice_config_id: payload.voice_config_id,
        }
    }
}

/// A reconciled save waiting for the user's commit notes.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveIntent {
    pub kind: SaveKind,
    pub payload: ReconciledPayload,
    /// Path to navigate to once the commit succeeds.
    pub navigate_after_save: Option<String>,
}

/// Merge every dirty draft in `session` onto `committed`.
///
/// A dirty flag without a corresponding draft contributes nothing.
pub fn reconcile(committed: &CommittedConfig, session: &DraftSession) -> ReconciledPayload {
    let mut payload = ReconciledPayload {
        config_json: committed.config_json.clone(),
        global_prompt: committed.global_prompt.clone(),
        rag_enabled: committed.rag_enabled,
        rag_config_id: committed.rag_config_id,
        voice_config_id: committed.voice_config_id,
    };

    if session.is_workflow_dirty {
        if let Some(draft) = &session.workflow_draft {
            payload.config_json = draft.config.clone();
        }
    }

    if session.is_settings_dirty {
        if let Some(draft) = &session.settings_draft {
            settings::project_into(&mut payload.config_json, draft);
            null_deprecated_root_keys(&mut payload.config_json);

            payload.global_prompt = draft.global_prompt.clone();
            payload.rag_enabled = draft.rag_enabled;
            payload.rag_config_id = draft.rag_config_id;
            payload.voice_config_id = draft.voice_config_id;
        }
    }

    payload
}

/// Reconcile only the surfaces `kind` covers; drafts outside it are ignored
/// even when dirty.
pub fn reconcile_for(
    kind: SaveKind,
    committed: &CommittedConfig,
    session: &DraftSession,
) -> ReconciledPayload {
    let scoped = DraftSession {
        workflow_draft: session.workflow_draft.clone(),
        is_workflow_dirty: session.is_workflow_dirty && kind.includes_workflow(),
        settings_draft: session.settings_draft.clone(),
        is_settings_dirty: session.is_settings_dirty && kind.includes_settings(),
        base_version_id: session.base_version_id,
    };
    reconcile(committed, &scoped)
}

/// Set the superseded root-level blocks to `null`. The payload is always an
/// object here since [`settings::project_into`] has just run.
fn null_deprecated_root_keys(config_json: &mut Value) {
    if let Value::Object(root) = config_json {
        for key in DEPRECATED_ROOT_KEYS {
            root.insert((*key).to_string(), Value::Null);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
