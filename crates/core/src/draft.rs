//! Draft session data held by the agent editing page.
//!
//! These are plain values; the mutable store that owns them lives in the
//! editor crate.

use serde::{Deserialize, Serialize};

use crate::hashing::json_fingerprint;
use crate::settings::SettingsDraft;
use crate::types::DbId;

/// The workflow graph editor's in-progress edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDraft {
    /// Full graph payload; substituted for `config_json` on save.
    pub config: serde_json::Value,
    /// Fingerprint of `config`, used only to detect no-op edits.
    pub serialized_fingerprint: String,
}

impl WorkflowDraft {
    pub fn new(config: serde_json::Value) -> Self {
        let serialized_fingerprint = json_fingerprint(&config);
        Self {
            config,
            serialized_fingerprint,
        }
    }
}

/// Both surfaces' drafts plus the version they were built on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSession {
    pub workflow_draft: Option<WorkflowDraft>,
    pub is_workflow_dirty: bool,
    pub settings_draft: Option<SettingsDraft>,
    pub is_settings_dirty: bool,
    pub base_version_id: Option<DbId>,
}

impl DraftSession {
    pub fn is_dirty(&self) -> bool {
        self.is_workflow_dirty || self.is_settings_dirty
    }

    /// Drop both drafts and both dirty flags. The base version is kept.
    pub fn clear_drafts(&mut self) {
        self.workflow_draft = None;
        self.is_workflow_dirty = false;
        self.settings_draft = None;
        self.is_settings_dirty = false;
    }

    /// The save kind covering every dirty surface, or `None` when clean.
    pub fn dirty_kind(&self) -> Option<SaveKind> {
        SaveKind::from_dirty(self.is_workflow_dirty, self.is_settings_dirty)
    }
}

/// Which surface(s) a save commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Workflow,
    Settings,
    Combined,
}

impl SaveKind {
    pub fn from_dirty(workflow_dirty: bool, settings_dirty: bool) -> Option<Self> {
        match (workflow_dirty, settings_dirty) {
            (true, true) => Some(Self::Combined),
            (true, false) => Some(Self::Workflow),
            (false, true) => Some(Self::Settings),
            (false, false) => None,
        }
    }

    pub fn includes_workflow(self) -> bool {
        matches!(self, Self::Workflow | Self::Combined)
    }

    pub fn includes_settings(self) -> bool {
        matches!(self, Self::Settings | Self::Combined)
    }

    /// Toast shown after a successful commit of this kind.
    pub fn success_message(self, version: i32) -> String {
        match self {
            Self::Workflow => format!("Workflow saved as version {version}"),
            Self::Settings => format!("Settings saved as version {version}"),
            Self::Combined => format!("Workflow and settings saved as version {version}"),
        }
    }
}

/// A navigation deferred until the user answers the unsaved-changes prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub target_path: String,
}
