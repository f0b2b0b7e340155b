//! Agent configuration export snapshot and file naming.
//!
//! The server builds an [`AgentExport`] from a stored version; the editor
//! writes it to a pretty-printed JSON file named by [`export_file_name`].

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Format version stamped into every export.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// Fallback file stem when an agent name sanitizes to nothing.
pub const FALLBACK_FILE_STEM: &str = "agent";

// ---------------------------------------------------------------------------
// Export envelope
// ---------------------------------------------------------------------------

/// A portable snapshot of one configuration version of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentExport {
    pub format_version: u32,
    pub agent_name: String,
    /// Version number (not id) of the exported configuration.
    pub version: i32,
    pub exported_at: Timestamp,
    pub config_json: serde_json::Value,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

/// Reduce an agent name to a safe, lowercase file stem.
///
/// Runs of non-alphanumeric characters collapse to a single `_`; leading
/// and trailing underscores are trimmed.
///
/// ```
/// use callflow_core::export::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Support Bot (EU)"), "support_bot_eu");
/// assert_eq!(sanitize_file_name("***"), "agent");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    if stem.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem
    }
}

/// File name for an export: `{sanitized_agent_name}_v{version}.json`.
pub fn export_file_name(agent_name: &str, version: i32) -> String {
    format!("{}_v{version}.json", sanitize_file_name(agent_name))
}
