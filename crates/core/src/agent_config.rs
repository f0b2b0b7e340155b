//! Agent configuration layout constants and validation.
//!
//! This module lives in `core` (zero internal deps) so the repository layer,
//! the HTTP handlers, and the editor client agree on where each settings block
//! lives inside a version's `config_json` payload.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Payload layout
// ---------------------------------------------------------------------------

/// Key of the workflow graph object at the root of `config_json`.
pub const WORKFLOW_KEY: &str = "workflow";

/// Root-level key holding the auto-hangup block.
pub const AUTO_HANGUP_KEY: &str = "auto_hangup";

/// Canonical settings blocks nested under `config_json.workflow`.
pub mod workflow_keys {
    pub const LLM: &str = "llm";
    pub const EXTRACTION_LLM: &str = "extraction_llm";
    pub const TTS: &str = "tts";
    pub const POST_CALL_ANALYSIS: &str = "post_call_analysis";
    pub const WEBHOOKS: &str = "webhooks";
    pub const GLOBAL_INTENTS: &str = "global_intents";
}

/// Root-level keys superseded by the nested `workflow.*` blocks.
///
/// A settings save sets each of these to `null` so downstream consumers only
/// ever read the nested locations.
pub const DEPRECATED_ROOT_KEYS: &[&str] = &["tts", "stt", "llm", "rag"];

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length for commit notes in characters.
pub const MAX_NOTES_LENGTH: usize = 1_000;

/// Maximum length for an agent name in characters.
pub const MAX_AGENT_NAME_LENGTH: usize = 200;

/// Maximum length for the global prompt in characters.
pub const MAX_GLOBAL_PROMPT_LENGTH: usize = 20_000;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a configuration payload is a JSON object.
pub fn validate_config_json(config_json: &serde_json::Value) -> Result<(), CoreError> {
    if config_json.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "config_json must be a JSON object".to_string(),
        ))
    }
}

/// Validate an agent name: must be non-blank and within length limit.
pub fn validate_agent_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Agent name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_AGENT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Agent name exceeds maximum length of {MAX_AGENT_NAME_LENGTH} characters (got {})",
            name.len()
        )));
    }
    Ok(())
}

/// Validate that a version number is positive.
pub fn validate_version_number(version: i32) -> Result<(), CoreError> {
    if version < 1 {
        return Err(CoreError::Validation(format!(
            "version must be at least 1, got {version}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
