//! Agent configuration version entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use callflow_core::types::{DbId, Timestamp};

/// A row from the `agent_config_versions` table.
///
/// Versions are immutable once written; only `is_active` ever changes.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigVersion {
    pub id: DbId,
    pub agent_id: DbId,
    pub version: i32,
    pub config_json: serde_json::Value,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new configuration version. The version number is
/// assigned by the repository.
#[derive(Debug, Clone)]
pub struct CreateConfigVersion {
    pub agent_id: DbId,
    pub config_json: serde_json::Value,
    pub global_prompt: Option<String>,
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}
