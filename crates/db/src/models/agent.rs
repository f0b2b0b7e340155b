//! Agent entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use callflow_core::types::{DbId, Timestamp};

use crate::models::config_version::ConfigVersion;

/// A row from the `agents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new agent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgent {
    pub name: String,
    pub description: Option<String>,
}

/// An agent together with its currently active configuration version.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetail {
    #[serde(flatten)]
    pub agent: Agent,
    pub active_version: Option<ConfigVersion>,
}
