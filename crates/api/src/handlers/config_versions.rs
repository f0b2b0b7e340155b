//! Handlers for agent configuration versions.
//!
//! Every commit inserts a new immutable row; nothing here updates an
//! existing version's content.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use callflow_core::agent_config::{self, MAX_GLOBAL_PROMPT_LENGTH, MAX_NOTES_LENGTH};
use callflow_core::error::CoreError;
use callflow_core::types::DbId;
use callflow_db::models::config_version::CreateConfigVersion;
use callflow_db::repositories::ConfigVersionRepo;

use super::ensure_agent_exists;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn default_auto_activate() -> bool {
    true
}

fn max_chars(value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new("length")
            .with_message(format!("must be at most {max} characters").into()));
    }
    Ok(())
}

fn validate_notes_length(notes: &str) -> Result<(), ValidationError> {
    max_chars(notes, MAX_NOTES_LENGTH)
}

fn validate_global_prompt_length(prompt: &str) -> Result<(), ValidationError> {
    max_chars(prompt, MAX_GLOBAL_PROMPT_LENGTH)
}

/// Request body for `POST /agents/{agent_id}/versions`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommitVersionRequest {
    pub config_json: serde_json::Value,
    #[validate(custom(function = "validate_notes_length"))]
    pub notes: Option<String>,
    #[validate(custom(function = "validate_global_prompt_length"))]
    pub global_prompt: Option<String>,
    #[serde(default)]
    pub rag_enabled: bool,
    pub rag_config_id: Option<DbId>,
    pub voice_config_id: Option<DbId>,
    #[serde(default = "default_auto_activate")]
    pub auto_activate: bool,
}

/// Response body for a successful commit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedVersion {
    pub id: DbId,
    pub version: i32,
}

// ---------------------------------------------------------------------------
// POST /agents/{agent_id}/versions
// ---------------------------------------------------------------------------

/// Commit a new configuration version.
///
/// With `autoActivate` (the default) the new version becomes the agent's only
/// active version in the same transaction.
pub async fn commit_version(
    State(state): State<AppState>,
    Path(agent_id): Path<DbId>,
    Json(body): Json<CommitVersionRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    agent_config::validate_config_json(&body.config_json)?;
    ensure_agent_exists(&state.pool, agent_id).await?;

    let input = CreateConfigVersion {
        agent_id,
        config_json: body.config_json,
        global_prompt: body.global_prompt,
        rag_enabled: body.rag_enabled,
        rag_config_id: body.rag_config_id,
        voice_config_id: body.voice_config_id,
        notes: body.notes.filter(|n| !n.trim().is_empty()),
        created_by: None,
    };

    let version = if body.auto_activate {
        ConfigVersionRepo::create_active(&state.pool, &input).await?
    } else {
        ConfigVersionRepo::create(&state.pool, &input).await?
    };

    tracing::info!(
        agent_id,
        version_id = version.id,
        version = version.version,
        is_active = version.is_active,
        "Config version committed"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CommittedVersion {
                id: version.id,
                version: version.version,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /agents/{agent_id}/versions
// ---------------------------------------------------------------------------

/// List an agent's version history, newest first.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(agent_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_agent_exists(&state.pool, agent_id).await?;
    let versions = ConfigVersionRepo::list_for_agent(&state.pool, agent_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// PUT /agents/{agent_id}/versions/{version_id}/activate
// ---------------------------------------------------------------------------

/// Make an existing version the agent's active one.
pub async fn activate_version(
    State(state): State<AppState>,
    Path((agent_id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_agent_exists(&state.pool, agent_id).await?;

    let version = ConfigVersionRepo::activate(&state.pool, agent_id, version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ConfigVersion",
            id: version_id,
        }))?;

    tracing::info!(agent_id, version_id, version = version.version, "Config version activated");

    Ok(Json(DataResponse { data: version }))
}
