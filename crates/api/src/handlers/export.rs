//! Handler for exporting an agent configuration snapshot.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use callflow_core::agent_config;
use callflow_core::error::CoreError;
use callflow_core::export::{AgentExport, EXPORT_FORMAT_VERSION};
use callflow_core::types::DbId;
use callflow_db::repositories::ConfigVersionRepo;

use super::ensure_agent_exists;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /agents/{agent_id}/export`.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Version number to export. Defaults to the active version, then the
    /// latest one.
    pub version: Option<i32>,
}

/// GET /agents/{agent_id}/export
pub async fn export_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<DbId>,
    Query(params): Query<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let agent = ensure_agent_exists(&state.pool, agent_id).await?;

    let version = match params.version {
        Some(number) => {
            agent_config::validate_version_number(number)?;
            ConfigVersionRepo::find_by_version(&state.pool, agent_id, number)
                .await?
                .ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "Agent {agent_id} has no version {number}"
                    ))
                })?
        }
        None => match ConfigVersionRepo::find_active(&state.pool, agent_id).await? {
            Some(active) => active,
            None => ConfigVersionRepo::find_latest(&state.pool, agent_id)
                .await?
                .ok_or(AppError::Core(CoreError::Conflict(format!(
                    "Agent {agent_id} has no configuration versions to export"
                ))))?,
        },
    };

    tracing::info!(agent_id, version = version.version, "Agent configuration exported");

    Ok(Json(DataResponse {
        data: AgentExport {
            format_version: EXPORT_FORMAT_VERSION,
            agent_name: agent.name,
            version: version.version,
            exported_at: chrono::Utc::now(),
            config_json: version.config_json,
            global_prompt: version.global_prompt,
            rag_enabled: version.rag_enabled,
            rag_config_id: version.rag_config_id,
            voice_config_id: version.voice_config_id,
        },
    }))
}
