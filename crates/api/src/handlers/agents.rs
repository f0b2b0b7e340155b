//! Handlers for the `/agents` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use callflow_core::agent_config;
use callflow_core::types::DbId;
use callflow_db::models::agent::{AgentDetail, CreateAgent};
use callflow_db::repositories::{AgentRepo, ConfigVersionRepo};

use super::ensure_agent_exists;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /agents`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// POST /agents
pub async fn create_agent(
    State(state): State<AppState>,
    Json(body): Json<CreateAgentRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    agent_config::validate_agent_name(&body.name)?;

    let agent = AgentRepo::create(
        &state.pool,
        &CreateAgent {
            name: body.name.trim().to_string(),
            description: body.description,
        },
    )
    .await?;

    tracing::info!(agent_id = agent.id, name = %agent.name, "Agent created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: agent })))
}

/// GET /agents
pub async fn list_agents(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let agents = AgentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: agents }))
}

/// GET /agents/{agent_id}
///
/// Returns the agent with its active version, or `activeVersion: null` when
/// nothing has been activated yet.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let agent = ensure_agent_exists(&state.pool, agent_id).await?;
    let active_version = ConfigVersionRepo::find_active(&state.pool, agent_id).await?;

    Ok(Json(DataResponse {
        data: AgentDetail {
            agent,
            active_version,
        },
    }))
}
