//! Route definitions for agents and their configuration versions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{agents, config_versions, export};
use crate::state::AppState;

/// Routes mounted at `/agents`.
///
/// ```text
/// GET    /                                          -> list_agents
/// POST   /                                          -> create_agent
/// GET    /{agent_id}                                -> get_agent
/// GET    /{agent_id}/versions                       -> list_versions
/// POST   /{agent_id}/versions                       -> commit_version
/// PUT    /{agent_id}/versions/{version_id}/activate -> activate_version
/// GET    /{agent_id}/export                         -> export_agent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agents::list_agents).post(agents::create_agent))
        .route("/{agent_id}", get(agents::get_agent))
        .route(
            "/{agent_id}/versions",
            get(config_versions::list_versions).post(config_versions::commit_version),
        )
        .route(
            "/{agent_id}/versions/{version_id}/activate",
            put(config_versions::activate_version),
        )
        .route("/{agent_id}/export", get(export::export_agent))
}

