pub mod agents;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /agents                                          list, create
/// /agents/{agent_id}                               detail with active version
/// /agents/{agent_id}/versions                      history, commit new version
/// /agents/{agent_id}/versions/{version_id}/activate  activate
/// /agents/{agent_id}/export                        export (?version=N)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/agents", agents::router())
}
