pub mod agents;
pub mod config_versions;
pub mod export;

use callflow_core::error::CoreError;
use callflow_core::types::DbId;
use callflow_db::models::agent::Agent;
use callflow_db::repositories::AgentRepo;

use crate::error::{AppError, AppResult};

/// Verify that an agent exists, returning the full row.
pub(crate) async fn ensure_agent_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Agent> {
    AgentRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Agent",
            id,
        })
    })
}
