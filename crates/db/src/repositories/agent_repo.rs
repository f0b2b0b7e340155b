//! Repository for the `agents` table.

use sqlx::PgPool;
use callflow_core::types::DbId;

use crate::models::agent::{Agent, CreateAgent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides create and lookup operations for agents.
pub struct AgentRepo;

impl AgentRepo {
    /// Insert a new agent.
    pub async fn create(pool: &PgPool, input: &CreateAgent) -> Result<Agent, sqlx::Error> {
        let query = format!(
            "INSERT INTO agents (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Agent>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an agent by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Agent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agents WHERE id = $1");
        sqlx::query_as::<_, Agent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all agents ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Agent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agents ORDER BY name, id");
        sqlx::query_as::<_, Agent>(&query).fetch_all(pool).await
    }
}
