//! Repository for the `agent_config_versions` table.

use sqlx::{PgPool, Postgres, Transaction};
use callflow_core::types::DbId;

use crate::models::config_version::{ConfigVersion, CreateConfigVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, agent_id, version, config_json, global_prompt, rag_enabled, \
    rag_config_id, voice_config_id, notes, created_by, is_active, created_at, updated_at";

/// Provides insert, lookup and activation operations for configuration versions.
pub struct ConfigVersionRepo;

impl ConfigVersionRepo {
    // ── Insert ───────────────────────────────────────────────────────

    /// Insert a new inactive version, auto-assigning the next version number.
    pub async fn create(
        pool: &PgPool,
        input: &CreateConfigVersion,
    ) -> Result<ConfigVersion, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_agent(&mut tx, input.agent_id).await?;
        let version = Self::insert(&mut tx, input, false).await?;
        tx.commit().await?;
        Ok(version)
    }

    /// Insert a new version and make it the agent's only active version.
    pub async fn create_active(
        pool: &PgPool,
        input: &CreateConfigVersion,
    ) -> Result<ConfigVersion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::lock_agent(&mut tx, input.agent_id).await?;
        Self::deactivate_all(&mut tx, input.agent_id).await?;
        let version = Self::insert(&mut tx, input, true).await?;

        tx.commit().await?;
        tracing::debug!(
            agent_id = input.agent_id,
            version_id = version.id,
            version = version.version,
            "Created active config version"
        );
        Ok(version)
    }

    /// Lock the agent row for the rest of `tx`. Every write to an agent's
    /// versions takes this lock first, so numbering and the active marker
    /// change one transaction at a time.
    async fn lock_agent(
        tx: &mut Transaction<'_, Postgres>,
        agent_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT id FROM agents WHERE id = $1 FOR UPDATE")
            .bind(agent_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Insert within `tx`, which must already hold the agent lock.
    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateConfigVersion,
        is_active: bool,
    ) -> Result<ConfigVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO agent_config_versions
                (agent_id, version, config_json, global_prompt, rag_enabled,
                 rag_config_id, voice_config_id, notes, created_by, is_active)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version), 0) + 1 FROM agent_config_versions WHERE agent_id = $1),
                $2, $3, $4, $5, $6, $7, $8, $9
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(input.agent_id)
            .bind(&input.config_json)
            .bind(&input.global_prompt)
            .bind(input.rag_enabled)
            .bind(input.rag_config_id)
            .bind(input.voice_config_id)
            .bind(&input.notes)
            .bind(&input.created_by)
            .bind(is_active)
            .fetch_one(&mut **tx)
            .await
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Find a version by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConfigVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agent_config_versions WHERE id = $1");
        sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an agent's version by its per-agent version number.
    pub async fn find_by_version(
        pool: &PgPool,
        agent_id: DbId,
        version: i32,
    ) -> Result<Option<ConfigVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agent_config_versions WHERE agent_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(agent_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// Find the agent's currently active version (if any).
    pub async fn find_active(
        pool: &PgPool,
        agent_id: DbId,
    ) -> Result<Option<ConfigVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agent_config_versions WHERE agent_id = $1 AND is_active = true"
        );
        sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(agent_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the agent's highest-numbered version (if any).
    pub async fn find_latest(
        pool: &PgPool,
        agent_id: DbId,
    ) -> Result<Option<ConfigVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agent_config_versions
             WHERE agent_id = $1
             ORDER BY version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(agent_id)
            .fetch_optional(pool)
            .await
    }

    /// List all versions for an agent, newest first.
    pub async fn list_for_agent(
        pool: &PgPool,
        agent_id: DbId,
    ) -> Result<Vec<ConfigVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agent_config_versions
             WHERE agent_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(agent_id)
            .fetch_all(pool)
            .await
    }

    // ── Activation ───────────────────────────────────────────────────

    /// Make `version_id` the agent's only active version.
    ///
    /// Returns `None` (and changes nothing) if `version_id` does not belong
    /// to `agent_id`.
    pub async fn activate(
        pool: &PgPool,
        agent_id: DbId,
        version_id: DbId,
    ) -> Result<Option<ConfigVersion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM agent_config_versions WHERE id = $1 AND agent_id = $2",
        )
        .bind(version_id)
        .bind(agent_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        Self::lock_agent(&mut tx, agent_id).await?;
        Self::deactivate_all(&mut tx, agent_id).await?;

        let query = format!(
            "UPDATE agent_config_versions SET is_active = true
             WHERE id = $1 AND agent_id = $2
             RETURNING {COLUMNS}"
        );
        let activated = sqlx::query_as::<_, ConfigVersion>(&query)
            .bind(version_id)
            .bind(agent_id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(activated)
    }

    async fn deactivate_all(
        tx: &mut Transaction<'_, Postgres>,
        agent_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE agent_config_versions SET is_active = false \
             WHERE agent_id = $1 AND is_active = true",
        )
        .bind(agent_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
