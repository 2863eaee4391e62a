//! Repository for the trained-model registry.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateModelRecord, ModelRecord};

/// Repository for `models` operations.
pub struct ModelRepository;

impl ModelRepository {
    /// Registers a new model artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        pool: &PgPool,
        input: CreateModelRecord,
    ) -> Result<ModelRecord, sqlx::Error> {
        let id = Uuid::new_v4();

        sqlx::query_as(
            "INSERT INTO models (id, name, version, artifact_path, training_config, metrics) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, version, artifact_path, training_config, metrics, trained_at",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.version)
        .bind(&input.artifact_path)
        .bind(&input.training_config)
        .bind(&input.metrics)
        .fetch_one(pool)
        .await
    }

    /// Gets the next version number for a model name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn next_version(pool: &PgPool, name: &str) -> Result<i32, sqlx::Error> {
        let max_version: Option<i32> =
            sqlx::query_scalar("SELECT MAX(version) FROM models WHERE name = $1")
                .bind(name)
                .fetch_one(pool)
                .await?;

        Ok(max_version.unwrap_or(0) + 1)
    }

    /// Gets the latest registered version of a model by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_latest(pool: &PgPool, name: &str) -> Result<Option<ModelRecord>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, name, version, artifact_path, training_config, metrics, trained_at \
             FROM models \
             WHERE name = $1 \
             ORDER BY version DESC \
             LIMIT 1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Lists all versions of a model, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_versions(pool: &PgPool, name: &str) -> Result<Vec<ModelRecord>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, name, version, artifact_path, training_config, metrics, trained_at \
             FROM models \
             WHERE name = $1 \
             ORDER BY version DESC",
        )
        .bind(name)
        .fetch_all(pool)
        .await
    }
}
