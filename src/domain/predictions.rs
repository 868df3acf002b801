//! Prediction domain - DB queries for the prediction history
//!
//! All functions use the generic Executor pattern, allowing them to work with
//! both `&PgPool` (for standalone queries) and `&mut PgConnection` (for transactions).

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct PredictionRow {
    pub storage_id: i64,
    pub prediction_id: Uuid,
    pub result: String,
    pub suggestion: String,
    pub created_at: DateTime<Utc>,
}

/// Create the predictions table if it does not exist yet
pub async fn ensure_table<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            storage_id BIGSERIAL PRIMARY KEY,
            prediction_id UUID NOT NULL UNIQUE,
            result TEXT NOT NULL,
            suggestion TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(executor)
    .await?;

    Ok(())
}

/// Insert a prediction and return its storage id
pub async fn insert_prediction<'e, E>(
    executor: E,
    prediction_id: Uuid,
    result: &str,
    suggestion: &str,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO predictions (prediction_id, result, suggestion, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING storage_id
        "#,
    )
    .bind(prediction_id)
    .bind(result)
    .bind(suggestion)
    .bind(created_at)
    .fetch_one(executor)
    .await?;

    Ok(row.0)
}

/// List every stored prediction. No ordering is promised to callers.
pub async fn list_predictions<'e, E>(executor: E) -> Result<Vec<PredictionRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT storage_id, prediction_id, result, suggestion, created_at
        FROM predictions
        "#,
    )
    .fetch_all(executor)
    .await
}
