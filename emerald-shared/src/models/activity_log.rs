//! Audit trail of portal writes
//!
//! Entries are append-only. Handlers record them after the main write has
//! succeeded; a failure to record is logged and never fails the request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,

    /// Verb, e.g. `create`
    pub action: String,

    /// Table-like resource name, e.g. `invoice`
    pub resource_type: String,

    pub resource_id: Option<Uuid>,
    pub changes: JsonValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<Uuid>,
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_id: Option<Uuid>,
    pub changes: JsonValue,
}

impl ActivityLog {
    pub async fn record(pool: &PgPool, entry: NewActivity) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (user_id, action, resource_type, resource_id, changes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, action, resource_type, resource_id, changes, created_at
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.resource_type)
        .bind(entry.resource_id)
        .bind(&entry.changes)
        .fetch_one(pool)
        .await
    }

    /// Records an entry, logging instead of returning any error
    pub async fn record_best_effort(pool: &PgPool, entry: NewActivity) {
        let action = entry.action;
        let resource_type = entry.resource_type;
        let resource_id = entry.resource_id;

        if let Err(e) = Self::record(pool, entry).await {
            error!(
                error = %e,
                action,
                resource_type,
                resource_id = ?resource_id,
                "Failed to record activity"
            );
        }
    }

    /// Most recent entries of a user
    pub async fn list_recent(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, user_id, action, resource_type, resource_id, changes, created_at
            FROM activity_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
