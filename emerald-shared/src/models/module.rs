//! Project modules
//!
//! A module is one deliverable inside a project (a cashier screen, an
//! inventory service, ...). Modules are ordered by `order_index`, assigned
//! on creation as the project's current maximum plus one.
//!
//! Creation locks the parent project row for the duration of the
//! transaction, so concurrent inserts into the same project serialize and
//! never share an `order_index`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::types::ModuleStatus;
use crate::slug::slugify;

const COLUMNS: &str = "id, project_id, name, slug, description, estimated_duration, due_date, \
     status, progress, order_index, created_at, updated_at, deleted_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Module {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,

    /// Estimated effort in days
    pub estimated_duration: Option<i32>,

    pub due_date: Option<NaiveDate>,
    pub status: ModuleStatus,
    pub progress: i32,

    /// 1-based position within the project
    pub order_index: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreateModule {
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub estimated_duration: Option<i32>,
    pub due_date: Option<NaiveDate>,
}

impl Module {
    /// Appends a module to a project
    ///
    /// Returns `None` when the project does not exist or is deleted.
    pub async fn create(pool: &PgPool, data: CreateModule) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
                .bind(data.project_id)
                .fetch_optional(&mut *tx)
                .await?;

        if project.is_none() {
            return Ok(None);
        }

        // Deleted modules keep their slot; indexes are never reused
        let (order_index,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(order_index), 0) + 1 FROM modules WHERE project_id = $1",
        )
        .bind(data.project_id)
        .fetch_one(&mut *tx)
        .await?;

        let module = sqlx::query_as::<_, Module>(&format!(
            r#"
            INSERT INTO modules (project_id, name, slug, description, estimated_duration, due_date, status, progress, order_index)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', 0, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.project_id)
        .bind(&data.name)
        .bind(slugify(&data.name))
        .bind(&data.description)
        .bind(data.estimated_duration)
        .bind(data.due_date)
        .bind(order_index)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            module_id = %module.id,
            project_id = %module.project_id,
            order_index,
            "Module created"
        );
        Ok(Some(module))
    }

    /// Live modules of a project in display order
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Module>(&format!(
            r#"
            SELECT {COLUMNS} FROM modules
            WHERE project_id = $1 AND deleted_at IS NULL
            ORDER BY order_index ASC
            "#
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
