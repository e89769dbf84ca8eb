//! Customer projects
//!
//! A project is a product build (POS, ERP or F&B) ordered by a customer.
//! Rows are soft-deleted: `deleted_at` is set and every read filters on it.
//!
//! # Example
//!
//! ```no_run
//! use emerald_shared::models::project::{CreateProject, Project};
//! use emerald_shared::models::types::ProductType;
//! use sqlx::PgPool;
//! use uuid::Uuid;
//!
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! let project = Project::create(&pool, CreateProject {
//!     user_id: Uuid::new_v4(),
//!     name: "Toko Retail Modern!".to_string(),
//!     project_type: ProductType::Pos,
//!     description: None,
//!     budget_amount: 12_000_000,
//!     due_date: None,
//! }).await?;
//!
//! assert_eq!(project.slug, "toko-retail-modern");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::types::{ProductType, ProjectStatus};
use crate::slug::slugify;

const COLUMNS: &str = "id, user_id, name, slug, type, description, status, progress, \
     budget_amount, spent_amount, start_date, due_date, created_at, updated_at, deleted_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,

    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub project_type: ProductType,

    pub description: Option<String>,
    pub status: ProjectStatus,

    /// Completion percentage, 0-100
    pub progress: i32,

    /// Whole rupiah
    pub budget_amount: i64,
    pub spent_amount: i64,

    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for [`Project::create`]
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: Uuid,
    pub name: String,
    pub project_type: ProductType,
    pub description: Option<String>,
    pub budget_amount: i64,
    pub due_date: Option<NaiveDate>,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub budget_amount: Option<i64>,
    pub spent_amount: Option<i64>,
    pub due_date: Option<NaiveDate>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.progress.is_none()
            && self.budget_amount.is_none()
            && self.spent_amount.is_none()
            && self.due_date.is_none()
    }
}

impl Project {
    /// Inserts a project in `planning` state with zero progress
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let slug = slugify(&data.name);

        sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (user_id, name, slug, type, description, budget_amount, due_date, status, progress)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'planning', 0)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&slug)
        .bind(data.project_type)
        .bind(&data.description)
        .bind(data.budget_amount)
        .bind(data.due_date)
        .fetch_one(pool)
        .await
    }

    /// Live projects of a user, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {COLUMNS} FROM projects
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Applies a partial update; the slug follows a renamed project
    ///
    /// Returns `None` when the project does not exist or is deleted.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let slug = data.name.as_deref().map(slugify);

        sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                progress = COALESCE($6, progress),
                budget_amount = COALESCE($7, budget_amount),
                spent_amount = COALESCE($8, spent_amount),
                due_date = COALESCE($9, due_date),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&slug)
        .bind(&data.description)
        .bind(data.status)
        .bind(data.progress)
        .bind(data.budget_amount)
        .bind(data.spent_amount)
        .bind(data.due_date)
        .fetch_optional(pool)
        .await
    }

    /// Marks the project deleted; `false` if it was already gone
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
