//! Public portfolio entries shown on the marketing site
//!
//! Only published, non-deleted rows are ever listed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::types::ProductType;
use crate::slug::slugify;

const COLUMNS: &str = "id, title, slug, description, category, featured_image_url, client_name, \
     features, technologies, featured, is_published, published_at, created_at, updated_at, deleted_at";

/// Default page size for public listings
pub const DEFAULT_PAGE_SIZE: i64 = 12;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PortfolioProject {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub category: ProductType,
    pub featured_image_url: Option<String>,
    pub client_name: Option<String>,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CreatePortfolioProject {
    pub title: String,
    pub description: Option<String>,
    pub category: ProductType,
    pub featured_image_url: Option<String>,
    pub client_name: Option<String>,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
}

/// Listing filter and page window
#[derive(Debug, Clone, Copy)]
pub struct PortfolioFilter {
    pub category: Option<ProductType>,

    /// Only featured entries when true
    pub featured_only: bool,

    pub limit: i64,
    pub offset: i64,
}

impl Default for PortfolioFilter {
    fn default() -> Self {
        Self {
            category: None,
            featured_only: false,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// One page of entries plus the number matching the filter
#[derive(Debug, Clone)]
pub struct PortfolioPage {
    pub entries: Vec<PortfolioProject>,
    pub total: i64,
}

impl PortfolioProject {
    /// Published entries, newest first
    pub async fn list_published(
        pool: &PgPool,
        filter: PortfolioFilter,
    ) -> Result<PortfolioPage, sqlx::Error> {
        const FILTER: &str = r#"
            WHERE is_published = TRUE
              AND deleted_at IS NULL
              AND ($1::product_type IS NULL OR category = $1)
              AND (NOT $2 OR featured = TRUE)
        "#;

        let entries = sqlx::query_as::<_, PortfolioProject>(&format!(
            "SELECT {COLUMNS} FROM portfolio_projects {FILTER} \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(filter.category)
        .bind(filter.featured_only)
        .bind(filter.limit.max(0))
        .bind(filter.offset.max(0))
        .fetch_all(pool)
        .await?;

        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM portfolio_projects {FILTER}"))
                .bind(filter.category)
                .bind(filter.featured_only)
                .fetch_one(pool)
                .await?;

        Ok(PortfolioPage { entries, total })
    }

    /// Inserts an entry, published immediately
    pub async fn create(pool: &PgPool, data: CreatePortfolioProject) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PortfolioProject>(&format!(
            r#"
            INSERT INTO portfolio_projects
                (title, slug, description, category, featured_image_url, client_name, features, technologies, is_published, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, NOW())
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&data.title)
        .bind(slugify(&data.title))
        .bind(&data.description)
        .bind(data.category)
        .bind(&data.featured_image_url)
        .bind(&data.client_name)
        .bind(&data.features)
        .bind(&data.technologies)
        .fetch_one(pool)
        .await
    }

    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE portfolio_projects SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = PortfolioFilter::default();
        assert_eq!(filter.limit, 12);
        assert_eq!(filter.offset, 0);
        assert!(filter.category.is_none());
        assert!(!filter.featured_only);
    }
}
