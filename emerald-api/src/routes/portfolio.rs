//! Portfolio endpoints
//!
//! The listing is public and only ever shows published entries. Creating
//! and deleting entries is reserved for the admin account; the router puts
//! both behind `require_auth` + `require_admin`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::{created, non_blank, ok, projects::DeletedResource, DataResponse},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use emerald_shared::{
    auth::jwt::AuthUser,
    models::{
        activity_log::{ActivityLog, NewActivity},
        portfolio::{CreatePortfolioProject, PortfolioFilter, PortfolioProject, DEFAULT_PAGE_SIZE},
        types::ProductType,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ListPortfolioQuery {
    pub category: Option<String>,

    /// `"true"` restricts the listing to featured entries
    pub featured: Option<String>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortfolioRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub category: Option<String>,

    #[validate(url(message = "featuredImageUrl must be a valid URL"))]
    pub featured_image_url: Option<String>,

    pub client_name: Option<String>,
    pub features: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
}

/// One page of the public portfolio
#[derive(Debug, Serialize)]
pub struct PortfolioListResponse {
    pub success: bool,
    pub data: Vec<PortfolioProject>,

    /// Entries matching the filter across all pages
    pub count: i64,

    pub limit: i64,
    pub offset: i64,
}

/// List published portfolio entries, newest first
///
/// # Endpoint
///
/// ```text
/// GET /api/portfolio?category=fnb&featured=true&limit=6&offset=0
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: unknown category, limit outside 1-100, negative offset
pub async fn list_portfolio(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListPortfolioQuery>,
) -> ApiResult<Json<PortfolioListResponse>> {
    query.validate()?;

    let filter = PortfolioFilter {
        category: non_blank(&query.category)
            .map(str::parse::<ProductType>)
            .transpose()?,
        featured_only: query.featured.as_deref() == Some("true"),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        offset: query.offset.unwrap_or(0),
    };

    let page = PortfolioProject::list_published(&state.db, filter).await?;

    Ok(Json(PortfolioListResponse {
        success: true,
        data: page.entries,
        count: page.total,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

/// Publish a portfolio entry (admin)
///
/// # Endpoint
///
/// ```text
/// POST /api/portfolio
/// Authorization: Bearer <admin access token>
/// Content-Type: application/json
///
/// {
///   "title": "Warung Kopi Nusantara",
///   "category": "fnb",
///   "clientName": "PT Kopi Nusantara",
///   "features": ["Kasir", "Stok bahan"],
///   "technologies": ["Next.js", "PostgreSQL"]
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `title` or `category` missing, unknown category
/// - `401 Unauthorized`: no valid bearer token
/// - `403 Forbidden`: caller is not the admin
pub async fn create_portfolio(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreatePortfolioRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<PortfolioProject>>)> {
    let (Some(title), Some(category)) = (non_blank(&req.title), non_blank(&req.category)) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: title, category".to_string(),
        ));
    };
    req.validate()?;
    let category: ProductType = category.parse()?;

    let entry = PortfolioProject::create(
        &state.db,
        CreatePortfolioProject {
            title: title.to_string(),
            description: req.description.clone(),
            category,
            featured_image_url: req.featured_image_url.clone(),
            client_name: req.client_name.clone(),
            features: req.features.clone().unwrap_or_default(),
            technologies: req.technologies.clone().unwrap_or_default(),
        },
    )
    .await?;

    info!(entry_id = %entry.id, slug = %entry.slug, admin = %user.id, "Portfolio entry published");
    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: Some(user.id),
            action: "create",
            resource_type: "portfolio_project",
            resource_id: Some(entry.id),
            changes: json!({ "title": entry.title, "category": entry.category }),
        },
    )
    .await;

    Ok(created(entry))
}

/// Soft-delete a portfolio entry (admin)
///
/// # Errors
///
/// - `401 Unauthorized` / `403 Forbidden`: as for creation
/// - `404 Not Found`: unknown or already deleted entry
pub async fn delete_portfolio(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<DataResponse<DeletedResource>>> {
    if !PortfolioProject::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Portfolio entry not found".to_string()));
    }

    info!(entry_id = %id, admin = %user.id, "Portfolio entry deleted");
    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: Some(user.id),
            action: "delete",
            resource_type: "portfolio_project",
            resource_id: Some(id),
            changes: json!({}),
        },
    )
    .await;

    Ok(ok(DeletedResource { id }))
}
