//! Customer dashboard summary and recent activity

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiQuery,
    routes::{list, ok, DataResponse, ListResponse},
};
use axum::{extract::State, Json};
use emerald_shared::models::{activity_log::ActivityLog, dashboard::DashboardStats};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

const DEFAULT_ACTIVITY_LIMIT: i64 = 10;
const MAX_ACTIVITY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,

    /// Clamped to 1-50, defaults to 10
    pub limit: Option<i64>,
}

/// Project and invoice totals for one customer
///
/// ```text
/// GET /api/dashboard/stats?userId=…
///
/// { "success": true, "data": { "totalProjects": 3, "activeProjects": 2, "totalInvoices": 4, "totalInvoiced": 15400000, "paidInvoices": 1 } }
/// ```
pub async fn stats(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> ApiResult<Json<DataResponse<DashboardStats>>> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))?;

    Ok(ok(DashboardStats::for_user(&state.db, user_id).await?))
}

/// A customer's latest activity entries, newest first
///
/// ```text
/// GET /api/dashboard/activity?userId=…&limit=5
/// ```
pub async fn activity(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> ApiResult<Json<ListResponse<ActivityLog>>> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT);

    Ok(list(ActivityLog::list_recent(&state.db, user_id, limit).await?))
}
