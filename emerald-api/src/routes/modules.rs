//! Module endpoints
//!
//! - `GET /api/modules?projectId=` - a project's modules in display order
//! - `POST /api/modules` - append a module to a project

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery},
    routes::{created, list, non_blank, DataResponse, ListResponse},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use emerald_shared::models::{
    activity_log::{ActivityLog, NewActivity},
    module::{CreateModule, Module},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListModulesQuery {
    #[serde(rename = "projectId")]
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateModuleRequest {
    pub project_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    /// Days
    #[validate(range(min = 0, message = "Estimated duration must not be negative"))]
    pub estimated_duration: Option<i32>,

    pub due_date: Option<NaiveDate>,
}

/// List a project's modules, lowest `order_index` first
///
/// # Errors
///
/// - `400 Bad Request`: `projectId` missing or not a UUID
pub async fn list_modules(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListModulesQuery>,
) -> ApiResult<Json<ListResponse<Module>>> {
    let project_id = query
        .project_id
        .ok_or_else(|| ApiError::BadRequest("Project ID is required".to_string()))?;

    let modules = Module::list_by_project(&state.db, project_id).await?;
    Ok(list(modules))
}

/// Create a module
///
/// # Endpoint
///
/// ```text
/// POST /api/modules
/// Content-Type: application/json
///
/// { "projectId": "…", "name": "Kasir Digital", "estimatedDuration": 14, "dueDate": "2026-04-01" }
/// ```
///
/// The module starts `pending` at 0% and is placed after the project's
/// existing modules.
///
/// # Errors
///
/// - `400 Bad Request`: `projectId` or `name` missing
/// - `404 Not Found`: project unknown or deleted
pub async fn create_module(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateModuleRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<Module>>)> {
    let (Some(project_id), Some(name)) = (req.project_id, non_blank(&req.name)) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: projectId, name".to_string(),
        ));
    };
    req.validate()?;

    let module = Module::create(
        &state.db,
        CreateModule {
            project_id,
            name: name.to_string(),
            description: req.description.clone(),
            estimated_duration: req.estimated_duration,
            due_date: req.due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: None,
            action: "create",
            resource_type: "module",
            resource_id: Some(module.id),
            changes: json!({ "project_id": project_id, "order_index": module.order_index }),
        },
    )
    .await;

    Ok(created(module))
}
