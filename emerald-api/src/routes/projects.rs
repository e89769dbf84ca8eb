//! Project endpoints
//!
//! - `GET /api/projects?userId=` - a customer's projects, newest first
//! - `POST /api/projects` - create a project
//! - `GET /api/projects/:id` - one project with its modules
//! - `PATCH /api/projects/:id` - partial update (owner or admin)
//! - `DELETE /api/projects/:id` - soft delete (owner or admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    routes::{created, list, non_blank, ok, DataResponse, ListResponse},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::NaiveDate;
use emerald_shared::{
    auth::jwt::AuthUser,
    models::{
        activity_log::{ActivityLog, NewActivity},
        module::Module,
        project::{CreateProject, Project, UpdateProject},
        types::{ProductType, ProjectStatus},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub project_type: Option<ProductType>,

    pub description: Option<String>,

    /// Whole rupiah
    #[validate(range(min = 0, message = "Budget must not be negative"))]
    pub budget_amount: Option<i64>,

    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub status: Option<ProjectStatus>,

    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i32>,

    #[validate(range(min = 0, message = "Budget must not be negative"))]
    pub budget_amount: Option<i64>,

    #[validate(range(min = 0, message = "Spent amount must not be negative"))]
    pub spent_amount: Option<i64>,

    pub due_date: Option<NaiveDate>,
}

/// Project with its modules in display order
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub modules: Vec<Module>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResource {
    pub id: Uuid,
}

/// List a customer's projects
///
/// # Endpoint
///
/// ```text
/// GET /api/projects?userId=6f1d3a54-...
/// ```
///
/// # Response
///
/// ```json
/// { "success": true, "data": [{ "id": "...", "name": "Toko Retail", "type": "pos", ... }], "count": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `userId` missing or not a UUID
pub async fn list_projects(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListProjectsQuery>,
) -> ApiResult<Json<ListResponse<Project>>> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("User ID is required".to_string()))?;

    let projects = Project::list_by_user(&state.db, user_id).await?;
    Ok(list(projects))
}

/// Create a project
///
/// # Endpoint
///
/// ```text
/// POST /api/projects
/// Content-Type: application/json
///
/// {
///   "userId": "6f1d3a54-...",
///   "name": "Toko Retail Modern",
///   "type": "pos",
///   "description": "Kasir untuk 3 cabang",
///   "budget_amount": 12000000,
///   "due_date": "2026-06-30"
/// }
/// ```
///
/// Responds `201` with the stored project: slug derived from the name,
/// status `planning`, progress 0.
///
/// # Errors
///
/// - `400 Bad Request`: `userId`, `name` or `type` missing, unknown type,
///   negative budget
pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<Project>>)> {
    let (Some(user_id), Some(name), Some(project_type)) =
        (req.user_id, non_blank(&req.name), req.project_type)
    else {
        return Err(ApiError::BadRequest(
            "Missing required fields: userId, name, type".to_string(),
        ));
    };
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            user_id,
            name: name.to_string(),
            project_type,
            description: req.description.clone(),
            budget_amount: req.budget_amount.unwrap_or(0),
            due_date: req.due_date,
        },
    )
    .await?;

    info!(project_id = %project.id, %user_id, slug = %project.slug, "Project created");
    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: Some(user_id),
            action: "create",
            resource_type: "project",
            resource_id: Some(project.id),
            changes: json!({ "name": project.name, "type": project.project_type }),
        },
    )
    .await;

    Ok(created(project))
}

/// Get a project with its modules
///
/// # Errors
///
/// - `404 Not Found`: unknown or deleted project
pub async fn get_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<DataResponse<ProjectDetail>>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    let modules = Module::list_by_project(&state.db, project.id).await?;

    Ok(ok(ProjectDetail { project, modules }))
}

/// Update a project
///
/// # Endpoint
///
/// ```text
/// PATCH /api/projects/:id
/// Authorization: Bearer <token of the owner or the admin>
/// Content-Type: application/json
///
/// { "status": "in-progress", "progress": 40 }
/// ```
///
/// Renaming a project regenerates its slug.
///
/// # Errors
///
/// - `400 Bad Request`: empty body, blank name, progress outside 0-100,
///   negative amounts
/// - `401 Unauthorized`: missing or invalid token
/// - `403 Forbidden`: caller is neither owner nor admin
/// - `404 Not Found`: unknown or deleted project
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> ApiResult<Json<DataResponse<Project>>> {
    let name = req
        .name
        .as_ref()
        .map(|_| {
            non_blank(&req.name)
                .map(str::to_string)
                .ok_or_else(|| ApiError::BadRequest("Name must not be empty".to_string()))
        })
        .transpose()?;
    req.validate()?;

    let update = UpdateProject {
        name,
        description: req.description,
        status: req.status,
        progress: req.progress,
        budget_amount: req.budget_amount,
        spent_amount: req.spent_amount,
        due_date: req.due_date,
    };
    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    owned_project(&state, id, &user, "update").await?;

    let changes = json!({
        "name": update.name,
        "status": update.status,
        "progress": update.progress,
    });

    let project = Project::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: Some(user.id),
            action: "update",
            resource_type: "project",
            resource_id: Some(project.id),
            changes,
        },
    )
    .await;

    Ok(ok(project))
}

/// Soft-delete a project
///
/// Requires a bearer token of the project's owner or of the admin.
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token
/// - `403 Forbidden`: caller is neither owner nor admin
/// - `404 Not Found`: unknown or already deleted project
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<DataResponse<DeletedResource>>> {
    owned_project(&state, id, &user, "delete").await?;

    if !Project::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    info!(project_id = %id, deleted_by = %user.id, "Project deleted");
    ActivityLog::record_best_effort(
        &state.db,
        NewActivity {
            user_id: Some(user.id),
            action: "delete",
            resource_type: "project",
            resource_id: Some(id),
            changes: json!({}),
        },
    )
    .await;

    Ok(ok(DeletedResource { id }))
}

/// Loads a live project the caller may change
async fn owned_project(
    state: &AppState,
    id: Uuid,
    user: &AuthUser,
    action: &str,
) -> ApiResult<Project> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if project.user_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden(format!(
            "Not allowed to {} this project",
            action
        )));
    }

    Ok(project)
}
