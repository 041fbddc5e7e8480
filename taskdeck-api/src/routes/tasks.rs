/// Per-user task endpoints
///
/// All routes here sit behind the JWT middleware and carry the owner in the
/// path. Every handler authorizes the path-declared owner against the token
/// identity before touching storage, and every single-task statement is
/// additionally scoped to the owner id, so a task under another user answers
/// exactly like a task that does not exist.
///
/// # Endpoints
///
/// - `GET    /api/:user_id/tasks` - List with filters, search, and sorting
/// - `POST   /api/:user_id/tasks` - Create
/// - `GET    /api/:user_id/tasks/:task_id` - Fetch one
/// - `PUT    /api/:user_id/tasks/:task_id` - Partial update
/// - `DELETE /api/:user_id/tasks/:task_id` - Delete
/// - `PATCH  /api/:user_id/tasks/:task_id/complete` - Toggle completion

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{extractor::AuthenticatedUser, guard},
    models::task::{CreateTask, Priority, Task, TaskListQuery, UpdateTask},
};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (must be non-empty)
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (default: medium)
    #[serde(default)]
    pub priority: Priority,

    /// Optional category
    pub category: Option<String>,

    /// Completion flag (default: false)
    #[serde(default)]
    pub completed: bool,
}

/// Toggle completion response
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleCompletionResponse {
    /// Task id
    pub id: i64,

    /// New completion state
    pub completed: bool,

    /// Refreshed mutation timestamp
    pub updated_at: DateTime<Utc>,
}

/// Authorizes the path-declared owner and resolves it to a storage id
///
/// The guard compares canonical strings; parsing happens only after the
/// identity check has passed.
fn resolve_owner(path_user_id: &str, identity: &AuthenticatedUser) -> ApiResult<i64> {
    guard::authorize_owner(path_user_id, identity)?;

    path_user_id
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Invalid user id".to_string()))
}

/// List tasks with optional filters, search, and sorting
///
/// Query parameters: `status` (all|pending|completed), `priority`
/// (high|medium|low), `category`, `search`, `sort_by`
/// (createdAt|priority|title), `sort_order` (asc|desc).
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let owner_id = resolve_owner(&user_id, &identity)?;

    tracing::debug!(owner_id, ?query, "Listing tasks");

    let tasks = Task::list(&state.db, owner_id, &query).await?;

    Ok(Json(tasks))
}

/// Create a new task for the authenticated user
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let owner_id = resolve_owner(&user_id, &identity)?;

    req.validate()?;

    let task = Task::create(
        &state.db,
        owner_id,
        CreateTask {
            title: req.title,
            description: req.description,
            priority: req.priority,
            category: req.category,
            completed: req.completed,
        },
    )
    .await?;

    tracing::info!(owner_id, task_id = task.id, "Created task");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Fetch a single task by id
///
/// # Errors
///
/// - `404 Not Found`: task absent or owned by a different user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
) -> ApiResult<Json<Task>> {
    let owner_id = resolve_owner(&user_id, &identity)?;

    let task = Task::find_by_id_and_owner(&state.db, task_id, owner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Partially update a task
///
/// Only fields present in the payload are written; `updated_at` is always
/// refreshed.
///
/// # Errors
///
/// - `404 Not Found`: task absent or owned by a different user
/// - `422 Unprocessable Entity`: empty title
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let owner_id = resolve_owner(&user_id, &identity)?;

    // Title stays mandatory through updates
    if let Some(ref title) = req.title {
        if title.trim().is_empty() {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "title".to_string(),
                message: "Title must not be empty".to_string(),
            }]));
        }
    }

    let task = Task::update(&state.db, task_id, owner_id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(owner_id, task_id, "Updated task");

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: task absent or owned by a different user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    let owner_id = resolve_owner(&user_id, &identity)?;

    let deleted = Task::delete(&state.db, task_id, owner_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(owner_id, task_id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}

/// Toggle the completion status of a task
///
/// Flips the flag, refreshes `updated_at`, and returns the new state.
///
/// # Errors
///
/// - `404 Not Found`: task absent or owned by a different user
pub async fn toggle_task_completion(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedUser>,
    Path((user_id, task_id)): Path<(String, i64)>,
) -> ApiResult<Json<ToggleCompletionResponse>> {
    let owner_id = resolve_owner(&user_id, &identity)?;

    let task = Task::toggle_completed(&state.db, task_id, owner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(ToggleCompletionResponse {
        id: task.id,
        completed: task.completed,
        updated_at: task.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(user_id: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user_id.to_string(),
            email: "user@example.com".to_string(),
        }
    }

    #[test]
    fn test_resolve_owner_match() {
        let owner = resolve_owner("42", &identity("42")).unwrap();
        assert_eq!(owner, 42);
    }

    #[test]
    fn test_resolve_owner_mismatch_is_forbidden() {
        let result = resolve_owner("43", &identity("42"));
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_resolve_owner_guards_before_parsing() {
        // A non-numeric path id that doesn't match the identity must be
        // Forbidden, not BadRequest: the guard runs first
        let result = resolve_owner("abc", &identity("42"));
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn test_create_task_request_rejects_empty_title() {
        let req = CreateTaskRequest {
            title: String::new(),
            description: None,
            priority: Priority::Medium,
            category: None,
            completed: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_toggle_response_serialization() {
        let response = ToggleCompletionResponse {
            id: 7,
            completed: true,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["completed"], true);
        assert!(json.get("updated_at").is_some());
    }
}
