/// Task management endpoints
///
/// All routes here sit behind the request authorizer. The acting user for
/// task creation comes from the bound [`AuthContext`], never from the
/// request body, so clients cannot spoof the creator.
///
/// # Endpoints
///
/// - `GET /tasks` - List tasks joined with creator/assignee usernames
/// - `POST /tasks` - Create a task (creator = caller, status = Todo)
/// - `PUT /tasks/:id/status` - Set status (any of the three values)
/// - `PUT /tasks/:id/assign` - Set or clear assignee
/// - `PUT /tasks/:id` - Update title and description

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::middleware::AuthContext,
    models::{
        task::{CreateTask, Task, TaskStatus, TaskWithUsers},
        user::User,
    },
};
use validator::Validate;

/// Create task request
///
/// There is deliberately no creator field; unknown fields are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Create task response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskResponse {
    /// Task ID
    pub id: i64,

    /// Title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Status (always Todo at creation)
    pub status: TaskStatus,

    /// Creator, taken from the authenticated identity
    pub created_by_user_id: i64,
}

/// Status update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Requested status; must be one of Todo, InProgress, Done
    pub new_status: String,
}

/// Status update response
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    /// Task ID
    pub id: i64,

    /// New status
    pub status: TaskStatus,
}

/// Assignment request
///
/// Absent or null `userId` unassigns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    /// Assignee user ID, or null/absent to unassign
    pub user_id: Option<i64>,
}

/// Assignment response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskResponse {
    /// Task ID
    pub id: i64,

    /// Current assignee, if any
    pub assigned_to_user_id: Option<i64>,
}

/// Title/description update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// New description; absent clears the stored one
    pub description: Option<String>,
}

/// Title/description update response
#[derive(Debug, Serialize)]
pub struct UpdateTaskResponse {
    /// Task ID
    pub id: i64,

    /// Title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Status (unchanged by this operation)
    pub status: TaskStatus,
}

/// Lists all tasks with creator and assignee usernames resolved
///
/// Unassigned tasks carry null assignee fields, never an error.
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskWithUsers>>> {
    let tasks = Task::list_with_usernames(&state.db).await?;

    Ok(Json(tasks))
}

/// Creates a task
///
/// The creator is always the authenticated caller and the status always
/// starts at Todo.
///
/// # Errors
///
/// - `400 Bad Request`: empty title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate().map_err(validation_error)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            created_by_user_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, user_id = auth.user_id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            created_by_user_id: task.created_by_user_id,
        }),
    ))
}

/// Sets a task's status
///
/// Set membership is the only validation: any of the three statuses may
/// move to any other, with no ordering constraint. The check happens
/// before any mutation, so a rejected value leaves the stored status
/// untouched.
///
/// # Errors
///
/// - `400 Bad Request`: status outside {Todo, InProgress, Done}
/// - `404 Not Found`: unknown task id
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    let status: TaskStatus = req
        .new_status
        .parse()
        .map_err(|e: taskboard_shared::models::task::InvalidStatus| {
            ApiError::BadRequest(e.to_string())
        })?;

    let task = Task::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(UpdateStatusResponse {
        id: task.id,
        status: task.status,
    }))
}

/// Sets or clears a task's assignee
///
/// Validates assignee existence before writing (read-before-write); a
/// null or absent `userId` unassigns. Self-assignment is legal.
///
/// # Errors
///
/// - `400 Bad Request`: assignee user does not exist
/// - `404 Not Found`: unknown task id
pub async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<Json<AssignTaskResponse>> {
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(user_id) = req.user_id {
        if !User::exists(&state.db, user_id).await? {
            return Err(ApiError::BadRequest("User not found".to_string()));
        }
    }

    let task = Task::update_assignment(&state.db, id, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(AssignTaskResponse {
        id: task.id,
        assigned_to_user_id: task.assigned_to_user_id,
    }))
}

/// Updates a task's title and description
///
/// Status is left unchanged.
///
/// # Errors
///
/// - `400 Bad Request`: empty title
/// - `404 Not Found`: unknown task id
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<UpdateTaskResponse>> {
    req.validate().map_err(validation_error)?;

    let task = Task::update_fields(&state.db, id, req.title, req.description)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(UpdateTaskResponse {
        id: task.id,
        title: task.title,
        description: task.description,
        status: task.status,
    }))
}
