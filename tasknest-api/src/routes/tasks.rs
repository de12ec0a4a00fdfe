/// Task endpoints
///
/// Owner-scoped CRUD over tasks plus the derived listings and the structured
/// export. Every handler runs behind the JWT layer; the owner on create is
/// always taken from the authenticated context, never from the request body,
/// and detail/update/delete verify requester == owner before touching the
/// row.
///
/// # Endpoints
///
/// - `GET /v1/tasks` - List own tasks with overdue/upcoming subsets
/// - `POST /v1/tasks` - Create task
/// - `GET /v1/tasks/export` - Structured listing export
/// - `GET /v1/tasks/:id` - Task detail
/// - `PUT /v1/tasks/:id` - Edit task (owner-only)
/// - `DELETE /v1/tasks/:id` - Delete task (owner-only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{authorization::require_ownership, middleware::AuthContext},
    models::{
        category::Category,
        task::{CreateTask, Task, TaskExport, TaskPriority, TaskStatus, UpdateTask},
    },
    queries,
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 150, message = "Title must be 1-150 characters"))]
    pub title: String,

    /// Free-text description
    #[serde(default)]
    #[validate(length(max = 720, message = "Description must be at most 720 characters"))]
    pub description: String,

    /// Urgency/importance classification
    pub priority: TaskPriority,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Categories to associate; each must belong to the submitter
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Update task request (whole-form edit)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 150, message = "Title must be 1-150 characters"))]
    pub title: String,

    /// New description
    #[serde(default)]
    #[validate(length(max = 720, message = "Description must be at most 720 characters"))]
    pub description: String,

    /// New priority
    pub priority: TaskPriority,

    /// New deadline
    pub deadline: DateTime<Utc>,

    /// New status
    pub status: TaskStatus,

    /// Replacement set of category memberships; each must belong to the
    /// submitter
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Task list response
///
/// The full listing plus the deadline partition, all restricted to the
/// requesting owner.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// All of the owner's tasks, deadline ascending
    pub tasks: Vec<Task>,

    /// Tasks whose deadline has passed
    pub overdue: Vec<Task>,

    /// Tasks whose deadline is now or later
    pub upcoming: Vec<Task>,
}

/// Task detail response
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Urgency/importance classification
    pub priority: TaskPriority,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Completion status
    pub status: TaskStatus,

    /// Categories this task belongs to
    pub categories: Vec<Category>,

    /// Signed seconds until the deadline (negative once expired)
    pub time_left_seconds: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl TaskDetailResponse {
    fn new(task: Task, categories: Vec<Category>, now: DateTime<Utc>) -> Self {
        let time_left_seconds = queries::time_left(task.deadline, now).num_seconds();

        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            priority: task.priority,
            deadline: task.deadline,
            status: task.status,
            categories,
            time_left_seconds,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Rejects category ids that don't belong to the acting user
///
/// This is the restricted category selector: the submitter may only attach
/// their own categories, no matter what ids arrive in the request.
async fn validate_category_ids(
    state: &AppState,
    auth: &AuthContext,
    category_ids: &[Uuid],
) -> Result<(), ApiError> {
    let owned = Category::filter_owned(&state.db, auth.user_id, category_ids).await?;

    if owned.len() != category_ids.len() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "category_ids".to_string(),
            message: "One or more categories do not exist or belong to another user".to_string(),
        }]));
    }

    Ok(())
}

/// List tasks handler
///
/// Returns the owner's tasks, deadline ascending, enriched with the
/// overdue/upcoming partition evaluated at request time.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;

    let now = Utc::now();
    let overdue = queries::overdue(&tasks, now);
    let upcoming = queries::upcoming(&tasks, now);

    Ok(Json(TaskListResponse {
        tasks,
        overdue,
        upcoming,
    }))
}

/// Structured listing export handler
///
/// Returns the owner's tasks as a serialized array of records for
/// programmatic consumption.
pub async fn export_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskExport>>> {
    let records = Task::export_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(records))
}

/// Create task handler
///
/// The owner is forced from the authenticated session. Submitted category
/// ids are resolved against the owner's categories before anything is
/// written.
///
/// # Errors
///
/// - `409 Conflict`: Owner already has a task with this title
/// - `422 Unprocessable Entity`: Validation failed or foreign category id
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;
    validate_category_ids(&state, &auth, &req.category_ids).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.user_id,
            title: req.title,
            description: req.description,
            priority: req.priority,
            deadline: req.deadline,
            category_ids: req.category_ids,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, user_id = %auth.user_id, "Task created");

    Ok(Json(task))
}

/// Task detail handler
///
/// Ownership is enforced here like everywhere else; another user's task id
/// yields 403 without leaking the task's contents.
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_ownership(&auth, task.user_id)?;

    let categories = Task::categories(&state.db, task.id).await?;

    Ok(Json(TaskDetailResponse::new(task, categories, Utc::now())))
}

/// Update task handler (owner-only)
///
/// Whole-form edit: every editable field is replaced, including the category
/// membership set.
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not the owner; the task is unchanged
/// - `404 Not Found`: No such task
/// - `409 Conflict`: New title collides with another of the owner's tasks
/// - `422 Unprocessable Entity`: Validation failed or foreign category id
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let existing = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_ownership(&auth, existing.user_id)?;
    validate_category_ids(&state, &auth, &req.category_ids).await?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            priority: req.priority,
            deadline: req.deadline,
            status: req.status,
            category_ids: req.category_ids,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %task.id, user_id = %auth.user_id, "Task updated");

    Ok(Json(task))
}

/// Delete task handler (owner-only)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    require_ownership(&auth, task.user_id)?;

    Task::delete(&state.db, id).await?;

    tracing::info!(task_id = %id, user_id = %auth.user_id, "Task deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: String::new(),
            priority: TaskPriority::UrgentImportant,
            deadline: Utc::now(),
            category_ids: vec![],
        }
    }

    #[test]
    fn test_create_task_request_validation() {
        assert!(create_request("Write report").validate().is_ok());

        // Empty title
        assert!(create_request("").validate().is_err());

        // Title too long
        assert!(create_request(&"a".repeat(151)).validate().is_err());

        // Description too long
        let mut req = create_request("ok");
        req.description = "d".repeat(721);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_task_request_defaults() {
        // description and category_ids are optional in the wire format
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{
                "title": "Write report",
                "priority": "urgent_important",
                "deadline": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(req.title, "Write report");
        assert!(req.description.is_empty());
        assert!(req.category_ids.is_empty());
        assert_eq!(req.priority, TaskPriority::UrgentImportant);
    }

    #[test]
    fn test_update_task_request_parses_status() {
        let req: UpdateTaskRequest = serde_json::from_str(
            r#"{
                "title": "Write report",
                "priority": "not_urgent_important",
                "deadline": "2024-01-01T00:00:00Z",
                "status": "done",
                "category_ids": []
            }"#,
        )
        .unwrap();

        assert_eq!(req.status, TaskStatus::Done);
        assert_eq!(req.priority, TaskPriority::NotUrgentImportant);
    }

    #[test]
    fn test_malformed_deadline_rejected() {
        let result: Result<CreateTaskRequest, _> = serde_json::from_str(
            r#"{
                "title": "Write report",
                "priority": "urgent_important",
                "deadline": "tomorrow-ish"
            }"#,
        );

        assert!(result.is_err());
    }
}
