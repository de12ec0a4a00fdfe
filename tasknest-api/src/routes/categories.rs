/// Category endpoints
///
/// Owner-scoped CRUD over categories plus the derived listings. Deleting a
/// category never deletes its tasks; only the association rows go.
///
/// # Endpoints
///
/// - `GET /v1/categories` - List own categories with empty/full subsets
/// - `POST /v1/categories` - Create category
/// - `GET /v1/categories/:id` - Detail with completed/pending task split
/// - `PUT /v1/categories/:id` - Rename category (owner-only)
/// - `DELETE /v1/categories/:id` - Delete category (owner-only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{authorization::require_ownership, middleware::AuthContext},
    models::{
        category::{Category, CategoryTaskCount, CreateCategory},
        task::Task,
    },
    queries,
};
use uuid::Uuid;
use validator::Validate;

/// Create category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Rename category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    /// New category name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Category list response
///
/// The full listing plus the empty/full partition, all restricted to the
/// requesting owner.
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    /// All of the owner's categories with task counts, name ascending
    pub categories: Vec<CategoryTaskCount>,

    /// Categories with zero associated tasks
    pub empty: Vec<CategoryTaskCount>,

    /// Categories with at least one associated task
    pub full: Vec<CategoryTaskCount>,
}

/// Category detail response
///
/// The category's tasks split by completion status; "pending" means not yet
/// marked done, independent of the deadline.
#[derive(Debug, Serialize)]
pub struct CategoryDetailResponse {
    /// Category ID
    pub id: Uuid,

    /// Category name
    pub name: String,

    /// Member tasks with status = done
    pub completed: Vec<Task>,

    /// Member tasks not yet marked done
    pub pending: Vec<Task>,
}

/// List categories handler
///
/// Returns the owner's categories enriched with the empty/full partition.
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<CategoryListResponse>> {
    let categories = Category::list_by_owner_with_counts(&state.db, auth.user_id).await?;

    let empty = queries::empty_categories(&categories);
    let full = queries::full_categories(&categories);

    Ok(Json(CategoryListResponse {
        categories,
        empty,
        full,
    }))
}

/// Create category handler
///
/// The owner is forced from the authenticated session.
///
/// # Errors
///
/// - `409 Conflict`: Owner already has a category with this name
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    req.validate()?;

    let category = Category::create(
        &state.db,
        CreateCategory {
            name: req.name,
            user_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(category_id = %category.id, user_id = %auth.user_id, "Category created");

    Ok(Json(category))
}

/// Category detail handler
///
/// Returns the category with its tasks partitioned into completed and
/// pending. Ownership is enforced like everywhere else.
pub async fn get_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategoryDetailResponse>> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    require_ownership(&auth, category.user_id)?;

    let tasks = Task::list_by_category(&state.db, category.id).await?;
    let partition = queries::partition_by_status(&tasks);

    Ok(Json(CategoryDetailResponse {
        id: category.id,
        name: category.name,
        completed: partition.completed,
        pending: partition.pending,
    }))
}

/// Rename category handler (owner-only)
///
/// # Errors
///
/// - `403 Forbidden`: Requester is not the owner; the category is unchanged
/// - `404 Not Found`: No such category
/// - `409 Conflict`: Owner already has a category with the new name
pub async fn update_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    req.validate()?;

    let existing = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    require_ownership(&auth, existing.user_id)?;

    let category = Category::rename(&state.db, id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    tracing::info!(category_id = %category.id, user_id = %auth.user_id, "Category renamed");

    Ok(Json(category))
}

/// Delete category handler (owner-only)
///
/// Member tasks survive; only the category and its association rows are
/// removed.
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    require_ownership(&auth, category.user_id)?;

    Category::delete(&state.db, id).await?;

    tracing::info!(category_id = %id, user_id = %auth.user_id, "Category deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
