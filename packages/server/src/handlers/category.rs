use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::catalog::category as ops;
use crate::catalog::tree::TreeDepth;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthAdmin;
use crate::extractors::json::AppJson;
use crate::models::category::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Creates a category in the store. A parent, when given, must be a live category of the same store.",
    params(("store_id" = i32, Path, description = "Store ID")),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store or parent not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn create_category(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_category(&payload)?;
    let model = ops::create_category(&state.db, auth.id, store_id, payload).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "getCategoryTree",
    summary = "Category tree",
    description = "Returns the store's categories as a forest. `level` bounds the depth below the roots (0 = roots only); absent or `-1` is unbounded.",
    params(("store_id" = i32, Path, description = "Store ID"), CategoryTreeQuery),
    responses(
        (status = 200, description = "Category forest", body = Vec<CategoryNode>),
        (status = 400, description = "Invalid level (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, query), fields(admin_id = %auth.id, level = ?query.level))]
pub async fn category_tree(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    Query(query): Query<CategoryTreeQuery>,
) -> Result<Json<Vec<CategoryNode>>, AppError> {
    let depth = TreeDepth::from_level(query.level)?;
    let forest = ops::category_tree(&state.db, auth.id, store_id, depth).await?;
    Ok(Json(forest))
}

#[utoipa::path(
    get,
    path = "/{category_id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a category",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found in this store (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn get_category(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<CategoryResponse>, AppError> {
    let model = ops::get_category(&state.db, auth.id, store_id, category_id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{category_id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a category",
    description = "Partially updates a category. `parent_category_id`: absent leaves it unchanged, `null` makes the category a root, a value re-parents it within the same store. Moving a category under its own descendant is rejected.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error or cycle (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category or parent not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn update_category(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    validate_update_category(&payload)?;
    let model =
        ops::update_category(&state.db, auth.id, store_id, category_id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{category_id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Soft-deletes a category. Refused while live subcategories, products or variants reference it.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Category still referenced (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_category(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ops::delete_category(&state.db, auth.id, store_id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
