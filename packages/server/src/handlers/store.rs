use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::catalog::store as ops;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthAdmin;
use crate::extractors::json::AppJson;
use crate::models::shared::{PageQuery, Pagination};
use crate::models::store::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Stores",
    operation_id = "createStore",
    summary = "Create a store",
    description = "Creates a store owned by the authenticated admin.",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store created", body = StoreResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn create_store(
    auth: AuthAdmin,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateStoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_store(&payload)?;
    let model = ops::create_store(&state.db, auth.id, payload).await?;
    Ok((StatusCode::CREATED, Json(StoreResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Stores",
    operation_id = "listStores",
    summary = "List own stores",
    description = "Returns the authenticated admin's live stores, oldest first.",
    params(PageQuery),
    responses(
        (status = 200, description = "Stores", body = StoreListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, query), fields(admin_id = %auth.id))]
pub async fn list_stores(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<StoreListResponse>, AppError> {
    let page = ops::list_stores(&state.db, auth.id, query.window()).await?;
    let pagination = Pagination::from(&page);
    Ok(Json(StoreListResponse {
        data: page.rows.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/{store_id}",
    tag = "Stores",
    operation_id = "getStore",
    summary = "Get a store",
    params(("store_id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store", body = StoreResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn get_store(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> Result<Json<StoreResponse>, AppError> {
    let model = ops::get_store(&state.db, auth.id, store_id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{store_id}",
    tag = "Stores",
    operation_id = "updateStore",
    summary = "Update a store",
    description = "Partially updates a store. Absent or empty fields are left unchanged.",
    params(("store_id" = i32, Path, description = "Store ID")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated", body = StoreResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn update_store(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    AppJson(payload): AppJson<UpdateStoreRequest>,
) -> Result<Json<StoreResponse>, AppError> {
    validate_update_store(&payload)?;
    let model = ops::update_store(&state.db, auth.id, store_id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{store_id}",
    tag = "Stores",
    operation_id = "deleteStore",
    summary = "Delete a store",
    description = "Soft-deletes a store. Refused while it still has live categories or products.",
    params(("store_id" = i32, Path, description = "Store ID")),
    responses(
        (status = 204, description = "Store deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Store still has content (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_store(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ops::delete_store(&state.db, auth.id, store_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
