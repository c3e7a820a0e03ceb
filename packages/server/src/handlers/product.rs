use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::catalog::product::{self as ops, ProductAggregate};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthAdmin;
use crate::extractors::json::AppJson;
use crate::models::product::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::state::AppState;

impl From<ProductAggregate> for ProductResponse {
    fn from(agg: ProductAggregate) -> Self {
        ProductResponse::new(agg.product, agg.items, agg.images)
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a product",
    description = "Creates a product with its items and images in one transaction. If any item fails, for example on a duplicate SKU, nothing is created.",
    params(("store_id" = i32, Path, description = "Store ID")),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store or category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate SKU (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn create_product(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_product(&payload)?;
    let aggregate = ops::create_product(&state.db, auth.id, store_id, payload).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(aggregate))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List products",
    description = "Returns the store's live products with their items and images.",
    params(("store_id" = i32, Path, description = "Store ID"), PageQuery),
    responses(
        (status = 200, description = "Products", body = ProductListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, query), fields(admin_id = %auth.id))]
pub async fn list_products(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let page = ops::list_products(&state.db, auth.id, store_id, query.window()).await?;
    let pagination = Pagination::from(&page);
    Ok(Json(ProductListResponse {
        data: page.rows.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/{product_id}",
    tag = "Products",
    operation_id = "getProduct",
    summary = "Get a product",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("product_id" = i32, Path, description = "Product ID"),
    ),
    responses(
        (status = 200, description = "Product with items and images", body = ProductResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product not found in this store (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn get_product(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
) -> Result<Json<ProductResponse>, AppError> {
    let aggregate = ops::get_product(&state.db, auth.id, store_id, product_id).await?;
    Ok(Json(aggregate.into()))
}

#[utoipa::path(
    patch,
    path = "/{product_id}",
    tag = "Products",
    operation_id = "updateProduct",
    summary = "Update a product",
    description = "Updates a product and reconciles its items and images in one transaction. Items and images with an `id` are overwritten, those without are created, and existing ones left out of the lists are kept. `name`, `description` and `category_id` are only changed when present; `rating` and the flags are always written.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("product_id" = i32, Path, description = "Product ID"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product, category, item or image not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate SKU (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn update_product(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    validate_update_product(&payload)?;
    let aggregate =
        ops::update_product(&state.db, auth.id, store_id, product_id, payload).await?;
    Ok(Json(aggregate.into()))
}

#[utoipa::path(
    delete,
    path = "/{product_id}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a product",
    description = "Soft-deletes a product together with its items and images.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("product_id" = i32, Path, description = "Product ID"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_product(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ops::delete_product(&state.db, auth.id, store_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{product_id}/items/{item_id}",
    tag = "Products",
    operation_id = "deleteProductItem",
    summary = "Delete a product item",
    description = "Soft-deletes one item. Leaving an item out of an update never removes it; this is the explicit way to.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("product_id" = i32, Path, description = "Product ID"),
        ("item_id" = i32, Path, description = "Product item ID"),
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product or item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_product_item(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, product_id, item_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, AppError> {
    ops::delete_product_item(&state.db, auth.id, store_id, product_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{product_id}/images/{image_id}",
    tag = "Products",
    operation_id = "deleteProductImage",
    summary = "Delete a product image",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("product_id" = i32, Path, description = "Product ID"),
        ("image_id" = i32, Path, description = "Product image ID"),
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Product or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_product_image(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, product_id, image_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, AppError> {
    ops::delete_product_image(&state.db, auth.id, store_id, product_id, image_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
