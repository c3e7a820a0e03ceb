use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::catalog::variant::{self as ops, VariantAggregate};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthAdmin;
use crate::extractors::json::AppJson;
use crate::models::shared::{PageQuery, Pagination};
use crate::models::variant::*;
use crate::state::AppState;

impl From<VariantAggregate> for VariantResponse {
    fn from(agg: VariantAggregate) -> Self {
        VariantResponse::new(agg.variant, agg.options)
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Variants",
    operation_id = "createVariant",
    summary = "Create a variant",
    description = "Creates a variant with its options in one transaction.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    request_body = CreateVariantRequest,
    responses(
        (status = 201, description = "Variant created", body = VariantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store or category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn create_variant(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<CreateVariantRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_variant(&payload)?;
    let aggregate =
        ops::create_variant(&state.db, auth.id, store_id, category_id, payload).await?;
    Ok((StatusCode::CREATED, Json(VariantResponse::from(aggregate))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Variants",
    operation_id = "listVariants",
    summary = "List variants of a category",
    description = "Returns the category's live variants ordered by weight, each with its options.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Variants", body = VariantListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Store or category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, query), fields(admin_id = %auth.id))]
pub async fn list_variants(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id)): Path<(i32, i32)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<VariantListResponse>, AppError> {
    let page =
        ops::list_variants(&state.db, auth.id, store_id, category_id, query.window()).await?;
    let pagination = Pagination::from(&page);
    Ok(Json(VariantListResponse {
        data: page.rows.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[utoipa::path(
    get,
    path = "/{variant_id}",
    tag = "Variants",
    operation_id = "getVariant",
    summary = "Get a variant",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
        ("variant_id" = i32, Path, description = "Variant ID"),
    ),
    responses(
        (status = 200, description = "Variant with options", body = VariantResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Variant not found under this category (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn get_variant(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id, variant_id)): Path<(i32, i32, i32)>,
) -> Result<Json<VariantResponse>, AppError> {
    let aggregate =
        ops::get_variant(&state.db, auth.id, store_id, category_id, variant_id).await?;
    Ok(Json(aggregate.into()))
}

#[utoipa::path(
    patch,
    path = "/{variant_id}",
    tag = "Variants",
    operation_id = "updateVariant",
    summary = "Update a variant",
    description = "Updates a variant and reconciles its options in one transaction. Options with an `id` are overwritten, those without are created, and existing ones left out are kept. Absent, empty or zero scalar fields are left unchanged.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
        ("variant_id" = i32, Path, description = "Variant ID"),
    ),
    request_body = UpdateVariantRequest,
    responses(
        (status = 200, description = "Variant updated", body = VariantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Variant, category or option not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Option value already used (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(admin_id = %auth.id))]
pub async fn update_variant(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id, variant_id)): Path<(i32, i32, i32)>,
    AppJson(payload): AppJson<UpdateVariantRequest>,
) -> Result<Json<VariantResponse>, AppError> {
    validate_update_variant(&payload)?;
    let aggregate = ops::update_variant(
        &state.db,
        auth.id,
        store_id,
        category_id,
        variant_id,
        payload,
    )
    .await?;
    Ok(Json(aggregate.into()))
}

#[utoipa::path(
    delete,
    path = "/{variant_id}",
    tag = "Variants",
    operation_id = "deleteVariant",
    summary = "Delete a variant",
    description = "Soft-deletes a variant together with its options.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
        ("variant_id" = i32, Path, description = "Variant ID"),
    ),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Variant not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_variant(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id, variant_id)): Path<(i32, i32, i32)>,
) -> Result<StatusCode, AppError> {
    ops::delete_variant(&state.db, auth.id, store_id, category_id, variant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{variant_id}/options/{option_id}",
    tag = "Variants",
    operation_id = "deleteVariantOption",
    summary = "Delete a variant option",
    description = "Soft-deletes one option. Its value becomes available again within the variant.",
    params(
        ("store_id" = i32, Path, description = "Store ID"),
        ("category_id" = i32, Path, description = "Category ID"),
        ("variant_id" = i32, Path, description = "Variant ID"),
        ("option_id" = i32, Path, description = "Variant option ID"),
    ),
    responses(
        (status = 204, description = "Option deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Variant or option not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn delete_variant_option(
    auth: AuthAdmin,
    State(state): State<AppState>,
    Path((store_id, category_id, variant_id, option_id)): Path<(i32, i32, i32, i32)>,
) -> Result<StatusCode, AppError> {
    ops::delete_variant_option(
        &state.db,
        auth.id,
        store_id,
        category_id,
        variant_id,
        option_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
