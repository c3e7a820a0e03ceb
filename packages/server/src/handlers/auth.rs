use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use sea_orm::*;
use tracing::instrument;

use crate::catalog;
use crate::entity::admin;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AUTH_COOKIE, AuthAdmin};
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AdminResponse, LoginRequest, MeResponse, SignupRequest, TokenResponse,
    validate_login_request, validate_signup_request,
};
use crate::state::AppState;
use crate::utils::{hash, jwt};

fn issue_token(state: &AppState, admin: &admin::Model) -> Result<String, AppError> {
    jwt::sign(
        admin.id,
        &admin.username,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))
}

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    operation_id = "signup",
    summary = "Create an admin account",
    description = "Registers a new admin and returns a session token. Username and email must both be unused.",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Username or email taken (ACCOUNT_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_signup_request(&payload)?;

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let now = chrono::Utc::now();
    let new_admin = admin::ActiveModel {
        username: Set(payload.username.trim().to_string()),
        email: Set(payload.email.trim().to_lowercase()),
        password: Set(hash),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    let admin = new_admin.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Signup race condition: unique constraint caught on insert");
            AppError::AccountTaken
        }
        _ => AppError::from(e),
    })?;

    let token = issue_token(&state, &admin)?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            admin: admin.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in with email and password",
    description = "Returns a session token and also sets it as the HTTP-only `auth-token` cookie.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    validate_login_request(&payload)?;

    let admin = admin::Entity::find()
        .filter(admin::Column::Email.eq(payload.email.trim().to_lowercase()))
        .filter(admin::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &admin.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&state, &admin)?;
    let cookie = Cookie::build((AUTH_COOKIE, token.clone()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(state.config.auth.token_ttl_hours));

    Ok((
        jar.add(cookie),
        Json(TokenResponse {
            token,
            admin: admin.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current admin",
    description = "Returns the authenticated admin together with their live stores.",
    responses(
        (status = 200, description = "Current admin", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(admin_id = %auth.id))]
pub async fn me(
    auth: AuthAdmin,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    let admin = admin::Entity::find_by_id(auth.id.0)
        .filter(admin::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or(AppError::TokenInvalid)?;
    let stores = catalog::store::all_stores(&state.db, auth.id).await?;

    let AdminResponse {
        id,
        username,
        email,
        ..
    } = admin.into();
    Ok(Json(MeResponse {
        id,
        username,
        email,
        stores: stores.into_iter().map(Into::into).collect(),
    }))
}
