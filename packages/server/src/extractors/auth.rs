use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::catalog::AdminId;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth-token";

/// Authenticated admin, taken from `Authorization: Bearer <token>` or, when
/// that header is absent, from the `auth-token` cookie.
///
/// Add this as a handler parameter to require authentication. Ownership is
/// checked by the catalog operations using [`AuthAdmin::id`].
pub struct AuthAdmin {
    pub id: AdminId,
    pub username: String,
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    match parts.headers.get("Authorization") {
        None => Ok(None),
        Some(value) => {
            let value = value.to_str().map_err(|_| AppError::TokenInvalid)?;
            let token = value
                .strip_prefix("Bearer ")
                .ok_or(AppError::TokenInvalid)?;
            Ok(Some(token.to_owned()))
        }
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(AUTH_COOKIE)
                .map(|c| c.value().to_owned())
                .ok_or(AppError::TokenMissing)?,
        };

        let claims =
            jwt::verify(&token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthAdmin {
            id: AdminId(claims.uid),
            username: claims.sub,
        })
    }
}
