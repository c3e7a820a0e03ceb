use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::StoreResponse;
use crate::error::AppError;

/// Request body for admin signup.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    /// Unique username (1-64 chars, letters, digits, `_`, `-`, `.`).
    #[schema(example = "alice")]
    pub username: String,
    /// Unique email address.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (6-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_signup_request(payload: &SignupRequest) -> Result<(), AppError> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 64 {
        return Err(AppError::Validation(
            "Username must be 1-64 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, '_', '-' and '.'".into(),
        ));
    }
    validate_email(&payload.email)?;
    if payload.password.len() < 6 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 6-128 characters".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && email.len() <= 255
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Email address is invalid".into()))
    }
}

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Public view of an admin account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::admin::Model> for AdminResponse {
    fn from(admin: crate::entity::admin::Model) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            email: admin.email,
            created_at: admin.created_at,
        }
    }
}

/// Successful signup or login. The token is also set as the `auth-token` cookie.
#[derive(Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub admin: AdminResponse,
}

/// The authenticated admin with the stores they own.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub stores: Vec<StoreResponse>,
}
