use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_description, validate_name, validate_optional_name};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateStoreRequest {
    #[schema(example = "Corner Shop")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update. Absent or empty fields are left unchanged.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StoreResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Corner Shop")]
    pub name: String,
    pub description: String,
    pub admin_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StoreListResponse {
    pub data: Vec<StoreResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::store::Model> for StoreResponse {
    fn from(m: crate::entity::store::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            admin_id: m.admin_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_store(req: &CreateStoreRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    validate_description(&req.description)
}

pub fn validate_update_store(req: &UpdateStoreRequest) -> Result<(), AppError> {
    validate_optional_name(&req.name, "Name")?;
    if let Some(ref description) = req.description {
        validate_description(description)?;
    }
    Ok(())
}
