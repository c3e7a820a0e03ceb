use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_description, validate_name, validate_optional_name};
use crate::error::AppError;

pub use crate::catalog::tree::CategoryNode;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Shoes")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Parent category in the same store; omit for a root category.
    pub parent_category_id: Option<i32>,
}

/// Partial update. `name`/`description` absent or empty are left unchanged;
/// `parent_category_id` absent is unchanged, `null` makes the category a root.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub parent_category_id: Option<Option<i32>>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryTreeQuery {
    /// Maximum depth below the roots (0 = roots only). `-1` or absent is unbounded.
    pub level: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Shoes")]
    pub name: String,
    pub description: String,
    pub store_id: i32,
    pub parent_category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::category::Model> for CategoryResponse {
    fn from(m: crate::entity::category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            store_id: m.store_id,
            parent_category_id: m.parent_category_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_category(req: &CreateCategoryRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    validate_description(&req.description)
}

pub fn validate_update_category(req: &UpdateCategoryRequest) -> Result<(), AppError> {
    validate_optional_name(&req.name, "Name")?;
    if let Some(ref description) = req.description {
        validate_description(description)?;
    }
    Ok(())
}
