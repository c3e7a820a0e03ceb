use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, non_empty, validate_description, validate_name, validate_optional_name};
use crate::entity::{variant, variant_option};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct VariantOptionInput {
    #[schema(example = "XL")]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: i32,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateVariantRequest {
    #[schema(example = "Size")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display order, must be positive.
    #[schema(example = 1)]
    pub weight: i32,
    #[serde(default)]
    pub options: Vec<VariantOptionInput>,
}

/// Option input on update. With `id` the existing option is overwritten,
/// without it a new option is created.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateVariantOptionInput {
    pub id: Option<i32>,
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: i32,
}

/// Variant update. Every scalar is left unchanged when absent; an empty
/// string or a zero weight also counts as absent.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateVariantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub weight: Option<i32>,
    /// Move the variant to another category of the same store.
    pub category_id: Option<i32>,
    #[serde(default)]
    pub options: Vec<UpdateVariantOptionInput>,
}

impl From<VariantOptionInput> for UpdateVariantOptionInput {
    fn from(option: VariantOptionInput) -> Self {
        Self {
            id: None,
            value: option.value,
            description: option.description,
            weight: option.weight,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VariantOptionResponse {
    pub id: i32,
    pub variant_id: i32,
    pub value: String,
    pub description: String,
    pub weight: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<variant_option::Model> for VariantOptionResponse {
    fn from(m: variant_option::Model) -> Self {
        Self {
            id: m.id,
            variant_id: m.variant_id,
            value: m.value,
            description: m.description,
            weight: m.weight,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VariantResponse {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Size")]
    pub name: String,
    pub description: String,
    pub weight: i32,
    pub category_id: i32,
    pub options: Vec<VariantOptionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VariantResponse {
    pub fn new(m: variant::Model, options: Vec<variant_option::Model>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            weight: m.weight,
            category_id: m.category_id,
            options: options.into_iter().map(Into::into).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VariantListResponse {
    pub data: Vec<VariantResponse>,
    pub pagination: Pagination,
}

fn validate_option(value: &str, description: &str, weight: i32) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 255 {
        return Err(AppError::Validation(
            "Option value must be 1-255 characters".into(),
        ));
    }
    validate_description(description)?;
    if weight < 0 {
        return Err(AppError::Validation(
            "Option weight must not be negative".into(),
        ));
    }
    Ok(())
}

/// Reject repeated option values inside one submission.
fn ensure_distinct_values<'a>(values: impl Iterator<Item = &'a str>) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value.trim()) {
            return Err(AppError::Validation(format!(
                "Duplicate option value '{}'",
                value.trim()
            )));
        }
    }
    Ok(())
}

pub fn validate_create_variant(req: &CreateVariantRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    validate_description(&req.description)?;
    if req.weight <= 0 {
        return Err(AppError::Validation("Weight must be positive".into()));
    }
    for option in &req.options {
        validate_option(&option.value, &option.description, option.weight)?;
    }
    ensure_distinct_values(req.options.iter().map(|o| o.value.as_str()))
}

pub fn validate_update_variant(req: &UpdateVariantRequest) -> Result<(), AppError> {
    validate_optional_name(&req.name, "Name")?;
    if let Some(description) = non_empty(&req.description) {
        validate_description(description)?;
    }
    if let Some(weight) = req.weight
        && weight < 0
    {
        return Err(AppError::Validation("Weight must be positive".into()));
    }
    for option in &req.options {
        validate_option(&option.value, &option.description, option.weight)?;
    }
    ensure_distinct_values(req.options.iter().map(|o| o.value.as_str()))
}
