use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::repo::{Page, PageWindow};
use crate::error::AppError;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl<T> From<&Page<T>> for Pagination {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.window.page,
            per_page: page.window.per_page,
            total: page.total,
            total_pages: page.total_pages(),
        }
    }
}

/// Offset pagination query parameters.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, 1-based (default 1).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page, 1-100 (default 20).
    #[param(example = 20)]
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.per_page)
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Treat an empty or whitespace-only string as "not provided".
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validate a trimmed display name (1-255 Unicode characters).
pub fn validate_name(name: &str, what: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 255 {
        return Err(AppError::Validation(format!(
            "{what} must be 1-255 characters"
        )));
    }
    Ok(())
}

/// Validate an optional name on update. Empty strings mean "unchanged".
pub fn validate_optional_name(name: &Option<String>, what: &str) -> Result<(), AppError> {
    match non_empty(name) {
        Some(name) => validate_name(name, what),
        None => Ok(()),
    }
}

/// Validate a free-text description (at most 10000 characters).
pub fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > 10_000 {
        return Err(AppError::Validation(
            "Description must be at most 10000 characters".into(),
        ));
    }
    Ok(())
}
