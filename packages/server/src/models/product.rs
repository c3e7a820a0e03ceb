use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, non_empty, validate_description, validate_name, validate_optional_name};
use crate::entity::{product, product_image, product_item};
use crate::error::AppError;

/// A purchasable SKU under a product.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ProductItemInput {
    #[schema(example = "SHOE-42-RED")]
    pub sku: String,
    #[schema(example = 10)]
    pub quantity: i32,
    #[schema(example = 59.9)]
    pub price: f64,
    pub discounted_price: Option<f64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ProductImageInput {
    #[schema(example = "https://cdn.example.com/shoe.png")]
    pub image_url: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Trail Runner")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 0-5.
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub has_variants: bool,
    /// Category in the same store.
    pub category_id: i32,
    #[serde(default)]
    pub items: Vec<ProductItemInput>,
    #[serde(default)]
    pub images: Vec<ProductImageInput>,
}

/// Item input on update. With `id` the existing item is overwritten, without
/// it a new item is created. Items not listed are kept as they are.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProductItemInput {
    pub id: Option<i32>,
    pub sku: String,
    pub quantity: i32,
    pub price: f64,
    pub discounted_price: Option<f64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProductImageInput {
    pub id: Option<i32>,
    pub image_url: String,
}

/// Product update.
///
/// `name`, `description` and `category_id` are left unchanged when absent
/// (empty strings count as absent). `rating` and the three flags are always
/// written and default to `0` / `false`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub has_variants: bool,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub items: Vec<UpdateProductItemInput>,
    #[serde(default)]
    pub images: Vec<UpdateProductImageInput>,
}

impl From<ProductItemInput> for UpdateProductItemInput {
    fn from(item: ProductItemInput) -> Self {
        Self {
            id: None,
            sku: item.sku,
            quantity: item.quantity,
            price: item.price,
            discounted_price: item.discounted_price,
        }
    }
}

impl From<ProductImageInput> for UpdateProductImageInput {
    fn from(image: ProductImageInput) -> Self {
        Self {
            id: None,
            image_url: image.image_url,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductItemResponse {
    pub id: i32,
    pub product_id: i32,
    pub sku: String,
    pub quantity: i32,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_item::Model> for ProductItemResponse {
    fn from(m: product_item::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            sku: m.sku,
            quantity: m.quantity,
            price: m.price,
            discounted_price: m.discounted_price,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductImageResponse {
    pub id: i32,
    pub product_id: i32,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_image::Model> for ProductImageResponse {
    fn from(m: product_image::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            image_url: m.image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A product with its live items and images.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductResponse {
    #[schema(example = 12)]
    pub id: i32,
    #[schema(example = "Trail Runner")]
    pub name: String,
    pub description: String,
    pub rating: f32,
    pub is_featured: bool,
    pub is_archived: bool,
    pub has_variants: bool,
    pub category_id: i32,
    pub store_id: i32,
    pub items: Vec<ProductItemResponse>,
    pub images: Vec<ProductImageResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(
        m: product::Model,
        items: Vec<product_item::Model>,
        images: Vec<product_image::Model>,
    ) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            rating: m.rating,
            is_featured: m.is_featured,
            is_archived: m.is_archived,
            has_variants: m.has_variants,
            category_id: m.category_id,
            store_id: m.store_id,
            items: items.into_iter().map(Into::into).collect(),
            images: images.into_iter().map(Into::into).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductListResponse {
    pub data: Vec<ProductResponse>,
    pub pagination: Pagination,
}

fn validate_rating(rating: f32) -> Result<(), AppError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(AppError::Validation("Rating must be between 0 and 5".into()));
    }
    Ok(())
}

fn validate_item(sku: &str, quantity: i32, price: f64, discounted: Option<f64>) -> Result<(), AppError> {
    let sku = sku.trim();
    if sku.is_empty() || sku.chars().count() > 255 {
        return Err(AppError::Validation("SKU must be 1-255 characters".into()));
    }
    if quantity < 0 {
        return Err(AppError::Validation("Quantity must not be negative".into()));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Validation("Price must be greater than 0".into()));
    }
    if let Some(discounted) = discounted
        && (!discounted.is_finite() || discounted <= 0.0)
    {
        return Err(AppError::Validation(
            "Discounted price must be greater than 0".into(),
        ));
    }
    Ok(())
}

fn validate_image_url(url: &str) -> Result<(), AppError> {
    let url = url.trim();
    if url.is_empty() || url.len() > 2048 {
        return Err(AppError::Validation(
            "Image URL must be 1-2048 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_product(req: &CreateProductRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")?;
    validate_description(&req.description)?;
    validate_rating(req.rating)?;
    for item in &req.items {
        validate_item(&item.sku, item.quantity, item.price, item.discounted_price)?;
    }
    for image in &req.images {
        validate_image_url(&image.image_url)?;
    }
    Ok(())
}

pub fn validate_update_product(req: &UpdateProductRequest) -> Result<(), AppError> {
    validate_optional_name(&req.name, "Name")?;
    if let Some(description) = non_empty(&req.description) {
        validate_description(description)?;
    }
    validate_rating(req.rating)?;
    for item in &req.items {
        validate_item(&item.sku, item.quantity, item.price, item.discounted_price)?;
    }
    for image in &req.images {
        validate_image_url(&image.image_url)?;
    }
    Ok(())
}
