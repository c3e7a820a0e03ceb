//! Ownership checks: every catalog row resolves to a store, and every store
//! to exactly one admin.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

use super::{CatalogError, repo};
use crate::entity::{category, product, store, variant};

/// Identity of an authenticated admin, produced once by the authentication
/// layer and passed by value into every check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(pub i32);

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Compare a store's owner with the authenticated admin.
pub fn ensure_owner(store_admin_id: i32, admin: AdminId) -> Result<(), CatalogError> {
    if store_admin_id == admin.0 {
        Ok(())
    } else {
        Err(CatalogError::Forbidden)
    }
}

/// Resolve a live store and confirm `admin` owns it.
pub async fn owned_store<C: ConnectionTrait>(
    db: &C,
    admin: AdminId,
    store_id: i32,
) -> Result<store::Model, CatalogError> {
    let store = repo::find_store(db, store_id).await?;
    ensure_owner(store.admin_id, admin)?;
    Ok(store)
}

/// Follow a row's own store link to its owner. Runs before the path is
/// compared, so a foreign row is `Forbidden` even when addressed through a
/// store the caller owns.
async fn ensure_owns_store_of<C: ConnectionTrait>(
    db: &C,
    admin: AdminId,
    store_id: i32,
) -> Result<(), CatalogError> {
    let store = repo::find_store(db, store_id).await?;
    ensure_owner(store.admin_id, admin)
}

/// Resolve category → store, confirming `admin` owns the category's store
/// and that the category lives in `store_id`.
pub async fn owned_category<C: ConnectionTrait>(
    db: &C,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
) -> Result<category::Model, CatalogError> {
    owned_store(db, admin, store_id).await?;
    let category = repo::find_category(db, category_id).await?;
    ensure_owns_store_of(db, admin, category.store_id).await?;
    if category.store_id != store_id {
        return Err(CatalogError::NotFound("Category"));
    }
    Ok(category)
}

/// Resolve product → store.
pub async fn owned_product<C: ConnectionTrait>(
    db: &C,
    admin: AdminId,
    store_id: i32,
    product_id: i32,
) -> Result<product::Model, CatalogError> {
    owned_store(db, admin, store_id).await?;
    let product = repo::find_product(db, product_id).await?;
    ensure_owns_store_of(db, admin, product.store_id).await?;
    if product.store_id != store_id {
        return Err(CatalogError::NotFound("Product"));
    }
    Ok(product)
}

/// Resolve variant → category → store.
pub async fn owned_variant<C: ConnectionTrait>(
    db: &C,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    variant_id: i32,
) -> Result<variant::Model, CatalogError> {
    owned_store(db, admin, store_id).await?;
    let variant = repo::find_variant(db, variant_id).await?;
    let category = repo::find_category(db, variant.category_id).await?;
    ensure_owns_store_of(db, admin, category.store_id).await?;
    if category.store_id != store_id {
        return Err(CatalogError::NotFound("Category"));
    }
    if variant.category_id != category_id {
        return Err(CatalogError::NotFound("Variant"));
    }
    Ok(variant)
}

/// Confirm `category_id` is a live category of `store_id`. Used where a body
/// field, not the path, names the category.
pub async fn category_in_store<C: ConnectionTrait>(
    db: &C,
    store_id: i32,
    category_id: i32,
) -> Result<category::Model, CatalogError> {
    let category = repo::find_category(db, category_id).await?;
    if category.store_id != store_id {
        return Err(CatalogError::validation(
            "Category must belong to the same store",
        ));
    }
    Ok(category)
}
