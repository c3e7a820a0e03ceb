//! Store lifecycle. A store is the ownership root of every catalog row.

use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::guard::{self, AdminId};
use super::repo::{self, Page, PageWindow};
use super::tx::transact;
use super::CatalogError;
use crate::entity::{category, product, store};
use crate::models::shared::non_empty;
use crate::models::store::{CreateStoreRequest, UpdateStoreRequest};

#[instrument(level = "debug", skip(db, req))]
pub async fn create_store(
    db: &DatabaseConnection,
    admin: AdminId,
    req: CreateStoreRequest,
) -> Result<store::Model, CatalogError> {
    let now = Utc::now();
    let model = store::ActiveModel {
        name: Set(req.name.trim().to_string()),
        description: Set(req.description),
        admin_id: Set(admin.0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

/// The admin's live stores, oldest first.
#[instrument(level = "debug", skip(db))]
pub async fn list_stores(
    db: &DatabaseConnection,
    admin: AdminId,
    window: PageWindow,
) -> Result<Page<store::Model>, CatalogError> {
    let select = store::Entity::find()
        .filter(store::Column::AdminId.eq(admin.0))
        .filter(store::Column::DeletedAt.is_null());
    Ok(repo::paginate(db, select, store::Column::Id, window).await?)
}

/// Every live store of the admin, unpaginated.
pub async fn all_stores<C: ConnectionTrait>(
    db: &C,
    admin: AdminId,
) -> Result<Vec<store::Model>, CatalogError> {
    Ok(store::Entity::find()
        .filter(store::Column::AdminId.eq(admin.0))
        .filter(store::Column::DeletedAt.is_null())
        .order_by_asc(store::Column::Id)
        .all(db)
        .await?)
}

#[instrument(level = "debug", skip(db))]
pub async fn get_store(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
) -> Result<store::Model, CatalogError> {
    guard::owned_store(db, admin, store_id).await
}

#[instrument(level = "debug", skip(db, req))]
pub async fn update_store(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    req: UpdateStoreRequest,
) -> Result<store::Model, CatalogError> {
    guard::owned_store(db, admin, store_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            let existing = repo::lock_live::<store::Entity>(
                txn,
                store_id,
                store::Column::DeletedAt,
                "Store",
            )
            .await?;
            let mut active: store::ActiveModel = existing.into();
            if let Some(name) = non_empty(&req.name) {
                active.name = Set(name.to_string());
            }
            if let Some(description) = non_empty(&req.description) {
                active.description = Set(description.to_string());
            }
            active.updated_at = Set(Utc::now());
            Ok(active.update(txn).await?)
        })
    })
    .await
}

/// Soft-delete a store. Refused while it still has live categories or
/// products.
#[instrument(level = "debug", skip(db))]
pub async fn delete_store(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_store(db, admin, store_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<store::Entity>(txn, store_id, store::Column::DeletedAt, "Store")
                .await?;

            let categories = repo::count_live::<category::Entity, _>(
                txn,
                category::Column::DeletedAt,
                Condition::all().add(category::Column::StoreId.eq(store_id)),
            )
            .await?;
            let products = repo::count_live::<product::Entity, _>(
                txn,
                product::Column::DeletedAt,
                Condition::all().add(product::Column::StoreId.eq(store_id)),
            )
            .await?;
            if categories > 0 || products > 0 {
                return Err(CatalogError::Conflict(format!(
                    "Store still has {categories} categories and {products} products"
                )));
            }

            repo::soft_delete_where::<store::Entity, _>(
                txn,
                store::Column::DeletedAt,
                store::Column::UpdatedAt,
                Condition::all().add(store::Column::Id.eq(store_id)),
            )
            .await?;
            Ok(())
        })
    })
    .await
}
