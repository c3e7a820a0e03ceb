//! Variant aggregate: a variant row with its options.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::guard::{self, AdminId};
use super::reconcile::{self, VariantOptions};
use super::repo::{self, Page, PageWindow};
use super::tx::transact;
use super::CatalogError;
use crate::entity::{variant, variant_option};
use crate::models::shared::non_empty;
use crate::models::variant::{CreateVariantRequest, UpdateVariantOptionInput, UpdateVariantRequest};

#[derive(Clone, Debug)]
pub struct VariantAggregate {
    pub variant: variant::Model,
    pub options: Vec<variant_option::Model>,
}

async fn live_options<C: ConnectionTrait>(
    db: &C,
    variant_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<variant_option::Model>>, DbErr> {
    let mut grouped: HashMap<i32, Vec<variant_option::Model>> = HashMap::new();
    if variant_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = variant_option::Entity::find()
        .filter(variant_option::Column::VariantId.is_in(variant_ids))
        .filter(variant_option::Column::DeletedAt.is_null())
        .order_by_asc(variant_option::Column::Weight)
        .order_by_asc(variant_option::Column::Id)
        .all(db)
        .await?;
    for row in rows {
        grouped.entry(row.variant_id).or_default().push(row);
    }
    Ok(grouped)
}

async fn hydrate_one<C: ConnectionTrait>(
    db: &C,
    variant: variant::Model,
) -> Result<VariantAggregate, DbErr> {
    let options = live_options(db, vec![variant.id])
        .await?
        .remove(&variant.id)
        .unwrap_or_default();
    Ok(VariantAggregate { variant, options })
}

#[instrument(level = "debug", skip(db, req), fields(options = req.options.len()))]
pub async fn create_variant(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    req: CreateVariantRequest,
) -> Result<VariantAggregate, CatalogError> {
    guard::owned_category(db, admin, store_id, category_id).await?;

    let options: Vec<UpdateVariantOptionInput> =
        req.options.into_iter().map(Into::into).collect();
    let now = Utc::now();
    let new_variant = variant::ActiveModel {
        name: Set(req.name.trim().to_string()),
        description: Set(req.description),
        weight: Set(req.weight),
        category_id: Set(category_id),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    transact(db, move |txn| {
        Box::pin(async move {
            let variant = new_variant.insert(txn).await?;
            let options = reconcile::reconcile::<VariantOptions>(txn, variant.id, &options).await?;
            Ok(VariantAggregate { variant, options })
        })
    })
    .await
}

/// Live variants of a category, ordered by display weight.
#[instrument(level = "debug", skip(db))]
pub async fn list_variants(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    window: PageWindow,
) -> Result<Page<VariantAggregate>, CatalogError> {
    guard::owned_category(db, admin, store_id, category_id).await?;
    let select = variant::Entity::find()
        .filter(variant::Column::CategoryId.eq(category_id))
        .filter(variant::Column::DeletedAt.is_null())
        .order_by_asc(variant::Column::Weight);
    let page = repo::paginate(db, select, variant::Column::Id, window).await?;

    let ids: Vec<i32> = page.rows.iter().map(|v| v.id).collect();
    let mut options = live_options(db, ids).await?;
    Ok(page.map(|variant| VariantAggregate {
        options: options.remove(&variant.id).unwrap_or_default(),
        variant,
    }))
}

#[instrument(level = "debug", skip(db))]
pub async fn get_variant(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    variant_id: i32,
) -> Result<VariantAggregate, CatalogError> {
    let variant = guard::owned_variant(db, admin, store_id, category_id, variant_id).await?;
    Ok(hydrate_one(db, variant).await?)
}

/// Merge present fields and reconcile options in one transaction.
#[instrument(level = "debug", skip(db, req), fields(options = req.options.len()))]
pub async fn update_variant(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    variant_id: i32,
    req: UpdateVariantRequest,
) -> Result<VariantAggregate, CatalogError> {
    guard::owned_variant(db, admin, store_id, category_id, variant_id).await?;
    if let Some(target) = req.category_id {
        guard::category_in_store(db, store_id, target).await?;
    }

    transact(db, move |txn| {
        Box::pin(async move {
            let existing = repo::lock_live::<variant::Entity>(
                txn,
                variant_id,
                variant::Column::DeletedAt,
                "Variant",
            )
            .await?;

            let mut active: variant::ActiveModel = existing.into();
            if let Some(name) = non_empty(&req.name) {
                active.name = Set(name.to_string());
            }
            if let Some(description) = non_empty(&req.description) {
                active.description = Set(description.to_string());
            }
            if let Some(weight) = req.weight.filter(|w| *w > 0) {
                active.weight = Set(weight);
            }
            if let Some(category_id) = req.category_id {
                active.category_id = Set(category_id);
            }
            active.updated_at = Set(Utc::now());
            let variant = active.update(txn).await?;

            reconcile::reconcile::<VariantOptions>(txn, variant_id, &req.options).await?;
            Ok(hydrate_one(txn, variant).await?)
        })
    })
    .await
}

/// Soft-delete a variant after its options, atomically.
#[instrument(level = "debug", skip(db))]
pub async fn delete_variant(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    variant_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_variant(db, admin, store_id, category_id, variant_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<variant::Entity>(
                txn,
                variant_id,
                variant::Column::DeletedAt,
                "Variant",
            )
            .await?;
            repo::soft_delete_where::<variant_option::Entity, _>(
                txn,
                variant_option::Column::DeletedAt,
                variant_option::Column::UpdatedAt,
                Condition::all().add(variant_option::Column::VariantId.eq(variant_id)),
            )
            .await?;
            repo::soft_delete_where::<variant::Entity, _>(
                txn,
                variant::Column::DeletedAt,
                variant::Column::UpdatedAt,
                Condition::all().add(variant::Column::Id.eq(variant_id)),
            )
            .await?;
            Ok(())
        })
    })
    .await
}

/// Soft-delete one option of a variant.
#[instrument(level = "debug", skip(db))]
pub async fn delete_variant_option(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    variant_id: i32,
    option_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_variant(db, admin, store_id, category_id, variant_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<variant::Entity>(
                txn,
                variant_id,
                variant::Column::DeletedAt,
                "Variant",
            )
            .await?;
            let removed = repo::soft_delete_where::<variant_option::Entity, _>(
                txn,
                variant_option::Column::DeletedAt,
                variant_option::Column::UpdatedAt,
                Condition::all()
                    .add(variant_option::Column::Id.eq(option_id))
                    .add(variant_option::Column::VariantId.eq(variant_id)),
            )
            .await?;
            if removed == 0 {
                return Err(CatalogError::NotFound("Variant option"));
            }
            Ok(())
        })
    })
    .await
}
