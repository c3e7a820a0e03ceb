//! Product aggregate: a product row with its items and images.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::guard::{self, AdminId};
use super::reconcile::{self, ProductImages, ProductItems};
use super::repo::{self, Page, PageWindow};
use super::tx::transact;
use super::CatalogError;
use crate::entity::{product, product_image, product_item};
use crate::models::product::{
    CreateProductRequest, UpdateProductImageInput, UpdateProductItemInput, UpdateProductRequest,
};
use crate::models::shared::non_empty;

/// A product with its live children, ordered by id.
#[derive(Clone, Debug)]
pub struct ProductAggregate {
    pub product: product::Model,
    pub items: Vec<product_item::Model>,
    pub images: Vec<product_image::Model>,
}

async fn live_items<C: ConnectionTrait>(
    db: &C,
    product_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<product_item::Model>>, DbErr> {
    let mut grouped: HashMap<i32, Vec<product_item::Model>> = HashMap::new();
    if product_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = product_item::Entity::find()
        .filter(product_item::Column::ProductId.is_in(product_ids))
        .filter(product_item::Column::DeletedAt.is_null())
        .order_by_asc(product_item::Column::Id)
        .all(db)
        .await?;
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row);
    }
    Ok(grouped)
}

async fn live_images<C: ConnectionTrait>(
    db: &C,
    product_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<product_image::Model>>, DbErr> {
    let mut grouped: HashMap<i32, Vec<product_image::Model>> = HashMap::new();
    if product_ids.is_empty() {
        return Ok(grouped);
    }
    let rows = product_image::Entity::find()
        .filter(product_image::Column::ProductId.is_in(product_ids))
        .filter(product_image::Column::DeletedAt.is_null())
        .order_by_asc(product_image::Column::Id)
        .all(db)
        .await?;
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row);
    }
    Ok(grouped)
}

/// Attach live children to a batch of products, preserving product order.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductAggregate>, DbErr> {
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let mut items = live_items(db, ids.clone()).await?;
    let mut images = live_images(db, ids).await?;
    Ok(products
        .into_iter()
        .map(|product| ProductAggregate {
            items: items.remove(&product.id).unwrap_or_default(),
            images: images.remove(&product.id).unwrap_or_default(),
            product,
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    db: &C,
    product: product::Model,
) -> Result<ProductAggregate, DbErr> {
    let id = product.id;
    let mut items = live_items(db, vec![id]).await?;
    let mut images = live_images(db, vec![id]).await?;
    Ok(ProductAggregate {
        items: items.remove(&id).unwrap_or_default(),
        images: images.remove(&id).unwrap_or_default(),
        product,
    })
}

/// Create a product together with its items and images. Any failing child
/// write, such as a duplicate SKU, leaves nothing behind.
#[instrument(level = "debug", skip(db, req), fields(items = req.items.len(), images = req.images.len()))]
pub async fn create_product(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    req: CreateProductRequest,
) -> Result<ProductAggregate, CatalogError> {
    guard::owned_store(db, admin, store_id).await?;
    guard::category_in_store(db, store_id, req.category_id).await?;

    let items: Vec<UpdateProductItemInput> = req.items.into_iter().map(Into::into).collect();
    let images: Vec<UpdateProductImageInput> = req.images.into_iter().map(Into::into).collect();
    let now = Utc::now();
    let new_product = product::ActiveModel {
        name: Set(req.name.trim().to_string()),
        description: Set(req.description),
        rating: Set(req.rating),
        is_featured: Set(req.is_featured),
        is_archived: Set(req.is_archived),
        has_variants: Set(req.has_variants),
        category_id: Set(req.category_id),
        store_id: Set(store_id),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    transact(db, move |txn| {
        Box::pin(async move {
            let product = new_product.insert(txn).await?;
            let items = reconcile::reconcile::<ProductItems>(txn, product.id, &items).await?;
            let images = reconcile::reconcile::<ProductImages>(txn, product.id, &images).await?;
            Ok(ProductAggregate {
                product,
                items,
                images,
            })
        })
    })
    .await
}

#[instrument(level = "debug", skip(db))]
pub async fn list_products(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    window: PageWindow,
) -> Result<Page<ProductAggregate>, CatalogError> {
    guard::owned_store(db, admin, store_id).await?;
    let select = product::Entity::find()
        .filter(product::Column::StoreId.eq(store_id))
        .filter(product::Column::DeletedAt.is_null());
    let page = repo::paginate(db, select, product::Column::Id, window).await?;
    let aggregates = hydrate(db, page.rows).await?;
    Ok(Page {
        rows: aggregates,
        total: page.total,
        window: page.window,
    })
}

#[instrument(level = "debug", skip(db))]
pub async fn get_product(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    product_id: i32,
) -> Result<ProductAggregate, CatalogError> {
    let product = guard::owned_product(db, admin, store_id, product_id).await?;
    Ok(hydrate_one(db, product).await?)
}

/// Merge scalar fields and reconcile items and images in one transaction.
///
/// Returns the full aggregate afterwards, including children the request
/// did not mention.
#[instrument(level = "debug", skip(db, req), fields(items = req.items.len(), images = req.images.len()))]
pub async fn update_product(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    product_id: i32,
    req: UpdateProductRequest,
) -> Result<ProductAggregate, CatalogError> {
    guard::owned_product(db, admin, store_id, product_id).await?;
    if let Some(category_id) = req.category_id {
        guard::category_in_store(db, store_id, category_id).await?;
    }

    transact(db, move |txn| {
        Box::pin(async move {
            let existing = repo::lock_live::<product::Entity>(
                txn,
                product_id,
                product::Column::DeletedAt,
                "Product",
            )
            .await?;

            let mut active: product::ActiveModel = existing.into();
            if let Some(name) = non_empty(&req.name) {
                active.name = Set(name.to_string());
            }
            if let Some(description) = non_empty(&req.description) {
                active.description = Set(description.to_string());
            }
            if let Some(category_id) = req.category_id {
                active.category_id = Set(category_id);
            }
            active.rating = Set(req.rating);
            active.is_featured = Set(req.is_featured);
            active.is_archived = Set(req.is_archived);
            active.has_variants = Set(req.has_variants);
            active.updated_at = Set(Utc::now());
            let product = active.update(txn).await?;

            reconcile::reconcile::<ProductItems>(txn, product_id, &req.items).await?;
            reconcile::reconcile::<ProductImages>(txn, product_id, &req.images).await?;
            Ok(hydrate_one(txn, product).await?)
        })
    })
    .await
}

/// Soft-delete a product after its items and images, atomically.
#[instrument(level = "debug", skip(db))]
pub async fn delete_product(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    product_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_product(db, admin, store_id, product_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<product::Entity>(
                txn,
                product_id,
                product::Column::DeletedAt,
                "Product",
            )
            .await?;
            repo::soft_delete_where::<product_item::Entity, _>(
                txn,
                product_item::Column::DeletedAt,
                product_item::Column::UpdatedAt,
                Condition::all().add(product_item::Column::ProductId.eq(product_id)),
            )
            .await?;
            repo::soft_delete_where::<product_image::Entity, _>(
                txn,
                product_image::Column::DeletedAt,
                product_image::Column::UpdatedAt,
                Condition::all().add(product_image::Column::ProductId.eq(product_id)),
            )
            .await?;
            repo::soft_delete_where::<product::Entity, _>(
                txn,
                product::Column::DeletedAt,
                product::Column::UpdatedAt,
                Condition::all().add(product::Column::Id.eq(product_id)),
            )
            .await?;
            Ok(())
        })
    })
    .await
}

/// Soft-delete one item of a product. The only way an item leaves a product
/// short of deleting the product itself.
#[instrument(level = "debug", skip(db))]
pub async fn delete_product_item(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    product_id: i32,
    item_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_product(db, admin, store_id, product_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<product::Entity>(
                txn,
                product_id,
                product::Column::DeletedAt,
                "Product",
            )
            .await?;
            let removed = repo::soft_delete_where::<product_item::Entity, _>(
                txn,
                product_item::Column::DeletedAt,
                product_item::Column::UpdatedAt,
                Condition::all()
                    .add(product_item::Column::Id.eq(item_id))
                    .add(product_item::Column::ProductId.eq(product_id)),
            )
            .await?;
            if removed == 0 {
                return Err(CatalogError::NotFound("Product item"));
            }
            Ok(())
        })
    })
    .await
}

#[instrument(level = "debug", skip(db))]
pub async fn delete_product_image(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    product_id: i32,
    image_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_product(db, admin, store_id, product_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<product::Entity>(
                txn,
                product_id,
                product::Column::DeletedAt,
                "Product",
            )
            .await?;
            let removed = repo::soft_delete_where::<product_image::Entity, _>(
                txn,
                product_image::Column::DeletedAt,
                product_image::Column::UpdatedAt,
                Condition::all()
                    .add(product_image::Column::Id.eq(image_id))
                    .add(product_image::Column::ProductId.eq(product_id)),
            )
            .await?;
            if removed == 0 {
                return Err(CatalogError::NotFound("Product image"));
            }
            Ok(())
        })
    })
    .await
}
