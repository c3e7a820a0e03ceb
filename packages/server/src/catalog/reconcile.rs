//! Merges a client-submitted child list into a persisted aggregate.
//!
//! A child input carrying an id updates that child; one without an id creates
//! a new child under the root. Persisted children missing from the list are
//! left alone: omission never deletes.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::CatalogError;
use crate::entity::{product_image, product_item, variant_option};
use crate::models::product::{UpdateProductImageInput, UpdateProductItemInput};
use crate::models::variant::UpdateVariantOptionInput;

/// A kind of child row owned by an aggregate root.
#[async_trait]
pub trait ChildKind {
    type Input: Sync;
    type Model: Send;

    /// Name used in `NotFound` errors.
    const LABEL: &'static str;

    fn input_id(input: &Self::Input) -> Option<i32>;

    /// Load a live child by id, only if it belongs to `root_id`.
    async fn find_owned(
        txn: &DatabaseTransaction,
        root_id: i32,
        child_id: i32,
    ) -> Result<Option<Self::Model>, DbErr>;

    async fn insert(
        txn: &DatabaseTransaction,
        root_id: i32,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr>;

    /// Overwrite every mutable field of `existing` from `input`.
    async fn overwrite(
        txn: &DatabaseTransaction,
        existing: Self::Model,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr>;
}

/// Apply `inputs` to the children of `root_id`, returning the touched rows in
/// submission order. The first failure aborts; the enclosing transaction
/// then discards everything written so far.
#[instrument(level = "debug", skip(txn, inputs), fields(kind = K::LABEL, count = inputs.len()))]
pub async fn reconcile<K: ChildKind>(
    txn: &DatabaseTransaction,
    root_id: i32,
    inputs: &[K::Input],
) -> Result<Vec<K::Model>, CatalogError> {
    let mut touched = Vec::with_capacity(inputs.len());
    for input in inputs {
        let model = match K::input_id(input) {
            Some(child_id) => {
                let existing = K::find_owned(txn, root_id, child_id)
                    .await?
                    .ok_or(CatalogError::NotFound(K::LABEL))?;
                K::overwrite(txn, existing, input).await?
            }
            None => K::insert(txn, root_id, input).await?,
        };
        touched.push(model);
    }
    Ok(touched)
}

pub struct ProductItems;

#[async_trait]
impl ChildKind for ProductItems {
    type Input = UpdateProductItemInput;
    type Model = product_item::Model;
    const LABEL: &'static str = "Product item";

    fn input_id(input: &Self::Input) -> Option<i32> {
        input.id
    }

    async fn find_owned(
        txn: &DatabaseTransaction,
        root_id: i32,
        child_id: i32,
    ) -> Result<Option<Self::Model>, DbErr> {
        product_item::Entity::find_by_id(child_id)
            .filter(product_item::Column::ProductId.eq(root_id))
            .filter(product_item::Column::DeletedAt.is_null())
            .one(txn)
            .await
    }

    async fn insert(
        txn: &DatabaseTransaction,
        root_id: i32,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr> {
        let now = Utc::now();
        product_item::ActiveModel {
            product_id: Set(root_id),
            sku: Set(input.sku.trim().to_string()),
            quantity: Set(input.quantity),
            price: Set(input.price),
            discounted_price: Set(input.discounted_price),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    async fn overwrite(
        txn: &DatabaseTransaction,
        existing: Self::Model,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr> {
        let mut active: product_item::ActiveModel = existing.into();
        active.sku = Set(input.sku.trim().to_string());
        active.quantity = Set(input.quantity);
        active.price = Set(input.price);
        active.discounted_price = Set(input.discounted_price);
        active.updated_at = Set(Utc::now());
        active.update(txn).await
    }
}

pub struct ProductImages;

#[async_trait]
impl ChildKind for ProductImages {
    type Input = UpdateProductImageInput;
    type Model = product_image::Model;
    const LABEL: &'static str = "Product image";

    fn input_id(input: &Self::Input) -> Option<i32> {
        input.id
    }

    async fn find_owned(
        txn: &DatabaseTransaction,
        root_id: i32,
        child_id: i32,
    ) -> Result<Option<Self::Model>, DbErr> {
        product_image::Entity::find_by_id(child_id)
            .filter(product_image::Column::ProductId.eq(root_id))
            .filter(product_image::Column::DeletedAt.is_null())
            .one(txn)
            .await
    }

    async fn insert(
        txn: &DatabaseTransaction,
        root_id: i32,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr> {
        let now = Utc::now();
        product_image::ActiveModel {
            product_id: Set(root_id),
            image_url: Set(input.image_url.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    async fn overwrite(
        txn: &DatabaseTransaction,
        existing: Self::Model,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr> {
        let mut active: product_image::ActiveModel = existing.into();
        active.image_url = Set(input.image_url.trim().to_string());
        active.updated_at = Set(Utc::now());
        active.update(txn).await
    }
}

pub struct VariantOptions;

#[async_trait]
impl ChildKind for VariantOptions {
    type Input = UpdateVariantOptionInput;
    type Model = variant_option::Model;
    const LABEL: &'static str = "Variant option";

    fn input_id(input: &Self::Input) -> Option<i32> {
        input.id
    }

    async fn find_owned(
        txn: &DatabaseTransaction,
        root_id: i32,
        child_id: i32,
    ) -> Result<Option<Self::Model>, DbErr> {
        variant_option::Entity::find_by_id(child_id)
            .filter(variant_option::Column::VariantId.eq(root_id))
            .filter(variant_option::Column::DeletedAt.is_null())
            .one(txn)
            .await
    }

    async fn insert(
        txn: &DatabaseTransaction,
        root_id: i32,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr> {
        let now = Utc::now();
        variant_option::ActiveModel {
            variant_id: Set(root_id),
            value: Set(input.value.trim().to_string()),
            description: Set(input.description.clone()),
            weight: Set(input.weight),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    async fn overwrite(
        txn: &DatabaseTransaction,
        existing: Self::Model,
        input: &Self::Input,
    ) -> Result<Self::Model, DbErr> {
        let mut active: variant_option::ActiveModel = existing.into();
        active.value = Set(input.value.trim().to_string());
        active.description = Set(input.description.clone());
        active.weight = Set(input.weight);
        active.updated_at = Set(Utc::now());
        active.update(txn).await
    }
}
