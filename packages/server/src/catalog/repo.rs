//! Row-level primitives shared by every catalog aggregate.
//!
//! Rows are never physically removed; every lookup here ignores rows whose
//! `deleted_at` marker is set.

use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LockType;
use sea_orm::*;

use super::CatalogError;
use crate::entity::{category, product, store, variant};

/// Offset/limit window over a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
}

impl PageWindow {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self {
            page: Ord::max(page.unwrap_or(1), 1),
            per_page: per_page.unwrap_or(20).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

/// One page of rows plus the total number of matching rows.
#[derive(Debug)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: u64,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.window.per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            total: self.total,
            window: self.window,
        }
    }
}

/// Fetch a live row by primary key.
pub async fn find_live<E, C>(
    db: &C,
    id: i32,
    deleted_at: E::Column,
    what: &'static str,
) -> Result<E::Model, CatalogError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .filter(deleted_at.is_null())
        .one(db)
        .await?
        .ok_or(CatalogError::NotFound(what))
}

/// Fetch a live row by primary key with `FOR UPDATE`, serialising concurrent
/// writers of the same aggregate until the transaction ends.
pub async fn lock_live<E>(
    txn: &DatabaseTransaction,
    id: i32,
    deleted_at: E::Column,
    what: &'static str,
) -> Result<E::Model, CatalogError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .filter(deleted_at.is_null())
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(CatalogError::NotFound(what))
}

/// Mark every live row matching `condition` as deleted. Returns the number of
/// rows marked.
pub async fn soft_delete_where<E, C>(
    db: &C,
    deleted_at: E::Column,
    updated_at: E::Column,
    condition: Condition,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = E::update_many()
        .col_expr(deleted_at, Expr::value(now))
        .col_expr(updated_at, Expr::value(now))
        .filter(condition)
        .filter(deleted_at.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Run a filtered select as one page, counting the full result first.
pub async fn paginate<E, C>(
    db: &C,
    select: Select<E>,
    order_by: E::Column,
    window: PageWindow,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let total = select.clone().paginate(db, window.per_page).num_items().await?;
    let rows = select
        .order_by_asc(order_by)
        .offset(Some(window.offset()))
        .limit(Some(window.per_page))
        .all(db)
        .await?;
    Ok(Page {
        rows,
        total,
        window,
    })
}

pub async fn find_store<C: ConnectionTrait>(db: &C, id: i32) -> Result<store::Model, CatalogError> {
    find_live::<store::Entity, _>(db, id, store::Column::DeletedAt, "Store").await
}

pub async fn find_category<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<category::Model, CatalogError> {
    find_live::<category::Entity, _>(db, id, category::Column::DeletedAt, "Category").await
}

pub async fn find_product<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<product::Model, CatalogError> {
    find_live::<product::Entity, _>(db, id, product::Column::DeletedAt, "Product").await
}

pub async fn find_variant<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<variant::Model, CatalogError> {
    find_live::<variant::Entity, _>(db, id, variant::Column::DeletedAt, "Variant").await
}

/// Count live rows matching `condition`.
pub async fn count_live<E, C>(
    db: &C,
    deleted_at: E::Column,
    condition: Condition,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    E::find()
        .filter(condition)
        .filter(deleted_at.is_null())
        .count(db)
        .await
}
