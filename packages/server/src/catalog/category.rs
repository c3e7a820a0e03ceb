//! Category lifecycle and the store-scoped tree query.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::*;
use tracing::instrument;

use super::guard::{self, AdminId};
use super::repo;
use super::tree::{self, CategoryNode, MAX_CATEGORY_DEPTH, TreeDepth};
use super::tx::transact;
use super::CatalogError;
use crate::entity::{category, product, store, variant};
use crate::models::category::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::shared::non_empty;

/// Load a live parent candidate and confirm it sits in `store_id`.
async fn parent_in_store<C: ConnectionTrait>(
    db: &C,
    store_id: i32,
    parent_id: i32,
) -> Result<category::Model, CatalogError> {
    let parent = category::Entity::find_by_id(parent_id)
        .filter(category::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or(CatalogError::NotFound("Parent category"))?;
    if parent.store_id != store_id {
        return Err(CatalogError::validation(
            "Parent category must belong to the same store",
        ));
    }
    Ok(parent)
}

fn too_deep() -> CatalogError {
    CatalogError::validation(format!(
        "Categories cannot be nested more than {MAX_CATEGORY_DEPTH} levels deep"
    ))
}

/// Depth of `parent_id` below its root, walking up through live parents.
///
/// With `moving` set, reaching that category means the new edge would close a
/// loop. A row already seen ends the walk.
async fn parent_depth<C: ConnectionTrait>(
    db: &C,
    parent_id: i32,
    moving: Option<i32>,
) -> Result<u32, CatalogError> {
    let mut seen = HashSet::new();
    let mut cursor = parent_id;
    let mut depth = 0;
    loop {
        if moving == Some(cursor) {
            return Err(CatalogError::validation(
                "A category cannot be moved under itself or one of its descendants",
            ));
        }
        if !seen.insert(cursor) {
            break;
        }
        let Some(next) = category::Entity::find_by_id(cursor)
            .filter(category::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .and_then(|c| c.parent_category_id)
        else {
            break;
        };
        depth += 1;
        if depth >= MAX_CATEGORY_DEPTH {
            return Err(too_deep());
        }
        cursor = next;
    }
    Ok(depth)
}

#[derive(FromQueryResult)]
struct SubtreeHeight {
    height: i32,
}

const SUBTREE_HEIGHT_SQL: &str = r#"
WITH RECURSIVE subtree AS (
    SELECT id, 0 AS height FROM category WHERE id = $1 AND deleted_at IS NULL
    UNION ALL
    SELECT c.id, s.height + 1
    FROM category c
    JOIN subtree s ON c.parent_category_id = s.id
    WHERE c.deleted_at IS NULL AND s.height < $2
)
SELECT COALESCE(MAX(height), 0) AS height FROM subtree
"#;

/// Levels below `category_id` in its live subtree, counted up to one past
/// the depth limit.
async fn subtree_height<C: ConnectionTrait>(db: &C, category_id: i32) -> Result<u32, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        SUBTREE_HEIGHT_SQL,
        [category_id.into(), (MAX_CATEGORY_DEPTH as i32 + 1).into()],
    );
    let height = SubtreeHeight::find_by_statement(stmt)
        .one(db)
        .await?
        .map_or(0, |h| h.height);
    Ok(u32::try_from(height).unwrap_or(0))
}

/// Serialise structural changes within one store. Ancestor walks that run
/// after this lock see every re-parenting committed before it.
async fn lock_store_tree(txn: &DatabaseTransaction, store_id: i32) -> Result<(), CatalogError> {
    repo::lock_live::<store::Entity>(txn, store_id, store::Column::DeletedAt, "Store").await?;
    Ok(())
}

#[instrument(level = "debug", skip(db, req))]
pub async fn create_category(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    req: CreateCategoryRequest,
) -> Result<category::Model, CatalogError> {
    guard::owned_store(db, admin, store_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            if let Some(parent_id) = req.parent_category_id {
                lock_store_tree(txn, store_id).await?;
                parent_in_store(txn, store_id, parent_id).await?;
                parent_depth(txn, parent_id, None).await?;
            }

            let now = Utc::now();
            let model = category::ActiveModel {
                name: Set(req.name.trim().to_string()),
                description: Set(req.description),
                store_id: Set(store_id),
                parent_category_id: Set(req.parent_category_id),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            Ok(model)
        })
    })
    .await
}

/// The store's category forest, bounded by `depth`.
#[instrument(level = "debug", skip(db))]
pub async fn category_tree(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    depth: TreeDepth,
) -> Result<Vec<CategoryNode>, CatalogError> {
    guard::owned_store(db, admin, store_id).await?;
    let rows = tree::fetch_category_rows(db, store_id, depth).await?;
    Ok(tree::build_tree(rows, depth))
}

#[instrument(level = "debug", skip(db))]
pub async fn get_category(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
) -> Result<category::Model, CatalogError> {
    guard::owned_category(db, admin, store_id, category_id).await
}

#[instrument(level = "debug", skip(db, req))]
pub async fn update_category(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
    req: UpdateCategoryRequest,
) -> Result<category::Model, CatalogError> {
    guard::owned_category(db, admin, store_id, category_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            let existing = repo::lock_live::<category::Entity>(
                txn,
                category_id,
                category::Column::DeletedAt,
                "Category",
            )
            .await?;

            let mut active: category::ActiveModel = existing.into();
            if let Some(name) = non_empty(&req.name) {
                active.name = Set(name.to_string());
            }
            if let Some(description) = non_empty(&req.description) {
                active.description = Set(description.to_string());
            }
            match req.parent_category_id {
                None => {}
                Some(None) => active.parent_category_id = Set(None),
                Some(Some(parent_id)) => {
                    lock_store_tree(txn, store_id).await?;
                    parent_in_store(txn, store_id, parent_id).await?;
                    let above = parent_depth(txn, parent_id, Some(category_id)).await?;
                    let below = subtree_height(txn, category_id).await?;
                    if above + 1 + below > MAX_CATEGORY_DEPTH {
                        return Err(too_deep());
                    }
                    active.parent_category_id = Set(Some(parent_id));
                }
            }
            active.updated_at = Set(Utc::now());
            Ok(active.update(txn).await?)
        })
    })
    .await
}

/// Soft-delete a category. Refused while live subcategories, products or
/// variants still reference it.
#[instrument(level = "debug", skip(db))]
pub async fn delete_category(
    db: &DatabaseConnection,
    admin: AdminId,
    store_id: i32,
    category_id: i32,
) -> Result<(), CatalogError> {
    guard::owned_category(db, admin, store_id, category_id).await?;
    transact(db, move |txn| {
        Box::pin(async move {
            repo::lock_live::<category::Entity>(
                txn,
                category_id,
                category::Column::DeletedAt,
                "Category",
            )
            .await?;

            let subcategories = repo::count_live::<category::Entity, _>(
                txn,
                category::Column::DeletedAt,
                Condition::all().add(category::Column::ParentCategoryId.eq(category_id)),
            )
            .await?;
            let products = repo::count_live::<product::Entity, _>(
                txn,
                product::Column::DeletedAt,
                Condition::all().add(product::Column::CategoryId.eq(category_id)),
            )
            .await?;
            let variants = repo::count_live::<variant::Entity, _>(
                txn,
                variant::Column::DeletedAt,
                Condition::all().add(variant::Column::CategoryId.eq(category_id)),
            )
            .await?;
            if subcategories + products + variants > 0 {
                return Err(CatalogError::Conflict(format!(
                    "Category is still referenced by {subcategories} subcategories, \
                     {products} products and {variants} variants"
                )));
            }

            repo::soft_delete_where::<category::Entity, _>(
                txn,
                category::Column::DeletedAt,
                category::Column::UpdatedAt,
                Condition::all().add(category::Column::Id.eq(category_id)),
            )
            .await?;
            Ok(())
        })
    })
    .await
}
