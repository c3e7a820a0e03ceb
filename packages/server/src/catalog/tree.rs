//! Materialises a store's flat category table into a forest.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement};
use serde::Serialize;
use tracing::instrument;

use super::CatalogError;

/// Deepest level a category may be written at; roots are level 0.
pub const MAX_CATEGORY_DEPTH: u32 = 64;

/// How deep below the roots a tree query descends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeDepth {
    Unbounded,
    /// Roots are depth 0; nodes deeper than this are excluded.
    AtMost(u32),
}

impl TreeDepth {
    /// Parse the `level` query parameter, where `-1` means unbounded.
    pub fn from_level(level: Option<i32>) -> Result<Self, CatalogError> {
        match level {
            None | Some(-1) => Ok(TreeDepth::Unbounded),
            Some(n) if n >= 0 => Ok(TreeDepth::AtMost(n as u32)),
            Some(_) => Err(CatalogError::validation(
                "level must be -1 (unbounded) or a non-negative depth",
            )),
        }
    }

    fn sql_bound(self) -> i32 {
        match self {
            TreeDepth::Unbounded => -1,
            TreeDepth::AtMost(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }

    fn allows_children_at(self, depth: u32) -> bool {
        match self {
            TreeDepth::Unbounded => true,
            TreeDepth::AtMost(max) => depth <= max,
        }
    }
}

/// One category row annotated with its distance from the root.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub store_id: i32,
    pub parent_category_id: Option<i32>,
    pub depth: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category together with its direct subcategories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct CategoryNode {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "Shoes")]
    pub name: String,
    pub description: String,
    pub store_id: i32,
    pub parent_category_id: Option<i32>,
    /// Distance from the root (roots are 0).
    pub depth: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(no_recursion)]
    pub subcategories: Vec<CategoryNode>,
}

const CATEGORY_TREE_SQL: &str = r#"
WITH RECURSIVE category_tree AS (
    SELECT c.id, c.name, c.description, c.store_id, c.parent_category_id,
           c.created_at, c.updated_at, 0 AS depth
    FROM category c
    WHERE c.store_id = $1 AND c.parent_category_id IS NULL AND c.deleted_at IS NULL

    UNION ALL

    SELECT c.id, c.name, c.description, c.store_id, c.parent_category_id,
           c.created_at, c.updated_at, ct.depth + 1
    FROM category c
    JOIN category_tree ct ON c.parent_category_id = ct.id
    WHERE c.store_id = $1 AND c.deleted_at IS NULL AND ($2 < 0 OR ct.depth < $2)
)
SELECT id, name, description, store_id, parent_category_id, created_at, updated_at, depth
FROM category_tree
WHERE $2 < 0 OR depth <= $2
ORDER BY id
"#;

/// Fetch every live category of a store reachable from a root, in one
/// recursive query, ordered by ascending id.
#[instrument(level = "debug", skip(db))]
pub async fn fetch_category_rows<C: ConnectionTrait>(
    db: &C,
    store_id: i32,
    depth: TreeDepth,
) -> Result<Vec<CategoryRow>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        CATEGORY_TREE_SQL,
        [store_id.into(), depth.sql_bound().into()],
    );
    CategoryRow::find_by_statement(stmt).all(db).await
}

/// Assemble rows into a forest.
///
/// Roots are the rows without a parent, kept in input order. Each row is
/// attached under its parent regardless of whether the parent appears before
/// or after it. Rows whose parent is absent from `rows`, or that sit deeper
/// than `depth`, are dropped rather than promoted to roots.
///
/// Runs without recursion, so the height of the input never bounds the stack.
pub fn build_tree(rows: Vec<CategoryRow>, depth: TreeDepth) -> Vec<CategoryNode> {
    let mut children: HashMap<i32, Vec<CategoryRow>> = HashMap::new();
    let mut placed = Vec::new();

    for row in rows {
        match row.parent_category_id {
            None => placed.push(Placed {
                row,
                level: 0,
                parent: None,
            }),
            Some(parent) => children.entry(parent).or_default().push(row),
        }
    }

    // Breadth-first: every node lands after its parent. `remove` hands out
    // each child list once, so a node is placed at most once.
    let mut next = 0;
    while next < placed.len() {
        let (id, level) = (placed[next].row.id, placed[next].level + 1);
        if depth.allows_children_at(level)
            && let Some(kids) = children.remove(&id)
        {
            placed.extend(kids.into_iter().map(|row| Placed {
                row,
                level,
                parent: Some(next),
            }));
        }
        next += 1;
    }

    // Fold bottom-up: when a node is popped, all of its descendants sit at
    // higher indices and have already been folded into it.
    let mut pending: Vec<Vec<CategoryNode>> = placed.iter().map(|_| Vec::new()).collect();
    let mut forest = Vec::new();
    while let Some(Placed { row, level, parent }) = placed.pop() {
        let mut subcategories = std::mem::take(&mut pending[placed.len()]);
        subcategories.reverse();
        let node = CategoryNode {
            id: row.id,
            name: row.name,
            description: row.description,
            store_id: row.store_id,
            parent_category_id: row.parent_category_id,
            depth: level as i32,
            created_at: row.created_at,
            updated_at: row.updated_at,
            subcategories,
        };
        match parent {
            Some(index) => pending[index].push(node),
            None => forest.push(node),
        }
    }
    forest.reverse();
    forest
}

struct Placed {
    row: CategoryRow,
    level: u32,
    parent: Option<usize>,
}

impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.subcategories);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.subcategories);
        }
    }
}
