use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{category, product, product_image, product_item, store, variant, variant_option};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("catalog_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Self-referencing foreign key for the category hierarchy. Schema sync only
/// handles relations declared on the entity, so it is added here.
const CATEGORY_PARENT_FK_SQL: &str = r#"
DO $$
BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM pg_constraint WHERE conname = 'fk_category_parent_category'
    ) THEN
        ALTER TABLE category
            ADD CONSTRAINT fk_category_parent_category
            FOREIGN KEY (parent_category_id) REFERENCES category (id);
    END IF;
END
$$;
"#;

/// One live option per value under a variant. Soft-deleted rows do not count.
const VARIANT_OPTION_VALUE_UNIQUE_SQL: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS uq_variant_option_live_value
    ON variant_option (variant_id, value)
    WHERE deleted_at IS NULL
"#;

async fn create_lookup_index(db: &DatabaseConnection, name: &str, stmt: &mut IndexCreateStatement) {
    let sql = stmt.if_not_exists().name(name).to_string(PostgresQueryBuilder);
    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}

/// Create indexes and constraints the entity registry cannot express.
///
/// Lookup indexes are best effort. The parent foreign key and the option
/// uniqueness index back catalog invariants, so failing to create them is
/// an error.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_lookup_index(
        db,
        "idx_store_admin_live",
        Index::create()
            .table(store::Entity)
            .col(store::Column::AdminId)
            .col(store::Column::DeletedAt),
    )
    .await;
    create_lookup_index(
        db,
        "idx_category_store_parent",
        Index::create()
            .table(category::Entity)
            .col(category::Column::StoreId)
            .col(category::Column::ParentCategoryId),
    )
    .await;
    create_lookup_index(
        db,
        "idx_product_store_category",
        Index::create()
            .table(product::Entity)
            .col(product::Column::StoreId)
            .col(product::Column::CategoryId),
    )
    .await;
    create_lookup_index(
        db,
        "idx_product_item_product",
        Index::create()
            .table(product_item::Entity)
            .col(product_item::Column::ProductId)
            .col(product_item::Column::DeletedAt),
    )
    .await;
    create_lookup_index(
        db,
        "idx_product_image_product",
        Index::create()
            .table(product_image::Entity)
            .col(product_image::Column::ProductId)
            .col(product_image::Column::DeletedAt),
    )
    .await;
    create_lookup_index(
        db,
        "idx_variant_category_weight",
        Index::create()
            .table(variant::Entity)
            .col(variant::Column::CategoryId)
            .col(variant::Column::Weight),
    )
    .await;

    db.execute_unprepared(CATEGORY_PARENT_FK_SQL).await?;
    info!("Ensured constraint fk_category_parent_category exists");

    db.execute_unprepared(VARIANT_OPTION_VALUE_UNIQUE_SQL).await?;
    info!("Ensured index uq_variant_option_live_value exists");

    Ok(())
}
