use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub rating: f32,
    pub is_featured: bool,
    pub is_archived: bool,
    pub has_variants: bool,

    pub category_id: i32,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    pub store_id: i32,
    #[sea_orm(belongs_to, from = "store_id", to = "id")]
    pub store: HasOne<super::store::Entity>,

    #[sea_orm(has_many)]
    pub items: HasMany<super::product_item::Entity>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::product_image::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
