use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub store_id: i32,
    #[sea_orm(belongs_to, from = "store_id", to = "id")]
    pub store: HasOne<super::store::Entity>,

    /// NULL for root categories. The self-referencing foreign key is created
    /// in `database::ensure_indexes`.
    pub parent_category_id: Option<i32>,

    #[sea_orm(has_many)]
    pub products: HasMany<super::product::Entity>,

    #[sea_orm(has_many)]
    pub variants: HasMany<super::variant::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
