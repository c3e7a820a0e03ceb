use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "variant_option")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique per variant among live rows, see `database::ensure_indexes`.
    pub value: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub weight: i32,

    pub variant_id: i32,
    #[sea_orm(belongs_to, from = "variant_id", to = "id")]
    pub variant: HasOne<super::variant::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
