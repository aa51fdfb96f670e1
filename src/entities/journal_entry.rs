//! Journal entry entity - Free-form writing with optional mood, tags and photos.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Journal entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub date: DateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// 1-5
    pub mood: Option<i32>,
    /// JSON array of `JournalTag` tokens
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    /// JSON array of base64 images; NULL when the entry has no image list
    #[sea_orm(column_type = "Text", nullable)]
    pub images: Option<String>,
    pub created_at: DateTimeUtc,
    pub last_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
