//! Recovery entry entity - Physical recovery log for one point in time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recovery entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recovery_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub date: DateTimeUtc,
    /// JSON array of `PhysicalSymptom` tokens
    #[sea_orm(column_type = "Text")]
    pub symptoms: String,
    /// 1-10
    pub pain_level: Option<i32>,
    /// `BleedingLevel` token
    pub bleeding: Option<String>,
    /// JSON array of free-text medication names
    #[sea_orm(column_type = "Text")]
    pub medications: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
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
