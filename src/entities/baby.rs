//! Baby entity - The baby recorded during onboarding, linked to its parent's profile.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Baby database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "babies")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user, if any
    pub user_id: Option<Uuid>,
    pub name: String,
    pub birth_date: DateTimeUtc,
    /// Birth weight, positive when present
    pub birth_weight: Option<f64>,
    /// Birth length, positive when present
    pub birth_length: Option<f64>,
    /// `Gender` token
    pub gender: String,
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
