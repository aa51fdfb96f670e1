//! Mood entry entity - One emotional check-in.
//!
//! Symptoms are free tag strings stored as a JSON array; the ratings are small
//! integers validated before they reach this table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mood entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mood_entries")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user, if any
    pub user_id: Option<Uuid>,
    /// When the mood was felt
    pub date: DateTimeUtc,
    /// 1-5
    pub mood_rating: i32,
    /// JSON array of symptom tags
    #[sea_orm(column_type = "Text")]
    pub symptoms: String,
    /// 1-5
    pub anxiety: Option<i32>,
    /// 1-5
    pub sleep_quality: Option<i32>,
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
