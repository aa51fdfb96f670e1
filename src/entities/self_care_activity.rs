//! Self-care activity entity - A timed activity the parent did for themselves.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Self-care activity database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "self_care_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    /// `ActivityType` token
    pub activity_type: String,
    pub start_time: DateTimeUtc,
    /// Length of the activity in seconds
    pub duration_secs: f64,
    pub notes: Option<String>,
    /// 1-5
    pub mood: Option<i32>,
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
