//! Medication entity - A prescription or supplement being tracked.
//!
//! Each medication exclusively owns its dose logs; deleting the medication
//! deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medication database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    /// Free-text dosage, e.g. "400mg"
    pub dosage: String,
    /// `FrequencyType` token
    pub frequency: String,
    /// JSON array of `TimeOfDay` tokens
    #[sea_orm(column_type = "Text")]
    pub time_of_day: String,
    pub notes: Option<String>,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
    pub reminder_enabled: bool,
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
    /// One medication has many dose logs
    #[sea_orm(has_many = "super::medication_log::Entity")]
    Logs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::medication_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
