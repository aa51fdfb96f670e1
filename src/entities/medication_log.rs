//! Medication log entity - One scheduled dose and whether it was taken.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medication log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medication_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The medication that owns this log
    pub medication_id: Uuid,
    pub taken: bool,
    pub scheduled_time: DateTimeUtc,
    pub taken_time: Option<DateTimeUtc>,
    pub skipped: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each log belongs to exactly one medication
    #[sea_orm(
        belongs_to = "super::medication::Entity",
        from = "Column::MedicationId",
        to = "super::medication::Column::Id"
    )]
    Medication,
}

impl Related<super::medication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medication.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
