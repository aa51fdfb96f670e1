//! User entity - The profile at the root of the tracking aggregate.
//!
//! A user owns mood, recovery, self-care, medication and journal rows, plus the
//! baby recorded during onboarding. Deleting a user deletes all of them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name of the parent
    pub name: String,
    /// Parent's date of birth
    pub birth_date: DateTimeUtc,
    /// Actual delivery date, or the due date before the baby is born
    pub delivery_date: DateTimeUtc,
    /// `DeliveryType` token, absent until the baby is born
    pub delivery_type: Option<String>,
    /// JPEG bytes of the profile picture
    pub profile_image: Option<Vec<u8>>,
    /// Set once at construction
    pub created_at: DateTimeUtc,
    /// Refreshed on every committed update
    pub last_modified: DateTimeUtc,
}

/// Defines relationships between User and the rows it owns
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::baby::Entity")]
    Babies,
    #[sea_orm(has_many = "super::mood_entry::Entity")]
    MoodEntries,
    #[sea_orm(has_many = "super::recovery_entry::Entity")]
    RecoveryEntries,
    #[sea_orm(has_many = "super::self_care_activity::Entity")]
    SelfCareActivities,
    #[sea_orm(has_many = "super::medication::Entity")]
    Medications,
    #[sea_orm(has_many = "super::journal_entry::Entity")]
    JournalEntries,
}

impl Related<super::baby::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Babies.def()
    }
}

impl Related<super::mood_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoodEntries.def()
    }
}

impl Related<super::recovery_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecoveryEntries.def()
    }
}

impl Related<super::self_care_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SelfCareActivities.def()
    }
}

impl Related<super::medication::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medications.def()
    }
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
