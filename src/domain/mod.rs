//! Domain model - typed records, insert drafts and their vocabularies.
//!
//! Rows come out of the store as [`crate::entities`] models and are decoded
//! into the records defined here; new rows go in as drafts.

pub mod bounds;
pub mod journal;
pub mod medication;
pub mod profile;
pub mod tokens;
pub mod tracking;
pub mod vocabulary;

use std::fmt;

pub use journal::{JournalEntry, NewJournalEntry};
pub use medication::{Medication, MedicationLog, NewMedication, NewMedicationLog};
pub use profile::{Baby, NewBaby, NewUser, User};
pub use tracking::{
    MoodEntry, NewMoodEntry, NewRecoveryEntry, NewSelfCareActivity, RecoveryEntry,
    SelfCareActivity,
};
pub use vocabulary::{
    ActivityType, BleedingLevel, DeliveryType, FrequencyType, Gender, JournalTag,
    PhysicalSymptom, PostpartumSymptom, TimeOfDay,
};

/// The persisted collections, one per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    User,
    Baby,
    MoodEntry,
    RecoveryEntry,
    SelfCareActivity,
    Medication,
    MedicationLog,
    JournalEntry,
    AppState,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "User",
            Self::Baby => "Baby",
            Self::MoodEntry => "MoodEntry",
            Self::RecoveryEntry => "RecoveryEntry",
            Self::SelfCareActivity => "SelfCareActivity",
            Self::Medication => "Medication",
            Self::MedicationLog => "MedicationLog",
            Self::JournalEntry => "JournalEntry",
            Self::AppState => "AppState",
        };
        f.write_str(name)
    }
}

/// The row a staged write claims to belong to.
///
/// Checked inside the commit transaction so a unit of work can reference a
/// user or medication staged earlier in the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    User(uuid::Uuid),
    Medication(uuid::Uuid),
}
