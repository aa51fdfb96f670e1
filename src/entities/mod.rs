//! Entity module - Contains all SeaORM entity definitions for the local store.
//! Each entity has a Model struct for row data and an Entity struct for queries.

pub mod app_state;
pub mod baby;
pub mod journal_entry;
pub mod medication;
pub mod medication_log;
pub mod mood_entry;
pub mod recovery_entry;
pub mod self_care_activity;
pub mod user;

// Re-export specific types to avoid conflicts
pub use app_state::{Column as AppStateColumn, Entity as AppState, Model as AppStateModel};
pub use baby::{Column as BabyColumn, Entity as Baby, Model as BabyModel};
pub use journal_entry::{
    Column as JournalEntryColumn, Entity as JournalEntry, Model as JournalEntryModel,
};
pub use medication::{Column as MedicationColumn, Entity as Medication, Model as MedicationModel};
pub use medication_log::{
    Column as MedicationLogColumn, Entity as MedicationLog, Model as MedicationLogModel,
};
pub use mood_entry::{Column as MoodEntryColumn, Entity as MoodEntry, Model as MoodEntryModel};
pub use recovery_entry::{
    Column as RecoveryEntryColumn, Entity as RecoveryEntry, Model as RecoveryEntryModel,
};
pub use self_care_activity::{
    Column as SelfCareActivityColumn, Entity as SelfCareActivity, Model as SelfCareActivityModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
