//! The seam between typed domain records and `SeaORM` rows.

use crate::{
    domain::{EntityKind, Owner},
    entities::{
        baby, journal_entry, medication, medication_log, mood_entry, recovery_entry,
        self_care_activity, user,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait, prelude::Uuid};

/// A typed record stored in one entity collection.
pub trait Record: Sized + Send + Sync + 'static {
    /// Backing `SeaORM` entity
    type Entity: EntityTrait;
    /// Collection this record lives in
    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    /// Primary key column of the backing entity.
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// Rebuilds the record from a row. Fails with `UnknownVariant` when a
    /// required vocabulary column holds a token this build does not know.
    fn decode(model: <Self::Entity as EntityTrait>::Model) -> Result<Self>;

    /// Row this record must stay attached to, if any.
    fn owner(&self) -> Option<Owner>;

    /// Same checks a draft gets before insert.
    fn validate(&self) -> Result<()>;

    /// Full-row update. `created_at` is left untouched; entities that carry
    /// `last_modified` set it to `now`.
    fn stage_update(&self, now: DateTime<Utc>) -> Result<StagedRow>;
}

/// A not-yet-persisted record.
pub trait Draft: Send {
    const KIND: EntityKind;

    fn owner(&self) -> Option<Owner>;

    /// Rejects out-of-range or missing values before anything is staged.
    fn validate(&self) -> Result<()>;

    /// Builds the row to insert with its store-assigned id and creation time.
    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow>;
}

/// A row waiting for the next commit.
#[derive(Clone, Debug)]
pub enum StagedRow {
    User(user::ActiveModel),
    Baby(baby::ActiveModel),
    MoodEntry(mood_entry::ActiveModel),
    RecoveryEntry(recovery_entry::ActiveModel),
    SelfCareActivity(self_care_activity::ActiveModel),
    Medication(medication::ActiveModel),
    MedicationLog(medication_log::ActiveModel),
    JournalEntry(journal_entry::ActiveModel),
}

impl StagedRow {
    pub(crate) async fn insert<C>(self, db: &C) -> std::result::Result<(), DbErr>
    where
        C: sea_orm::ConnectionTrait,
    {
        match self {
            Self::User(row) => {
                row.insert(db).await?;
            }
            Self::Baby(row) => {
                row.insert(db).await?;
            }
            Self::MoodEntry(row) => {
                row.insert(db).await?;
            }
            Self::RecoveryEntry(row) => {
                row.insert(db).await?;
            }
            Self::SelfCareActivity(row) => {
                row.insert(db).await?;
            }
            Self::Medication(row) => {
                row.insert(db).await?;
            }
            Self::MedicationLog(row) => {
                row.insert(db).await?;
            }
            Self::JournalEntry(row) => {
                row.insert(db).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn update<C>(self, db: &C) -> std::result::Result<(), DbErr>
    where
        C: sea_orm::ConnectionTrait,
    {
        match self {
            Self::User(row) => {
                row.update(db).await?;
            }
            Self::Baby(row) => {
                row.update(db).await?;
            }
            Self::MoodEntry(row) => {
                row.update(db).await?;
            }
            Self::RecoveryEntry(row) => {
                row.update(db).await?;
            }
            Self::SelfCareActivity(row) => {
                row.update(db).await?;
            }
            Self::Medication(row) => {
                row.update(db).await?;
            }
            Self::MedicationLog(row) => {
                row.update(db).await?;
            }
            Self::JournalEntry(row) => {
                row.update(db).await?;
            }
        }
        Ok(())
    }
}
