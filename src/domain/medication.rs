//! Medications and the dose logs they own.

use super::{
    EntityKind, FrequencyType, Owner, TimeOfDay,
    bounds::check_not_blank,
    tokens::{decode_set, encode_set},
};
use crate::{
    entities::{medication, medication_log},
    errors::{Error, Result},
    store::{Draft, Record, StagedRow},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Unchanged},
    Set,
    prelude::Uuid,
};
use std::collections::BTreeSet;

/// A prescription or supplement on the parent's schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub dosage: String,
    pub frequency: FrequencyType,
    pub time_of_day: BTreeSet<TimeOfDay>,
    pub notes: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl Medication {
    /// Whether the medication is still being taken at `at`.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && self.end_date.is_none_or(|end| at <= end)
    }
}

/// Input for a new [`Medication`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedication {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub dosage: String,
    pub frequency: FrequencyType,
    pub time_of_day: BTreeSet<TimeOfDay>,
    pub notes: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_enabled: bool,
}

fn validate_medication(
    name: &str,
    dosage: &str,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> Result<()> {
    check_not_blank("medication name", name)?;
    check_not_blank("dosage", dosage)?;
    match end_date {
        Some(end) if end < start_date => Err(Error::constraint(format!(
            "end date {end} is before start date {start_date}"
        ))),
        _ => Ok(()),
    }
}

impl Draft for NewMedication {
    const KIND: EntityKind = EntityKind::Medication;

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_medication(&self.name, &self.dosage, self.start_date, self.end_date)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::Medication(medication::ActiveModel {
            id: Set(id),
            user_id: Set(self.user_id),
            name: Set(self.name.trim().to_string()),
            dosage: Set(self.dosage.trim().to_string()),
            frequency: Set(self.frequency.as_token().to_string()),
            time_of_day: Set(encode_set(&self.time_of_day)?),
            notes: Set(self.notes),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            reminder_enabled: Set(self.reminder_enabled),
            created_at: Set(now),
        }))
    }
}

impl Record for Medication {
    type Entity = medication::Entity;
    const KIND: EntityKind = EntityKind::Medication;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> medication::Column {
        medication::Column::Id
    }

    fn decode(model: medication::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            dosage: model.dosage,
            frequency: FrequencyType::from_token(&model.frequency)?,
            time_of_day: decode_set(&model.time_of_day)?,
            notes: model.notes,
            start_date: model.start_date,
            end_date: model.end_date,
            reminder_enabled: model.reminder_enabled,
            created_at: model.created_at,
        })
    }

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_medication(&self.name, &self.dosage, self.start_date, self.end_date)
    }

    fn stage_update(&self, _now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::Medication(medication::ActiveModel {
            id: Unchanged(self.id),
            user_id: Set(self.user_id),
            name: Set(self.name.trim().to_string()),
            dosage: Set(self.dosage.trim().to_string()),
            frequency: Set(self.frequency.as_token().to_string()),
            time_of_day: Set(encode_set(&self.time_of_day)?),
            notes: Set(self.notes.clone()),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            reminder_enabled: Set(self.reminder_enabled),
            created_at: NotSet,
        }))
    }
}

/// One scheduled dose and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationLog {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub taken: bool,
    pub scheduled_time: DateTime<Utc>,
    pub taken_time: Option<DateTime<Utc>>,
    pub skipped: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for a new [`MedicationLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMedicationLog {
    pub medication_id: Uuid,
    pub taken: bool,
    pub scheduled_time: DateTime<Utc>,
    pub taken_time: Option<DateTime<Utc>>,
    pub skipped: bool,
    pub notes: Option<String>,
}

impl NewMedicationLog {
    /// A dose taken at `taken_time`.
    #[must_use]
    pub const fn taken(
        medication_id: Uuid,
        scheduled_time: DateTime<Utc>,
        taken_time: DateTime<Utc>,
    ) -> Self {
        Self {
            medication_id,
            taken: true,
            scheduled_time,
            taken_time: Some(taken_time),
            skipped: false,
            notes: None,
        }
    }

    /// A dose deliberately skipped.
    #[must_use]
    pub const fn skipped(medication_id: Uuid, scheduled_time: DateTime<Utc>) -> Self {
        Self {
            medication_id,
            taken: false,
            scheduled_time,
            taken_time: None,
            skipped: true,
            notes: None,
        }
    }
}

fn validate_log(taken: bool, skipped: bool) -> Result<()> {
    if taken && skipped {
        return Err(Error::constraint("a dose cannot be both taken and skipped"));
    }
    Ok(())
}

impl Draft for NewMedicationLog {
    const KIND: EntityKind = EntityKind::MedicationLog;

    fn owner(&self) -> Option<Owner> {
        Some(Owner::Medication(self.medication_id))
    }

    fn validate(&self) -> Result<()> {
        validate_log(self.taken, self.skipped)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::MedicationLog(medication_log::ActiveModel {
            id: Set(id),
            medication_id: Set(self.medication_id),
            taken: Set(self.taken),
            scheduled_time: Set(self.scheduled_time),
            taken_time: Set(self.taken_time),
            skipped: Set(self.skipped),
            notes: Set(self.notes),
            created_at: Set(now),
        }))
    }
}

impl Record for MedicationLog {
    type Entity = medication_log::Entity;
    const KIND: EntityKind = EntityKind::MedicationLog;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> medication_log::Column {
        medication_log::Column::Id
    }

    fn decode(model: medication_log::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            medication_id: model.medication_id,
            taken: model.taken,
            scheduled_time: model.scheduled_time,
            taken_time: model.taken_time,
            skipped: model.skipped,
            notes: model.notes,
            created_at: model.created_at,
        })
    }

    fn owner(&self) -> Option<Owner> {
        Some(Owner::Medication(self.medication_id))
    }

    fn validate(&self) -> Result<()> {
        validate_log(self.taken, self.skipped)
    }

    fn stage_update(&self, _now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::MedicationLog(medication_log::ActiveModel {
            id: Unchanged(self.id),
            medication_id: Set(self.medication_id),
            taken: Set(self.taken),
            scheduled_time: Set(self.scheduled_time),
            taken_time: Set(self.taken_time),
            skipped: Set(self.skipped),
            notes: Set(self.notes.clone()),
            created_at: NotSet,
        }))
    }
}
