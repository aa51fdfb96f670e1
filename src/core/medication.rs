//! Medication schedule and dose logging.

use super::owner_or_active;
use crate::{
    domain::{Medication, MedicationLog, NewMedication, NewMedicationLog},
    entities::{MedicationColumn, MedicationLogColumn},
    errors::Result,
    store::{FetchDescriptor, LocalStore},
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, Order, prelude::Uuid};
use tracing::info;

/// What happened to a scheduled dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dose {
    /// Taken at the given time
    Taken(DateTime<Utc>),
    /// Not taken
    Skipped,
}

/// Adds a medication to the active profile unless the draft names an owner.
pub async fn add_medication(store: &LocalStore, mut draft: NewMedication) -> Result<Uuid> {
    draft.user_id = owner_or_active(store, draft.user_id).await?;
    let mut unit = store.begin();
    let id = unit.insert(draft)?;
    unit.save().await?;
    info!("Added medication {id}");
    Ok(id)
}

/// Logs the outcome of one scheduled dose.
///
/// # Errors
/// * `Constraint` if the medication does not exist
pub async fn record_dose(
    store: &LocalStore,
    medication_id: Uuid,
    scheduled_time: DateTime<Utc>,
    dose: Dose,
    notes: Option<String>,
) -> Result<Uuid> {
    let log = match dose {
        Dose::Taken(at) => NewMedicationLog::taken(medication_id, scheduled_time, at),
        Dose::Skipped => NewMedicationLog::skipped(medication_id, scheduled_time),
    };
    let mut unit = store.begin();
    let id = unit.insert(NewMedicationLog { notes, ..log })?;
    unit.save().await?;
    Ok(id)
}

/// Dose logs of one medication by scheduled time, earliest first.
pub async fn medication_logs(store: &LocalStore, medication_id: Uuid) -> Result<Vec<MedicationLog>> {
    store
        .fetch(
            FetchDescriptor::<MedicationLog>::new()
                .filter(MedicationLogColumn::MedicationId.eq(medication_id))
                .sort_by(MedicationLogColumn::ScheduledTime, Order::Asc),
        )
        .await
}

/// Medications being taken at `at`: started, and not yet ended.
pub async fn active_medications(store: &LocalStore, at: DateTime<Utc>) -> Result<Vec<Medication>> {
    store
        .fetch(
            FetchDescriptor::<Medication>::new()
                .filter(MedicationColumn::StartDate.lte(at))
                .filter(
                    Condition::any()
                        .add(MedicationColumn::EndDate.is_null())
                        .add(MedicationColumn::EndDate.gte(at)),
                )
                .sort_by(MedicationColumn::Name, Order::Asc),
        )
        .await
}

/// Removes a medication and its dose logs.
pub async fn remove_medication(store: &LocalStore, medication_id: Uuid) -> Result<()> {
    let mut unit = store.begin();
    unit.delete::<Medication>(medication_id);
    unit.save().await?;
    info!("Removed medication {medication_id}");
    Ok(())
}
