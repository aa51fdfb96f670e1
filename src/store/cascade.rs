//! Cascading deletes, executed inside the commit transaction.
//!
//! User owns babies, mood, recovery, self-care, medication and journal rows.
//! Medication owns its logs. A partial cascade can never commit because every
//! statement here runs on the unit-of-work transaction.

use super::app_state;
use crate::{
    domain::EntityKind,
    entities::{
        Baby, JournalEntry, Medication, MedicationLog, MoodEntry, RecoveryEntry,
        SelfCareActivity, User, baby, journal_entry, medication, medication_log, mood_entry,
        recovery_entry, self_care_activity,
    },
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DeleteResult, prelude::*};
use std::collections::BTreeSet;
use tracing::debug;

/// Deletes one row and everything it owns. Returns the collections touched.
pub(crate) async fn delete<C>(db: &C, kind: EntityKind, id: Uuid) -> Result<BTreeSet<EntityKind>>
where
    C: ConnectionTrait,
{
    let mut touched = BTreeSet::from([kind]);
    match kind {
        EntityKind::User => delete_user(db, id, &mut touched).await?,
        EntityKind::Medication => delete_medication(db, id, &mut touched).await?,
        EntityKind::Baby => expect_deleted(kind, id, Baby::delete_by_id(id).exec(db).await?)?,
        EntityKind::MoodEntry => {
            expect_deleted(kind, id, MoodEntry::delete_by_id(id).exec(db).await?)?;
        }
        EntityKind::RecoveryEntry => {
            expect_deleted(kind, id, RecoveryEntry::delete_by_id(id).exec(db).await?)?;
        }
        EntityKind::SelfCareActivity => {
            expect_deleted(kind, id, SelfCareActivity::delete_by_id(id).exec(db).await?)?;
        }
        EntityKind::MedicationLog => {
            expect_deleted(kind, id, MedicationLog::delete_by_id(id).exec(db).await?)?;
        }
        EntityKind::JournalEntry => {
            expect_deleted(kind, id, JournalEntry::delete_by_id(id).exec(db).await?)?;
        }
        EntityKind::AppState => {
            return Err(Error::constraint("app state rows are not deleted by id"));
        }
    }
    Ok(touched)
}

async fn delete_user<C>(db: &C, id: Uuid, touched: &mut BTreeSet<EntityKind>) -> Result<()>
where
    C: ConnectionTrait,
{
    if User::find_by_id(id).one(db).await?.is_none() {
        return Err(Error::NotFound {
            kind: EntityKind::User,
            id,
        });
    }

    let medication_ids: Vec<Uuid> = Medication::find()
        .filter(medication::Column::UserId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let logs = MedicationLog::delete_many()
        .filter(medication_log::Column::MedicationId.is_in(medication_ids))
        .exec(db)
        .await?;
    let medications = Medication::delete_many()
        .filter(medication::Column::UserId.eq(id))
        .exec(db)
        .await?;
    let moods = MoodEntry::delete_many()
        .filter(mood_entry::Column::UserId.eq(id))
        .exec(db)
        .await?;
    let recoveries = RecoveryEntry::delete_many()
        .filter(recovery_entry::Column::UserId.eq(id))
        .exec(db)
        .await?;
    let self_care = SelfCareActivity::delete_many()
        .filter(self_care_activity::Column::UserId.eq(id))
        .exec(db)
        .await?;
    let journals = JournalEntry::delete_many()
        .filter(journal_entry::Column::UserId.eq(id))
        .exec(db)
        .await?;
    let babies = Baby::delete_many()
        .filter(baby::Column::UserId.eq(id))
        .exec(db)
        .await?;

    touched.extend([
        EntityKind::MedicationLog,
        EntityKind::Medication,
        EntityKind::MoodEntry,
        EntityKind::RecoveryEntry,
        EntityKind::SelfCareActivity,
        EntityKind::JournalEntry,
        EntityKind::Baby,
    ]);

    if app_state::active_user_id(db).await? == Some(id) {
        app_state::set_active_user(db, None).await?;
        touched.insert(EntityKind::AppState);
    }

    User::delete_by_id(id).exec(db).await?;

    debug!(
        "Cascade from user {id}: {} logs, {} medications, {} moods, {} recoveries, {} self-care, {} journal, {} babies",
        logs.rows_affected,
        medications.rows_affected,
        moods.rows_affected,
        recoveries.rows_affected,
        self_care.rows_affected,
        journals.rows_affected,
        babies.rows_affected
    );
    Ok(())
}

async fn delete_medication<C>(db: &C, id: Uuid, touched: &mut BTreeSet<EntityKind>) -> Result<()>
where
    C: ConnectionTrait,
{
    let logs = MedicationLog::delete_many()
        .filter(medication_log::Column::MedicationId.eq(id))
        .exec(db)
        .await?;
    expect_deleted(
        EntityKind::Medication,
        id,
        Medication::delete_by_id(id).exec(db).await?,
    )?;
    touched.insert(EntityKind::MedicationLog);
    debug!("Cascade from medication {id}: {} logs", logs.rows_affected);
    Ok(())
}

fn expect_deleted(kind: EntityKind, id: Uuid, result: DeleteResult) -> Result<()> {
    if result.rows_affected == 0 {
        return Err(Error::NotFound { kind, id });
    }
    Ok(())
}
