//! Physical recovery log.

use super::owner_or_active;
use crate::{
    domain::{NewRecoveryEntry, RecoveryEntry},
    entities::RecoveryEntryColumn,
    errors::Result,
    store::{FetchDescriptor, LocalStore},
};
use sea_orm::prelude::Uuid;

/// Saves a recovery entry for the active profile unless the draft names an
/// owner.
pub async fn log_recovery(store: &LocalStore, mut draft: NewRecoveryEntry) -> Result<Uuid> {
    draft.user_id = owner_or_active(store, draft.user_id).await?;
    let mut unit = store.begin();
    let id = unit.insert(draft)?;
    unit.save().await?;
    Ok(id)
}

/// The most recent recovery entry by date.
pub async fn latest_recovery(store: &LocalStore) -> Result<Option<RecoveryEntry>> {
    store.latest::<RecoveryEntry>(RecoveryEntryColumn::Date).await
}

/// Entries newest first, optionally capped.
pub async fn recovery_history(
    store: &LocalStore,
    limit: Option<u64>,
) -> Result<Vec<RecoveryEntry>> {
    let mut descriptor = FetchDescriptor::<RecoveryEntry>::newest_first(RecoveryEntryColumn::Date);
    if let Some(limit) = limit {
        descriptor = descriptor.limit(limit);
    }
    store.fetch(descriptor).await
}
