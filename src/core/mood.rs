//! Mood tracking - check-ins, history and simple trends.

use super::owner_or_active;
use crate::{
    domain::{MoodEntry, NewMoodEntry},
    entities::MoodEntryColumn,
    errors::Result,
    store::{FetchDescriptor, LocalStore},
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, prelude::Uuid};
use tracing::debug;

/// Saves a check-in for the given owner, or for the active profile when the
/// draft names none.
///
/// # Errors
/// * `Constraint` if a score is outside 1-5
/// * `Persistence` if the commit fails; nothing is saved and the call can be
///   repeated
pub async fn log_mood(store: &LocalStore, mut draft: NewMoodEntry) -> Result<Uuid> {
    draft.user_id = owner_or_active(store, draft.user_id).await?;
    let mut unit = store.begin();
    let id = unit.insert(draft)?;
    unit.save().await?;
    debug!("Logged mood entry {id}");
    Ok(id)
}

/// The most recent check-in by date.
pub async fn latest_mood(store: &LocalStore) -> Result<Option<MoodEntry>> {
    store.latest::<MoodEntry>(MoodEntryColumn::Date).await
}

/// Check-ins newest first, optionally capped.
pub async fn mood_history(store: &LocalStore, limit: Option<u64>) -> Result<Vec<MoodEntry>> {
    let mut descriptor = FetchDescriptor::<MoodEntry>::newest_first(MoodEntryColumn::Date);
    if let Some(limit) = limit {
        descriptor = descriptor.limit(limit);
    }
    store.fetch(descriptor).await
}

/// Deletes the given check-ins together. Fails without deleting anything if
/// one of them is gone.
pub async fn delete_mood_entries(store: &LocalStore, ids: &[Uuid]) -> Result<()> {
    let mut unit = store.begin();
    for id in ids {
        unit.delete::<MoodEntry>(*id);
    }
    unit.save().await?;
    Ok(())
}

/// Label shown next to a mood score.
#[must_use]
pub const fn mood_description(rating: u8) -> &'static str {
    match rating {
        1 => "Very Low",
        2 => "Low",
        3 => "Neutral",
        4 => "Good",
        5 => "Excellent",
        _ => "Unknown",
    }
}

/// Mean mood score of check-ins dated at or after `since`.
#[allow(clippy::cast_precision_loss)]
pub async fn average_mood_since(store: &LocalStore, since: DateTime<Utc>) -> Result<Option<f64>> {
    let entries = store
        .fetch(FetchDescriptor::<MoodEntry>::new().filter(MoodEntryColumn::Date.gte(since)))
        .await?;
    if entries.is_empty() {
        return Ok(None);
    }
    let total: u32 = entries.iter().map(|e| u32::from(e.mood_rating)).sum();
    Ok(Some(f64::from(total) / entries.len() as f64))
}
