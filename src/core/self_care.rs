//! Self-care activities.

use super::owner_or_active;
use crate::{
    domain::{NewSelfCareActivity, SelfCareActivity},
    entities::SelfCareActivityColumn,
    errors::Result,
    store::{FetchDescriptor, LocalStore},
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, prelude::Uuid};
use std::time::Duration;

/// Saves an activity for the active profile unless the draft names an owner.
pub async fn log_self_care(store: &LocalStore, mut draft: NewSelfCareActivity) -> Result<Uuid> {
    draft.user_id = owner_or_active(store, draft.user_id).await?;
    let mut unit = store.begin();
    let id = unit.insert(draft)?;
    unit.save().await?;
    Ok(id)
}

/// The activity that started most recently.
pub async fn latest_self_care(store: &LocalStore) -> Result<Option<SelfCareActivity>> {
    store.latest::<SelfCareActivity>(SelfCareActivityColumn::StartTime).await
}

/// Total time spent on activities that started at or after `since`.
pub async fn total_self_care_since(store: &LocalStore, since: DateTime<Utc>) -> Result<Duration> {
    let activities = store
        .fetch(
            FetchDescriptor::<SelfCareActivity>::new()
                .filter(SelfCareActivityColumn::StartTime.gte(since)),
        )
        .await?;
    let seconds: f64 = activities.iter().map(|a| a.duration_secs).sum();
    Ok(Duration::from_secs_f64(seconds))
}
