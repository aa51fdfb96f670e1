//! Key-value app state: the active profile reference and the onboarding flag.
//!
//! All functions take any [`ConnectionTrait`] so they run both standalone and
//! inside a unit-of-work transaction.

use crate::{
    entities::{AppState, app_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, Set, prelude::*};
use tracing::{debug, warn};

/// Key holding the active user's id
pub const ACTIVE_USER_KEY: &str = "active_user_id";
/// Key holding `"true"` once onboarding has completed
pub const ONBOARDING_COMPLETED_KEY: &str = "onboarding_completed";

/// Retrieves a value from the `app_state` table.
///
/// # Returns
/// * `Ok(Some(value))` - The key exists
/// * `Ok(None)` - The key has never been written
pub async fn get_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = AppState::find()
        .filter(app_state::Column::Key.eq(key))
        .one(db)
        .await?;
    debug!("App state for key '{}': {:?}", key, state.as_ref().map(|s| &s.value));
    Ok(state.map(|s| s.value))
}

/// Sets or updates a value in the `app_state` table.
pub async fn set_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now();

    // Check if the key exists
    let existing = AppState::find()
        .filter(app_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: app_state::ActiveModel = state.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = app_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

/// Deletes a key; missing keys are ignored.
pub async fn remove_value<C>(db: &C, key: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    AppState::delete_many()
        .filter(app_state::Column::Key.eq(key))
        .exec(db)
        .await?;
    Ok(())
}

/// The active profile, if one has been chosen.
pub async fn active_user_id<C>(db: &C) -> Result<Option<Uuid>>
where
    C: ConnectionTrait,
{
    let Some(raw) = get_value(db, ACTIVE_USER_KEY).await? else {
        return Ok(None);
    };
    match Uuid::parse_str(&raw) {
        Ok(id) => Ok(Some(id)),
        Err(e) => {
            warn!("Ignoring unparseable active user id {raw:?}: {e}");
            Ok(None)
        }
    }
}

/// Points the active profile at `user_id`, or clears it.
pub async fn set_active_user<C>(db: &C, user_id: Option<Uuid>) -> Result<()>
where
    C: ConnectionTrait,
{
    match user_id {
        Some(id) => set_value(db, ACTIVE_USER_KEY, &id.to_string()).await,
        None => remove_value(db, ACTIVE_USER_KEY).await,
    }
}

/// Whether the onboarding flag is set to `true`.
pub async fn onboarding_completed<C>(db: &C) -> Result<bool>
where
    C: ConnectionTrait,
{
    Ok(get_value(db, ONBOARDING_COMPLETED_KEY)
        .await?
        .is_some_and(|v| v == "true"))
}

/// Writes the onboarding flag.
pub async fn set_onboarding_completed<C>(db: &C, completed: bool) -> Result<()>
where
    C: ConnectionTrait,
{
    set_value(db, ONBOARDING_COMPLETED_KEY, if completed { "true" } else { "false" }).await
}
