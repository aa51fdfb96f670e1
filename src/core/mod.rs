//! Core business logic module - What each screen of the app asks of the store.
//!
//! Each submodule is a set of async functions over a [`LocalStore`]. None of
//! them hold presentation state; they read, stage, commit and return typed
//! results.

pub mod home;
pub mod journal;
pub mod medication;
pub mod mood;
pub mod onboarding;
pub mod profile;
pub mod recovery;
pub mod self_care;

use crate::{errors::Result, store::LocalStore, store::app_state};
use sea_orm::prelude::Uuid;

/// An explicit owner wins; otherwise new entries belong to the active profile.
pub(crate) async fn owner_or_active(
    store: &LocalStore,
    user_id: Option<Uuid>,
) -> Result<Option<Uuid>> {
    match user_id {
        Some(id) => Ok(Some(id)),
        None => app_state::active_user_id(store.connection()).await,
    }
}
