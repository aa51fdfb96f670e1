//! Shared test utilities for `PostpartumEase`.
//!
//! This module provides common helper functions for setting up test stores
//! and creating test records with sensible defaults.

use crate::{
    domain::{DeliveryType, FrequencyType, Gender, NewBaby, NewMedication, NewUser, TimeOfDay},
    errors::Result,
    store::LocalStore,
};
use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseConnection, prelude::Uuid};
use std::collections::BTreeSet;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all store tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Wraps a fresh in-memory database in a [`LocalStore`].
pub async fn setup_test_store() -> Result<LocalStore> {
    Ok(LocalStore::from_connection(setup_test_db().await?))
}

/// A user draft with sensible defaults.
///
/// # Defaults
/// * `birth_date`: 1994-03-12
/// * `delivery_date`: 2024-06-01
/// * `delivery_type`: Vaginal
/// * `profile_image`: None
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn test_user_draft(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        birth_date: Utc.with_ymd_and_hms(1994, 3, 12, 0, 0, 0).unwrap(),
        delivery_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        delivery_type: Some(DeliveryType::Vaginal),
        profile_image: None,
    }
}

/// A baby draft with no owner and no measurements.
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn test_baby_draft(name: &str) -> NewBaby {
    NewBaby {
        user_id: None,
        name: name.to_string(),
        birth_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        birth_weight: None,
        birth_length: None,
        gender: Gender::Female,
    }
}

/// A daily morning medication starting on the delivery date, no owner.
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
pub fn test_medication_draft(name: &str) -> NewMedication {
    NewMedication {
        user_id: None,
        name: name.to_string(),
        dosage: "200mg".to_string(),
        frequency: FrequencyType::Daily,
        time_of_day: BTreeSet::from([TimeOfDay::Morning]),
        notes: None,
        start_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        end_date: None,
        reminder_enabled: false,
    }
}

/// Inserts a user with [`test_user_draft`] defaults and returns its id.
pub async fn create_test_user(store: &LocalStore, name: &str) -> Result<Uuid> {
    let mut unit = store.begin();
    let id = unit.insert(test_user_draft(name))?;
    unit.save().await?;
    Ok(id)
}
