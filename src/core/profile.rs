//! Profile management for the active user.

use crate::{
    domain::{Baby, User},
    entities::BabyColumn,
    errors::Result,
    store::{FetchDescriptor, LocalStore},
    sync::SyncAgent,
};
use sea_orm::{ColumnTrait, prelude::Uuid};
use tracing::info;

/// The active profile, if onboarding has set one.
pub async fn current_user(store: &LocalStore) -> Result<Option<User>> {
    store.current_user().await
}

/// Saves an edited profile and returns it as stored, with `last_modified`
/// refreshed. The stored profile is then mirrored best effort.
///
/// # Errors
/// * `Constraint` if the name is blank
/// * `NotFound` if the user was deleted meanwhile
pub async fn update_profile(store: &LocalStore, sync: &SyncAgent, user: &User) -> Result<User> {
    let mut unit = store.begin();
    unit.update(user)?;
    unit.save().await?;
    let stored: User = store.get(user.id).await?;
    sync.mirror_best_effort(&stored).await;
    info!("Updated profile {}", stored.id);
    Ok(stored)
}

/// Deletes a profile and every record it owns.
pub async fn delete_profile(store: &LocalStore, user_id: Uuid) -> Result<()> {
    let mut unit = store.begin();
    unit.delete::<User>(user_id);
    unit.save().await?;
    info!("Deleted profile {user_id}");
    Ok(())
}

/// Babies linked to a profile, oldest first.
pub async fn babies_of(store: &LocalStore, user_id: Uuid) -> Result<Vec<Baby>> {
    store
        .fetch(
            FetchDescriptor::<Baby>::new()
                .filter(BabyColumn::UserId.eq(user_id))
                .sort_by(BabyColumn::BirthDate, sea_orm::Order::Asc),
        )
        .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        domain::{MoodEntry, NewBaby, NewMoodEntry},
        errors::Error,
        sync::{AccountStatus, RemoteValue, agent::tests::FakeRemote},
        test_utils::*,
    };
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_update_profile_persists_changes() -> Result<()> {
        let store = setup_test_store().await?;
        let id = create_test_user(&store, "Ava").await?;
        let mut user: User = store.get(id).await?;
        user.profile_image = Some(vec![7, 7, 7]);

        let saved = update_profile(&store, &SyncAgent::disabled(), &user).await?;
        assert_eq!(saved.profile_image, Some(vec![7, 7, 7]));
        assert!(saved.last_modified >= user.last_modified);

        user.name = String::new();
        assert!(matches!(
            update_profile(&store, &SyncAgent::disabled(), &user).await,
            Err(Error::Constraint { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_mirrors_edited_name() -> Result<()> {
        let store = setup_test_store().await?;
        let remote = Arc::new(FakeRemote::new(AccountStatus::Available));
        let scratch = tempfile::tempdir()?;
        let sync = SyncAgent::new(Arc::clone(&remote) as _, scratch.path().to_path_buf());
        let id = create_test_user(&store, "Ava").await?;
        let mut user: User = store.get(id).await?;
        user.name = "Ava Rose".to_string();

        update_profile(&store, &sync, &user).await?;
        let saved = remote.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(
            saved[0].get("name"),
            Some(&RemoteValue::Text("Ava Rose".to_string()))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_succeeds_when_remote_unavailable() -> Result<()> {
        let store = setup_test_store().await?;
        let remote = Arc::new(FakeRemote::new(AccountStatus::NoAccount));
        let sync = SyncAgent::new(Arc::clone(&remote) as _, std::env::temp_dir());
        let id = create_test_user(&store, "Ava").await?;
        let mut user: User = store.get(id).await?;
        user.name = "Ava Rose".to_string();

        let stored = update_profile(&store, &sync, &user).await?;
        assert_eq!(stored.name, "Ava Rose");
        assert_eq!(store.get::<User>(id).await?.name, "Ava Rose");
        assert!(remote.saved.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_profile_cascades() -> Result<()> {
        let store = setup_test_store().await?;
        let id = create_test_user(&store, "Ava").await?;
        let mut unit = store.begin();
        unit.insert(NewMoodEntry {
            user_id: Some(id),
            ..NewMoodEntry::new(Utc::now(), 4)
        })?;
        unit.insert(NewBaby {
            user_id: Some(id),
            ..test_baby_draft("Noor")
        })?;
        unit.save().await?;

        assert_eq!(babies_of(&store, id).await?.len(), 1);
        delete_profile(&store, id).await?;
        assert_eq!(store.count::<MoodEntry>().await?, 0);
        assert!(babies_of(&store, id).await?.is_empty());

        assert!(matches!(
            delete_profile(&store, id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
