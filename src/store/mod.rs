//! Local store - durable, queryable persistence for every domain record.
//!
//! The store is the single source of truth on the device. Reads go straight to
//! the database; writes go through a [`UnitOfWork`] and are serialized by one
//! writer lock, so there is exactly one logical writer per store regardless of
//! how many tasks hold a clone.

pub mod app_state;
mod cascade;
pub mod query;
pub mod record;
mod unit_of_work;

pub use query::FetchDescriptor;
pub use record::{Draft, Record, StagedRow};
pub use unit_of_work::UnitOfWork;

use crate::{
    config::{DatabaseConfig, database},
    domain::User,
    errors::{Error, Result},
    events::{AppEvent, EventBus},
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::{Mutex, broadcast};
use tracing::{info, instrument};

/// Handle to the local store. Cheap to clone; clones share the writer lock,
/// the generation counter and the event bus.
#[derive(Debug, Clone)]
pub struct LocalStore {
    db: DatabaseConnection,
    writer: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
    events: EventBus,
}

impl LocalStore {
    /// Opens the primary, file-backed store and makes sure the schema exists.
    ///
    /// In-memory databases are refused: the primary store must survive a
    /// process restart.
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        if database::is_in_memory(&config.url) {
            return Err(Error::Config {
                message: format!(
                    "The primary store must be file-backed, got in-memory URL {}",
                    config.url
                ),
            });
        }
        let db = database::create_connection(&config.url).await?;
        database::create_tables(&db).await?;
        info!("Local store ready");
        Ok(Self::from_connection(db))
    }

    /// Wraps an existing connection whose tables already exist.
    #[must_use]
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::with_events(db, EventBus::default())
    }

    /// Wraps an existing connection and publishes on the given bus.
    #[must_use]
    pub fn with_events(db: DatabaseConnection, events: EventBus) -> Self {
        Self {
            db,
            writer: Arc::new(Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
            events,
        }
    }

    /// The underlying connection, for reads outside a unit of work.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// The bus commits and app events are published on.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// A new receiver for every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    /// Number of successful commits since this store was opened.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Starts staging writes for one logical action.
    pub const fn begin(&self) -> UnitOfWork<'_> {
        UnitOfWork::new(self)
    }

    /// Fetches records matching the descriptor.
    ///
    /// Rows with unknown vocabulary tokens in required columns are skipped.
    pub async fn fetch<R: Record>(&self, descriptor: FetchDescriptor<R>) -> Result<Vec<R>> {
        let mut select = R::Entity::find().filter(descriptor.condition);
        for (column, order) in descriptor.sort {
            select = select.order_by(column, order);
        }
        if let Some(limit) = descriptor.limit {
            select = select.limit(limit);
        }
        let rows = select.all(&self.db).await?;
        query::decode_rows(rows)
    }

    /// The record with the greatest `column` value, if any.
    pub async fn latest<R: Record>(
        &self,
        column: <R::Entity as EntityTrait>::Column,
    ) -> Result<Option<R>> {
        let mut records = self
            .fetch(FetchDescriptor::<R>::newest_first(column).limit(1))
            .await?;
        Ok(records.pop())
    }

    /// Looks up one record by id.
    pub async fn get<R: Record>(&self, id: Uuid) -> Result<R> {
        let row = R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(&self.db)
            .await?
            .ok_or(Error::NotFound { kind: R::KIND, id })?;
        R::decode(row)
    }

    /// The active profile. There is no fallback: until onboarding sets the
    /// reference there is no current user.
    pub async fn current_user(&self) -> Result<Option<User>> {
        let Some(id) = app_state::active_user_id(&self.db).await? else {
            return Ok(None);
        };
        match self.get::<User>(id).await {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether onboarding has committed. Defaults to false.
    pub async fn onboarding_completed(&self) -> Result<bool> {
        app_state::onboarding_completed(&self.db).await
    }

    /// Row count of one collection.
    pub async fn count<R: Record>(&self) -> Result<u64>
    where
        <R::Entity as EntityTrait>::Model: Sync,
    {
        Ok(R::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        domain::{
            Baby, DeliveryType, EntityKind, Gender, JournalEntry, JournalTag, Medication,
            MedicationLog, MoodEntry, NewBaby, NewJournalEntry, NewMedication, NewMedicationLog,
            NewMoodEntry, NewRecoveryEntry, NewSelfCareActivity, NewUser, RecoveryEntry,
            SelfCareActivity,
        },
        entities::{baby, mood_entry, user},
        test_utils::*,
    };
    use chrono::{Duration, TimeZone, Utc};
    use sea_orm::{ActiveModelTrait, Set};
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_onboarding_scenario_user_and_baby() -> Result<()> {
        let store = setup_test_store().await?;

        let mut unit = store.begin();
        let user_id = unit.insert(NewUser {
            name: "Ava".to_string(),
            birth_date: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            delivery_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            delivery_type: Some(DeliveryType::Cesarean),
            profile_image: None,
        })?;
        unit.insert(NewBaby {
            user_id: Some(user_id),
            name: "Noor".to_string(),
            birth_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            birth_weight: None,
            birth_length: None,
            gender: Gender::Female,
        })?;
        unit.set_active_user(Some(user_id));
        unit.save().await?;

        let user = store.current_user().await?.unwrap();
        assert_eq!(user.name, "Ava");
        assert_eq!(user.delivery_type, Some(DeliveryType::Cesarean));

        let newest = store
            .latest::<crate::domain::User>(user::Column::CreatedAt)
            .await?
            .unwrap();
        assert_eq!(newest.id, user_id);

        let babies = store
            .fetch(
                FetchDescriptor::<Baby>::new().filter(
                    baby::Column::BirthDate.eq(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
                ),
            )
            .await?;
        assert_eq!(babies.len(), 1);
        assert_eq!(babies[0].name, "Noor");
        assert_eq!(babies[0].user_id, Some(user_id));
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_mood_is_independent_of_insertion_order() -> Result<()> {
        let store = setup_test_store().await?;
        let t1 = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        let t2 = t1 + Duration::hours(5);

        // Insert the newer entry first
        let mut unit = store.begin();
        unit.insert(NewMoodEntry::new(t2, 5))?;
        unit.save().await?;

        let mut unit = store.begin();
        unit.insert(NewMoodEntry {
            symptoms: BTreeSet::from(["Anxiety".to_string(), "Fatigue".to_string()]),
            ..NewMoodEntry::new(t1, 3)
        })?;
        unit.save().await?;

        let latest = store
            .latest::<MoodEntry>(mood_entry::Column::Date)
            .await?
            .unwrap();
        assert_eq!(latest.mood_rating, 5);
        assert_eq!(latest.date, t2);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_sort_and_limit() -> Result<()> {
        let store = setup_test_store().await?;
        let base = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

        let mut unit = store.begin();
        for (offset, rating) in [(2, 2), (0, 4), (3, 1), (1, 5)] {
            unit.insert(NewMoodEntry::new(base + Duration::days(offset), rating))?;
        }
        unit.save().await?;

        let two_newest = store
            .fetch(FetchDescriptor::<MoodEntry>::newest_first(mood_entry::Column::Date).limit(2))
            .await?;
        let ratings: Vec<u8> = two_newest.iter().map(|m| m.mood_rating).collect();
        assert_eq!(ratings, vec![1, 2]);

        let oldest_first = store
            .fetch(
                FetchDescriptor::<MoodEntry>::new()
                    .sort_by(mood_entry::Column::Date, sea_orm::Order::Asc),
            )
            .await?;
        assert_eq!(oldest_first.len(), 4);
        assert_eq!(oldest_first[0].mood_rating, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_insert_is_rejected_and_not_staged() -> Result<()> {
        let store = setup_test_store().await?;
        let mut unit = store.begin();

        let result = unit.insert(NewMoodEntry::new(Utc::now(), 6));
        assert!(matches!(result, Err(Error::Constraint { .. })));
        let result = unit.insert(NewMoodEntry::new(Utc::now(), 0));
        assert!(matches!(result, Err(Error::Constraint { .. })));

        let result = unit.insert(NewRecoveryEntry {
            pain_level: Some(11),
            ..NewRecoveryEntry::new(Utc::now())
        });
        assert!(matches!(result, Err(Error::Constraint { .. })));

        // Both boundaries are accepted
        unit.insert(NewMoodEntry::new(Utc::now(), 1))?;
        unit.insert(NewRecoveryEntry {
            pain_level: Some(10),
            ..NewRecoveryEntry::new(Utc::now())
        })?;
        assert_eq!(unit.pending(), 2);
        unit.save().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_cascades_everything_it_owns() -> Result<()> {
        let store = setup_test_store().await?;
        let user_id = create_test_user(&store, "Ava").await?;
        let other_id = create_test_user(&store, "Bea").await?;

        let mut unit = store.begin();
        for owner in [user_id, other_id] {
            unit.insert(NewMoodEntry {
                user_id: Some(owner),
                ..NewMoodEntry::new(Utc::now(), 3)
            })?;
            unit.insert(NewRecoveryEntry {
                user_id: Some(owner),
                ..NewRecoveryEntry::new(Utc::now())
            })?;
            unit.insert(NewSelfCareActivity {
                user_id: Some(owner),
                ..NewSelfCareActivity::new(crate::domain::ActivityType::Nap, Utc::now(), 1800.0)
            })?;
            unit.insert(NewJournalEntry {
                user_id: Some(owner),
                tags: BTreeSet::from([JournalTag::Gratitude]),
                ..NewJournalEntry::new(Utc::now(), "Slept four hours straight")
            })?;
            let medication_id = unit.insert(NewMedication {
                user_id: Some(owner),
                ..test_medication_draft("Ibuprofen")
            })?;
            unit.insert(NewMedicationLog::taken(medication_id, Utc::now(), Utc::now()))?;
            unit.insert(NewMedicationLog::skipped(medication_id, Utc::now()))?;
            unit.insert(NewBaby {
                user_id: Some(owner),
                ..test_baby_draft("Noor")
            })?;
        }
        unit.set_active_user(Some(user_id));
        unit.save().await?;

        let mut unit = store.begin();
        unit.delete::<crate::domain::User>(user_id);
        unit.save().await?;

        // Only the other user's rows remain
        assert_eq!(store.count::<crate::domain::User>().await?, 1);
        assert_eq!(store.count::<MoodEntry>().await?, 1);
        assert_eq!(store.count::<RecoveryEntry>().await?, 1);
        assert_eq!(store.count::<SelfCareActivity>().await?, 1);
        assert_eq!(store.count::<JournalEntry>().await?, 1);
        assert_eq!(store.count::<Medication>().await?, 1);
        assert_eq!(store.count::<MedicationLog>().await?, 2);
        assert_eq!(store.count::<Baby>().await?, 1);

        let moods = store.fetch(FetchDescriptor::<MoodEntry>::new()).await?;
        assert!(moods.iter().all(|m| m.user_id == Some(other_id)));

        // The active profile pointed at the deleted user
        assert!(store.current_user().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_medication_cascades_logs_only() -> Result<()> {
        let store = setup_test_store().await?;
        let mut unit = store.begin();
        let keep = unit.insert(test_medication_draft("Iron"))?;
        let drop = unit.insert(test_medication_draft("Ibuprofen"))?;
        unit.insert(NewMedicationLog::skipped(keep, Utc::now()))?;
        unit.insert(NewMedicationLog::skipped(drop, Utc::now()))?;
        unit.insert(NewMedicationLog::skipped(drop, Utc::now()))?;
        unit.save().await?;

        let mut unit = store.begin();
        unit.delete::<Medication>(drop);
        unit.save().await?;

        assert_eq!(store.count::<Medication>().await?, 1);
        let logs = store.fetch(FetchDescriptor::<MedicationLog>::new()).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].medication_id, keep);
        Ok(())
    }

    #[tokio::test]
    async fn test_log_for_missing_medication_fails_whole_unit() -> Result<()> {
        let store = setup_test_store().await?;
        let mut unit = store.begin();
        unit.insert(NewMoodEntry::new(Utc::now(), 4))?;
        unit.insert(NewMedicationLog::skipped(Uuid::new_v4(), Utc::now()))?;

        let result = unit.save().await;
        assert!(matches!(result, Err(Error::Constraint { .. })));

        // Rolled back: the mood entry staged before the bad log is not there
        assert_eq!(store.count::<MoodEntry>().await?, 0);
        // And still staged for a retry
        assert_eq!(unit.pending(), 2);
        assert_eq!(store.generation(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_can_be_retried() -> Result<()> {
        let store = setup_test_store().await?;
        let mut unit = store.begin();
        unit.insert(NewMoodEntry::new(Utc::now(), 2))?;

        // Delete of a row that does not exist fails the commit
        unit.delete::<Medication>(Uuid::new_v4());
        assert!(matches!(
            unit.save().await,
            Err(Error::NotFound {
                kind: EntityKind::Medication,
                ..
            })
        ));
        assert_eq!(store.count::<MoodEntry>().await?, 0);

        // Drop the bad op by starting over from what is still wanted
        unit.discard();
        unit.insert(NewMoodEntry::new(Utc::now(), 2))?;
        assert_eq!(unit.save().await?, 1);
        assert_eq!(store.count::<MoodEntry>().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_refreshes_last_modified_but_not_created_at() -> Result<()> {
        let store = setup_test_store().await?;
        let user_id = create_test_user(&store, "Ava").await?;
        let original: crate::domain::User = store.get(user_id).await?;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut changed = original.clone();
        changed.name = "Ava Rose".to_string();
        let mut unit = store.begin();
        unit.update(&changed)?;
        unit.save().await?;

        let reloaded: crate::domain::User = store.get(user_id).await?;
        assert_eq!(reloaded.name, "Ava Rose");
        assert_eq!(reloaded.created_at, original.created_at);
        assert!(reloaded.last_modified > original.last_modified);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() -> Result<()> {
        let store = setup_test_store().await?;
        let user_id = create_test_user(&store, "Ava").await?;
        let mut ghost: crate::domain::User = store.get(user_id).await?;
        ghost.id = Uuid::new_v4();

        let mut unit = store.begin();
        unit.update(&ghost)?;
        assert!(matches!(
            unit.save().await,
            Err(Error::NotFound {
                kind: EntityKind::User,
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_required_token_skips_row() -> Result<()> {
        let store = setup_test_store().await?;
        let user_id = create_test_user(&store, "Ava").await?;
        let mut unit = store.begin();
        let good = unit.insert(NewBaby {
            user_id: Some(user_id),
            ..test_baby_draft("Noor")
        })?;
        unit.save().await?;

        // A row written by a newer build with a gender this build does not know
        let now = Utc::now();
        baby::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(Some(user_id)),
            name: Set("Sam".to_string()),
            birth_date: Set(now),
            birth_weight: Set(None),
            birth_length: Set(None),
            gender: Set("Undisclosed".to_string()),
            created_at: Set(now),
            last_modified: Set(now),
        }
        .insert(store.connection())
        .await?;

        let babies = store.fetch(FetchDescriptor::<Baby>::new()).await?;
        assert_eq!(babies.len(), 1);
        assert_eq!(babies[0].id, good);
        Ok(())
    }

    #[tokio::test]
    async fn test_commit_broadcasts_generation_and_kinds() -> Result<()> {
        let store = setup_test_store().await?;
        let mut rx = store.subscribe();

        let mut unit = store.begin();
        unit.insert(NewMoodEntry::new(Utc::now(), 4))?;
        unit.save().await?;

        match rx.recv().await.unwrap() {
            AppEvent::Committed { generation, kinds } => {
                assert_eq!(generation, 1);
                assert_eq!(kinds, std::collections::BTreeSet::from([EntityKind::MoodEntry]));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_open_rejects_in_memory_primary_store() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        };
        let result = LocalStore::open(&config).await;
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_identity_survives_restart() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.sqlite");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
        };

        let user_id = {
            let store = LocalStore::open(&config).await?;
            let id = create_test_user(&store, "Ava").await?;
            let mut unit = store.begin();
            unit.set_active_user(Some(id));
            unit.set_onboarding_completed(true);
            unit.save().await?;
            store.connection().clone().close().await?;
            id
        };

        let reopened = LocalStore::open(&config).await?;
        let user = reopened.current_user().await?.unwrap();
        assert_eq!(user.id, user_id);
        assert!(reopened.onboarding_completed().await?);
        Ok(())
    }
}
