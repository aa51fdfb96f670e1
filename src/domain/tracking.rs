//! Daily tracking records: mood check-ins, physical recovery and self-care.

use super::{
    ActivityType, BleedingLevel, EntityKind, Owner, PhysicalSymptom, PostpartumSymptom,
    bounds::{
        SCALE_FIVE, SCALE_TEN, check_optional_scale, check_scale, from_column,
        from_optional_column, to_column,
    },
    tokens::{decode_optional, decode_set, decode_strings, encode_set, encode_strings},
};
use crate::{
    entities::{mood_entry, recovery_entry, self_care_activity},
    errors::{Error, Result},
    store::{Draft, Record, StagedRow},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Unchanged},
    Set,
    prelude::Uuid,
};
use std::collections::BTreeSet;

/// One emotional check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    /// 1-5
    pub mood_rating: u8,
    /// Free symptom tags as the user picked them
    pub symptoms: BTreeSet<String>,
    pub anxiety: Option<u8>,
    pub sleep_quality: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    /// The symptom tags that belong to the current vocabulary.
    #[must_use]
    pub fn known_symptoms(&self) -> BTreeSet<PostpartumSymptom> {
        self.symptoms
            .iter()
            .filter_map(|tag| PostpartumSymptom::from_token(tag).ok())
            .collect()
    }
}

/// Input for a new [`MoodEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMoodEntry {
    pub user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub mood_rating: u8,
    pub symptoms: BTreeSet<String>,
    pub anxiety: Option<u8>,
    pub sleep_quality: Option<u8>,
    pub notes: Option<String>,
}

impl NewMoodEntry {
    /// A bare check-in with no symptoms or optional scores.
    #[must_use]
    pub const fn new(date: DateTime<Utc>, mood_rating: u8) -> Self {
        Self {
            user_id: None,
            date,
            mood_rating,
            symptoms: BTreeSet::new(),
            anxiety: None,
            sleep_quality: None,
            notes: None,
        }
    }

    /// Adds typed symptoms to the free tag set.
    #[must_use]
    pub fn with_symptoms(mut self, symptoms: impl IntoIterator<Item = PostpartumSymptom>) -> Self {
        self.symptoms
            .extend(symptoms.into_iter().map(|s| s.as_token().to_string()));
        self
    }
}

fn validate_mood(rating: u8, anxiety: Option<u8>, sleep_quality: Option<u8>) -> Result<()> {
    check_scale("mood_rating", rating, SCALE_FIVE)?;
    check_optional_scale("anxiety", anxiety, SCALE_FIVE)?;
    check_optional_scale("sleep_quality", sleep_quality, SCALE_FIVE)
}

impl Draft for NewMoodEntry {
    const KIND: EntityKind = EntityKind::MoodEntry;

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_mood(self.mood_rating, self.anxiety, self.sleep_quality)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::MoodEntry(mood_entry::ActiveModel {
            id: Set(id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            mood_rating: Set(to_column(self.mood_rating)),
            symptoms: Set(encode_strings(&self.symptoms)?),
            anxiety: Set(self.anxiety.map(to_column)),
            sleep_quality: Set(self.sleep_quality.map(to_column)),
            notes: Set(self.notes),
            created_at: Set(now),
        }))
    }
}

impl Record for MoodEntry {
    type Entity = mood_entry::Entity;
    const KIND: EntityKind = EntityKind::MoodEntry;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> mood_entry::Column {
        mood_entry::Column::Id
    }

    fn decode(model: mood_entry::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            mood_rating: from_column("mood_rating", model.mood_rating)?,
            symptoms: decode_strings(&model.symptoms)?,
            anxiety: from_optional_column("anxiety", model.anxiety)?,
            sleep_quality: from_optional_column("sleep_quality", model.sleep_quality)?,
            notes: model.notes,
            created_at: model.created_at,
        })
    }

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_mood(self.mood_rating, self.anxiety, self.sleep_quality)
    }

    fn stage_update(&self, _now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::MoodEntry(mood_entry::ActiveModel {
            id: Unchanged(self.id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            mood_rating: Set(to_column(self.mood_rating)),
            symptoms: Set(encode_strings(&self.symptoms)?),
            anxiety: Set(self.anxiety.map(to_column)),
            sleep_quality: Set(self.sleep_quality.map(to_column)),
            notes: Set(self.notes.clone()),
            created_at: NotSet,
        }))
    }
}

/// Physical recovery log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub symptoms: BTreeSet<PhysicalSymptom>,
    /// 1-10
    pub pain_level: Option<u8>,
    pub bleeding: Option<BleedingLevel>,
    /// Free-text medication names taken for this entry
    pub medications: BTreeSet<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for a new [`RecoveryEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecoveryEntry {
    pub user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub symptoms: BTreeSet<PhysicalSymptom>,
    pub pain_level: Option<u8>,
    pub bleeding: Option<BleedingLevel>,
    pub medications: BTreeSet<String>,
    pub notes: Option<String>,
}

impl NewRecoveryEntry {
    /// An entry with no symptoms, notes or scores.
    #[must_use]
    pub const fn new(date: DateTime<Utc>) -> Self {
        Self {
            user_id: None,
            date,
            symptoms: BTreeSet::new(),
            pain_level: None,
            bleeding: None,
            medications: BTreeSet::new(),
            notes: None,
        }
    }
}

impl Draft for NewRecoveryEntry {
    const KIND: EntityKind = EntityKind::RecoveryEntry;

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        check_optional_scale("pain_level", self.pain_level, SCALE_TEN)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::RecoveryEntry(recovery_entry::ActiveModel {
            id: Set(id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            symptoms: Set(encode_set(&self.symptoms)?),
            pain_level: Set(self.pain_level.map(to_column)),
            bleeding: Set(self.bleeding.map(|b| b.as_token().to_string())),
            medications: Set(encode_strings(&self.medications)?),
            notes: Set(self.notes),
            created_at: Set(now),
        }))
    }
}

impl Record for RecoveryEntry {
    type Entity = recovery_entry::Entity;
    const KIND: EntityKind = EntityKind::RecoveryEntry;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> recovery_entry::Column {
        recovery_entry::Column::Id
    }

    fn decode(model: recovery_entry::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            symptoms: decode_set(&model.symptoms)?,
            pain_level: from_optional_column("pain_level", model.pain_level)?,
            bleeding: decode_optional(model.bleeding.as_deref()),
            medications: decode_strings(&model.medications)?,
            notes: model.notes,
            created_at: model.created_at,
        })
    }

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        check_optional_scale("pain_level", self.pain_level, SCALE_TEN)
    }

    fn stage_update(&self, _now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::RecoveryEntry(recovery_entry::ActiveModel {
            id: Unchanged(self.id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            symptoms: Set(encode_set(&self.symptoms)?),
            pain_level: Set(self.pain_level.map(to_column)),
            bleeding: Set(self.bleeding.map(|b| b.as_token().to_string())),
            medications: Set(encode_strings(&self.medications)?),
            notes: Set(self.notes.clone()),
            created_at: NotSet,
        }))
    }
}

/// A timed self-care activity.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfCareActivity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub activity_type: ActivityType,
    pub start_time: DateTime<Utc>,
    /// Seconds
    pub duration_secs: f64,
    pub notes: Option<String>,
    /// 1-5, how the parent felt afterwards
    pub mood: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// Input for a new [`SelfCareActivity`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSelfCareActivity {
    pub user_id: Option<Uuid>,
    pub activity_type: ActivityType,
    pub start_time: DateTime<Utc>,
    pub duration_secs: f64,
    pub notes: Option<String>,
    pub mood: Option<u8>,
}

impl NewSelfCareActivity {
    /// An activity of `duration_secs` seconds, no notes or mood.
    #[must_use]
    pub const fn new(activity_type: ActivityType, start_time: DateTime<Utc>, duration_secs: f64) -> Self {
        Self {
            user_id: None,
            activity_type,
            start_time,
            duration_secs,
            notes: None,
            mood: None,
        }
    }
}

fn validate_self_care(duration_secs: f64, mood: Option<u8>) -> Result<()> {
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(Error::constraint(format!(
            "duration must be a non-negative number of seconds, got {duration_secs}"
        )));
    }
    check_optional_scale("mood", mood, SCALE_FIVE)
}

impl Draft for NewSelfCareActivity {
    const KIND: EntityKind = EntityKind::SelfCareActivity;

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_self_care(self.duration_secs, self.mood)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::SelfCareActivity(self_care_activity::ActiveModel {
            id: Set(id),
            user_id: Set(self.user_id),
            activity_type: Set(self.activity_type.as_token().to_string()),
            start_time: Set(self.start_time),
            duration_secs: Set(self.duration_secs),
            notes: Set(self.notes),
            mood: Set(self.mood.map(to_column)),
            created_at: Set(now),
        }))
    }
}

impl Record for SelfCareActivity {
    type Entity = self_care_activity::Entity;
    const KIND: EntityKind = EntityKind::SelfCareActivity;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> self_care_activity::Column {
        self_care_activity::Column::Id
    }

    fn decode(model: self_care_activity::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            activity_type: ActivityType::from_token(&model.activity_type)?,
            start_time: model.start_time,
            duration_secs: model.duration_secs,
            notes: model.notes,
            mood: from_optional_column("mood", model.mood)?,
            created_at: model.created_at,
        })
    }

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        validate_self_care(self.duration_secs, self.mood)
    }

    fn stage_update(&self, _now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::SelfCareActivity(self_care_activity::ActiveModel {
            id: Unchanged(self.id),
            user_id: Set(self.user_id),
            activity_type: Set(self.activity_type.as_token().to_string()),
            start_time: Set(self.start_time),
            duration_secs: Set(self.duration_secs),
            notes: Set(self.notes.clone()),
            mood: Set(self.mood.map(to_column)),
            created_at: NotSet,
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        entities::recovery_entry as recovery_row, store::FetchDescriptor, test_utils::*,
    };
    use chrono::TimeZone;
    use sea_orm::ActiveModelTrait;

    #[test]
    fn test_mood_optional_scales_are_bounded() {
        let draft = NewMoodEntry {
            anxiety: Some(6),
            ..NewMoodEntry::new(Utc::now(), 3)
        };
        assert!(matches!(draft.validate(), Err(Error::Constraint { .. })));

        let draft = NewMoodEntry {
            sleep_quality: Some(0),
            ..NewMoodEntry::new(Utc::now(), 3)
        };
        assert!(matches!(draft.validate(), Err(Error::Constraint { .. })));

        let draft = NewMoodEntry {
            anxiety: Some(1),
            sleep_quality: Some(5),
            ..NewMoodEntry::new(Utc::now(), 3)
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_self_care_rejects_negative_duration_and_bad_mood() {
        let draft = NewSelfCareActivity::new(ActivityType::Nap, Utc::now(), -1.0);
        assert!(draft.validate().is_err());
        let draft = NewSelfCareActivity {
            mood: Some(6),
            ..NewSelfCareActivity::new(ActivityType::Nap, Utc::now(), 60.0)
        };
        assert!(draft.validate().is_err());
        let draft = NewSelfCareActivity {
            mood: Some(5),
            ..NewSelfCareActivity::new(ActivityType::Nap, Utc::now(), 0.0)
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_known_symptoms_filters_free_tags() {
        let entry = MoodEntry {
            id: Uuid::new_v4(),
            user_id: None,
            date: Utc::now(),
            mood_rating: 3,
            symptoms: BTreeSet::from(["Anxiety".to_string(), "Fatigue".to_string()]),
            anxiety: None,
            sleep_quality: None,
            notes: None,
            created_at: Utc::now(),
        };
        assert_eq!(
            entry.known_symptoms(),
            BTreeSet::from([PostpartumSymptom::Anxiety])
        );
    }

    #[tokio::test]
    async fn test_mood_round_trip() -> Result<()> {
        let store = setup_test_store().await?;
        let draft = NewMoodEntry {
            anxiety: Some(2),
            sleep_quality: None,
            notes: Some("Rough night".to_string()),
            ..NewMoodEntry::new(Utc.with_ymd_and_hms(2024, 7, 2, 22, 15, 0).unwrap(), 2)
        }
        .with_symptoms([PostpartumSymptom::Crying, PostpartumSymptom::SleepIssues]);

        let mut unit = store.begin();
        let id = unit.insert(draft.clone())?;
        unit.save().await?;

        let entry: MoodEntry = store.get(id).await?;
        assert_eq!(entry.date, draft.date);
        assert_eq!(entry.mood_rating, 2);
        assert_eq!(entry.symptoms, draft.symptoms);
        assert_eq!(entry.anxiety, Some(2));
        assert_eq!(entry.sleep_quality, None);
        assert_eq!(entry.notes.as_deref(), Some("Rough night"));
        Ok(())
    }

    #[tokio::test]
    async fn test_recovery_round_trip() -> Result<()> {
        let store = setup_test_store().await?;
        let draft = NewRecoveryEntry {
            symptoms: BTreeSet::from([PhysicalSymptom::IncisionPain, PhysicalSymptom::Swelling]),
            pain_level: Some(7),
            bleeding: Some(BleedingLevel::Moderate),
            medications: BTreeSet::from(["Ibuprofen".to_string(), "Stool softener".to_string()]),
            notes: None,
            ..NewRecoveryEntry::new(Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap())
        };

        let mut unit = store.begin();
        let id = unit.insert(draft.clone())?;
        unit.save().await?;

        let entry: RecoveryEntry = store.get(id).await?;
        assert_eq!(entry.symptoms, draft.symptoms);
        assert_eq!(entry.pain_level, Some(7));
        assert_eq!(entry.bleeding, Some(BleedingLevel::Moderate));
        assert_eq!(entry.medications, draft.medications);
        assert_eq!(entry.notes, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_recovery_unknown_tokens_are_dropped_not_fatal() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();
        recovery_row::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(None),
            date: Set(now),
            symptoms: Set(r#"["Cramping","Night Sweats"]"#.to_string()),
            pain_level: Set(Some(3)),
            bleeding: Set(Some("Spotting".to_string())),
            medications: Set("[]".to_string()),
            notes: Set(None),
            created_at: Set(now),
        }
        .insert(store.connection())
        .await?;

        let entries = store.fetch(FetchDescriptor::<RecoveryEntry>::new()).await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].symptoms,
            BTreeSet::from([PhysicalSymptom::Cramping])
        );
        assert_eq!(entries[0].bleeding, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_self_care_round_trip() -> Result<()> {
        let store = setup_test_store().await?;
        let draft = NewSelfCareActivity {
            notes: Some("Around the block".to_string()),
            mood: Some(4),
            ..NewSelfCareActivity::new(ActivityType::Outdoors, Utc::now(), 1200.5)
        };
        let mut unit = store.begin();
        let id = unit.insert(draft.clone())?;
        unit.save().await?;

        let activity: SelfCareActivity = store.get(id).await?;
        assert_eq!(activity.activity_type, ActivityType::Outdoors);
        assert_eq!(activity.duration_secs, 1200.5);
        assert_eq!(activity.mood, Some(4));
        assert_eq!(activity.start_time, draft.start_time);
        Ok(())
    }
}
