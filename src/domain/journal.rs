//! Journal entries.

use super::{
    EntityKind, JournalTag, Owner,
    bounds::{SCALE_FIVE, check_optional_scale, from_optional_column, to_column},
    tokens::{decode_images, decode_set, encode_images, encode_set},
};
use crate::{
    entities::journal_entry,
    errors::Result,
    store::{Draft, Record, StagedRow},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Unchanged},
    Set,
    prelude::Uuid,
};
use std::collections::BTreeSet;

/// A free-form journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub content: String,
    pub mood: Option<u8>,
    pub tags: BTreeSet<JournalTag>,
    /// `None` and an empty list are kept apart
    pub images: Option<Vec<Vec<u8>>>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Input for a new [`JournalEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    pub user_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub content: String,
    pub mood: Option<u8>,
    pub tags: BTreeSet<JournalTag>,
    pub images: Option<Vec<Vec<u8>>>,
}

impl NewJournalEntry {
    /// An untagged, image-free entry owned by nobody yet.
    #[must_use]
    pub fn new(date: DateTime<Utc>, content: &str) -> Self {
        Self {
            user_id: None,
            date,
            content: content.to_string(),
            mood: None,
            tags: BTreeSet::new(),
            images: None,
        }
    }
}

impl Draft for NewJournalEntry {
    const KIND: EntityKind = EntityKind::JournalEntry;

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        check_optional_scale("mood", self.mood, SCALE_FIVE)
    }

    fn stage(self, id: Uuid, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::JournalEntry(journal_entry::ActiveModel {
            id: Set(id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            content: Set(self.content),
            mood: Set(self.mood.map(to_column)),
            tags: Set(encode_set(&self.tags)?),
            images: Set(encode_images(self.images.as_deref())?),
            created_at: Set(now),
            last_modified: Set(now),
        }))
    }
}

impl Record for JournalEntry {
    type Entity = journal_entry::Entity;
    const KIND: EntityKind = EntityKind::JournalEntry;

    fn id(&self) -> Uuid {
        self.id
    }

    fn id_column() -> journal_entry::Column {
        journal_entry::Column::Id
    }

    fn decode(model: journal_entry::Model) -> Result<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            content: model.content,
            mood: from_optional_column("mood", model.mood)?,
            tags: decode_set(&model.tags)?,
            images: decode_images(model.images.as_deref())?,
            created_at: model.created_at,
            last_modified: model.last_modified,
        })
    }

    fn owner(&self) -> Option<Owner> {
        self.user_id.map(Owner::User)
    }

    fn validate(&self) -> Result<()> {
        check_optional_scale("mood", self.mood, SCALE_FIVE)
    }

    fn stage_update(&self, now: DateTime<Utc>) -> Result<StagedRow> {
        Ok(StagedRow::JournalEntry(journal_entry::ActiveModel {
            id: Unchanged(self.id),
            user_id: Set(self.user_id),
            date: Set(self.date),
            content: Set(self.content.clone()),
            mood: Set(self.mood.map(to_column)),
            tags: Set(encode_set(&self.tags)?),
            images: Set(encode_images(self.images.as_deref())?),
            created_at: NotSet,
            last_modified: Set(now),
        }))
    }
}
