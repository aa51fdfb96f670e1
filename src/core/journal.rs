//! Journal writing and browsing.

use super::owner_or_active;
use crate::{
    domain::{JournalEntry, JournalTag, NewJournalEntry},
    entities::JournalEntryColumn,
    errors::Result,
    store::{FetchDescriptor, LocalStore},
};
use sea_orm::{ColumnTrait, prelude::Uuid};

/// Saves a journal entry for the active profile unless the draft names an
/// owner. Images are optional.
pub async fn write_journal_entry(store: &LocalStore, mut draft: NewJournalEntry) -> Result<Uuid> {
    draft.user_id = owner_or_active(store, draft.user_id).await?;
    let mut unit = store.begin();
    let id = unit.insert(draft)?;
    unit.save().await?;
    Ok(id)
}

/// Entries newest first, limited to those carrying `tag` when given.
pub async fn journal_entries(
    store: &LocalStore,
    tag: Option<JournalTag>,
) -> Result<Vec<JournalEntry>> {
    let mut descriptor = FetchDescriptor::<JournalEntry>::newest_first(JournalEntryColumn::Date);
    if let Some(tag) = tag {
        // Tags are a JSON array of quoted tokens
        let quoted = format!("\"{}\"", tag.as_token());
        descriptor = descriptor.filter(JournalEntryColumn::Tags.contains(quoted));
    }
    store.fetch(descriptor).await
}

/// Deletes one entry.
///
/// # Errors
/// * `NotFound` if the entry does not exist
pub async fn delete_journal_entry(store: &LocalStore, id: Uuid) -> Result<()> {
    let mut unit = store.begin();
    unit.delete::<JournalEntry>(id);
    unit.save().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{errors::Error, test_utils::*};
    use chrono::{Duration, Utc};
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_tag_filter_and_order() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();
        write_journal_entry(
            &store,
            NewJournalEntry {
                tags: BTreeSet::from([JournalTag::Gratitude, JournalTag::Support]),
                ..NewJournalEntry::new(now - Duration::days(2), "Mum brought dinner")
            },
        )
        .await?;
        write_journal_entry(
            &store,
            NewJournalEntry {
                tags: BTreeSet::from([JournalTag::Challenge]),
                ..NewJournalEntry::new(now - Duration::days(1), "Cluster feeding all night")
            },
        )
        .await?;
        write_journal_entry(
            &store,
            NewJournalEntry {
                tags: BTreeSet::from([JournalTag::Gratitude]),
                images: Some(vec![vec![1, 2, 3]]),
                ..NewJournalEntry::new(now, "Sunny walk")
            },
        )
        .await?;

        let all = journal_entries(&store, None).await?;
        let contents: Vec<&str> = all.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["Sunny walk", "Cluster feeding all night", "Mum brought dinner"]
        );

        let grateful = journal_entries(&store, Some(JournalTag::Gratitude)).await?;
        assert_eq!(grateful.len(), 2);
        assert_eq!(grateful[0].images, Some(vec![vec![1, 2, 3]]));

        assert!(journal_entries(&store, Some(JournalTag::Goal)).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_journal_entry() -> Result<()> {
        let store = setup_test_store().await?;
        let id = write_journal_entry(&store, NewJournalEntry::new(Utc::now(), "x")).await?;
        delete_journal_entry(&store, id).await?;
        assert_eq!(store.count::<JournalEntry>().await?, 0);
        assert!(matches!(
            delete_journal_entry(&store, id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
