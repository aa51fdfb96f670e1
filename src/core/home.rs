//! Home screen summary.
//!
//! Refreshes can overlap (pull-to-refresh while a commit notification also
//! triggers one). Each refresh takes a ticket; a refresh that finishes after a
//! newer one started returns `None` so the caller never shows stale data.

use super::{mood, recovery, self_care};
use crate::{
    domain::{MoodEntry, RecoveryEntry, SelfCareActivity, User},
    errors::Result,
    store::LocalStore,
};
use chrono::{DateTime, Utc};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::debug;

/// Recovery milestones as (days postpartum, title)
pub const MILESTONES: [(i64, &str); 5] = [
    (7, "First Week Complete"),
    (14, "Two Weeks Milestone"),
    (30, "One Month Achievement"),
    (42, "Six Weeks Recovery"),
    (60, "Two Months Journey"),
];

/// A recovery milestone and whether it has been reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub title: &'static str,
    /// Days postpartum at which it is reached
    pub days: i64,
    pub completed: bool,
}

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeSummary {
    pub user: Option<User>,
    pub latest_mood: Option<MoodEntry>,
    pub latest_recovery: Option<RecoveryEntry>,
    pub latest_self_care: Option<SelfCareActivity>,
    /// Whole days since delivery; 0 without a profile or before the due date
    pub days_postpartum: i64,
    pub milestones: Vec<Milestone>,
}

/// Whole days between `delivery` and `now`, never negative.
#[must_use]
pub fn days_postpartum(delivery: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - delivery).num_days().max(0)
}

/// Every milestone, marked completed once `days_postpartum` reaches it.
#[must_use]
pub fn milestones(days_postpartum: i64) -> Vec<Milestone> {
    MILESTONES
        .iter()
        .map(|&(days, title)| Milestone {
            title,
            days,
            completed: days_postpartum >= days,
        })
        .collect()
}

/// Builds home summaries, discarding any that a newer refresh overtook.
#[derive(Debug, Clone)]
pub struct HomeLoader {
    store: LocalStore,
    latest_ticket: Arc<AtomicU64>,
}

impl HomeLoader {
    /// A loader with no refresh started yet.
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            latest_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Loads a fresh summary, or `None` if a newer refresh started meanwhile.
    pub async fn refresh(&self) -> Result<Option<HomeSummary>> {
        let ticket = self.start();
        self.finish(ticket, Utc::now()).await
    }

    /// Takes the next ticket; every earlier ticket becomes stale.
    pub fn start(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Loads the summary for `ticket` as of `now`.
    pub async fn finish(&self, ticket: u64, now: DateTime<Utc>) -> Result<Option<HomeSummary>> {
        let summary = summarize(&self.store, now).await?;
        let latest = self.latest_ticket.load(Ordering::SeqCst);
        if latest != ticket {
            debug!("Discarding home refresh {ticket}, superseded by {latest}");
            return Ok(None);
        }
        Ok(Some(summary))
    }
}

/// Reads the home summary without any staleness check.
pub async fn summarize(store: &LocalStore, now: DateTime<Utc>) -> Result<HomeSummary> {
    let user = store.current_user().await?;
    let days = user
        .as_ref()
        .map_or(0, |u| days_postpartum(u.delivery_date, now));
    Ok(HomeSummary {
        latest_mood: mood::latest_mood(store).await?,
        latest_recovery: recovery::latest_recovery(store).await?,
        latest_self_care: self_care::latest_self_care(store).await?,
        days_postpartum: days,
        milestones: milestones(days),
        user,
    })
}
