//! Process-wide wiring: one store, one sync agent.

use crate::{
    config::AppConfig,
    core::{
        home::HomeLoader,
        onboarding::{self, OnboardingForm},
        profile,
    },
    domain::User,
    errors::Result,
    store::LocalStore,
    sync::SyncAgent,
};
use tracing::{info, instrument, warn};

/// The running core. Clone it freely; clones share the store and the agent.
#[derive(Debug, Clone)]
pub struct App {
    store: LocalStore,
    sync: SyncAgent,
}

impl App {
    /// Opens the primary store and builds the sync agent.
    ///
    /// # Errors
    /// A store that cannot be opened is fatal to the caller: nothing else can
    /// work without it. A sync agent that cannot be built falls back to
    /// local-only.
    #[instrument(skip(config))]
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let store = LocalStore::open(&config.database).await?;
        let sync = SyncAgent::from_config(&config.sync).unwrap_or_else(|e| {
            warn!("Sync agent unavailable, running local-only: {e}");
            SyncAgent::disabled()
        });
        info!(sync_enabled = sync.is_enabled(), "Core ready");
        Ok(Self::new(store, sync))
    }

    /// Wraps an already opened store and agent.
    #[must_use]
    pub const fn new(store: LocalStore, sync: SyncAgent) -> Self {
        Self { store, sync }
    }

    /// The primary store.
    #[must_use]
    pub const fn store(&self) -> &LocalStore {
        &self.store
    }

    /// The remote mirror; may be disabled.
    #[must_use]
    pub const fn sync(&self) -> &SyncAgent {
        &self.sync
    }

    /// Runs onboarding against this app's store and agent.
    pub async fn complete_onboarding(&self, form: &OnboardingForm) -> Result<User> {
        onboarding::complete_onboarding(&self.store, &self.sync, form).await
    }

    /// Saves an edited profile and mirrors it through this app's agent.
    pub async fn update_profile(&self, user: &User) -> Result<User> {
        profile::update_profile(&self.store, &self.sync, user).await
    }

    /// A loader for home summaries over this app's store.
    #[must_use]
    pub fn home_loader(&self) -> HomeLoader {
        HomeLoader::new(self.store.clone())
    }
}
