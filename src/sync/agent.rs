//! Best-effort mirror of the local profile to the remote record store.

use super::{
    http::HttpRecordStore,
    remote::{RemoteRecord, RemoteRecordStore, RemoteValue},
};
use crate::{
    config::SyncConfig,
    domain::User,
    errors::{Error, Result},
};
use std::{io::Write, path::PathBuf, sync::Arc};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

/// Remote record type the profile is written as
pub const USER_RECORD_TYPE: &str = "User";

/// One-directional mirror. The local store stays authoritative; nothing here
/// reads back from the remote.
#[derive(Clone)]
pub struct SyncAgent {
    remote: Option<Arc<dyn RemoteRecordStore>>,
    scratch_dir: PathBuf,
}

impl std::fmt::Debug for SyncAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncAgent")
            .field("enabled", &self.is_enabled())
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}

impl SyncAgent {
    /// An agent with no remote; every mirror reports `RemoteUnavailable`.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            remote: None,
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// An agent writing to `remote`, with asset files under `scratch_dir`.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteRecordStore>, scratch_dir: PathBuf) -> Self {
        Self {
            remote: Some(remote),
            scratch_dir,
        }
    }

    /// Builds the agent from the `[sync]` section.
    ///
    /// # Errors
    /// Returns `Http` if the HTTP client cannot be constructed.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        if !config.enabled {
            info!("Sync disabled in configuration");
            return Ok(Self::disabled());
        }
        match HttpRecordStore::from_config(config)? {
            Some(store) => {
                info!("Sync enabled for container {}", config.container);
                Ok(Self::new(Arc::new(store), config.scratch_dir()))
            }
            None => {
                info!("No sync endpoint configured, running local-only");
                Ok(Self::disabled())
            }
        }
    }

    /// Whether a remote is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Mirrors the profile: availability check, record build, optional image
    /// asset, upload. The temporary image file is gone when this returns,
    /// whatever the outcome.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn mirror(&self, user: &User) -> Result<()> {
        let Some(remote) = &self.remote else {
            return Err(Error::RemoteUnavailable {
                reason: "no remote record store configured".to_string(),
            });
        };

        let status = remote.account_status().await?;
        if !status.is_available() {
            return Err(Error::RemoteUnavailable {
                reason: format!("account status is {status}"),
            });
        }

        let mut record = user_record(user);
        // Held until the upload finishes; dropping it deletes the file
        let _asset = match &user.profile_image {
            Some(bytes) => {
                let file = self.write_asset(bytes)?;
                record.set("profileImage", RemoteValue::Asset(file.path().to_path_buf()));
                Some(file)
            }
            None => None,
        };

        remote.save_record(&record).await?;
        debug!("Profile mirrored");
        Ok(())
    }

    /// Runs [`SyncAgent::mirror`] and discards any failure. Returns whether the
    /// mirror succeeded.
    pub async fn mirror_best_effort(&self, user: &User) -> bool {
        match self.mirror(user).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Profile sync failed (continuing anyway): {e}");
                false
            }
        }
    }

    fn write_asset(&self, bytes: &[u8]) -> Result<NamedTempFile> {
        std::fs::create_dir_all(&self.scratch_dir)?;
        let mut file = NamedTempFile::new_in(&self.scratch_dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }
}

/// Scalar fields of the remote `User` record.
fn user_record(user: &User) -> RemoteRecord {
    let mut record = RemoteRecord::new(USER_RECORD_TYPE);
    record.set("name", RemoteValue::Text(user.name.clone()));
    record.set("birthDate", RemoteValue::Timestamp(user.birth_date));
    record.set("deliveryDate", RemoteValue::Timestamp(user.delivery_date));
    if let Some(delivery_type) = user.delivery_type {
        record.set(
            "deliveryType",
            RemoteValue::Text(delivery_type.as_token().to_string()),
        );
    }
    record
}
