//! The remote record store port.
//!
//! The mirror only ever writes: it checks the account, then saves one record.
//! Anything that can do those two things can be plugged into [`SyncAgent`].
//!
//! [`SyncAgent`]: super::SyncAgent

use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, path::PathBuf};

/// Whether the remote account can accept writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountStatus {
    /// Signed in and writable
    Available,
    /// No account signed in on this device
    NoAccount,
    /// Access blocked by device policy
    Restricted,
    /// The service could not report a status
    CouldNotDetermine,
    /// Signed in but the service is down for now
    TemporarilyUnavailable,
}

impl AccountStatus {
    /// Only `Available` accepts writes.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "available",
            Self::NoAccount => "no account",
            Self::Restricted => "restricted",
            Self::CouldNotDetermine => "could not determine",
            Self::TemporarilyUnavailable => "temporarily unavailable",
        };
        f.write_str(label)
    }
}

/// One field value of a remote record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteValue {
    /// Plain string
    Text(String),
    /// Sent as RFC 3339
    Timestamp(DateTime<Utc>),
    /// Binary payload uploaded from a local file
    Asset(PathBuf),
}

/// A typed record ready to be written to the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    pub record_type: String,
    pub fields: BTreeMap<String, RemoteValue>,
}

impl RemoteRecord {
    /// An empty record of the given type.
    #[must_use]
    pub fn new(record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets or replaces one field.
    pub fn set(&mut self, key: &str, value: RemoteValue) {
        self.fields.insert(key.to_string(), value);
    }

    /// One field, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RemoteValue> {
        self.fields.get(key)
    }

    /// Scalar fields as JSON; timestamps are RFC 3339 strings.
    #[must_use]
    pub fn scalar_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .filter_map(|(key, value)| {
                let json = match value {
                    RemoteValue::Text(text) => serde_json::Value::String(text.clone()),
                    RemoteValue::Timestamp(at) => serde_json::Value::String(at.to_rfc3339()),
                    RemoteValue::Asset(_) => return None,
                };
                Some((key.clone(), json))
            })
            .collect()
    }

    /// Asset fields and the files they point at.
    pub fn assets(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.fields.iter().filter_map(|(key, value)| match value {
            RemoteValue::Asset(path) => Some((key.as_str(), path)),
            _ => None,
        })
    }
}

/// A write-only remote record store.
#[async_trait]
pub trait RemoteRecordStore: Send + Sync {
    /// Current state of the signed-in account.
    async fn account_status(&self) -> Result<AccountStatus>;

    /// Uploads one record, reading asset fields from their files.
    async fn save_record(&self, record: &RemoteRecord) -> Result<()>;
}
