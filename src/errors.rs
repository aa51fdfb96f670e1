//! Unified error type for the store, the sync agent and the application services.

use crate::domain::EntityKind;
use thiserror::Error;
use uuid::Uuid;

/// Every failure the crate can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is unusable
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// An insert or update would violate a bound or relationship invariant
    #[error("Constraint violated: {message}")]
    Constraint {
        /// Which invariant and why
        message: String,
    },

    /// The local store failed to read or commit
    #[error("Persistence error: {0}")]
    Persistence(#[from] sea_orm::DbErr),

    /// A row addressed by id does not exist
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity collection that was searched
        kind: EntityKind,
        /// Identifier that was requested
        id: Uuid,
    },

    /// Sync preconditions are not met (no account, not configured, no network)
    #[error("Remote record store unavailable: {reason}")]
    RemoteUnavailable {
        /// Why the remote cannot be used right now
        reason: String,
    },

    /// The remote accepted the connection but the upload failed
    #[error("Remote sync failed: {message}")]
    Remote {
        /// Failure reported by the transport or the service
        message: String,
    },

    /// A persisted enum token matches no known case
    #[error("Unknown {vocabulary} token: {token:?}")]
    UnknownVariant {
        /// Name of the vocabulary being decoded
        vocabulary: &'static str,
        /// The unrecognized token
        token: String,
    },

    /// JSON encoding of a set-valued column failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Shorthand for a [`Error::Constraint`] with a formatted message.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint {
            message: message.into(),
        }
    }

    /// Whether running the same operation again may succeed.
    ///
    /// Commit failures keep their staged writes, so the caller can offer a
    /// manual retry. Constraint and vocabulary errors will fail the same way
    /// every time.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_)
                | Self::RemoteUnavailable { .. }
                | Self::Remote { .. }
                | Self::Http(_)
                | Self::Io(_)
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
