//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity` from the entity
//! definitions, guarded by `IF NOT EXISTS` so opening an existing store is a no-op.

use crate::entities::{
    AppState, Baby, JournalEntry, Medication, MedicationLog, MoodEntry, RecoveryEntry,
    SelfCareActivity, User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::debug;

/// Default location of the primary store.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/postpartum_ease.sqlite?mode=rwc";

/// Whether a connection URL names a database that lives only in memory.
#[must_use]
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Establishes a connection to the `SQLite` database at `database_url`.
///
/// The parent directory of a file-backed database is created if missing.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    debug!("Connecting to {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates every table the store needs. Safe to run on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, User).await?;
    create_table(db, Baby).await?;
    create_table(db, MoodEntry).await?;
    create_table(db, RecoveryEntry).await?;
    create_table(db, SelfCareActivity).await?;
    create_table(db, Medication).await?;
    create_table(db, MedicationLog).await?;
    create_table(db, JournalEntry).await?;
    create_table(db, AppState).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

fn sqlite_file_path(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    if is_in_memory(url) {
        return None;
    }
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty()).then(|| Path::new(path))
}
