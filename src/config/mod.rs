/// Database connection and schema creation
pub mod database;

/// Application settings loaded from config.toml and the environment
pub mod settings;

pub use settings::{AppConfig, DatabaseConfig, SyncConfig, load_config, load_default_config};
