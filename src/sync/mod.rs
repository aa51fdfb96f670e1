//! Remote mirror - pushes the profile to a remote record store, best effort.
//!
//! Failures here never reach the caller of a local action; see
//! [`SyncAgent::mirror_best_effort`].

pub mod agent;
pub mod http;
pub mod remote;

pub use agent::SyncAgent;
pub use http::HttpRecordStore;
pub use remote::{AccountStatus, RemoteRecord, RemoteRecordStore, RemoteValue};
