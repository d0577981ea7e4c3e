//! Static-asset publishing to object storage under per-app temporary
//! credentials.
//!
//! Provides:
//! - A file-backed credential store with merge-on-refresh semantics
//! - A credential-exchange client for obtaining temporary storage credentials
//! - A publish engine that mirrors a local folder to a bucket prefix,
//!   deleting remote objects that no longer exist locally
//! - Content-type routing, filename exclusion rules, and a local upload
//!   cache that skips unchanged files

pub mod api_client;
pub mod cache;
pub mod config;
pub mod content_type;
pub mod credential_store;
pub mod error;
pub mod exclude;
pub mod publish;
pub mod refresh;
pub mod s3_transport;
pub mod types;

pub use config::PublisherConfig;
pub use error::{SyncError, SyncResult};
pub use types::*;
