//! Publisher configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the credential exchange and the publish engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Base URL for the credential-exchange API.
    pub api_base_url: String,

    /// Path of the on-disk credential store.
    pub credentials_file: PathBuf,

    /// Directory where upload-cache files are kept.
    pub cache_dir: PathBuf,

    /// AWS region for the asset bucket.
    pub s3_region: String,

    /// Optional S3 endpoint override (for MinIO in testing).
    pub s3_endpoint_override: Option<String>,

    /// Maximum concurrent uploads in flight.
    pub concurrency: usize,

    /// Upload objects with a public-read ACL.
    pub public_read: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.siteship.io".to_string(),
            credentials_file: PathBuf::from(crate::credential_store::DEFAULT_STORE_FILE),
            cache_dir: PathBuf::from("."),
            s3_region: "us-east-1".to_string(),
            s3_endpoint_override: None,
            concurrency: crate::publish::DEFAULT_CONCURRENCY,
            public_read: true,
        }
    }
}
