//! Publish and credential error types.

use thiserror::Error;

/// Result type for publish and credential operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while refreshing credentials or publishing assets.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No stored credential entry matched the requested app/service. This is
    /// the graceful "nothing to do" outcome, not a crash.
    #[error("no credentials for app: {0}")]
    MissingCredentials(String),

    #[error("credential exchange failed: {0}")]
    Exchange(String),

    #[error("storage credentials expired or rejected")]
    CredentialExpired,

    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed JSON document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
