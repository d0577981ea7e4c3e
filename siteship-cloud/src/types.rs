//! Shared types for credential and publish operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Temporary storage credentials issued by the credential exchange.
///
/// Field names follow the on-disk credential file format (camelCase).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

/// Where one app/service publishes: the bucket and the key prefix under it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationInfo {
    pub bucket: String,
    pub dir: String,
}

/// One service's stored credentials and placement.
///
/// Both sections are optional on disk so partial entries survive merges;
/// the publish engine validates presence before touching anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<StorageCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<DestinationInfo>,
}

impl ServiceEntry {
    /// Overlays the `Some` fields of `patch` onto this entry. Fields the
    /// patch does not carry are preserved.
    pub fn apply(&mut self, patch: ServiceEntry) {
        if patch.credentials.is_some() {
            self.credentials = patch.credentials;
        }
        if patch.info.is_some() {
            self.info = patch.info;
        }
    }
}

/// Per-app mapping of service name (e.g. "hosting", "nodejs") to its entry.
pub type AppEntry = BTreeMap<String, ServiceEntry>;

/// Response document from the credential-exchange endpoint.
///
/// The server speaks PascalCase. Both sections are required; a document
/// missing either one is rejected at the JSON boundary.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncInfoResponse {
    pub credentials: ExchangeCredentials,
    pub info: ExchangeInfo,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeInfo {
    pub bucket: String,
    pub dir: String,
}

impl From<SyncInfoResponse> for ServiceEntry {
    fn from(resp: SyncInfoResponse) -> Self {
        ServiceEntry {
            credentials: Some(StorageCredentials {
                access_key_id: resp.credentials.access_key_id,
                secret_access_key: resp.credentials.secret_access_key,
                session_token: resp.credentials.session_token,
            }),
            info: Some(DestinationInfo {
                bucket: resp.info.bucket,
                dir: resp.info.dir,
            }),
        }
    }
}

/// A local file selected for upload, with its computed remote placement.
#[derive(Clone, Debug)]
pub struct FileRecord {
    pub local_path: PathBuf,
    pub remote_key: String,
    pub content_type: &'static str,
}

/// Parameters for one publish run.
#[derive(Clone, Debug)]
pub struct PublishRequest {
    /// Root of the local asset tree to mirror.
    pub local_folder: PathBuf,
    /// App to publish for; the first stored app when omitted.
    pub app: Option<String>,
    /// Service within the app ("hosting", "nodejs", ...).
    pub service: String,
    /// Optional subfolder appended to the destination prefix.
    pub dest: Option<String>,
}

/// Summary of one publish run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub excluded: usize,
    pub deleted: usize,
    /// Where the assets are now reachable: `https://{bucket}/{prefix}`.
    pub public_url: String,
}
