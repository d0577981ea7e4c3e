//! Shared test fixtures: credential builders and an in-memory object store.

use async_trait::async_trait;
use siteship_cloud::error::{SyncError, SyncResult};
use siteship_cloud::s3_transport::ObjectStorage;
use siteship_cloud::types::{DestinationInfo, ServiceEntry, StorageCredentials};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn test_creds() -> StorageCredentials {
    StorageCredentials {
        access_key_id: "ASIATEST".to_string(),
        secret_access_key: "secret".to_string(),
        session_token: "token".to_string(),
    }
}

/// A complete hosting entry pointing at `bucket`/`dir`.
pub fn hosting_entry(bucket: &str, dir: &str) -> ServiceEntry {
    ServiceEntry {
        credentials: Some(test_creds()),
        info: Some(DestinationInfo {
            bucket: bucket.to_string(),
            dir: dir.to_string(),
        }),
    }
}

#[derive(Clone, Debug)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory [`ObjectStorage`]: objects keyed by `bucket/key`. Failure
/// injection via `fail_keys` (per-object) and `reject_credentials`
/// (auth rejection on every call).
#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<BTreeMap<String, StoredObject>>,
    pub fail_keys: Mutex<HashSet<String>>,
    pub reject_credentials: AtomicBool,
    pub put_calls: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, body: &[u8]) {
        self.objects.lock().unwrap().insert(
            format!("{bucket}/{key}"),
            StoredObject {
                body: body.to_vec(),
                content_type: "text/plain".to_string(),
            },
        );
    }

    /// All keys stored under `bucket`, in sorted order.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let prefix = format!("{bucket}/");
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{key}"))
            .map(|o| o.content_type.clone())
    }

    pub fn fail_key(&self, key: &str) {
        self.fail_keys.lock().unwrap().insert(key.to_string());
    }

    fn check_credentials(&self) -> SyncResult<()> {
        if self.reject_credentials.load(Ordering::SeqCst) {
            Err(SyncError::CredentialExpired)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put_object(
        &self,
        _creds: &StorageCredentials,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> SyncResult<()> {
        self.check_credentials()?;
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_keys.lock().unwrap().contains(key) {
            return Err(SyncError::Storage(format!("injected failure for {key}")));
        }
        self.objects.lock().unwrap().insert(
            format!("{bucket}/{key}"),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn list_keys(
        &self,
        _creds: &StorageCredentials,
        bucket: &str,
        prefix: &str,
    ) -> SyncResult<Vec<String>> {
        self.check_credentials()?;
        let bucket_prefix = format!("{bucket}/");
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter_map(|k| k.strip_prefix(&bucket_prefix))
            .filter(|k| k.starts_with(prefix))
            .map(str::to_string)
            .collect())
    }

    async fn delete_object(
        &self,
        _creds: &StorageCredentials,
        bucket: &str,
        key: &str,
    ) -> SyncResult<()> {
        self.check_credentials()?;
        self.objects.lock().unwrap().remove(&format!("{bucket}/{key}"));
        Ok(())
    }
}
