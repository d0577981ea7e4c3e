//! S3 operations behind the [`ObjectStorage`] trait.
//!
//! The client is rebuilt per call from the temporary credentials resolved
//! for the current publish run, so one transport serves any bucket.

use crate::error::{SyncError, SyncResult};
use crate::types::StorageCredentials;
use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;
use tracing::debug;

/// The storage capability the publish engine runs against: put, list,
/// delete. Implemented by [`S3Transport`] in production and by an in-memory
/// fake in tests.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(
        &self,
        creds: &StorageCredentials,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> SyncResult<()>;

    /// Lists every key under `prefix`, following continuation tokens.
    async fn list_keys(
        &self,
        creds: &StorageCredentials,
        bucket: &str,
        prefix: &str,
    ) -> SyncResult<Vec<String>>;

    async fn delete_object(
        &self,
        creds: &StorageCredentials,
        bucket: &str,
        key: &str,
    ) -> SyncResult<()>;
}

/// S3 transport for publishing static assets.
pub struct S3Transport {
    region: String,
    endpoint_override: Option<String>,
    public_read: bool,
}

impl S3Transport {
    pub fn new(region: String, endpoint_override: Option<String>, public_read: bool) -> Self {
        Self {
            region,
            endpoint_override,
            public_read,
        }
    }

    /// Builds an S3 client from the stored temporary credentials.
    fn build_client(&self, creds: &StorageCredentials) -> S3Client {
        let credentials = aws_credential_types::Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            Some(creds.session_token.clone()),
            None,
            "siteship-exchange",
        );

        let mut config_builder = aws_sdk_s3::Config::builder()
            .region(aws_types::region::Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .behavior_version_latest();

        if let Some(ref endpoint) = self.endpoint_override {
            config_builder = config_builder.endpoint_url(endpoint).force_path_style(true);
        }

        S3Client::from_conf(config_builder.build())
    }
}

#[async_trait]
impl ObjectStorage for S3Transport {
    async fn put_object(
        &self,
        creds: &StorageCredentials,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> SyncResult<()> {
        let client = self.build_client(creds);
        let size = body.len();

        let mut req = client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body));
        if self.public_read {
            req = req.acl(ObjectCannedAcl::PublicRead);
        }

        req.send()
            .await
            .map_err(|e| classify("upload", key, e.code(), e.to_string()))?;

        debug!("uploaded {size} bytes to s3://{bucket}/{key} ({content_type})");
        Ok(())
    }

    async fn list_keys(
        &self,
        creds: &StorageCredentials,
        bucket: &str,
        prefix: &str,
    ) -> SyncResult<Vec<String>> {
        let client = self.build_client(creds);

        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let resp = client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| classify("list", prefix, e.code(), e.to_string()))?;

            keys.extend(
                resp.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(|k| k.to_string())),
            );

            match resp.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    async fn delete_object(
        &self,
        creds: &StorageCredentials,
        bucket: &str,
        key: &str,
    ) -> SyncResult<()> {
        let client = self.build_client(creds);

        client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify("delete", key, e.code(), e.to_string()))?;

        debug!("deleted s3://{bucket}/{key}");
        Ok(())
    }
}

/// Maps an S3 service error to the publish taxonomy. Rejected or expired
/// credentials escalate to [`SyncError::CredentialExpired`], which aborts
/// the whole run; anything else stays a per-object failure.
fn classify(op: &str, target: &str, code: Option<&str>, message: String) -> SyncError {
    match code {
        Some(
            "ExpiredToken" | "InvalidToken" | "TokenRefreshRequired" | "InvalidAccessKeyId"
            | "SignatureDoesNotMatch" | "AccessDenied",
        ) => SyncError::CredentialExpired,
        _ => SyncError::Storage(format!("{op} failed for {target}: {message}")),
    }
}
