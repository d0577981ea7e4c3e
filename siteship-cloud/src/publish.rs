//! Publish engine: walk the local tree, filter and tag files, upload with
//! bounded concurrency, then reconcile remote state against the local set.

use crate::cache::{self, UploadCache};
use crate::config::PublisherConfig;
use crate::content_type;
use crate::credential_store::CredentialStore;
use crate::error::{SyncError, SyncResult};
use crate::exclude;
use crate::s3_transport::ObjectStorage;
use crate::types::{FileRecord, PublishReport, PublishRequest, StorageCredentials};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Maximum concurrent in-flight uploads.
pub const DEFAULT_CONCURRENCY: usize = 10;

enum UploadOutcome {
    Uploaded { key: String, hash: String },
    Skipped { key: String, hash: String },
    Failed,
}

/// Mirrors `request.local_folder` to the bucket prefix stored for the
/// requested app/service.
///
/// Uploads run with bounded concurrency and may complete in any order.
/// Reconciliation (deleting remote objects absent from the local set) only
/// starts once the upload phase has fully drained. A single file's failure
/// is logged and counted without aborting the batch; rejected or expired
/// credentials abort the whole run with [`SyncError::CredentialExpired`].
pub async fn publish(
    store: &CredentialStore,
    storage: &dyn ObjectStorage,
    config: &PublisherConfig,
    request: &PublishRequest,
) -> SyncResult<PublishReport> {
    let entry = store.resolve(request.app.as_deref(), &request.service)?;
    let credentials = entry
        .credentials
        .clone()
        .ok_or_else(|| SyncError::Config("stored entry has no credentials, run sts first".into()))?;
    let info = entry
        .info
        .clone()
        .ok_or_else(|| SyncError::Config("stored entry has no bucket/dir info, run sts first".into()))?;
    if info.bucket.is_empty() || info.dir.is_empty() {
        return Err(SyncError::Config("stored entry has an empty bucket or dir".into()));
    }

    let prefix = match &request.dest {
        Some(dest) => format!("{}/{}", info.dir, dest),
        None => info.dir.clone(),
    };

    exclude::check_entry_file(&request.local_folder, &request.service);

    let (records, excluded) = collect_files(&request.local_folder, &prefix)?;
    info!("publishing {} files to s3://{}/{prefix}", records.len(), info.bucket);

    let mut upload_cache = UploadCache::load(UploadCache::file_for(&config.cache_dir, &info.bucket));

    let mut outcomes = Vec::with_capacity(records.len());
    {
        let credentials = &credentials;
        let bucket = info.bucket.as_str();
        let upload_cache = &upload_cache;
        let mut uploads = stream::iter(records.iter().map(|record| async move {
            upload_one(storage, credentials, bucket, upload_cache, record).await
        }))
        .buffer_unordered(config.concurrency.max(1));

        while let Some(result) = uploads.next().await {
            outcomes.push(result?);
        }
    }

    // The local set was computed once at the start of the run; only now that
    // every upload has completed or failed may stale remote keys be removed.
    let local_keys: BTreeSet<&str> = records.iter().map(|r| r.remote_key.as_str()).collect();
    let remote_keys = storage
        .list_keys(&credentials, &info.bucket, &format!("{prefix}/"))
        .await?;

    let mut deleted = 0;
    for key in remote_keys.iter().filter(|k| !local_keys.contains(k.as_str())) {
        match storage.delete_object(&credentials, &info.bucket, key).await {
            Ok(()) => {
                info!("deleted stale object {key}");
                deleted += 1;
            }
            Err(SyncError::CredentialExpired) => return Err(SyncError::CredentialExpired),
            Err(e) => error!("delete failed for {key}: {e}"),
        }
    }

    let mut report = PublishReport {
        excluded,
        deleted,
        public_url: format!("https://{}/{prefix}", info.bucket),
        ..Default::default()
    };

    let mut fresh = BTreeMap::new();
    for outcome in outcomes {
        match outcome {
            UploadOutcome::Uploaded { key, hash } => {
                report.uploaded += 1;
                fresh.insert(key, hash);
            }
            UploadOutcome::Skipped { key, hash } => {
                report.skipped += 1;
                fresh.insert(key, hash);
            }
            UploadOutcome::Failed => report.failed += 1,
        }
    }
    upload_cache.replace(fresh);
    if let Err(e) = upload_cache.persist() {
        warn!("could not persist upload cache: {e}");
    }

    info!(
        "publish complete: {} uploaded, {} skipped, {} failed, {} excluded, {} deleted",
        report.uploaded, report.skipped, report.failed, report.excluded, report.deleted
    );
    Ok(report)
}

/// Walks the local tree, dropping excluded files with a warning and tagging
/// the rest with their remote key and content type.
fn collect_files(root: &Path, prefix: &str) -> SyncResult<(Vec<FileRecord>, usize)> {
    let mut records = Vec::new();
    let mut excluded = 0;

    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel = rel.to_string_lossy().replace('\\', "/");

        if exclude::disallowed_char(&rel).is_some() {
            warn!(
                "cannot sync files with characters {:?} in the file name: {rel}",
                exclude::DISALLOWED_CHARS
            );
            excluded += 1;
            continue;
        }

        records.push(FileRecord {
            remote_key: content_type::remote_key(prefix, &rel),
            content_type: content_type::content_type_for(&rel),
            local_path: entry.into_path(),
        });
    }

    Ok((records, excluded))
}

async fn upload_one(
    storage: &dyn ObjectStorage,
    creds: &StorageCredentials,
    bucket: &str,
    cache: &UploadCache,
    record: &FileRecord,
) -> SyncResult<UploadOutcome> {
    let key = record.remote_key.clone();

    let body = match tokio::fs::read(&record.local_path).await {
        Ok(body) => body,
        Err(e) => {
            error!("cannot read {}: {e}", record.local_path.display());
            return Ok(UploadOutcome::Failed);
        }
    };
    let hash = cache::content_hash(&body);

    if cache.matches(&key, &hash) {
        debug!("unchanged, skipping {key}");
        return Ok(UploadOutcome::Skipped { key, hash });
    }

    match storage
        .put_object(creds, bucket, &key, body, record.content_type)
        .await
    {
        Ok(()) => {
            info!("uploaded {key} ({})", record.content_type);
            Ok(UploadOutcome::Uploaded { key, hash })
        }
        Err(SyncError::CredentialExpired) => Err(SyncError::CredentialExpired),
        Err(e) => {
            error!("upload failed for {key}: {e}");
            Ok(UploadOutcome::Failed)
        }
    }
}
