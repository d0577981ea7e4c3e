//! Credential refresh: exchange caller identity for temporary storage
//! credentials and merge them into the store.

use crate::api_client::ExchangeClient;
use crate::credential_store::CredentialStore;
use crate::error::SyncResult;
use crate::types::ServiceEntry;
use tracing::info;

/// Service a refreshed entry is stored under when the caller does not say.
pub const DEFAULT_SERVICE: &str = "hosting";

/// How the caller authenticates against the exchange endpoint.
/// Exactly one mode per refresh.
#[derive(Clone, Debug)]
pub enum AuthMode {
    Basic { username: String, password: String },
    Bearer(String),
}

/// Performs one credential exchange and merges the result into the store,
/// persisting immediately on success. A failed exchange leaves the store
/// untouched on disk.
///
/// The entry is keyed by `app` when given; otherwise by the `Dir` value the
/// server embeds in the response, which identifies the app. Returns the key
/// the entry was stored under.
pub async fn refresh(
    api: &ExchangeClient,
    store: &mut CredentialStore,
    app: Option<&str>,
    service: &str,
    auth: &AuthMode,
) -> SyncResult<String> {
    let resp = api.fetch_sync_info(auth).await?;

    let app_key = match app {
        Some(name) => name.to_string(),
        None => resp.info.dir.clone(),
    };

    store.merge(&app_key, service, ServiceEntry::from(resp));
    store.persist()?;

    info!("stored credentials for app {app_key} ({service})");
    Ok(app_key)
}
