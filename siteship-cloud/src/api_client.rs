//! HTTP client for the credential-exchange endpoint.

use crate::config::PublisherConfig;
use crate::error::{SyncError, SyncResult};
use crate::refresh::AuthMode;
use crate::types::SyncInfoResponse;
use reqwest::Client;
use tracing::debug;

/// Client for exchanging caller identity for temporary storage credentials.
pub struct ExchangeClient {
    client: Client,
    api_base_url: String,
}

impl ExchangeClient {
    pub fn new(config: &PublisherConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_base_url: config.api_base_url.clone(),
        }
    }

    /// POSTs to the sync-info endpoint and returns the issued credential
    /// document. Any transport failure, non-2xx status, or malformed body
    /// aborts with [`SyncError::Exchange`].
    pub async fn fetch_sync_info(&self, auth: &AuthMode) -> SyncResult<SyncInfoResponse> {
        let url = format!("{}/1/syncInfo", self.api_base_url);
        debug!("requesting sync info from {url}");

        let req = self.client.post(&url);
        let req = match auth {
            AuthMode::Basic { username, password } => req.basic_auth(username, Some(password)),
            AuthMode::Bearer(token) => req.bearer_auth(token),
        };

        let resp = req
            .send()
            .await
            .map_err(|e| SyncError::Exchange(e.to_string()))?
            .error_for_status()
            .map_err(|e| SyncError::Exchange(e.to_string()))?;

        resp.json()
            .await
            .map_err(|e| SyncError::Exchange(format!("malformed response: {e}")))
    }
}
