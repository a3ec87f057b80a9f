//! ARM Client
//!
//! Main client for the management API, combining a token credential with
//! the HTTP wrapper. Every call takes the caller's cancellation token.

use super::auth::TokenCredential;
use super::error::ArmError;
use super::http::{ArmHttpClient, ArmResponse};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Public cloud management endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// Interval between polls when the server sends no `Retry-After`
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Main ARM client
#[derive(Clone)]
pub struct ArmClient {
    credential: Arc<dyn TokenCredential>,
    http: ArmHttpClient,
    endpoint: Url,
    poll_interval: Duration,
}

impl ArmClient {
    pub fn new(endpoint: &str, credential: Arc<dyn TokenCredential>) -> Result<Self, ArmError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ArmError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;

        Ok(Self {
            credential,
            http: ArmHttpClient::new()?,
            endpoint,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Build the URL for a resource path with its `api-version`
    pub fn url_for(&self, path: &str, api_version: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path(path);
        url.set_query(None);
        url.query_pairs_mut().append_pair("api-version", api_version);
        url
    }

    /// Parse an absolute URL handed back by the API (`nextLink`, polling headers)
    pub fn parse_link(&self, link: &str) -> Result<Url, ArmError> {
        Url::parse(link)
            .or_else(|_| self.endpoint.join(link))
            .map_err(|source| ArmError::InvalidUrl {
                url: link.to_string(),
                source,
            })
    }

    /// Send a request to an absolute URL, giving up when `cancel` fires
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<ArmResponse, ArmError> {
        if cancel.is_cancelled() {
            return Err(ArmError::Cancelled);
        }

        let request = async {
            let token = self.credential.token().await?;
            self.http.send(method, url, &token, body).await
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(ArmError::Cancelled),
            result = request => result,
        }
    }

    pub async fn get(
        &self,
        path: &str,
        api_version: &str,
        cancel: &CancellationToken,
    ) -> Result<ArmResponse, ArmError> {
        self.send(Method::GET, &self.url_for(path, api_version), None, cancel)
            .await
    }

    pub async fn put(
        &self,
        path: &str,
        api_version: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<ArmResponse, ArmError> {
        self.send(Method::PUT, &self.url_for(path, api_version), Some(body), cancel)
            .await
    }

    pub async fn patch(
        &self,
        path: &str,
        api_version: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<ArmResponse, ArmError> {
        self.send(Method::PATCH, &self.url_for(path, api_version), Some(body), cancel)
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<ArmResponse, ArmError> {
        self.send(Method::POST, &self.url_for(path, api_version), body, cancel)
            .await
    }

    pub async fn delete(
        &self,
        path: &str,
        api_version: &str,
        cancel: &CancellationToken,
    ) -> Result<ArmResponse, ArmError> {
        self.send(Method::DELETE, &self.url_for(path, api_version), None, cancel)
            .await
    }
}
