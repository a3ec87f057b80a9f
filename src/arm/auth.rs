//! ARM Authentication
//!
//! Bearer tokens for the management API: a fixed token taken from the
//! environment, or a service principal's client-credentials grant against
//! the Microsoft identity platform with token caching.

use super::error::ArmError;
use super::http::sanitize_for_log;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default identity platform authority
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Token expiry buffer in seconds - refresh tokens this long before they actually expire
const TOKEN_EXPIRY_BUFFER_SECS: i64 = 60;

/// Token TTL in seconds used when the token endpoint omits `expires_in`
const DEFAULT_TOKEN_TTL_SECS: i64 = 30 * 60;

/// Source of bearer tokens for ARM requests
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn token(&self) -> Result<String, ArmError>;
}

/// A pre-acquired bearer token, e.g. from `ARM_ACCESS_TOKEN`
#[derive(Clone)]
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenCredential").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<String, ArmError> {
        Ok(self.token.clone())
    }
}

/// Service principal credential with token caching
#[derive(Clone)]
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl ClientSecretCredential {
    /// Credential for the given ARM endpoint; the scope is `{endpoint}/.default`
    pub fn new(
        http: reqwest::Client,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoint: &str,
    ) -> Self {
        Self {
            http,
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: format!("{}/.default", endpoint.trim_end_matches('/')),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Use a different authority host, e.g. a sovereign cloud or a test server
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        )
    }

    /// Drop the cached token so the next call fetches a new one
    pub async fn refresh_token(&self) -> Result<String, ArmError> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }
        self.token().await
    }

    async fn request_token(&self) -> Result<CachedToken, ArmError> {
        let url = self.token_url();
        tracing::debug!("Requesting token from {}", url);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|source| ArmError::Transport {
                method: "POST".to_string(),
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ArmError::Transport {
            method: "POST".to_string(),
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            tracing::error!("Token request failed: {} - {}", status, sanitize_for_log(&body));
            return Err(ArmError::Auth(format!(
                "token endpoint returned {} for client {}",
                status, self.client_id
            )));
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|source| ArmError::Decode { url, source })?;
        let ttl = parsed.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        Ok(CachedToken {
            token: parsed.access_token,
            expires_at: Utc::now() + Duration::seconds(ttl - TOKEN_EXPIRY_BUFFER_SECS),
        })
    }
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn token(&self) -> Result<String, ArmError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let fresh = self.request_token().await?;
        let token = fresh.token.clone();
        tracing::debug!("New token cached, expires at {}", fresh.expires_at);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(fresh);
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> ClientSecretCredential {
        ClientSecretCredential::new(
            reqwest::Client::new(),
            "my-tenant-123",
            "client",
            "hunter2",
            "https://management.azure.com/",
        )
    }

    #[test]
    fn test_token_url_construction() {
        assert_eq!(
            credential().token_url(),
            "https://login.microsoftonline.com/my-tenant-123/oauth2/v2.0/token"
        );
        assert_eq!(
            credential().with_authority("http://127.0.0.1:9000/").token_url(),
            "http://127.0.0.1:9000/my-tenant-123/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_scope_from_endpoint() {
        assert_eq!(credential().scope, "https://management.azure.com/.default");
    }

    #[test]
    fn test_cached_token_expiry() {
        let valid = CachedToken {
            token: "t".to_string(),
            expires_at: Utc::now() + Duration::minutes(5),
        };
        let expired = CachedToken {
            token: "t".to_string(),
            expires_at: Utc::now() - Duration::seconds(1),
        };
        assert!(valid.is_valid());
        assert!(!expired.is_valid());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", credential());
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", StaticTokenCredential::new("abc")).contains("abc"));
    }

    #[tokio::test]
    async fn test_static_token() {
        let credential = StaticTokenCredential::new("abc");
        assert_eq!(credential.token().await.unwrap(), "abc");
    }
}
