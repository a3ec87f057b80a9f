//! Configuration Management
//!
//! Persistent settings live in `<config_dir>/armctl/config.json`. Effective
//! values resolve command-line flag > config file > environment (`ARM_*`,
//! then `AZURE_*`).

use crate::arm::{
    ArmClient, ClientSecretCredential, StaticTokenCredential, TokenCredential, DEFAULT_ENDPOINT,
    DEFAULT_POLL_INTERVAL,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Management endpoint, e.g. `https://management.usgovcloudapi.net`
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Seconds between polls of long-running operations
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub subscription_id: Option<String>,
    pub endpoint: Option<String>,
}

/// How requests are authenticated
#[derive(Clone, PartialEq)]
pub enum CredentialSource {
    AccessToken(String),
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    Missing,
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken(_) => f.write_str("AccessToken(..)"),
            Self::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Self::Missing => f.write_str("Missing"),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub subscription_id: Option<String>,
    pub endpoint: String,
    pub poll_interval: Duration,
    pub credential: CredentialSource,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("armctl").join("config.json"))
    }

    /// Load configuration from disk; a missing or unreadable file yields defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            bail!("No configuration directory on this platform");
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("Saved configuration to {:?}", path);

        Ok(())
    }

    /// Resolve settings against the process environment
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings> {
        self.resolve_with(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve settings using `env` to look up environment variables
    pub fn resolve_with<F>(&self, overrides: &Overrides, env: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let subscription_id = overrides
            .subscription_id
            .clone()
            .or_else(|| self.subscription_id.clone())
            .or_else(|| first_set(&env, &["ARM_SUBSCRIPTION_ID", "AZURE_SUBSCRIPTION_ID"]))
            .map(|s| validate_subscription(&s))
            .transpose()?;

        let endpoint = overrides
            .endpoint
            .clone()
            .or_else(|| self.endpoint.clone())
            .or_else(|| first_set(&env, &["ARM_ENDPOINT", "AZURE_ENDPOINT"]))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let poll_interval = self
            .poll_interval_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let tenant_id = self
            .tenant_id
            .clone()
            .or_else(|| first_set(&env, &["ARM_TENANT_ID", "AZURE_TENANT_ID"]));
        let client_id = self
            .client_id
            .clone()
            .or_else(|| first_set(&env, &["ARM_CLIENT_ID", "AZURE_CLIENT_ID"]));
        let client_secret = first_set(&env, &["ARM_CLIENT_SECRET", "AZURE_CLIENT_SECRET"]);

        let access_token = first_set(&env, &["ARM_ACCESS_TOKEN"]);
        let credential = match (access_token, tenant_id, client_id, client_secret) {
            (Some(token), _, _, _) => CredentialSource::AccessToken(token),
            (None, Some(tenant_id), Some(client_id), Some(client_secret)) => {
                CredentialSource::ClientSecret {
                    tenant_id,
                    client_id,
                    client_secret,
                }
            }
            _ => CredentialSource::Missing,
        };

        Ok(Settings {
            subscription_id,
            endpoint,
            poll_interval,
            credential,
        })
    }
}

impl Settings {
    /// The subscription, or an error explaining how to set one
    pub fn require_subscription(&self) -> Result<&str> {
        self.subscription_id.as_deref().context(
            "No subscription configured. Pass --subscription, run 'armctl config set --subscription', or set ARM_SUBSCRIPTION_ID",
        )
    }

    pub fn credential(&self) -> Result<Arc<dyn TokenCredential>> {
        match &self.credential {
            CredentialSource::AccessToken(token) => {
                Ok(Arc::new(StaticTokenCredential::new(token.clone())))
            }
            CredentialSource::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => {
                let http = reqwest::Client::builder()
                    .user_agent(concat!("armctl/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .context("Failed to create HTTP client")?;
                Ok(Arc::new(ClientSecretCredential::new(
                    http,
                    tenant_id.clone(),
                    client_id.clone(),
                    client_secret.clone(),
                    &self.endpoint,
                )))
            }
            CredentialSource::Missing => bail!(
                "No credentials found. Set ARM_ACCESS_TOKEN, or ARM_TENANT_ID, ARM_CLIENT_ID and ARM_CLIENT_SECRET"
            ),
        }
    }

    /// Build the ARM client for these settings
    pub fn client(&self) -> Result<ArmClient> {
        let client = ArmClient::new(&self.endpoint, self.credential()?)
            .with_context(|| format!("Failed to create ARM client for {}", self.endpoint))?;
        Ok(client.with_poll_interval(self.poll_interval))
    }
}

/// First of `names` set to a non-empty value
fn first_set<F>(env: &F, names: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| env(name).filter(|v| !v.is_empty()))
}

/// Subscription IDs are UUIDs; the canonical lower-case form is returned
pub fn validate_subscription(subscription_id: &str) -> Result<String> {
    let parsed = uuid::Uuid::parse_str(subscription_id.trim())
        .with_context(|| {
            format!("Invalid subscription ID {:?}: expected a UUID", subscription_id)
        })?;
    Ok(parsed.hyphenated().to_string())
}
