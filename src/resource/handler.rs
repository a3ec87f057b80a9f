//! Generic Resource Handler
//!
//! Create, read, update, delete and list for any registered resource type.
//! Each operation runs under its own timeout budget and the caller's
//! cancellation token.

use super::registry::ResourceDef;
use crate::arm::{fetch_all, ArmClient, ArmError, ArmListSource};
use crate::resourceids::ResourceId;
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Per-operation time budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

/// CRUD for one resource definition against one client
pub struct ResourceHandler<'a> {
    def: &'a ResourceDef,
    client: &'a ArmClient,
    timeouts: Timeouts,
}

impl<'a> ResourceHandler<'a> {
    pub fn new(def: &'a ResourceDef, client: &'a ArmClient) -> Self {
        Self {
            def,
            client,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn definition(&self) -> &ResourceDef {
        self.def
    }

    /// Parse `input` as an ID of this handler's resource type
    pub fn parse_id(&self, input: &str) -> Result<ResourceId, ArmError> {
        self.def
            .parse_id(input)
            .map_err(|source| ArmError::TypeMismatch {
                expected: self.def.display_name.clone(),
                id: input.to_string(),
                source,
            })
    }

    /// Create the resource, failing if it already exists
    pub async fn create(
        &self,
        id: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, ArmError> {
        let id = self.parse_id(id)?;
        let path = id.id();

        within("create", self.timeouts.create, async {
            match self.client.get(&path, &self.def.api_version, cancel).await {
                Ok(_) => return Err(ArmError::AlreadyExists { id: path.clone() }),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }

            tracing::info!("Creating {} {}", self.def.display_name, path);
            self.write(Method::PUT, &path, body, cancel).await
        })
        .await
    }

    /// Read the resource; `None` when it does not exist
    pub async fn read(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, ArmError> {
        let id = self.parse_id(id)?;
        let path = id.id();

        within("read", self.timeouts.read, async {
            match self.client.get(&path, &self.def.api_version, cancel).await {
                Ok(response) => Ok(Some(response.json()?)),
                Err(e) if e.is_not_found() => {
                    tracing::debug!("{} {} is absent", self.def.display_name, path);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Update the resource with the definition's update method
    pub async fn update(
        &self,
        id: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, ArmError> {
        let id = self.parse_id(id)?;
        let path = id.id();

        within("update", self.timeouts.update, async {
            tracing::info!("Updating {} {}", self.def.display_name, path);
            self.write(self.def.update_method.as_method(), &path, body, cancel)
                .await
        })
        .await
    }

    /// Delete the resource. A resource that is already gone counts as deleted.
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> Result<(), ArmError> {
        let id = self.parse_id(id)?;
        let path = id.id();

        within("delete", self.timeouts.delete, async {
            tracing::info!("Deleting {} {}", self.def.display_name, path);
            let result = if self.def.long_running {
                self.client
                    .send_and_wait(Method::DELETE, &path, &self.def.api_version, None, cancel)
                    .await
                    .map(|_| ())
            } else {
                self.client
                    .delete(&path, &self.def.api_version, cancel)
                    .await
                    .map(|_| ())
            };

            match result {
                Err(e) if e.is_not_found() => {
                    tracing::debug!("{} {} was already deleted", self.def.display_name, path);
                    Ok(())
                }
                other => other,
            }
        })
        .await
    }

    /// Every resource of this type under the given parent segment values
    pub async fn list(
        &self,
        parents: &HashMap<&str, &str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>, ArmError> {
        let path = self
            .def
            .collection_path(parents)
            .map_err(|source| ArmError::TypeMismatch {
                expected: self.def.display_name.clone(),
                id: self.def.id_type.template(),
                source,
            })?;

        within("list", self.timeouts.read, async {
            let source =
                ArmListSource::new(self.client, path.as_str(), self.def.api_version.as_str());
            fetch_all(&source, cancel).await
        })
        .await
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        body: &Value,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, ArmError> {
        if self.def.long_running {
            return self
                .client
                .send_and_wait(method, path, &self.def.api_version, Some(body), cancel)
                .await;
        }

        let url = self.client.url_for(path, &self.def.api_version);
        let response = self.client.send(method, &url, Some(body), cancel).await?;
        let value = response.json()?;
        Ok((!value.is_null()).then_some(value))
    }
}

async fn within<T, F>(operation: &'static str, budget: Duration, future: F) -> Result<T, ArmError>
where
    F: Future<Output = Result<T, ArmError>>,
{
    match tokio::time::timeout(budget, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("{} timed out after {:?}", operation, budget);
            Err(ArmError::Timeout {
                operation,
                after: budget,
            })
        }
    }
}
