//! Long-Running Operation Poller
//!
//! Mutating requests may complete asynchronously. The initial response says
//! how to track them: an `Azure-AsyncOperation` URL, a `Location` URL on
//! `202 Accepted`, or a non-terminal `properties.provisioningState`.

use super::client::ArmClient;
use super::error::{ArmError, ErrorEnvelope};
use super::http::ArmResponse;
use crate::payload::arm_enum;
use reqwest::header::LOCATION;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

pub const AZURE_ASYNC_OPERATION: &str = "azure-asyncoperation";

arm_enum! {
    /// Status of an asynchronous operation or a resource's provisioning state
    pub enum OperationStatus {
        Succeeded => "Succeeded",
        Failed => "Failed",
        Canceled => "Canceled",
        InProgress => "InProgress",
    }
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress | Self::Other(_))
    }

    fn from_body(body: &Value, pointer: &str) -> Option<Self> {
        body.pointer(pointer)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

/// How the initial response says the operation is tracked
#[derive(Debug, Clone, PartialEq)]
enum Tracking {
    AsyncOperation(Url),
    Location(Url),
    ProvisioningState,
    Completed,
}

fn tracking(
    client: &ArmClient,
    method: &Method,
    initial: &ArmResponse,
) -> Result<Tracking, ArmError> {
    if let Some(link) = initial.header(AZURE_ASYNC_OPERATION) {
        return Ok(Tracking::AsyncOperation(client.parse_link(link)?));
    }

    if initial.status == StatusCode::ACCEPTED {
        if let Some(link) = initial.header(LOCATION.as_str()) {
            return Ok(Tracking::Location(client.parse_link(link)?));
        }
    }

    if *method == Method::PUT || *method == Method::PATCH {
        let body = initial.json()?;
        if let Some(state) = OperationStatus::from_body(&body, "/properties/provisioningState") {
            if !state.is_terminal() {
                return Ok(Tracking::ProvisioningState);
            }
        }
    }

    Ok(Tracking::Completed)
}

impl ArmClient {
    /// Send a mutating request and wait until the operation it started is done.
    ///
    /// For `PUT`/`PATCH` the final resource is returned; for other methods the
    /// body of the last response, if it had one.
    pub async fn send_and_wait(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, ArmError> {
        let resource_url = self.url_for(path, api_version);
        let initial = self.send(method.clone(), &resource_url, body, cancel).await?;
        self.poll_until_done(&method, &resource_url, initial, cancel).await
    }

    /// Poll the operation started by `initial` until it reaches a terminal state
    pub async fn poll_until_done(
        &self,
        method: &Method,
        resource_url: &Url,
        initial: ArmResponse,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, ArmError> {
        let returns_resource = *method == Method::PUT || *method == Method::PATCH;
        let mut last = initial;

        match tracking(self, method, &last)? {
            Tracking::Completed => {
                let body = last.json()?;
                let state = OperationStatus::from_body(&body, "/properties/provisioningState");
                if let (true, Some(state)) = (returns_resource, state) {
                    if state.is_terminal() && state != OperationStatus::Succeeded {
                        return Err(operation_failed(&state, &body));
                    }
                }
                return Ok(non_null(body));
            }

            Tracking::AsyncOperation(url) => {
                tracing::debug!("Tracking {} {} via {}", method, resource_url, url);
                loop {
                    self.pause(&last, cancel).await?;
                    last = self.send(Method::GET, &url, None, cancel).await?;
                    let body = last.json()?;
                    match OperationStatus::from_body(&body, "/status") {
                        Some(OperationStatus::Succeeded) => break,
                        Some(status) if status.is_terminal() => {
                            return Err(operation_failed(&status, &body));
                        }
                        status => tracing::debug!("Operation still running: {:?}", status),
                    }
                }
            }

            Tracking::Location(url) => {
                tracing::debug!("Tracking {} {} via Location {}", method, resource_url, url);
                loop {
                    self.pause(&last, cancel).await?;
                    last = self.send(Method::GET, &url, None, cancel).await?;
                    if last.status != StatusCode::ACCEPTED {
                        break;
                    }
                }
            }

            Tracking::ProvisioningState => {
                tracing::debug!("Tracking {} {} via provisioningState", method, resource_url);
                loop {
                    self.pause(&last, cancel).await?;
                    last = self.send(Method::GET, resource_url, None, cancel).await?;
                    let body = last.json()?;
                    match OperationStatus::from_body(&body, "/properties/provisioningState") {
                        Some(OperationStatus::Succeeded) => return Ok(non_null(body)),
                        Some(state) if state.is_terminal() => {
                            return Err(operation_failed(&state, &body));
                        }
                        // A resource without the field has nothing left to wait for
                        None => return Ok(non_null(body)),
                        Some(state) => tracing::debug!("Provisioning state {}", state),
                    }
                }
            }
        }

        if returns_resource {
            let resource = self.send(Method::GET, resource_url, None, cancel).await?;
            return Ok(non_null(resource.json()?));
        }

        Ok(non_null(last.json()?))
    }

    async fn pause(&self, last: &ArmResponse, cancel: &CancellationToken) -> Result<(), ArmError> {
        let interval: Duration = last.retry_after().unwrap_or(self.poll_interval());
        tokio::select! {
            _ = cancel.cancelled() => Err(ArmError::Cancelled),
            _ = tokio::time::sleep(interval) => Ok(()),
        }
    }
}

fn non_null(body: Value) -> Option<Value> {
    (!body.is_null()).then_some(body)
}

fn operation_failed(status: &OperationStatus, body: &Value) -> ArmError {
    let message = serde_json::from_value::<ErrorEnvelope>(body.clone())
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|detail| match detail.code.is_empty() {
            true => detail.message,
            false => format!("{}: {}", detail.code, detail.message),
        })
        .unwrap_or_else(|| "no error details returned".to_string());

    ArmError::OperationFailed {
        status: status.to_string(),
        message,
    }
}
