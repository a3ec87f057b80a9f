//! HTTP utilities for ARM REST API calls

use super::error::ArmError;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying a per-request correlation ID
pub const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

/// Truncate a response body and strip control characters before logging
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... [truncated, {} bytes total]", &body[..cut], body.len()),
        None => body.to_string(),
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A successful response, kept whole so pollers can read its headers
#[derive(Debug, Clone)]
pub struct ArmResponse {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ArmResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Retry-After` in seconds. HTTP-date values are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header(RETRY_AFTER.as_str())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// The body as JSON; an empty body is `null`
    pub fn json(&self) -> Result<Value, ArmError> {
        self.parse()
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ArmError> {
        let body = if self.body.trim().is_empty() { "null" } else { &self.body };
        serde_json::from_str(body).map_err(|source| ArmError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}

/// HTTP client wrapper for ARM API calls
#[derive(Clone)]
pub struct ArmHttpClient {
    client: Client,
}

impl ArmHttpClient {
    pub fn new() -> Result<Self, ArmError> {
        let client = Client::builder()
            .user_agent(concat!("armctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ArmError::ClientBuild)?;

        Ok(Self { client })
    }

    /// Send one authenticated request.
    ///
    /// Any status of 400 or above becomes [`ArmError::Status`].
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        token: &str,
        body: Option<&Value>,
    ) -> Result<ArmResponse, ArmError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("{} {} ({}={})", method, url, CLIENT_REQUEST_ID, request_id);

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .bearer_auth(token);
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            request = request.header(CLIENT_REQUEST_ID, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| ArmError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(|source| ArmError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        })?;

        if status.is_client_error() || status.is_server_error() {
            if status == StatusCode::NOT_FOUND {
                tracing::debug!("{} {} not found", method, url);
            } else {
                tracing::error!("API error: {} - {}", status, sanitize_for_log(&text));
            }
            return Err(ArmError::from_status(
                method.as_str(),
                url.as_str(),
                status.as_u16(),
                &text,
            ));
        }

        tracing::trace!("{} {} -> {}: {}", method, url, status, sanitize_for_log(&text));
        Ok(ArmResponse {
            url: url.to_string(),
            status,
            headers,
            body: text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let logged = sanitize_for_log(&body);
        assert!(logged.starts_with(&"x".repeat(200)));
        assert!(logged.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert!(sanitize_for_log(&body).contains("bytes total"));
    }

    #[test]
    fn test_response_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let response = ArmResponse {
            url: "https://example.test/op".to_string(),
            status: StatusCode::ACCEPTED,
            headers,
            body: String::new(),
        };
        assert_eq!(response.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(response.json().unwrap(), Value::Null);
    }
}
