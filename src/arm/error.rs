//! ARM errors

use crate::payload::PayloadError;
use crate::resourceids::ParseError;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArmError {
    /// The request never produced a response
    #[error("sending {method} {url}: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("{method} {url} returned {status}: {code}: {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        /// ARM error code, e.g. `ResourceNotFound`
        code: String,
        message: String,
    },

    /// A success response whose body was not the expected JSON
    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("building HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("authenticating: {0}")]
    Auth(String),

    /// A long-running operation reached a failed terminal state
    #[error("long-running operation finished with status {status:?}: {message}")]
    OperationFailed { status: String, message: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{operation} did not complete within {}s", .after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Create found the resource already present
    #[error("a resource with the ID {id:?} already exists - to be managed it must be imported")]
    AlreadyExists { id: String },

    /// An ID was handed to a definition of another resource type
    #[error("{id:?} is not a {expected} ID: {source}")]
    TypeMismatch {
        expected: String,
        id: String,
        #[source]
        source: ParseError,
    },
}

impl ArmError {
    /// Build a status error from a failed response, reading the ARM error
    /// envelope when the body has one.
    pub(crate) fn from_status(method: &str, url: &str, status: u16, body: &str) -> Self {
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error: Some(detail) }) => (detail.code, detail.message),
            _ => (default_code(status).to_string(), String::new()),
        };

        Self::Status {
            method: method.to_string(),
            url: url.to_string(),
            status,
            code,
            message,
        }
    }

    /// HTTP status, when the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The ARM error code, when the error came from a response
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// `{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn default_code(status: u16) -> &'static str {
    match status {
        400 => "BadRequest",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "NotFound",
        409 => "Conflict",
        429 => "TooManyRequests",
        500..=599 => "ServerError",
        _ => "Unknown",
    }
}
