//! Schema validation adapter for resource IDs

use super::error::ParseError;
use super::template::ResourceIdType;
use serde_json::Value;
use thiserror::Error;

/// Error reported back to the configuration schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected {key:?} to be a string")]
    NotAString { key: String },

    #[error("{key:?}: {source}")]
    Invalid {
        key: String,
        #[source]
        source: ParseError,
    },
}

/// Validate a plain configuration value as an ID of `id_type`.
///
/// Parsing is strict. Returns `(warnings, errors)`; any parse failure is a
/// single-element error list.
pub fn validate_resource_id(
    id_type: &ResourceIdType,
    input: &Value,
    key: &str,
) -> (Vec<String>, Vec<ValidationError>) {
    let Some(raw) = input.as_str() else {
        return (
            Vec::new(),
            vec![ValidationError::NotAString {
                key: key.to_string(),
            }],
        );
    };

    match id_type.parse_values(raw, false) {
        Ok(_) => (Vec::new(), Vec::new()),
        Err(source) => (
            Vec::new(),
            vec![ValidationError::Invalid {
                key: key.to_string(),
                source,
            }],
        ),
    }
}
