//! Raw fallback for unrecognised discriminators

use serde_json::{Map, Value};

/// A payload whose discriminator matched no known variant.
///
/// Keeps the discriminator and the full field map verbatim so server-side
/// additions can still be inspected without data loss. It is decode-only:
/// encoding it for a request is refused by the codec.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    discriminator: String,
    fields: Map<String, Value>,
}

impl RawPayload {
    pub(crate) fn new(discriminator: String, fields: Map<String, Value>) -> Self {
        Self {
            discriminator,
            fields,
        }
    }

    /// The discriminator value exactly as received
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Every field of the received object, discriminator included
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The received object, for inspection and display only
    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
