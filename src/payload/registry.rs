//! Variant Registry
//!
//! Maps discriminator values to decode functions for one payload family.

use super::error::PayloadError;
use super::raw::RawPayload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A concrete shape within a payload family
pub trait Variant: Serialize + DeserializeOwned {
    /// Discriminator value identifying this shape
    const TAG: &'static str;
}

/// A discriminated union: one enum variant per known shape plus a raw fallback
pub trait Family: Sized + 'static {
    /// Name used in errors and logs
    const NAME: &'static str;

    /// Field holding the discriminator, e.g. `kind`
    const DISCRIMINATOR: &'static str;

    fn registry() -> &'static VariantRegistry<Self>;

    /// The raw fallback, if this value is one
    fn as_raw(&self) -> Option<&RawPayload>;

    /// Encode a known variant with its discriminator injected
    fn encode(&self) -> Result<Value, PayloadError>;

    /// Discriminator of this value: the variant tag, or the raw string
    fn tag(&self) -> &str;
}

type DecodeFn<T> = Box<dyn Fn(Value) -> Result<T, serde_json::Error> + Send + Sync>;

struct Entry<T> {
    tag: &'static str,
    decode: DecodeFn<T>,
}

/// Discriminator value → decoder table for one family
pub struct VariantRegistry<T> {
    family: &'static str,
    discriminator: &'static str,
    entries: Vec<Entry<T>>,
    raw: fn(RawPayload) -> T,
}

impl<T: 'static> VariantRegistry<T> {
    pub fn new(
        family: &'static str,
        discriminator: &'static str,
        raw: fn(RawPayload) -> T,
    ) -> Self {
        Self {
            family,
            discriminator,
            entries: Vec::new(),
            raw,
        }
    }

    /// Register a known variant and how to wrap it into the family
    pub fn register<V>(mut self, wrap: fn(V) -> T) -> Self
    where
        V: Variant + 'static,
    {
        self.entries.push(Entry {
            tag: V::TAG,
            decode: Box::new(move |value| serde_json::from_value::<V>(value).map(wrap)),
        });
        self
    }

    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Known discriminator values, in registration order
    pub fn tags(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.tag).collect()
    }

    /// Decode raw bytes.
    ///
    /// Returns `Ok(None)` when the document carries no string discriminator.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<T>, PayloadError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|source| PayloadError::Malformed {
            family: self.family,
            source,
        })?;
        self.decode_value(value)
    }

    /// Decode an already parsed JSON value
    pub fn decode_value(&self, value: Value) -> Result<Option<T>, PayloadError> {
        let mut fields = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(None),
            other => {
                return Err(PayloadError::NotAnObject {
                    family: self.family,
                    found: json_kind(&other),
                })
            }
        };

        let Some(tag) = fields.get(self.discriminator).and_then(|v| v.as_str()) else {
            tracing::trace!(
                "{} payload has no {:?} discriminator",
                self.family,
                self.discriminator
            );
            return Ok(None);
        };
        let tag = tag.to_string();

        match self.entries.iter().find(|e| e.tag.eq_ignore_ascii_case(&tag)) {
            Some(entry) => {
                fields.remove(self.discriminator);
                let decoded = (entry.decode)(Value::Object(fields)).map_err(|source| {
                    PayloadError::Variant {
                        family: self.family,
                        variant: entry.tag,
                        source,
                    }
                })?;
                Ok(Some(decoded))
            }
            None => {
                tracing::debug!(
                    "{} payload has unrecognised {} {:?}, keeping raw fields",
                    self.family,
                    self.discriminator,
                    tag
                );
                Ok(Some((self.raw)(RawPayload::new(tag, fields))))
            }
        }
    }
}

/// Encode a known variant: serialise its declared fields, then inject the
/// discriminator with the variant's fixed tag.
pub fn encode_variant<V: Variant>(
    variant: &V,
    family: &'static str,
    discriminator: &str,
) -> Result<Value, PayloadError> {
    let encoded = serde_json::to_value(variant).map_err(|source| PayloadError::Encode {
        family,
        variant: V::TAG,
        source,
    })?;

    let mut fields = match encoded {
        Value::Object(map) => map,
        // Unit-like variants serialise to null and carry only the tag
        Value::Null => Map::new(),
        other => {
            return Err(PayloadError::NotAnObject {
                family,
                found: json_kind(&other),
            })
        }
    };
    fields.insert(discriminator.to_string(), Value::String(V::TAG.to_string()));
    Ok(Value::Object(fields))
}

/// Decode a family from bytes
pub fn from_slice<F: Family>(bytes: &[u8]) -> Result<Option<F>, PayloadError> {
    F::registry().decode(bytes)
}

/// Encode a family member to bytes for a request
pub fn to_vec<F: Family>(value: &F) -> Result<Vec<u8>, PayloadError> {
    let encoded = value.encode()?;
    serde_json::to_vec(&encoded).map_err(|source| PayloadError::Malformed {
        family: F::NAME,
        source,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
