//! Schema helpers shared by every resource body

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Maximum number of tags on one resource
pub const MAX_TAGS: usize = 50;
const MAX_TAG_KEY_LENGTH: usize = 512;
const MAX_TAG_VALUE_LENGTH: usize = 256;

/// Normalise an Azure location: `West Europe` and `westeurope` are the same
pub fn normalize_location(location: &str) -> String {
    location
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether two location spellings name the same region
pub fn locations_equal(a: &str, b: &str) -> bool {
    normalize_location(a) == normalize_location(b)
}

/// Plain key/value tags to the ARM `tags` object
pub fn expand_tags(tags: &BTreeMap<String, String>) -> Value {
    let map: Map<String, Value> = tags
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Value::Object(map)
}

/// The ARM `tags` object back to plain key/value tags.
///
/// Non-string values are rendered as JSON; `null` becomes an empty string.
pub fn flatten_tags(tags: Option<&Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(map)) = tags else {
        return BTreeMap::new();
    };

    map.iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

/// Check tags against ARM limits, returning one message per violation
pub fn validate_tags(tags: &BTreeMap<String, String>) -> Vec<String> {
    let mut errors = Vec::new();

    if tags.len() > MAX_TAGS {
        errors.push(format!(
            "a maximum of {} tags can be applied to a resource, got {}",
            MAX_TAGS,
            tags.len()
        ));
    }

    for (key, value) in tags {
        if key.len() > MAX_TAG_KEY_LENGTH {
            errors.push(format!(
                "the maximum length for a tag key is {} characters: {:?} is {} characters",
                MAX_TAG_KEY_LENGTH,
                key,
                key.len()
            ));
        }
        if value.len() > MAX_TAG_VALUE_LENGTH {
            errors.push(format!(
                "the maximum length for a tag value is {} characters: the value for {:?} is {} characters",
                MAX_TAG_VALUE_LENGTH,
                key,
                value.len()
            ));
        }
    }

    errors
}

/// Parse `key=value` pairs as given on a command line
pub fn parse_tag_pairs<'a, I>(pairs: I) -> Result<BTreeMap<String, String>, String>
where
    I: IntoIterator<Item = &'a str>,
{
    pairs
        .into_iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(format!("tag {:?} must be written as key=value", pair)),
        })
        .collect()
}
