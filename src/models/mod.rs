//! Resource models
//!
//! Typed IDs, API constants and payload families for the providers this
//! tool knows about. Anything not modelled here is handled as plain JSON by
//! the generic resource handler.

pub mod cache;
pub mod datamigration;
pub mod insights;
pub mod kubernetesconfiguration;
pub mod network;
pub mod recoveryservices;
pub mod signalr;
pub mod storage;
pub mod streamanalytics;
pub mod timeseriesinsights;

use crate::payload::{Family, PayloadError};
use serde::Serialize;
use serde_json::Value;

/// Payload families that can be decoded by name
pub const FAMILIES: &[&str] = &[
    <timeseriesinsights::Environment as Family>::NAME,
    <timeseriesinsights::EventSource as Family>::NAME,
    <streamanalytics::InputProperties as Family>::NAME,
    <streamanalytics::StreamInputDataSource as Family>::NAME,
    <streamanalytics::Serialization as Family>::NAME,
    <datamigration::ConnectionInfo as Family>::NAME,
    <recoveryservices::EnableProtectionProviderSpecificInput as Family>::NAME,
];

/// Outcome of decoding a payload by family name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPayload {
    pub family: &'static str,
    pub discriminator: &'static str,
    /// Discriminator value found in the payload
    pub tag: String,
    /// Whether the tag matched a modelled variant
    pub known: bool,
    /// Whether the payload, nested families included, is fully modelled and
    /// so may be sent back in a request
    pub sendable: bool,
    /// Sendable payloads re-encoded from their typed form, anything else
    /// exactly as received
    pub body: Value,
}

fn describe<F: Family>(value: Value) -> Result<Option<DecodedPayload>, PayloadError> {
    let received = value.clone();
    let Some(decoded) = F::registry().decode_value(value)? else {
        return Ok(None);
    };

    let (sendable, body) = match decoded.encode() {
        Ok(body) => (true, body),
        Err(e) => {
            tracing::debug!("Keeping {} payload as received: {}", F::NAME, e);
            (false, received)
        }
    };

    Ok(Some(DecodedPayload {
        family: F::NAME,
        discriminator: F::DISCRIMINATOR,
        tag: decoded.tag().to_string(),
        known: decoded.as_raw().is_none(),
        sendable,
        body,
    }))
}

/// Decode `value` as a member of the family called `family`.
///
/// Returns `Ok(None)` when the value carries no discriminator.
pub fn decode_payload(family: &str, value: Value) -> Result<Option<DecodedPayload>, PayloadError> {
    let matches = |name: &str| name.eq_ignore_ascii_case(family);

    if matches(<timeseriesinsights::Environment as Family>::NAME) {
        describe::<timeseriesinsights::Environment>(value)
    } else if matches(<timeseriesinsights::EventSource as Family>::NAME) {
        describe::<timeseriesinsights::EventSource>(value)
    } else if matches(<streamanalytics::InputProperties as Family>::NAME) {
        describe::<streamanalytics::InputProperties>(value)
    } else if matches(<streamanalytics::StreamInputDataSource as Family>::NAME) {
        describe::<streamanalytics::StreamInputDataSource>(value)
    } else if matches(<streamanalytics::Serialization as Family>::NAME) {
        describe::<streamanalytics::Serialization>(value)
    } else if matches(<datamigration::ConnectionInfo as Family>::NAME) {
        describe::<datamigration::ConnectionInfo>(value)
    } else if matches(<recoveryservices::EnableProtectionProviderSpecificInput as Family>::NAME) {
        describe::<recoveryservices::EnableProtectionProviderSpecificInput>(value)
    } else {
        Err(PayloadError::UnknownFamily(family.to_string()))
    }
}

/// Whether `family` names a known payload family
pub fn is_family(family: &str) -> bool {
    FAMILIES.iter().any(|name| name.eq_ignore_ascii_case(family))
}
