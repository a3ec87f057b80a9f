//! Payload codec errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    /// The outer document was not valid JSON or not an object
    #[error("decoding {family} payload: {source}")]
    Malformed {
        family: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The outer document was JSON but not an object
    #[error("decoding {family} payload: expected a JSON object, got {found}")]
    NotAnObject { family: &'static str, found: &'static str },

    /// The discriminator matched a known variant whose body did not decode
    #[error("decoding {family} variant {variant:?}: {source}")]
    Variant {
        family: &'static str,
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A nested payload carried no discriminator where one was required
    #[error("decoding {family} payload: missing discriminator {discriminator:?}")]
    MissingDiscriminator {
        family: &'static str,
        discriminator: &'static str,
    },

    /// Encoding a known variant failed
    #[error("encoding {family} variant {variant:?}: {source}")]
    Encode {
        family: &'static str,
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown payload family {0:?}")]
    UnknownFamily(String),

    /// Raw fallbacks describe what the server sent and may not be sent back
    #[error("{family} payload with unrecognised discriminator {discriminator:?} cannot be used in a request")]
    RawNotEncodable {
        family: &'static str,
        discriminator: String,
    },
}
