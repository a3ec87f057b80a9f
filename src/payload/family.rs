//! Payload Families
//!
//! Declares discriminated unions and wires them into serde so they nest
//! inside ordinary models.

use super::error::PayloadError;
use super::registry::Family;
use serde_json::Value;

/// Decode a value that must carry a discriminator
pub fn decode_required<F: Family>(value: Value) -> Result<F, PayloadError> {
    F::registry()
        .decode_value(value)?
        .ok_or(PayloadError::MissingDiscriminator {
            family: F::NAME,
            discriminator: F::DISCRIMINATOR,
        })
}

/// serde adapter for `Option<Family>` fields: a missing or null value, or an
/// object without a discriminator, is `None`.
///
/// Use together with `#[serde(default, skip_serializing_if = "Option::is_none")]`.
pub mod optional {
    use super::super::registry::Family;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<F, S>(value: &Option<F>, serializer: S) -> Result<S::Ok, S::Error>
    where
        F: Family + Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, F, D>(deserializer: D) -> Result<Option<F>, D::Error>
    where
        F: Family,
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        F::registry()
            .decode_value(value)
            .map_err(serde::de::Error::custom)
    }
}

/// Declare a payload family.
///
/// Each arm names the enum variant, the concrete shape it wraps and the
/// discriminator value identifying it. A `Raw` variant is added for
/// unrecognised discriminators.
///
/// ```ignore
/// payload_family! {
///     pub enum Shape("Shape", "kind") {
///         Circle(CircleShape) = "Circle",
///         Square(SquareShape) = "Square",
///     }
/// }
/// ```
macro_rules! payload_family {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($family:literal, $discriminator:literal) {
            $( $(#[$vmeta:meta])* $variant:ident($shape:ty) = $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($shape), )+
            /// Unrecognised discriminator, kept verbatim
            Raw($crate::payload::RawPayload),
        }

        $(
            impl $crate::payload::Variant for $shape {
                const TAG: &'static str = $tag;
            }
        )+

        impl $crate::payload::Family for $name {
            const NAME: &'static str = $family;
            const DISCRIMINATOR: &'static str = $discriminator;

            fn registry() -> &'static $crate::payload::VariantRegistry<Self> {
                static REGISTRY: ::std::sync::OnceLock<$crate::payload::VariantRegistry<$name>> =
                    ::std::sync::OnceLock::new();
                REGISTRY.get_or_init(|| {
                    $crate::payload::VariantRegistry::new($family, $discriminator, $name::Raw)
                        $( .register::<$shape>($name::$variant) )+
                })
            }

            fn as_raw(&self) -> Option<&$crate::payload::RawPayload> {
                match self {
                    $name::Raw(raw) => Some(raw),
                    _ => None,
                }
            }

            fn encode(&self) -> Result<::serde_json::Value, $crate::payload::PayloadError> {
                match self {
                    $( $name::$variant(inner) => {
                        $crate::payload::encode_variant(inner, $family, $discriminator)
                    } )+
                    $name::Raw(raw) => Err($crate::payload::PayloadError::RawNotEncodable {
                        family: $family,
                        discriminator: raw.discriminator().to_string(),
                    }),
                }
            }

            fn tag(&self) -> &str {
                match self {
                    $( $name::$variant(_) => $tag, )+
                    $name::Raw(raw) => raw.discriminator(),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let value = $crate::payload::Family::encode(self)
                    .map_err(::serde::ser::Error::custom)?;
                ::serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let value: ::serde_json::Value = ::serde::Deserialize::deserialize(deserializer)?;
                $crate::payload::decode_required::<Self>(value).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use payload_family;
