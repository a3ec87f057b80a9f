//! Polymorphic Payload Codec
//!
//! Discriminated-union JSON: a field such as `kind` or `type` names the
//! concrete shape. Known shapes decode into typed variants; anything else is
//! kept as a [`RawPayload`].

mod constants;
mod error;
mod family;
mod raw;
mod registry;

pub(crate) use constants::arm_enum;
pub use error::PayloadError;
pub use family::{decode_required, optional};
pub(crate) use family::payload_family;
pub use raw::RawPayload;
pub use registry::{encode_variant, from_slice, to_vec, Family, Variant, VariantRegistry};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Circle {
        radius: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Square {
        side_length: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    }

    payload_family! {
        enum Shape("Shape", "kind") {
            Circle(Circle) = "Circle",
            Square(Square) = "Square",
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Drawing {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none", with = "optional")]
        shape: Option<Shape>,
    }

    #[test]
    fn test_decode_known_variant_strips_discriminator() {
        let decoded = from_slice::<Shape>(br#"{"kind":"Square","sideLength":4}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            decoded,
            Shape::Square(Square {
                side_length: 4,
                label: None
            })
        );
        assert_eq!(decoded.tag(), "Square");
    }

    #[test]
    fn test_encode_injects_discriminator() {
        let shape = Shape::Circle(Circle { radius: 1.5 });
        assert_eq!(shape.encode().unwrap(), json!({"kind": "Circle", "radius": 1.5}));

        let bytes = to_vec(&shape).unwrap();
        assert_eq!(from_slice::<Shape>(&bytes).unwrap(), Some(shape));
    }

    #[test]
    fn test_unknown_discriminator_falls_back_to_raw() {
        let decoded = from_slice::<Shape>(br#"{"kind":"Hexagon","sides":6,"extra":{"a":1}}"#)
            .unwrap()
            .unwrap();
        let raw = decoded.as_raw().unwrap();
        assert_eq!(raw.discriminator(), "Hexagon");
        assert_eq!(raw.get("sides"), Some(&json!(6)));
        assert_eq!(raw.as_value(), json!({"kind": "Hexagon", "sides": 6, "extra": {"a": 1}}));
    }

    #[test]
    fn test_raw_is_not_encodable() {
        let decoded = from_slice::<Shape>(br#"{"kind":"Hexagon"}"#).unwrap().unwrap();
        let err = decoded.encode().unwrap_err();
        assert!(matches!(
            err,
            PayloadError::RawNotEncodable { ref discriminator, .. } if discriminator == "Hexagon"
        ));
    }

    #[test]
    fn test_missing_discriminator_is_none() {
        assert!(from_slice::<Shape>(br#"{"radius":1.0}"#).unwrap().is_none());
        assert!(from_slice::<Shape>(b"null").unwrap().is_none());
    }

    #[test]
    fn test_malformed_outer_json_fails() {
        let err = from_slice::<Shape>(b"{not json").unwrap_err();
        assert!(matches!(err, PayloadError::Malformed { .. }));

        let err = from_slice::<Shape>(b"[1, 2]").unwrap_err();
        assert!(matches!(err, PayloadError::NotAnObject { found: "an array", .. }));
    }

    #[test]
    fn test_malformed_known_variant_names_variant() {
        let err = from_slice::<Shape>(br#"{"kind":"Circle","radius":"big"}"#).unwrap_err();
        assert!(matches!(err, PayloadError::Variant { variant: "Circle", .. }));
    }

    #[test]
    fn test_discriminator_match_ignores_case() {
        let decoded = from_slice::<Shape>(br#"{"kind":"circle","radius":2.0}"#).unwrap();
        assert_eq!(decoded, Some(Shape::Circle(Circle { radius: 2.0 })));
    }

    #[test]
    fn test_family_nests_in_models() {
        let drawing: Drawing =
            serde_json::from_value(json!({"name": "d", "shape": {"kind": "Circle", "radius": 3.0}}))
                .unwrap();
        assert_eq!(drawing.shape, Some(Shape::Circle(Circle { radius: 3.0 })));
        assert_eq!(
            serde_json::to_value(&drawing).unwrap(),
            json!({"name": "d", "shape": {"kind": "Circle", "radius": 3.0}})
        );

        let bare: Drawing =
            serde_json::from_value(json!({"name": "d", "shape": {"radius": 3.0}})).unwrap();
        assert!(bare.shape.is_none());

        let absent: Drawing = serde_json::from_value(json!({"name": "d"})).unwrap();
        assert!(absent.shape.is_none());
    }

    #[test]
    fn test_required_family_without_discriminator_fails() {
        let err = serde_json::from_value::<Shape>(json!({"radius": 1.0})).unwrap_err();
        assert!(err.to_string().contains("missing discriminator"));
    }

    #[test]
    fn test_registry_lists_tags() {
        assert_eq!(Shape::registry().tags(), vec!["Circle", "Square"]);
        assert_eq!(Shape::registry().discriminator(), "kind");
    }
}
