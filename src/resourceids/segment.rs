//! Resource ID Segments
//!
//! A segment is one `/`-delimited component of a resource path, either a
//! fixed literal or a caller-supplied value.

use std::fmt;

/// Example subscription used when rendering example IDs
pub const EXAMPLE_SUBSCRIPTION_ID: &str = "12345678-1234-9876-4563-123456789012";

/// Example resource group used when rendering example IDs
pub const EXAMPLE_RESOURCE_GROUP: &str = "example-resource-group";

/// Kind of a segment within an ID template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fixed literal text, e.g. `subscriptions`
    Static(String),
    /// Resource provider namespace, e.g. `Microsoft.SignalRService`
    ResourceProvider(String),
    /// Subscription ID value
    SubscriptionId,
    /// Resource group name value
    ResourceGroup,
    /// Any user-supplied name
    UserSpecified,
    /// One of a fixed set of values
    Constant(Vec<String>),
    /// A nested resource path standing in for the parent of an extension resource
    Scope,
}

/// A named segment of an ID template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub kind: SegmentKind,
    pub example: String,
}

impl Segment {
    pub fn static_segment(name: &str, literal: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SegmentKind::Static(literal.to_string()),
            example: literal.to_string(),
        }
    }

    pub fn resource_provider(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SegmentKind::ResourceProvider(namespace.to_string()),
            example: namespace.to_string(),
        }
    }

    pub fn subscription_id(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SegmentKind::SubscriptionId,
            example: EXAMPLE_SUBSCRIPTION_ID.to_string(),
        }
    }

    pub fn resource_group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SegmentKind::ResourceGroup,
            example: EXAMPLE_RESOURCE_GROUP.to_string(),
        }
    }

    /// User-supplied segment. `widgetName` gets the example value `widgetValue`.
    pub fn user_specified(name: &str) -> Self {
        let example = match name.strip_suffix("Name") {
            Some(stem) if !stem.is_empty() => format!("{}Value", stem),
            _ => format!("{}Value", name),
        };
        Self {
            name: name.to_string(),
            kind: SegmentKind::UserSpecified,
            example,
        }
    }

    pub fn constant(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: SegmentKind::Constant(values.iter().map(|v| v.to_string()).collect()),
            example: values.first().map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    pub fn scope(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: SegmentKind::Scope,
            example: format!(
                "/subscriptions/{}/resourceGroups/{}",
                EXAMPLE_SUBSCRIPTION_ID, EXAMPLE_RESOURCE_GROUP
            ),
        }
    }

    /// The literal text of a fixed segment, if this is one
    pub fn literal(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Static(s) | SegmentKind::ResourceProvider(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value of this segment is supplied by the caller
    pub fn is_value(&self) -> bool {
        self.literal().is_none()
    }

    /// Match a single raw token against this segment.
    ///
    /// Returns the value to store: the canonical literal for fixed and
    /// constant segments, the token itself for user values.
    pub(crate) fn match_token(&self, token: &str, insensitively: bool) -> Option<String> {
        let equal = |expected: &str| {
            if insensitively {
                expected.eq_ignore_ascii_case(token)
            } else {
                expected == token
            }
        };

        match &self.kind {
            SegmentKind::Static(literal) | SegmentKind::ResourceProvider(literal) => {
                equal(literal).then(|| literal.clone())
            }
            SegmentKind::Constant(values) => values.iter().find(|v| equal(v)).cloned(),
            SegmentKind::SubscriptionId
            | SegmentKind::ResourceGroup
            | SegmentKind::UserSpecified => {
                (!token.is_empty()).then(|| token.to_string())
            }
            // Scopes span several tokens and are matched by the template
            SegmentKind::Scope => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SegmentKind::Static(literal) | SegmentKind::ResourceProvider(literal) => {
                write!(f, "{}", literal)
            }
            SegmentKind::Constant(values) => write!(f, "{{{}:{}}}", self.name, values.join("|")),
            _ => write!(f, "{{{}}}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_specified_example_value() {
        assert_eq!(Segment::user_specified("widgetName").example, "widgetValue");
        assert_eq!(Segment::user_specified("scopeId").example, "scopeIdValue");
        assert_eq!(Segment::user_specified("Name").example, "NameValue");
    }

    #[test]
    fn test_static_segment_matching() {
        let segment = Segment::static_segment("staticResourceGroups", "resourceGroups");
        assert_eq!(
            segment.match_token("resourceGroups", false).as_deref(),
            Some("resourceGroups")
        );
        assert!(segment.match_token("resourcegroups", false).is_none());
        assert_eq!(
            segment.match_token("RESOURCEGROUPS", true).as_deref(),
            Some("resourceGroups")
        );
    }

    #[test]
    fn test_constant_segment_normalizes_value() {
        let segment = Segment::constant("kind", &["Gen1", "Gen2"]);
        assert_eq!(segment.match_token("gen2", true).as_deref(), Some("Gen2"));
        assert!(segment.match_token("gen2", false).is_none());
        assert!(segment.match_token("Gen3", true).is_none());
    }

    #[test]
    fn test_empty_user_value_is_not_specified() {
        let segment = Segment::user_specified("widgetName");
        assert!(segment.match_token("", false).is_none());
        assert_eq!(segment.match_token("MyWidget", true).as_deref(), Some("MyWidget"));
    }
}
