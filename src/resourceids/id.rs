//! Parsed Resource IDs

use super::error::ParseError;
use super::segment::Segment;
use super::template::ResourceIdType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A resource ID bound to its type, immutable once constructed
#[derive(Debug, Clone)]
pub struct ResourceId {
    id_type: Arc<ResourceIdType>,
    /// One value per template segment, literals included
    values: Vec<String>,
}

impl ResourceId {
    /// Construct an ID from named values.
    ///
    /// Literal segments take their template text. Value segments missing from
    /// `values` are left empty; formatting does not validate.
    pub fn from_values(id_type: Arc<ResourceIdType>, values: &HashMap<&str, &str>) -> Self {
        let values = id_type
            .segments()
            .iter()
            .map(|segment| match segment.literal() {
                Some(literal) => literal.to_string(),
                None => values
                    .get(segment.name.as_str())
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Self { id_type, values }
    }

    /// Parse an ID strictly, as required for any user-supplied value
    pub fn parse(id_type: &Arc<ResourceIdType>, input: &str) -> Result<Self, ParseError> {
        let values = id_type.parse_values(input, false)?;
        Ok(Self {
            id_type: Arc::clone(id_type),
            values,
        })
    }

    /// Parse an ID returned by the API, tolerating inconsistent casing of
    /// literal segments. Never use this to validate user input.
    pub fn parse_insensitively(
        id_type: &Arc<ResourceIdType>,
        input: &str,
    ) -> Result<Self, ParseError> {
        let values = id_type.parse_values(input, true)?;
        Ok(Self {
            id_type: Arc::clone(id_type),
            values,
        })
    }

    pub fn id_type(&self) -> &Arc<ResourceIdType> {
        &self.id_type
    }

    /// Value of a named segment
    pub fn get(&self, name: &str) -> Option<&str> {
        self.id_type
            .segments()
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.values[i].as_str())
    }

    /// Segments paired with their values, in template order
    pub fn segments(&self) -> impl Iterator<Item = (&Segment, &str)> {
        self.id_type
            .segments()
            .iter()
            .zip(self.values.iter().map(|v| v.as_str()))
    }

    /// The caller-supplied values only, in template order
    pub fn named_values(&self) -> Vec<(&str, &str)> {
        self.segments()
            .filter(|(s, _)| s.is_value())
            .map(|(s, v)| (s.name.as_str(), v))
            .collect()
    }

    /// The canonical path form of this ID
    pub fn id(&self) -> String {
        self.id_type.render(&self.values)
    }

    /// The last value segment, i.e. the resource's own name
    pub fn name(&self) -> Option<&str> {
        self.segments()
            .filter(|(s, _)| s.is_value())
            .last()
            .map(|(_, v)| v)
    }

    /// The ID with its final value segment removed: the collection the
    /// resource is listed under.
    pub fn collection_path(&self) -> String {
        let keep = self.values.len().saturating_sub(1);
        self.id_type.render(&self.values[..keep])
    }

    /// Compare two IDs of the same type, ignoring ASCII case in values
    pub fn eq_ignore_case(&self, other: &ResourceId) -> bool {
        self.id_type.name() == other.id_type.name()
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl PartialEq for ResourceId {
    fn eq(&self, other: &Self) -> bool {
        self.id_type.name() == other.id_type.name() && self.values == other.values
    }
}

impl Eq for ResourceId {}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ID {:?}", self.id_type.name(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_type() -> Arc<ResourceIdType> {
        Arc::new(
            ResourceIdType::from_template(
                "Widget",
                "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Example/widgets/{widgetName}",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_format_and_parse_example() {
        let id_type = widget_type();
        let values = HashMap::from([
            ("subscriptionId", "12345678-1234-9876-4563-123456789012"),
            ("resourceGroupName", "example-resource-group"),
            ("widgetName", "widgetValue"),
        ]);
        let id = ResourceId::from_values(Arc::clone(&id_type), &values);
        assert_eq!(
            id.id(),
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/example-resource-group/providers/Microsoft.Example/widgets/widgetValue"
        );

        let parsed = ResourceId::parse(&id_type, &id.id()).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.get("subscriptionId"), Some("12345678-1234-9876-4563-123456789012"));
        assert_eq!(parsed.get("resourceGroupName"), Some("example-resource-group"));
        assert_eq!(parsed.get("widgetName"), Some("widgetValue"));
        assert_eq!(parsed.name(), Some("widgetValue"));
    }

    #[test]
    fn test_collection_path() {
        let id = ResourceId::parse(
            &widget_type(),
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Example/widgets/w",
        )
        .unwrap();
        assert_eq!(
            id.collection_path(),
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Example/widgets"
        );
    }

    #[test]
    fn test_insensitive_parse_matches_canonical() {
        let id_type = widget_type();
        let canonical = ResourceId::parse(
            &id_type,
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Example/widgets/Widget1",
        )
        .unwrap();
        let shouted = ResourceId::parse_insensitively(
            &id_type,
            "/SUBSCRIPTIONS/s/RESOURCEGROUPS/rg/PROVIDERS/MICROSOFT.EXAMPLE/WIDGETS/WIDGET1",
        )
        .unwrap();
        assert_ne!(canonical, shouted);
        assert!(canonical.eq_ignore_case(&shouted));
        assert_eq!(shouted.get("widgetName"), Some("WIDGET1"));
    }

    #[test]
    fn test_named_values() {
        let id = ResourceId::parse(
            &widget_type(),
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Example/widgets/w",
        )
        .unwrap();
        assert_eq!(
            id.named_values(),
            vec![("subscriptionId", "s"), ("resourceGroupName", "rg"), ("widgetName", "w")]
        );
    }
}
