//! Typed Resource IDs
//!
//! Resource types modelled in code get a plain struct of named fields. The
//! struct is declared from a template with [`typed_resource_id!`] and
//! converts to and from the generic [`ResourceId`], so formatting and parsing
//! always go through the one template routine.

use super::error::ParseError;
use super::id::ResourceId;
use super::template::ResourceIdType;
use super::validate::{validate_resource_id, ValidationError};
use serde_json::Value;
use std::sync::Arc;

/// A resource ID with named fields
pub trait TypedResourceId: Sized {
    /// The template shared by every value of this type
    fn id_type() -> Arc<ResourceIdType>;

    /// Read the fields out of an ID already parsed against [`Self::id_type`]
    fn from_resource_id(id: &ResourceId) -> Self;

    fn to_resource_id(&self) -> ResourceId;

    /// Parse strictly. Use this for anything a user supplied.
    fn parse(input: &str) -> Result<Self, ParseError> {
        let id = ResourceId::parse(&Self::id_type(), input)?;
        Ok(Self::from_resource_id(&id))
    }

    /// Parse a value the API returned, tolerating casing differences in
    /// literal segments
    fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        let id = ResourceId::parse_insensitively(&Self::id_type(), input)?;
        Ok(Self::from_resource_id(&id))
    }

    /// The canonical path form
    fn id(&self) -> String {
        self.to_resource_id().id()
    }

    /// Schema validation adapter for plain configuration values
    fn validate(input: &Value, key: &str) -> (Vec<String>, Vec<ValidationError>) {
        validate_resource_id(&Self::id_type(), input, key)
    }
}

/// Declare a typed resource ID from a template.
///
/// ```ignore
/// typed_resource_id! {
///     /// A widget
///     pub struct WidgetId("Widget", "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Example/widgets/{widgetName}") {
///         subscription_id => "subscriptionId",
///         resource_group_name => "resourceGroupName",
///         widget_name => "widgetName",
///     }
/// }
/// ```
macro_rules! typed_resource_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($display:literal, $template:literal) {
            $($field:ident => $segment:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            $(pub $field: String,)+
        }

        impl $name {
            pub fn new($($field: impl Into<String>),+) -> Self {
                Self {
                    $($field: $field.into(),)+
                }
            }
        }

        impl $crate::resourceids::TypedResourceId for $name {
            fn id_type() -> std::sync::Arc<$crate::resourceids::ResourceIdType> {
                static ID_TYPE: std::sync::OnceLock<
                    std::sync::Arc<$crate::resourceids::ResourceIdType>,
                > = std::sync::OnceLock::new();
                std::sync::Arc::clone(ID_TYPE.get_or_init(|| {
                    let id_type =
                        $crate::resourceids::ResourceIdType::from_template($display, $template)
                            .unwrap_or_else(|e| panic!("invalid {} ID template: {}", $display, e));
                    std::sync::Arc::new(id_type)
                }))
            }

            fn from_resource_id(id: &$crate::resourceids::ResourceId) -> Self {
                Self {
                    $($field: id.get($segment).unwrap_or_default().to_string(),)+
                }
            }

            fn to_resource_id(&self) -> $crate::resourceids::ResourceId {
                let values = std::collections::HashMap::from([
                    $(($segment, self.$field.as_str()),)+
                ]);
                $crate::resourceids::ResourceId::from_values(
                    <Self as $crate::resourceids::TypedResourceId>::id_type(),
                    &values,
                )
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{} ID {:?}",
                    $display,
                    <Self as $crate::resourceids::TypedResourceId>::id(self)
                )
            }
        }
    };
}

pub(crate) use typed_resource_id;
