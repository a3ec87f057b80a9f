//! Resource identifiers
//!
//! Bidirectional mapping between structured resource IDs and their canonical
//! hierarchical path form, e.g.
//! `/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Cache/redis/{redisName}`.
//!
//! # Module Structure
//!
//! - [`segment`] - Segment kinds, from static literals to scopes
//! - [`template`] - [`ResourceIdType`]: one format/parse routine driven by a segment list
//! - [`id`] - [`ResourceId`]: a parsed or constructed ID bound to its type
//! - [`typed`] - [`TypedResourceId`] and the macro declaring typed ID structs
//! - [`validate`] - Adapter for configuration schema validation
//! - [`common`] - Subscription and resource group IDs

pub mod common;
pub mod error;
pub mod id;
pub mod segment;
pub mod template;
pub mod typed;
pub mod validate;

pub use common::{ResourceGroupId, SubscriptionId};
pub use error::{ParseError, TemplateError};
pub use id::ResourceId;
pub use segment::{Segment, SegmentKind};
pub use template::ResourceIdType;
pub(crate) use typed::typed_resource_id;
pub use typed::TypedResourceId;
pub use validate::{validate_resource_id, ValidationError};
