//! Resource abstraction layer
//!
//! A data-driven approach to managing ARM resources. Resource definitions
//! are loaded from JSON files at compile time, so new resource types are
//! added without code changes.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and validates resource definitions from embedded JSON
//! - [`handler`] - Generic create/read/update/delete/list over the ARM client
//! - [`schema`] - Location and tag helpers shared by every resource body
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`, one per
//! provider, e.g. `cache.json` for Redis and `kubernetes.json` for Arc
//! clusters and Flux configurations.
//!
//! # Example
//!
//! ```ignore
//! use armctl::resource::{ResourceHandler, ServiceRegistry};
//!
//! async fn show(client: &armctl::arm::ArmClient, id: &str) -> anyhow::Result<()> {
//!     let registry = ServiceRegistry::embedded()?;
//!     let def = registry.get("redis-caches").unwrap();
//!     let cancel = tokio_util::sync::CancellationToken::new();
//!     let cache = ResourceHandler::new(def, client).read(id, &cancel).await?;
//!     println!("{:?}", cache);
//!     Ok(())
//! }
//! ```

pub mod handler;
pub mod registry;
pub mod schema;

pub use handler::{ResourceHandler, Timeouts};
pub use registry::{PayloadDef, RegistryError, ResourceDef, ServiceRegistry, UpdateMethod};
