//! armctl
//!
//! Building blocks for talking to Azure Resource Manager: resource ID
//! templates, discriminated payload families, paged listing and polling of
//! long-running operations, tied together by a registry-driven resource
//! handler.

pub mod arm;
pub mod config;
pub mod models;
pub mod payload;
pub mod resource;
pub mod resourceids;

/// Version injected at compile time via ARMCTL_VERSION (set by CI/CD), or
/// the crate version for local builds.
pub const VERSION: &str = match option_env!("ARMCTL_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
