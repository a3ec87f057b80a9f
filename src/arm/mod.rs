//! Azure Resource Manager API interaction
//!
//! # Module Structure
//!
//! - [`auth`] - bearer token credentials
//! - [`client`] - main ARM client for making API requests
//! - [`error`] - transport, status and operation errors
//! - [`http`] - HTTP utilities for REST API calls
//! - [`pager`] - `nextLink` list traversal
//! - [`poller`] - long-running operation tracking
//!
//! # Example
//!
//! ```ignore
//! use armctl::arm::{ArmClient, StaticTokenCredential};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn example() -> Result<(), armctl::arm::ArmError> {
//!     let client = ArmClient::new(
//!         armctl::arm::DEFAULT_ENDPOINT,
//!         std::sync::Arc::new(StaticTokenCredential::new("token")),
//!     )?;
//!     let cancel = CancellationToken::new();
//!     let path = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg";
//!     let group = client.get(path, "2021-04-01", &cancel).await?;
//!     println!("{}", group.body);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod pager;
pub mod poller;

pub use auth::{ClientSecretCredential, StaticTokenCredential, TokenCredential};
pub use client::{ArmClient, DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL};
pub use error::ArmError;
pub use http::ArmResponse;
pub use pager::{fetch_all, item_stream, ArmListSource, Page, PageSource};
pub use poller::OperationStatus;
