//! ProVision REST API Client
//!
//! A Rust client library for the 6connect ProVision v1 REST API.
//! Provides type-safe models and methods for resources, DNS, DHCP and IPAM operations.
//!
//! # Example
//!
//! ```no_run
//! use provision_client::{DhcpPushScope, ProVisionClient, ProVisionClientTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = ProVisionClient::new(
//!     "https://provision.example.net".to_string(),
//!     "api-user",
//!     "api-password",
//! )?;
//!
//! // Push DHCP configuration for a group and check on it
//! let pid = client.dhcp_push(DhcpPushScope::Group, "42").await?;
//! let messages = client.dhcp_push_status(DhcpPushScope::Group, "42", &pid).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Resources**: Query and manage generic ProVision resources
//! - **DNS**: Zones, records and DNS configuration pushes
//! - **DHCP**: DHCP configuration pushes
//! - **IPAM**: Netblocks, smart assign and first available address
//! - **Lenient decoding**: Mixed string/number encodings from the API decode uniformly

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod provision_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::ProVisionClient;
pub use common::HttpClient;
pub use error::ProVisionError;
pub use models::*;
pub use provision_trait::ProVisionClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockProVisionClient, RecordedPush, RecordedStatusRequest};
