//! Read-only data sources

pub mod first_available_ip;
pub mod netblocks;
pub mod pushes;
pub mod resources;

#[cfg(test)]
mod push_test;

pub use first_available_ip::FirstAvailableIp;
pub use netblocks::Netblocks;
pub use pushes::{DhcpPush, DhcpPushStatus, DnsPush, DnsPushStatus};
pub use resources::Resources;
