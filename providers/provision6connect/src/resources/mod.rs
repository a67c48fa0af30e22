//! Managed resources
//!
//! Each resource maps one ProVision entity onto a typed state model and
//! implements [`crate::host::Resource`].

pub mod dns_record;
pub mod dns_zone;
pub mod pvresource;
pub mod smart_assign;

#[cfg(test)]
mod pvresource_test;

pub use dns_record::{DnsRecordResource, DnsRecordState};
pub use dns_zone::{DnsZoneResource, DnsZoneState};
pub use pvresource::PvResource;
pub use smart_assign::{SmartAssignResource, SmartAssignState};
