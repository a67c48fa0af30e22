//! ProVisionClient trait for mocking
//!
//! This trait abstracts the ProVisionClient to enable mocking in unit tests.
//! The concrete ProVisionClient implements this trait, and tests can use mock implementations.

use crate::error::ProVisionError;
use crate::models::*;
use std::collections::BTreeMap;

/// Trait for ProVision API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
/// Search filters are passed through to ProVision untouched.
#[async_trait::async_trait]
pub trait ProVisionClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the configured credentials
    async fn validate_credentials(&self) -> Result<(), ProVisionError>;

    // Resource Operations
    async fn get_resources(&self, filters: &BTreeMap<String, String>) -> Result<Vec<Resource>, ProVisionError>;
    async fn add_resource(&self, resource: &Resource) -> Result<Resource, ProVisionError>;
    async fn update_resource(&self, resource: &Resource) -> Result<Resource, ProVisionError>;
    async fn delete_resource_by_id(&self, id: &str) -> Result<(), ProVisionError>;

    // DNS Operations
    async fn get_zone_by_id(&self, id: &str) -> Result<Vec<DnsZone>, ProVisionError>;
    async fn add_zone(&self, zone: &DnsZone) -> Result<DnsZone, ProVisionError>;
    async fn update_zone(&self, zone: &DnsZone) -> Result<DnsZone, ProVisionError>;
    async fn delete_zone_by_id(&self, id: &str) -> Result<(), ProVisionError>;
    async fn get_zone_records(&self, zone_id: &str, filters: &BTreeMap<String, String>) -> Result<Vec<DnsRecord>, ProVisionError>;
    async fn add_zone_record(&self, record: &DnsRecord) -> Result<DnsRecord, ProVisionError>;
    async fn update_zone_record(&self, record: &DnsRecord) -> Result<DnsRecord, ProVisionError>;
    async fn delete_zone_record_by_id(&self, zone_id: &str, id: &str) -> Result<(), ProVisionError>;
    async fn dns_push(&self, scope: DnsPushScope, id: &str) -> Result<String, ProVisionError>;
    async fn dns_push_status(&self, scope: DnsPushScope, id: &str, pid: &str) -> Result<Vec<PushStatusMessage>, ProVisionError>;

    // DHCP Operations
    async fn dhcp_push(&self, scope: DhcpPushScope, id: &str) -> Result<String, ProVisionError>;
    async fn dhcp_push_status(&self, scope: DhcpPushScope, id: &str, pid: &str) -> Result<Vec<PushStatusMessage>, ProVisionError>;

    // IPAM Operations
    async fn get_netblocks(&self, filters: &BTreeMap<String, String>) -> Result<Vec<Netblock>, ProVisionError>;
    async fn get_netblock_by_id(&self, id: &str) -> Result<Netblock, ProVisionError>;
    async fn update_netblock(&self, update: &NetblockUpdate) -> Result<Netblock, ProVisionError>;
    async fn smart_assign(&self, request: &SmartAssignRequest) -> Result<Netblock, ProVisionError>;
    async fn unassign_netblock_by_id(&self, id: &str, skip_holding: bool) -> Result<UnassignResponse, ProVisionError>;
    async fn get_first_available(&self, search: &str) -> Result<String, ProVisionError>;
}
