//! Mock ProVisionClient for unit testing
//!
//! This module provides a mock implementation of ProVisionClientTrait that can be used
//! in unit tests without requiring a running ProVision instance.
//!
//! The mock is organized into domain-specific modules:
//! - `resources.rs` - generic resources
//! - `dns.rs` - DNS zones, records and DNS push
//! - `dhcp.rs` - DHCP push
//! - `ipam.rs` - netblocks, smart assign, first available address
//! - `helpers.rs` - locking, id and timestamp helpers

mod helpers;
mod resources;
mod dns;
mod dhcp;
mod ipam;

use crate::error::ProVisionError;
use crate::models::*;
use crate::provision_trait::ProVisionClientTrait;
use helpers::lock;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// One recorded push request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPush {
    /// `"dns"` or `"dhcp"`
    pub module: &'static str,
    /// `"group"`, `"server"`, `"zone"` or `"pool"`
    pub scope: &'static str,
    pub id: String,
    pub pid: String,
}

/// One recorded push status request
#[derive(Debug, Clone)]
pub struct RecordedStatusRequest {
    pub module: &'static str,
    pub scope: &'static str,
    pub id: String,
    pub pid: String,
    pub at: Instant,
}

/// Mock ProVisionClient for testing
///
/// This mock stores entities in memory and can be configured to fail the next call
/// or to return canned push status messages. Clones share the same store.
#[derive(Debug, Clone)]
pub struct MockProVisionClient {
    pub(crate) base_url: String,
    // In-memory storage, keyed by id
    pub(crate) resources: Arc<Mutex<BTreeMap<String, Resource>>>,
    pub(crate) zones: Arc<Mutex<BTreeMap<String, DnsZone>>>,
    pub(crate) records: Arc<Mutex<BTreeMap<String, DnsRecord>>>,
    pub(crate) netblocks: Arc<Mutex<BTreeMap<String, Netblock>>>,
    pub(crate) first_available: Arc<Mutex<HashMap<String, String>>>,
    // Push bookkeeping
    pub(crate) push_statuses: Arc<Mutex<HashMap<String, Vec<PushStatusMessage>>>>,
    pub(crate) pushes: Arc<Mutex<Vec<RecordedPush>>>,
    pub(crate) status_requests: Arc<Mutex<Vec<RecordedStatusRequest>>>,
    // Failure injection
    pub(crate) fail_next: Arc<Mutex<Option<ProVisionError>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

impl MockProVisionClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resources: Arc::new(Mutex::new(BTreeMap::new())),
            zones: Arc::new(Mutex::new(BTreeMap::new())),
            records: Arc::new(Mutex::new(BTreeMap::new())),
            netblocks: Arc::new(Mutex::new(BTreeMap::new())),
            first_available: Arc::new(Mutex::new(HashMap::new())),
            push_statuses: Arc::new(Mutex::new(HashMap::new())),
            pushes: Arc::new(Mutex::new(Vec::new())),
            status_requests: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(None)),
            next_id: Arc::new(Mutex::new(100)),
        }
    }

    /// Add a resource to the mock store (for test setup)
    pub fn insert_resource(&self, resource: Resource) {
        let id = resource.id.clone().unwrap_or_else(|| PvId::from(self.next_id()));
        lock(&self.resources).insert(id.to_string(), Resource { id: Some(id), ..resource });
    }

    /// Add a DNS zone to the mock store (for test setup)
    pub fn insert_zone(&self, zone: DnsZone) {
        let id = zone.id.clone().unwrap_or_else(|| PvId::from(self.next_id()));
        lock(&self.zones).insert(id.to_string(), DnsZone { id: Some(id), ..zone });
    }

    /// Add a netblock to the mock store (for test setup)
    pub fn insert_netblock(&self, netblock: Netblock) {
        let id = netblock.id.clone().unwrap_or_else(|| PvId::from(self.next_id()));
        lock(&self.netblocks).insert(id.to_string(), Netblock { id: Some(id), ..netblock });
    }

    /// Answer a first-available lookup for `search` (netblock id or CIDR)
    pub fn set_first_available(&self, search: impl Into<String>, address: impl Into<String>) {
        lock(&self.first_available).insert(search.into(), address.into());
    }

    /// Status messages returned for push `pid`, in this order
    pub fn set_push_status(&self, pid: impl Into<String>, messages: Vec<PushStatusMessage>) {
        lock(&self.push_statuses).insert(pid.into(), messages);
    }

    /// Make the next client call fail with `error`
    pub fn fail_next(&self, error: ProVisionError) {
        *lock(&self.fail_next) = Some(error);
    }

    /// Push requests issued so far
    pub fn pushes(&self) -> Vec<RecordedPush> {
        lock(&self.pushes).clone()
    }

    /// Push status requests issued so far
    pub fn status_requests(&self) -> Vec<RecordedStatusRequest> {
        lock(&self.status_requests).clone()
    }

    /// Snapshot of a stored resource
    pub fn resource(&self, id: &str) -> Option<Resource> {
        lock(&self.resources).get(id).cloned()
    }

    /// Snapshot of a stored DNS zone
    pub fn zone(&self, id: &str) -> Option<DnsZone> {
        lock(&self.zones).get(id).cloned()
    }

    /// Snapshot of a stored DNS record
    pub fn record(&self, id: &str) -> Option<DnsRecord> {
        lock(&self.records).get(id).cloned()
    }

    /// Snapshot of a stored netblock
    pub fn netblock(&self, id: &str) -> Option<Netblock> {
        lock(&self.netblocks).get(id).cloned()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    /// Consume an injected failure, if any
    pub(crate) fn take_failure(&self) -> Result<(), ProVisionError> {
        match lock(&self.fail_next).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ProVisionClientTrait for MockProVisionClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), ProVisionError> {
        self.take_failure()
    }

    // Resource Operations - delegated to resources module
    async fn get_resources(&self, filters: &BTreeMap<String, String>) -> Result<Vec<Resource>, ProVisionError> {
        self.take_failure()?;
        resources::get_resources(self, filters).await
    }

    async fn add_resource(&self, resource: &Resource) -> Result<Resource, ProVisionError> {
        self.take_failure()?;
        resources::add_resource(self, resource).await
    }

    async fn update_resource(&self, resource: &Resource) -> Result<Resource, ProVisionError> {
        self.take_failure()?;
        resources::update_resource(self, resource).await
    }

    async fn delete_resource_by_id(&self, id: &str) -> Result<(), ProVisionError> {
        self.take_failure()?;
        resources::delete_resource_by_id(self, id).await
    }

    // DNS Operations - delegated to dns module
    async fn get_zone_by_id(&self, id: &str) -> Result<Vec<DnsZone>, ProVisionError> {
        self.take_failure()?;
        dns::get_zone_by_id(self, id).await
    }

    async fn add_zone(&self, zone: &DnsZone) -> Result<DnsZone, ProVisionError> {
        self.take_failure()?;
        dns::add_zone(self, zone).await
    }

    async fn update_zone(&self, zone: &DnsZone) -> Result<DnsZone, ProVisionError> {
        self.take_failure()?;
        dns::update_zone(self, zone).await
    }

    async fn delete_zone_by_id(&self, id: &str) -> Result<(), ProVisionError> {
        self.take_failure()?;
        dns::delete_zone_by_id(self, id).await
    }

    async fn get_zone_records(&self, zone_id: &str, filters: &BTreeMap<String, String>) -> Result<Vec<DnsRecord>, ProVisionError> {
        self.take_failure()?;
        dns::get_zone_records(self, zone_id, filters).await
    }

    async fn add_zone_record(&self, record: &DnsRecord) -> Result<DnsRecord, ProVisionError> {
        self.take_failure()?;
        dns::add_zone_record(self, record).await
    }

    async fn update_zone_record(&self, record: &DnsRecord) -> Result<DnsRecord, ProVisionError> {
        self.take_failure()?;
        dns::update_zone_record(self, record).await
    }

    async fn delete_zone_record_by_id(&self, zone_id: &str, id: &str) -> Result<(), ProVisionError> {
        self.take_failure()?;
        dns::delete_zone_record_by_id(self, zone_id, id).await
    }

    async fn dns_push(&self, scope: DnsPushScope, id: &str) -> Result<String, ProVisionError> {
        self.take_failure()?;
        Ok(dns::push(self, scope, id).await)
    }

    async fn dns_push_status(&self, scope: DnsPushScope, id: &str, pid: &str) -> Result<Vec<PushStatusMessage>, ProVisionError> {
        self.take_failure()?;
        Ok(dns::push_status(self, scope, id, pid).await)
    }

    // DHCP Operations - delegated to dhcp module
    async fn dhcp_push(&self, scope: DhcpPushScope, id: &str) -> Result<String, ProVisionError> {
        self.take_failure()?;
        Ok(dhcp::push(self, scope, id).await)
    }

    async fn dhcp_push_status(&self, scope: DhcpPushScope, id: &str, pid: &str) -> Result<Vec<PushStatusMessage>, ProVisionError> {
        self.take_failure()?;
        Ok(dhcp::push_status(self, scope, id, pid).await)
    }

    // IPAM Operations - delegated to ipam module
    async fn get_netblocks(&self, filters: &BTreeMap<String, String>) -> Result<Vec<Netblock>, ProVisionError> {
        self.take_failure()?;
        ipam::get_netblocks(self, filters).await
    }

    async fn get_netblock_by_id(&self, id: &str) -> Result<Netblock, ProVisionError> {
        self.take_failure()?;
        ipam::get_netblock_by_id(self, id).await
    }

    async fn update_netblock(&self, update: &NetblockUpdate) -> Result<Netblock, ProVisionError> {
        self.take_failure()?;
        ipam::update_netblock(self, update).await
    }

    async fn smart_assign(&self, request: &SmartAssignRequest) -> Result<Netblock, ProVisionError> {
        self.take_failure()?;
        Ok(ipam::smart_assign(self, request).await)
    }

    async fn unassign_netblock_by_id(&self, id: &str, skip_holding: bool) -> Result<UnassignResponse, ProVisionError> {
        self.take_failure()?;
        ipam::unassign_netblock_by_id(self, id, skip_holding).await
    }

    async fn get_first_available(&self, search: &str) -> Result<String, ProVisionError> {
        self.take_failure()?;
        ipam::get_first_available(self, search).await
    }
}
