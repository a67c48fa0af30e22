//! Test utilities for unit testing resources and data sources
//!
//! This module provides helpers for building a mock-backed client and seeding it with
//! ProVision entities.

use crate::provider::Provider;
use provision_client::{DnsZone, MockProVisionClient, ProVisionClientTrait, PvId, Resource};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mock client plus the same mock behind the trait object the provider holds.
/// Both handles share one store.
pub fn mock_client() -> (MockProVisionClient, Arc<dyn ProVisionClientTrait>) {
    let mock = MockProVisionClient::new("http://test-provision");
    let client: Arc<dyn ProVisionClientTrait> = Arc::new(mock.clone());
    (mock, client)
}

/// Provider wired to a fresh mock
pub fn mock_provider() -> (MockProVisionClient, Provider) {
    let (mock, client) = mock_client();
    (mock, Provider::new(client))
}

/// Helper to create a test ProVision resource with attributes
pub fn create_test_resource(id: &str, name: &str, resource_type: &str) -> Resource {
    Resource {
        id: Some(PvId::from(id)),
        parent_id: Some(PvId::from("1")),
        name: name.to_string(),
        slug: Some(name.to_lowercase()),
        resource_type: resource_type.to_string(),
        modified: Some("2024-05-01 10:00:00".to_string()),
        attrs: Some(BTreeMap::from([("rack".to_string(), "r7".to_string())])),
    }
}

/// Helper to create a test DNS zone
pub fn create_test_zone(id: &str, name: &str) -> DnsZone {
    DnsZone {
        id: Some(PvId::from(id)),
        parent_id: Some(PvId::from("5")),
        name: name.to_string(),
        status: Some("active".to_string()),
        zone_type: Some("master".to_string()),
        zone_serial: Some(1),
        zone_ttl: Some(3600),
        ..Default::default()
    }
}
