//! ProVision API models
//!
//! These models match the ProVision v1 REST API payloads for resources, DNS zones and
//! records, IPAM netblocks, and the DNS/DHCP push endpoints.
//!
//! Every attribute that ProVision may omit is an `Option` and is skipped on write when
//! unset, so the server applies its own default.

use crate::common::coerce;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// ProVision object identifier
///
/// Identifiers are numeric on the server but travel as strings in most payloads and as
/// numbers in a few; both decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PvId(String);

impl PvId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PvId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PvId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for PvId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for PvId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PvId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        coerce::string(deserializer).map(PvId)
    }
}

/// Generic ProVision resource (the object every other entity hangs off)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PvId>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub slug: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "coerce::string")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string_map")]
    pub attrs: Option<BTreeMap<String, String>>,
}

/// DNS zone (SOA attributes are optional on write; ProVision fills in defaults)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsZone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<PvId>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub zone_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub zone_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub zone_mail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub zone_expire: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub zone_minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub zone_refresh: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub zone_retry: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub zone_serial: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub zone_ttl: Option<i64>,
}

/// DNS record; `parent_id` is the owning zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PvId>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "coerce::string")]
    pub record_type: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub record_host: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub record_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub record_ttl: Option<i64>,
}

/// Free-form netblock metadata slots `meta1`..`meta10`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetblockMeta {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta7: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta8: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta9: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub meta10: Option<String>,
}

/// IPAM netblock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netblock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PvId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub netblock_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_aggregate: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub end_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_bool")]
    pub is_aggregate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_bool")]
    pub assigned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_allocation_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_bool")]
    pub is_important: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_bool")]
    pub swipped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub last_update_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lir_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_i64")]
    pub mask: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub netmask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_bool")]
    pub allow_sub_assignments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child1: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child2: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub rir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub generic_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub assign_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub swip_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub net_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub customer_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub reserved_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_by: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_resource_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmnetblock_resource_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umbrella_resource_id: Option<PvId>,
    #[serde(flatten)]
    pub meta: NetblockMeta,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub nat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub host_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "coerce::string_list")]
    pub range: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "coerce::string_list")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "coerce::opt_string")]
    pub utilization_status: Option<String>,
}

/// Writable subset of a netblock sent on update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetblockUpdate {
    pub id: PvId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_sub_assignments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<PvId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lir_id: Option<PvId>,
    #[serde(flatten)]
    pub meta: NetblockMeta,
}

/// Request body for the IPAM smart-assign endpoint
///
/// Picks the next free block of `mask` bits from the pool matching `netblock_type` and
/// `rir`, and assigns it to `resource_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartAssignRequest {
    pub resource_id: PvId,
    #[serde(rename = "type")]
    pub netblock_type: String,
    pub rir: String,
    pub mask: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_aggregate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
    /// Comma separated tag list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(flatten)]
    pub meta: NetblockMeta,
}

/// One progress entry of an asynchronous DNS or DHCP push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushStatusMessage {
    #[serde(default, deserialize_with = "coerce::string")]
    pub msgid: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub message: String,
    /// running, finished, warning or error
    #[serde(default, deserialize_with = "coerce::string")]
    pub state: String,
    #[serde(default, deserialize_with = "coerce::string")]
    pub date_created: String,
}

/// Response body of a push request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    #[serde(deserialize_with = "coerce::string")]
    pub pid: String,
}

/// Response body of the first-available-address lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstAvailableResponse {
    #[serde(deserialize_with = "coerce::string")]
    pub address: String,
}

/// Response body of the unassign endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnassignResponse {
    #[serde(default, deserialize_with = "coerce::opt_bool")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "coerce::opt_string")]
    pub message: Option<String>,
}

/// Object a DNS push is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsPushScope {
    Group,
    Server,
    Zone,
}

impl DnsPushScope {
    /// Path segment used by the push endpoints
    pub fn as_str(self) -> &'static str {
        match self {
            DnsPushScope::Group => "group",
            DnsPushScope::Server => "server",
            DnsPushScope::Zone => "zone",
        }
    }
}

impl fmt::Display for DnsPushScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object a DHCP push is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DhcpPushScope {
    Group,
    Server,
    Pool,
}

impl DhcpPushScope {
    /// Path segment used by the push endpoints
    pub fn as_str(self) -> &'static str {
        match self {
            DhcpPushScope::Group => "group",
            DhcpPushScope::Server => "server",
            DhcpPushScope::Pool => "pool",
        }
    }
}

impl fmt::Display for DhcpPushScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pv_id_accepts_numbers_and_strings() {
        let from_number: PvId = serde_json::from_str("42").unwrap();
        let from_string: PvId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number).unwrap(), "\"42\"");
    }

    #[test]
    fn test_resource_write_omits_unset_fields() {
        let resource = Resource {
            name: "edge-01".to_string(),
            resource_type: "entry".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&resource).unwrap();
        assert_eq!(body, serde_json::json!({"name": "edge-01", "type": "entry"}));
    }

    #[test]
    fn test_resource_write_keeps_explicit_empty_slug() {
        let resource = Resource {
            name: "edge-01".to_string(),
            resource_type: "entry".to_string(),
            slug: Some(String::new()),
            ..Default::default()
        };
        let body = serde_json::to_value(&resource).unwrap();
        assert_eq!(body["slug"], serde_json::json!(""));
    }

    #[test]
    fn test_netblock_decodes_provision_encodings() {
        let netblock: Netblock = serde_json::from_value(serde_json::json!({
            "id": 812,
            "type": "ipv4",
            "cidr": "10.20.0.0/24",
            "mask": "24",
            "assigned": "1",
            "is_aggregate": 0,
            "range": ["10.20.0.0", "10.20.0.255"],
            "tags": "",
            "meta3": "rack-7"
        }))
        .unwrap();
        assert_eq!(netblock.id, Some(PvId::from("812")));
        assert_eq!(netblock.mask, Some(24));
        assert_eq!(netblock.assigned, Some(true));
        assert_eq!(netblock.is_aggregate, Some(false));
        assert_eq!(netblock.range.len(), 2);
        assert!(netblock.tags.is_empty());
        assert_eq!(netblock.meta.meta3.as_deref(), Some("rack-7"));
    }
}
