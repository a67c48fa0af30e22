//! State models shared between resources and data sources
//!
//! State mirrors the ProVision entity with identifiers rendered as strings.
//! Unset optional attributes are `None` and serialize as `null`.

use provision_client::{Netblock, NetblockMeta, PvId, Resource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) fn id_string(id: Option<PvId>) -> Option<String> {
    id.map(PvId::into_inner)
}

/// A generic ProVision resource as held in state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub parent_id: Option<String>,
    pub slug: Option<String>,
    pub modified: Option<String>,
    pub attrs: Option<BTreeMap<String, String>>,
}

impl ResourceState {
    /// Request body for create and update; unset attributes are left to ProVision
    pub fn to_remote(&self) -> Resource {
        Resource {
            id: self.id.clone().map(PvId::from),
            parent_id: self.parent_id.clone().map(PvId::from),
            name: self.name.clone(),
            slug: self.slug.clone(),
            resource_type: self.resource_type.clone(),
            modified: None,
            attrs: self.attrs.clone(),
        }
    }
}

impl From<Resource> for ResourceState {
    fn from(resource: Resource) -> Self {
        Self {
            id: id_string(resource.id),
            name: resource.name,
            resource_type: resource.resource_type,
            parent_id: id_string(resource.parent_id),
            slug: resource.slug,
            modified: resource.modified,
            attrs: resource.attrs,
        }
    }
}

/// An IPAM netblock as held in state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetblockState {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub netblock_type: Option<String>,
    pub top_aggregate: Option<String>,
    pub cidr: Option<String>,
    pub address: Option<String>,
    pub end_address: Option<String>,
    pub is_aggregate: Option<bool>,
    pub assigned: Option<bool>,
    pub sparse_allocation_id: Option<String>,
    pub is_important: Option<bool>,
    pub swipped: Option<bool>,
    pub last_update_time: Option<String>,
    pub lir_id: Option<String>,
    pub mask: Option<i64>,
    pub netmask: Option<String>,
    pub asn: Option<String>,
    pub allow_sub_assignments: Option<bool>,
    pub child1: Option<String>,
    pub child2: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub description: Option<String>,
    pub parent: Option<String>,
    pub rir: Option<String>,
    pub notes: Option<String>,
    pub generic_code: Option<String>,
    pub assign_time: Option<String>,
    pub swip_time: Option<String>,
    pub net_handle: Option<String>,
    pub customer_handle: Option<String>,
    pub vlan_id: Option<String>,
    pub org_id: Option<String>,
    pub region: Option<String>,
    pub region_id: Option<String>,
    pub rule_id: Option<String>,
    pub reserved_time: Option<String>,
    pub reserved_by: Option<String>,
    pub dhcp_resource_id: Option<String>,
    pub cmnetblock_resource_id: Option<String>,
    pub umbrella_resource_id: Option<String>,
    pub meta1: Option<String>,
    pub meta2: Option<String>,
    pub meta3: Option<String>,
    pub meta4: Option<String>,
    pub meta5: Option<String>,
    pub meta6: Option<String>,
    pub meta7: Option<String>,
    pub meta8: Option<String>,
    pub meta9: Option<String>,
    pub meta10: Option<String>,
    pub nat: Option<String>,
    pub host_count: Option<String>,
    pub region_name: Option<String>,
    #[serde(default)]
    pub range: Vec<String>,
    pub tags: Option<Vec<String>>,
    pub utilization_status: Option<String>,
}

impl NetblockState {
    /// The `meta1`..`meta10` slots as sent to ProVision
    pub fn meta(&self) -> NetblockMeta {
        NetblockMeta {
            meta1: self.meta1.clone(),
            meta2: self.meta2.clone(),
            meta3: self.meta3.clone(),
            meta4: self.meta4.clone(),
            meta5: self.meta5.clone(),
            meta6: self.meta6.clone(),
            meta7: self.meta7.clone(),
            meta8: self.meta8.clone(),
            meta9: self.meta9.clone(),
            meta10: self.meta10.clone(),
        }
    }
}

impl From<Netblock> for NetblockState {
    fn from(netblock: Netblock) -> Self {
        let meta = netblock.meta;
        Self {
            id: id_string(netblock.id),
            netblock_type: netblock.netblock_type,
            top_aggregate: id_string(netblock.top_aggregate),
            cidr: netblock.cidr,
            address: netblock.address,
            end_address: netblock.end_address,
            is_aggregate: netblock.is_aggregate,
            assigned: netblock.assigned,
            sparse_allocation_id: id_string(netblock.sparse_allocation_id),
            is_important: netblock.is_important,
            swipped: netblock.swipped,
            last_update_time: netblock.last_update_time,
            lir_id: id_string(netblock.lir_id),
            mask: netblock.mask,
            netmask: netblock.netmask,
            asn: id_string(netblock.asn),
            allow_sub_assignments: netblock.allow_sub_assignments,
            child1: id_string(netblock.child1),
            child2: id_string(netblock.child2),
            resource_id: id_string(netblock.resource_id),
            resource_name: netblock.resource_name,
            description: netblock.description,
            parent: id_string(netblock.parent),
            rir: netblock.rir,
            notes: netblock.notes,
            generic_code: netblock.generic_code,
            assign_time: netblock.assign_time,
            swip_time: netblock.swip_time,
            net_handle: netblock.net_handle,
            customer_handle: netblock.customer_handle,
            vlan_id: id_string(netblock.vlan_id),
            org_id: id_string(netblock.org_id),
            region: netblock.region,
            region_id: id_string(netblock.region_id),
            rule_id: id_string(netblock.rule_id),
            reserved_time: netblock.reserved_time,
            reserved_by: id_string(netblock.reserved_by),
            dhcp_resource_id: id_string(netblock.dhcp_resource_id),
            cmnetblock_resource_id: id_string(netblock.cmnetblock_resource_id),
            umbrella_resource_id: id_string(netblock.umbrella_resource_id),
            meta1: meta.meta1,
            meta2: meta.meta2,
            meta3: meta.meta3,
            meta4: meta.meta4,
            meta5: meta.meta5,
            meta6: meta.meta6,
            meta7: meta.meta7,
            meta8: meta.meta8,
            meta9: meta.meta9,
            meta10: meta.meta10,
            nat: netblock.nat,
            host_count: netblock.host_count,
            region_name: netblock.region_name,
            range: netblock.range,
            tags: Some(netblock.tags),
            utilization_status: netblock.utilization_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_state_uses_schema_names() {
        let state = ResourceState::from(Resource {
            id: Some(PvId::from("12")),
            parent_id: Some(PvId::from("1")),
            name: "edge-01".to_string(),
            slug: Some("edge-01".to_string()),
            resource_type: "entry".to_string(),
            modified: Some("2024-05-01 10:00:00".to_string()),
            attrs: None,
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["id"], "12");
        assert_eq!(json["type"], "entry");
        assert_eq!(json["parent_id"], "1");
        assert!(json["attrs"].is_null());
    }

    #[test]
    fn test_resource_to_remote_keeps_tri_state_slug() {
        let unset = ResourceState { name: "a".to_string(), ..Default::default() };
        assert_eq!(unset.to_remote().slug, None);

        let empty = ResourceState { slug: Some(String::new()), ..unset.clone() };
        assert_eq!(empty.to_remote().slug, Some(String::new()));
    }

    #[test]
    fn test_netblock_state_flattens_meta_and_ids() {
        let netblock = Netblock {
            id: Some(PvId::from("812")),
            vlan_id: Some(PvId::from("30")),
            mask: Some(24),
            meta: NetblockMeta { meta4: Some("rack-7".to_string()), ..Default::default() },
            tags: vec!["prod".to_string()],
            ..Default::default()
        };
        let state = NetblockState::from(netblock);
        assert_eq!(state.id.as_deref(), Some("812"));
        assert_eq!(state.vlan_id.as_deref(), Some("30"));
        assert_eq!(state.meta4.as_deref(), Some("rack-7"));
        assert_eq!(state.meta().meta4.as_deref(), Some("rack-7"));
        assert_eq!(state.tags, Some(vec!["prod".to_string()]));
    }
}
