//! IPAM operations for MockProVisionClient
//!
//! Handles netblocks, smart assign, unassign and first-available lookups

use super::helpers::{lock, matches, timestamp};
use super::MockProVisionClient;
use crate::error::ProVisionError;
use crate::models::*;
use std::collections::BTreeMap;

fn flag(value: Option<bool>) -> Option<&'static str> {
    value.map(|v| if v { "1" } else { "0" })
}

pub async fn get_netblocks(client: &MockProVisionClient, filters: &BTreeMap<String, String>) -> Result<Vec<Netblock>, ProVisionError> {
    Ok(lock(&client.netblocks)
        .values()
        .filter(|n| matches(filters, "id", n.id.as_ref().map(PvId::as_str)))
        .filter(|n| matches(filters, "cidr", n.cidr.as_deref()))
        .filter(|n| matches(filters, "type", n.netblock_type.as_deref()))
        .filter(|n| matches(filters, "rir", n.rir.as_deref()))
        .filter(|n| matches(filters, "resource_id", n.resource_id.as_ref().map(PvId::as_str)))
        .filter(|n| matches(filters, "assigned", flag(n.assigned)))
        .cloned()
        .collect())
}

pub async fn get_netblock_by_id(client: &MockProVisionClient, id: &str) -> Result<Netblock, ProVisionError> {
    lock(&client.netblocks)
        .get(id)
        .cloned()
        .ok_or_else(|| ProVisionError::NotFound(format!("Netblock {} not found", id)))
}

pub async fn update_netblock(client: &MockProVisionClient, update: &NetblockUpdate) -> Result<Netblock, ProVisionError> {
    let mut netblocks = lock(&client.netblocks);
    let existing = netblocks
        .get_mut(update.id.as_str())
        .ok_or_else(|| ProVisionError::NotFound(format!("Netblock {} not found", update.id)))?;

    existing.allow_sub_assignments = update.allow_sub_assignments.or(existing.allow_sub_assignments);
    existing.rir = update.rir.clone().or(existing.rir.take());
    existing.vlan_id = update.vlan_id.clone().or(existing.vlan_id.take());
    existing.rule_id = update.rule_id.clone().or(existing.rule_id.take());
    existing.asn = update.asn.clone().or(existing.asn.take());
    existing.region_id = update.region_id.clone().or(existing.region_id.take());
    existing.lir_id = update.lir_id.clone().or(existing.lir_id.take());
    let meta = &mut existing.meta;
    for (slot, value) in [
        (&mut meta.meta1, &update.meta.meta1),
        (&mut meta.meta2, &update.meta.meta2),
        (&mut meta.meta3, &update.meta.meta3),
        (&mut meta.meta4, &update.meta.meta4),
        (&mut meta.meta5, &update.meta.meta5),
        (&mut meta.meta6, &update.meta.meta6),
        (&mut meta.meta7, &update.meta.meta7),
        (&mut meta.meta8, &update.meta.meta8),
        (&mut meta.meta9, &update.meta.meta9),
        (&mut meta.meta10, &update.meta.meta10),
    ] {
        if value.is_some() {
            *slot = value.clone();
        }
    }
    existing.last_update_time = Some(timestamp());
    Ok(existing.clone())
}

pub async fn smart_assign(client: &MockProVisionClient, request: &SmartAssignRequest) -> Netblock {
    let id = client.next_id();
    let address = format!("10.{}.{}.0", (id / 256) % 256, id % 256);
    let netblock = Netblock {
        id: Some(PvId::from(id)),
        netblock_type: Some(request.netblock_type.clone()),
        top_aggregate: request.top_aggregate.clone().map(PvId::from),
        cidr: Some(format!("{}/{}", address, request.mask)),
        address: Some(address),
        is_aggregate: Some(false),
        assigned: Some(true),
        mask: Some(request.mask),
        allow_sub_assignments: Some(false),
        resource_id: Some(request.resource_id.clone()),
        rir: Some(request.rir.clone()),
        assign_time: Some(timestamp()),
        vlan_id: request.vlan.clone().map(PvId::from),
        region_id: request.region_id.clone().map(PvId::from),
        meta: request.meta.clone(),
        tags: request
            .tags
            .as_deref()
            .map(|t| t.split(',').filter(|t| !t.is_empty()).map(str::to_string).collect())
            .unwrap_or_default(),
        ..Default::default()
    };
    lock(&client.netblocks).insert(id.to_string(), netblock.clone());
    netblock
}

pub async fn unassign_netblock_by_id(client: &MockProVisionClient, id: &str, skip_holding: bool) -> Result<UnassignResponse, ProVisionError> {
    let mut netblocks = lock(&client.netblocks);
    let existing = netblocks
        .get_mut(id)
        .ok_or_else(|| ProVisionError::NotFound(format!("Netblock {} not found", id)))?;

    existing.assigned = Some(false);
    existing.resource_id = None;
    existing.assign_time = None;
    existing.reserved_time = if skip_holding { None } else { Some(timestamp()) };
    Ok(UnassignResponse {
        success: Some(true),
        message: Some(format!("Netblock {} unassigned", id)),
    })
}

pub async fn get_first_available(client: &MockProVisionClient, search: &str) -> Result<String, ProVisionError> {
    lock(&client.first_available)
        .get(search)
        .cloned()
        .ok_or_else(|| ProVisionError::NotFound(format!("No available address in {}", search)))
}
