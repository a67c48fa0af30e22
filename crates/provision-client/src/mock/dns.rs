//! DNS operations for MockProVisionClient
//!
//! Handles zones, records, and DNS pushes

use super::helpers::{lock, matches, timestamp};
use super::{MockProVisionClient, RecordedPush, RecordedStatusRequest};
use crate::error::ProVisionError;
use crate::models::*;
use std::collections::BTreeMap;
use std::time::Instant;

pub async fn get_zone_by_id(client: &MockProVisionClient, id: &str) -> Result<Vec<DnsZone>, ProVisionError> {
    Ok(lock(&client.zones).get(id).cloned().into_iter().collect())
}

pub async fn add_zone(client: &MockProVisionClient, zone: &DnsZone) -> Result<DnsZone, ProVisionError> {
    let id = PvId::from(client.next_id());
    // Server-side SOA defaults
    let created = DnsZone {
        id: Some(id.clone()),
        parent_id: zone.group_id.clone().or_else(|| zone.parent_id.clone()),
        modified: Some(timestamp()),
        status: zone.status.clone().or_else(|| Some("active".to_string())),
        zone_type: zone.zone_type.clone().or_else(|| Some("master".to_string())),
        zone_host: zone.zone_host.clone().or_else(|| Some(format!("ns1.{}", zone.name))),
        zone_mail: zone.zone_mail.clone().or_else(|| Some(format!("hostmaster.{}", zone.name))),
        zone_expire: zone.zone_expire.or(Some(604800)),
        zone_minimum: zone.zone_minimum.or(Some(3600)),
        zone_refresh: zone.zone_refresh.or(Some(10800)),
        zone_retry: zone.zone_retry.or(Some(3600)),
        zone_serial: zone.zone_serial.or(Some(1)),
        zone_ttl: zone.zone_ttl.or(Some(3600)),
        ..zone.clone()
    };
    lock(&client.zones).insert(id.to_string(), created.clone());
    Ok(created)
}

pub async fn update_zone(client: &MockProVisionClient, zone: &DnsZone) -> Result<DnsZone, ProVisionError> {
    let id = zone
        .id
        .as_ref()
        .ok_or_else(|| ProVisionError::InvalidRequest("DNS zone has no id".to_string()))?;
    let mut zones = lock(&client.zones);
    let existing = zones
        .get_mut(id.as_str())
        .ok_or_else(|| ProVisionError::NotFound(format!("DNS zone {} not found", id)))?;

    existing.name = zone.name.clone();
    if zone.group_id.is_some() {
        existing.group_id = zone.group_id.clone();
    }
    existing.status = zone.status.clone().or(existing.status.take());
    existing.zone_type = zone.zone_type.clone().or(existing.zone_type.take());
    existing.zone_host = zone.zone_host.clone().or(existing.zone_host.take());
    existing.zone_mail = zone.zone_mail.clone().or(existing.zone_mail.take());
    existing.zone_expire = zone.zone_expire.or(existing.zone_expire);
    existing.zone_minimum = zone.zone_minimum.or(existing.zone_minimum);
    existing.zone_refresh = zone.zone_refresh.or(existing.zone_refresh);
    existing.zone_retry = zone.zone_retry.or(existing.zone_retry);
    existing.zone_serial = zone.zone_serial.or(existing.zone_serial.map(|s| s + 1));
    existing.zone_ttl = zone.zone_ttl.or(existing.zone_ttl);
    existing.modified = Some(timestamp());
    Ok(existing.clone())
}

pub async fn delete_zone_by_id(client: &MockProVisionClient, id: &str) -> Result<(), ProVisionError> {
    lock(&client.zones)
        .remove(id)
        .ok_or_else(|| ProVisionError::NotFound(format!("DNS zone {} not found", id)))?;
    lock(&client.records).retain(|_, r| r.parent_id.as_ref().map(PvId::as_str) != Some(id));
    Ok(())
}

pub async fn get_zone_records(client: &MockProVisionClient, zone_id: &str, filters: &BTreeMap<String, String>) -> Result<Vec<DnsRecord>, ProVisionError> {
    if !lock(&client.zones).contains_key(zone_id) {
        return Err(ProVisionError::NotFound(format!("DNS zone {} not found", zone_id)));
    }
    Ok(lock(&client.records)
        .values()
        .filter(|r| r.parent_id.as_ref().map(PvId::as_str) == Some(zone_id))
        .filter(|r| matches(filters, "id", r.id.as_ref().map(PvId::as_str)))
        .filter(|r| matches(filters, "record_type", Some(&r.record_type)))
        .filter(|r| matches(filters, "record_host", Some(&r.record_host)))
        .cloned()
        .collect())
}

pub async fn add_zone_record(client: &MockProVisionClient, record: &DnsRecord) -> Result<DnsRecord, ProVisionError> {
    let zone_id = record
        .parent_id
        .as_ref()
        .ok_or_else(|| ProVisionError::InvalidRequest("DNS record zone has no id".to_string()))?;
    if !lock(&client.zones).contains_key(zone_id.as_str()) {
        return Err(ProVisionError::NotFound(format!("DNS zone {} not found", zone_id)));
    }

    let id = PvId::from(client.next_id());
    let created = DnsRecord {
        id: Some(id.clone()),
        modified: Some(timestamp()),
        status: record.status.clone().or_else(|| Some("active".to_string())),
        ..record.clone()
    };
    lock(&client.records).insert(id.to_string(), created.clone());
    Ok(created)
}

pub async fn update_zone_record(client: &MockProVisionClient, record: &DnsRecord) -> Result<DnsRecord, ProVisionError> {
    let id = record
        .id
        .as_ref()
        .ok_or_else(|| ProVisionError::InvalidRequest("DNS record has no id".to_string()))?;
    let mut records = lock(&client.records);
    let existing = records
        .get_mut(id.as_str())
        .filter(|r| r.parent_id == record.parent_id)
        .ok_or_else(|| ProVisionError::NotFound(format!("DNS record {} not found", id)))?;

    existing.name = record.name.clone();
    existing.record_type = record.record_type.clone();
    existing.record_host = record.record_host.clone();
    existing.record_value = record.record_value.clone();
    existing.record_ttl = record.record_ttl.or(existing.record_ttl);
    existing.status = record.status.clone().or(existing.status.take());
    existing.modified = Some(timestamp());
    Ok(existing.clone())
}

pub async fn delete_zone_record_by_id(client: &MockProVisionClient, zone_id: &str, id: &str) -> Result<(), ProVisionError> {
    let mut records = lock(&client.records);
    match records.get(id) {
        Some(r) if r.parent_id.as_ref().map(PvId::as_str) == Some(zone_id) => {
            records.remove(id);
            Ok(())
        }
        _ => Err(ProVisionError::NotFound(format!("DNS record {} not found in zone {}", id, zone_id))),
    }
}

pub async fn push(client: &MockProVisionClient, scope: DnsPushScope, id: &str) -> String {
    let pid = format!("dns-{}", client.next_id());
    lock(&client.pushes).push(RecordedPush {
        module: "dns",
        scope: scope.as_str(),
        id: id.to_string(),
        pid: pid.clone(),
    });
    pid
}

pub async fn push_status(client: &MockProVisionClient, scope: DnsPushScope, id: &str, pid: &str) -> Vec<PushStatusMessage> {
    lock(&client.status_requests).push(RecordedStatusRequest {
        module: "dns",
        scope: scope.as_str(),
        id: id.to_string(),
        pid: pid.to_string(),
        at: Instant::now(),
    });
    lock(&client.push_statuses).get(pid).cloned().unwrap_or_default()
}
