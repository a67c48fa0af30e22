//! `provision6connect_dnszone`: a DNS zone
//!
//! SOA attributes are optional; when left unset ProVision fills in its defaults
//! and the values come back as computed state.

use crate::error::ProviderError;
use crate::host::Resource;
use crate::models::id_string;
use provision_client::{DnsZone, ProVisionClientTrait, PvId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZoneState {
    pub id: Option<String>,
    pub name: String,
    pub parent_id: Option<String>,
    pub group_id: Option<String>,
    pub modified: Option<String>,
    pub status: Option<String>,
    pub zone_type: Option<String>,
    pub zone_host: Option<String>,
    pub zone_mail: Option<String>,
    pub zone_expire: Option<i64>,
    pub zone_minimum: Option<i64>,
    pub zone_refresh: Option<i64>,
    pub zone_retry: Option<i64>,
    pub zone_serial: Option<i64>,
    pub zone_ttl: Option<i64>,
}

impl DnsZoneState {
    /// Write body; `modified` and `status` are owned by ProVision and never sent
    pub(crate) fn to_remote(&self) -> DnsZone {
        DnsZone {
            id: self.id.clone().map(PvId::from),
            parent_id: self.parent_id.clone().map(PvId::from),
            group_id: self.group_id.clone().map(PvId::from),
            name: self.name.clone(),
            modified: None,
            status: None,
            zone_type: self.zone_type.clone(),
            zone_host: self.zone_host.clone(),
            zone_mail: self.zone_mail.clone(),
            zone_expire: self.zone_expire,
            zone_minimum: self.zone_minimum,
            zone_refresh: self.zone_refresh,
            zone_retry: self.zone_retry,
            zone_serial: self.zone_serial,
            zone_ttl: self.zone_ttl,
        }
    }

    /// ProVision does not always echo `group_id`; keep the known one when it is absent.
    fn from_remote(zone: DnsZone, prior: &DnsZoneState) -> Self {
        Self {
            id: id_string(zone.id),
            name: zone.name,
            parent_id: id_string(zone.parent_id),
            group_id: id_string(zone.group_id).or_else(|| prior.group_id.clone()),
            modified: zone.modified,
            status: zone.status,
            zone_type: zone.zone_type,
            zone_host: zone.zone_host,
            zone_mail: zone.zone_mail,
            zone_expire: zone.zone_expire,
            zone_minimum: zone.zone_minimum,
            zone_refresh: zone.zone_refresh,
            zone_retry: zone.zone_retry,
            zone_serial: zone.zone_serial,
            zone_ttl: zone.zone_ttl,
        }
    }
}

#[derive(Clone)]
pub struct DnsZoneResource {
    client: Arc<dyn ProVisionClientTrait>,
}

impl DnsZoneResource {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

fn require_id(state: &DnsZoneState) -> Result<&str, ProviderError> {
    state
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ProviderError::MissingAttribute("id"))
}

#[async_trait::async_trait]
impl Resource for DnsZoneResource {
    type State = DnsZoneState;

    fn type_suffix(&self) -> &'static str {
        "dnszone"
    }

    async fn create(&self, plan: DnsZoneState) -> Result<DnsZoneState, ProviderError> {
        info!("Creating DNS Zone {}", plan.name);
        let zone = self
            .client
            .add_zone(&plan.to_remote())
            .await
            .map_err(|e| ProviderError::upstream("Could not create ProVision DNS Zone", e))?;
        Ok(DnsZoneState::from_remote(zone, &plan))
    }

    async fn read(&self, state: DnsZoneState) -> Result<DnsZoneState, ProviderError> {
        let id = require_id(&state)?;
        let zones = self
            .client
            .get_zone_by_id(id)
            .await
            .map_err(|e| ProviderError::upstream(format!("Could not read ProVision DNS Zone ID {}", id), e))?;

        let zone = zones
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(format!("ProVision DNS Zone has not been found ID {}", id)))?;
        Ok(DnsZoneState::from_remote(zone, &state))
    }

    async fn update(&self, plan: DnsZoneState) -> Result<DnsZoneState, ProviderError> {
        info!("Updating DNS Zone ID {}", require_id(&plan)?);
        let zone = self
            .client
            .update_zone(&plan.to_remote())
            .await
            .map_err(|e| ProviderError::upstream("Could not update ProVision DNS Zone", e))?;
        Ok(DnsZoneState::from_remote(zone, &plan))
    }

    async fn delete(&self, state: DnsZoneState) -> Result<(), ProviderError> {
        let id = require_id(&state)?;
        self.client
            .delete_zone_by_id(id)
            .await
            .map_err(|e| ProviderError::upstream("Could not delete ProVision DNS Zone", e))
    }

    fn import(&self, id: &str) -> Result<DnsZoneState, ProviderError> {
        Ok(DnsZoneState {
            id: Some(id.to_string()),
            ..Default::default()
        })
    }
}
