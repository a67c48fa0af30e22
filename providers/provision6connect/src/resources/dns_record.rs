//! `provision6connect_dnsrecord`: a record inside a DNS zone

use crate::error::ProviderError;
use crate::host::Resource;
use crate::models::id_string;
use provision_client::{DnsRecord, ProVisionClientTrait, PvId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Import identifier shape
const IMPORT_ID_FORMAT: &str = "<zone_id>/<record_id>";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordState {
    pub id: Option<String>,
    pub zone_id: String,
    pub name: String,
    pub modified: Option<String>,
    pub status: Option<String>,
    pub record_type: String,
    pub record_host: String,
    pub record_value: String,
    pub record_ttl: i64,
}

impl DnsRecordState {
    fn to_remote(&self) -> DnsRecord {
        DnsRecord {
            id: self.id.clone().map(PvId::from),
            parent_id: Some(PvId::from(self.zone_id.as_str())),
            name: self.name.clone(),
            modified: None,
            status: None,
            record_type: self.record_type.clone(),
            record_host: self.record_host.clone(),
            record_value: self.record_value.clone(),
            record_ttl: Some(self.record_ttl),
        }
    }

    fn from_remote(record: DnsRecord, prior: &DnsRecordState) -> Self {
        Self {
            id: id_string(record.id),
            zone_id: id_string(record.parent_id).unwrap_or_else(|| prior.zone_id.clone()),
            name: if record.name.is_empty() {
                prior.name.clone()
            } else {
                record.name
            },
            modified: record.modified,
            status: record.status,
            record_type: record.record_type,
            record_host: record.record_host,
            record_value: record.record_value,
            record_ttl: record.record_ttl.unwrap_or(prior.record_ttl),
        }
    }

    fn ids(&self) -> Result<(&str, &str), ProviderError> {
        if self.zone_id.is_empty() {
            return Err(ProviderError::MissingAttribute("zone_id"));
        }
        let id = self
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ProviderError::MissingAttribute("id"))?;
        Ok((&self.zone_id, id))
    }
}

#[derive(Clone)]
pub struct DnsRecordResource {
    client: Arc<dyn ProVisionClientTrait>,
}

impl DnsRecordResource {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Resource for DnsRecordResource {
    type State = DnsRecordState;

    fn type_suffix(&self) -> &'static str {
        "dnsrecord"
    }

    async fn create(&self, plan: DnsRecordState) -> Result<DnsRecordState, ProviderError> {
        if plan.zone_id.is_empty() {
            return Err(ProviderError::MissingAttribute("zone_id"));
        }
        info!("Creating DNS Record {} in zone {}", plan.record_host, plan.zone_id);
        let record = self
            .client
            .add_zone_record(&plan.to_remote())
            .await
            .map_err(|e| ProviderError::upstream("Could not create ProVision DNS Record", e))?;
        Ok(DnsRecordState::from_remote(record, &plan))
    }

    async fn read(&self, state: DnsRecordState) -> Result<DnsRecordState, ProviderError> {
        let (zone_id, id) = state.ids()?;
        let filters = BTreeMap::from([
            ("id".to_string(), id.to_string()),
            ("load_attributes".to_string(), "1".to_string()),
        ]);

        let records = self
            .client
            .get_zone_records(zone_id, &filters)
            .await
            .map_err(|e| ProviderError::upstream(format!("Could not read ProVision DNS Record ID {}", id), e))?;

        let record = records.into_iter().next().ok_or_else(|| {
            ProviderError::NotFound(format!(
                "ProVision DNS Record has not been found ID {} in zone {}",
                id, zone_id
            ))
        })?;
        Ok(DnsRecordState::from_remote(record, &state))
    }

    async fn update(&self, plan: DnsRecordState) -> Result<DnsRecordState, ProviderError> {
        let (_, id) = plan.ids()?;
        info!("Updating DNS Record ID {}", id);
        let record = self
            .client
            .update_zone_record(&plan.to_remote())
            .await
            .map_err(|e| ProviderError::upstream("Could not update ProVision DNS Record", e))?;
        Ok(DnsRecordState::from_remote(record, &plan))
    }

    async fn delete(&self, state: DnsRecordState) -> Result<(), ProviderError> {
        let (zone_id, id) = state.ids()?;
        self.client
            .delete_zone_record_by_id(zone_id, id)
            .await
            .map_err(|e| ProviderError::upstream("Could not delete ProVision DNS Record", e))
    }

    fn import(&self, id: &str) -> Result<DnsRecordState, ProviderError> {
        match id.split_once('/') {
            Some((zone_id, record_id))
                if !zone_id.is_empty() && !record_id.is_empty() && !record_id.contains('/') =>
            {
                Ok(DnsRecordState {
                    id: Some(record_id.to_string()),
                    zone_id: zone_id.to_string(),
                    ..Default::default()
                })
            }
            _ => Err(ProviderError::InvalidImportId {
                id: id.to_string(),
                expected: IMPORT_ID_FORMAT,
            }),
        }
    }
}
