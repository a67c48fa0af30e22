//! `provision6connect_smartassign`: a netblock carved out by ProVision's SmartAssign
//!
//! Create asks ProVision to pick a free block matching type, RIR and mask and assign
//! it to `resource_id`. Destroy unassigns the block straight back to the pool, skipping
//! the holding tank.

use crate::error::ProviderError;
use crate::host::Resource;
use crate::models::NetblockState;
use provision_client::{NetblockUpdate, ProVisionClientTrait, ProVisionError, PvId, SmartAssignRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartAssignState {
    #[serde(flatten)]
    pub netblock: NetblockState,
    /// Only used when requesting the block; ProVision never reports it back
    pub assigned_resource_id: Option<String>,
}

impl SmartAssignState {
    fn request(&self) -> Result<SmartAssignRequest, ProviderError> {
        let netblock = &self.netblock;
        let netblock_type = netblock.netblock_type.clone().ok_or(ProviderError::MissingAttribute("type"))?;
        let mask = netblock.mask.ok_or(ProviderError::MissingAttribute("mask"))?;
        let resource_id = netblock
            .resource_id
            .clone()
            .ok_or(ProviderError::MissingAttribute("resource_id"))?;
        let rir = netblock.rir.clone().ok_or(ProviderError::MissingAttribute("rir"))?;

        Ok(SmartAssignRequest {
            resource_id: PvId::from(resource_id),
            netblock_type,
            rir,
            mask,
            top_aggregate: netblock.top_aggregate.clone(),
            assigned_resource_id: self.assigned_resource_id.clone(),
            vlan: netblock.vlan_id.clone(),
            region_id: netblock.region_id.clone(),
            tags: netblock.tags.as_ref().filter(|t| !t.is_empty()).map(|t| t.join(",")),
            meta: netblock.meta(),
        })
    }

    fn update(&self, id: &str) -> NetblockUpdate {
        let netblock = &self.netblock;
        NetblockUpdate {
            id: PvId::from(id),
            allow_sub_assignments: netblock.allow_sub_assignments,
            rir: netblock.rir.clone(),
            vlan_id: netblock.vlan_id.clone().map(PvId::from),
            rule_id: netblock.rule_id.clone().map(PvId::from),
            asn: netblock.asn.clone().map(PvId::from),
            region_id: netblock.region_id.clone().map(PvId::from),
            lir_id: netblock.lir_id.clone().map(PvId::from),
            meta: netblock.meta(),
        }
    }

    fn id(&self) -> Result<&str, ProviderError> {
        self.netblock
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ProviderError::MissingAttribute("id"))
    }

    fn with_remote(&self, netblock: NetblockState) -> Self {
        Self {
            netblock,
            assigned_resource_id: self.assigned_resource_id.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SmartAssignResource {
    client: Arc<dyn ProVisionClientTrait>,
}

impl SmartAssignResource {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Resource for SmartAssignResource {
    type State = SmartAssignState;

    fn type_suffix(&self) -> &'static str {
        "smartassign"
    }

    async fn create(&self, plan: SmartAssignState) -> Result<SmartAssignState, ProviderError> {
        let request = plan.request()?;
        info!("Executing SmartAssign Request for resource {}", request.resource_id);
        let netblock = self
            .client
            .smart_assign(&request)
            .await
            .map_err(|e| ProviderError::upstream("Could not SmartAssign a netblock", e))?;
        info!("SmartAssign returned netblock {:?}", netblock.cidr);
        Ok(plan.with_remote(NetblockState::from(netblock)))
    }

    async fn read(&self, state: SmartAssignState) -> Result<SmartAssignState, ProviderError> {
        let id = state.id()?;
        let netblock = self
            .client
            .get_netblock_by_id(id)
            .await
            .map_err(|e| ProviderError::upstream(format!("Could not read ProVision Netblock ID {}", id), e))?;
        Ok(state.with_remote(NetblockState::from(netblock)))
    }

    async fn update(&self, plan: SmartAssignState) -> Result<SmartAssignState, ProviderError> {
        let id = plan.id()?;
        info!("Updating Netblock ID {}", id);
        let netblock = self
            .client
            .update_netblock(&plan.update(id))
            .await
            .map_err(|e| ProviderError::upstream("Could not update ProVision Netblock", e))?;
        Ok(plan.with_remote(NetblockState::from(netblock)))
    }

    async fn delete(&self, state: SmartAssignState) -> Result<(), ProviderError> {
        let id = state.id()?;
        info!("Unassigning Netblock ID {}", id);
        let response = self
            .client
            .unassign_netblock_by_id(id, true)
            .await
            .map_err(|e| ProviderError::upstream("Could not unassign ProVision Netblock", e))?;

        if response.success == Some(false) {
            let message = response.message.unwrap_or_else(|| "unassign was rejected".to_string());
            return Err(ProviderError::upstream(
                "Could not unassign ProVision Netblock",
                ProVisionError::Api(message),
            ));
        }
        Ok(())
    }
}
