//! `provision6connect_resource`: a generic ProVision resource

use crate::error::ProviderError;
use crate::host::Resource;
use crate::models::ResourceState;
use provision_client::ProVisionClientTrait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Manages a ProVision resource (the object every other entity hangs off)
#[derive(Clone)]
pub struct PvResource {
    client: Arc<dyn ProVisionClientTrait>,
}

impl PvResource {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

fn require_id(state: &ResourceState) -> Result<&str, ProviderError> {
    state
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ProviderError::MissingAttribute("id"))
}

#[async_trait::async_trait]
impl Resource for PvResource {
    type State = ResourceState;

    fn type_suffix(&self) -> &'static str {
        "resource"
    }

    async fn create(&self, plan: ResourceState) -> Result<ResourceState, ProviderError> {
        info!("Creating Resource {} of type {}", plan.name, plan.resource_type);
        let created = self
            .client
            .add_resource(&plan.to_remote())
            .await
            .map_err(|e| ProviderError::upstream("Could not create ProVision Resource", e))?;

        // Attributes come back only on reads that ask for them
        Ok(ResourceState {
            attrs: plan.attrs,
            ..ResourceState::from(created)
        })
    }

    async fn read(&self, state: ResourceState) -> Result<ResourceState, ProviderError> {
        let id = require_id(&state)?;
        let filters = BTreeMap::from([
            ("id".to_string(), id.to_string()),
            ("load_attributes".to_string(), "1".to_string()),
        ]);

        let resources = self
            .client
            .get_resources(&filters)
            .await
            .map_err(|e| ProviderError::upstream(format!("Could not read ProVision Resource ID {}", id), e))?;

        let resource = resources
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(format!("ProVision Resource has not been found ID {}", id)))?;
        Ok(ResourceState::from(resource))
    }

    async fn update(&self, plan: ResourceState) -> Result<ResourceState, ProviderError> {
        let id = require_id(&plan)?;
        info!("Updating Resource ID {}", id);

        let updated = self
            .client
            .update_resource(&plan.to_remote())
            .await
            .map_err(|e| ProviderError::upstream("Could not update ProVision Resource", e))?;

        Ok(ResourceState {
            attrs: plan.attrs,
            ..ResourceState::from(updated)
        })
    }

    async fn delete(&self, state: ResourceState) -> Result<(), ProviderError> {
        let id = require_id(&state)?;
        info!("Deleting Resource ID {}", id);
        self.client
            .delete_resource_by_id(id)
            .await
            .map_err(|e| ProviderError::upstream("Could not delete ProVision Resource", e))
    }

    fn import(&self, id: &str) -> Result<ResourceState, ProviderError> {
        Ok(ResourceState {
            id: Some(id.to_string()),
            ..Default::default()
        })
    }
}
