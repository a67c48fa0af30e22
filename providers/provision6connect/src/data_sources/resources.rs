//! `provision6connect_resources`: search ProVision resources

use crate::error::ProviderError;
use crate::host::DataSource;
use crate::models::ResourceState;
use provision_client::ProVisionClientTrait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default)]
    pub search: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesState {
    pub search: BTreeMap<String, String>,
    pub resources: Vec<ResourceState>,
}

#[derive(Clone)]
pub struct Resources {
    client: Arc<dyn ProVisionClientTrait>,
}

impl Resources {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl DataSource for Resources {
    type Config = ResourcesConfig;
    type State = ResourcesState;

    fn type_suffix(&self) -> &'static str {
        "resources"
    }

    async fn read(&self, config: ResourcesConfig) -> Result<ResourcesState, ProviderError> {
        let mut search = config.search;
        search
            .entry("load_attributes".to_string())
            .or_insert_with(|| "1".to_string());
        debug!("Searching resources with {:?}", search);

        let resources = self
            .client
            .get_resources(&search)
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read ProVision Resources", e))?;

        Ok(ResourcesState {
            search,
            resources: resources.into_iter().map(ResourceState::from).collect(),
        })
    }
}
