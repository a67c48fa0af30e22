//! `provision6connect_netblocks`: search IPAM netblocks

use crate::error::ProviderError;
use crate::host::DataSource;
use crate::models::NetblockState;
use provision_client::ProVisionClientTrait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetblocksConfig {
    #[serde(default)]
    pub search: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetblocksState {
    pub search: BTreeMap<String, String>,
    pub netblocks: Vec<NetblockState>,
}

#[derive(Clone)]
pub struct Netblocks {
    client: Arc<dyn ProVisionClientTrait>,
}

impl Netblocks {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl DataSource for Netblocks {
    type Config = NetblocksConfig;
    type State = NetblocksState;

    fn type_suffix(&self) -> &'static str {
        "netblocks"
    }

    async fn read(&self, config: NetblocksConfig) -> Result<NetblocksState, ProviderError> {
        let netblocks = self
            .client
            .get_netblocks(&config.search)
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read ProVision Netblocks", e))?;

        Ok(NetblocksState {
            search: config.search,
            netblocks: netblocks.into_iter().map(NetblockState::from).collect(),
        })
    }
}
