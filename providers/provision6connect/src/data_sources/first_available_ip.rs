//! `provision6connect_firstavailableip`: next free address in a netblock

use crate::error::ProviderError;
use crate::host::DataSource;
use crate::selector::{self, NetblockLookup};
use provision_client::ProVisionClientTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstAvailableIpState {
    #[serde(default)]
    pub netblock_id: Option<String>,
    #[serde(default)]
    pub netblock_cidr: Option<String>,
    #[serde(default)]
    pub firstavailableip: Option<String>,
}

#[derive(Clone)]
pub struct FirstAvailableIp {
    client: Arc<dyn ProVisionClientTrait>,
}

impl FirstAvailableIp {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl DataSource for FirstAvailableIp {
    type Config = FirstAvailableIpState;
    type State = FirstAvailableIpState;

    fn type_suffix(&self) -> &'static str {
        "firstavailableip"
    }

    async fn read(&self, config: FirstAvailableIpState) -> Result<FirstAvailableIpState, ProviderError> {
        let lookup = selector::resolve(&[
            (NetblockLookup::Id, config.netblock_id.as_deref()),
            (NetblockLookup::Cidr, config.netblock_cidr.as_deref()),
        ])?;

        let address = self
            .client
            .get_first_available(&lookup.id)
            .await
            .map_err(|e| ProviderError::upstream("Unable to Read ProVision FirstAvailableIP", e))?;
        info!("First available address in {} is {}", lookup.id, address);

        Ok(FirstAvailableIpState {
            firstavailableip: Some(address),
            ..config
        })
    }
}
