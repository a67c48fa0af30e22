//! Provider registry
//!
//! Owns the configured ProVision client and routes host requests to the resource or
//! data source registered under the request's type name.

use crate::config::{ProviderConfig, ProviderConfigInput};
use crate::data_sources::{DhcpPush, DhcpPushStatus, DnsPush, DnsPushStatus, FirstAvailableIp, Netblocks, Resources};
use crate::error::ProviderError;
use crate::host::{DynamicDataSource, DynamicResource, HostRequest, HostResponse, Kind, Operation};
use crate::resources::{DnsRecordResource, DnsZoneResource, PvResource, SmartAssignResource};
use provision_client::ProVisionClientTrait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub const PROVIDER_TYPE_NAME: &str = "provision6connect";

pub struct Provider {
    client: Arc<dyn ProVisionClientTrait>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl Provider {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self { client }
    }

    /// Resolve connection parameters and build the HTTP client.
    ///
    /// Every missing parameter is reported; nothing is sent to ProVision.
    pub fn configure<F>(input: &ProviderConfigInput, env: F) -> Result<Self, Vec<ProviderError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ProviderConfig::resolve(input, env)?;
        info!("Configuring 6connect ProVision client for {}", config.host);

        let client = config
            .build_client()
            .map_err(|e| vec![ProviderError::upstream("Unable to Create 6connect ProVision Client", e)])?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn resources(&self) -> Vec<Box<dyn DynamicResource>> {
        vec![
            Box::new(PvResource::new(Arc::clone(&self.client))),
            Box::new(DnsZoneResource::new(Arc::clone(&self.client))),
            Box::new(DnsRecordResource::new(Arc::clone(&self.client))),
            Box::new(SmartAssignResource::new(Arc::clone(&self.client))),
        ]
    }

    pub fn data_sources(&self) -> Vec<Box<dyn DynamicDataSource>> {
        vec![
            Box::new(Resources::new(Arc::clone(&self.client))),
            Box::new(Netblocks::new(Arc::clone(&self.client))),
            Box::new(FirstAvailableIp::new(Arc::clone(&self.client))),
            Box::new(DnsPush::new(Arc::clone(&self.client))),
            Box::new(DnsPushStatus::new(Arc::clone(&self.client))),
            Box::new(DhcpPush::new(Arc::clone(&self.client))),
            Box::new(DhcpPushStatus::new(Arc::clone(&self.client))),
        ]
    }

    /// Run one request against an already configured provider
    pub async fn handle(&self, request: HostRequest) -> HostResponse {
        debug!("{} {} {}", request.operation, request.kind.as_str(), request.type_name);

        let suffix = request
            .type_name
            .strip_prefix(PROVIDER_TYPE_NAME)
            .and_then(|rest| rest.strip_prefix('_'));

        match request.kind {
            Kind::Resource => {
                let resources = self.resources();
                match suffix.and_then(|s| resources.iter().find(|r| r.type_suffix() == s)) {
                    Some(resource) => {
                        resource
                            .call(request.operation, request.payload, request.prior_state)
                            .await
                    }
                    None => HostResponse::failed(unchanged_state(&request), &unknown_type(&request)),
                }
            }
            Kind::DataSource => {
                let data_sources = self.data_sources();
                match suffix.and_then(|s| data_sources.iter().find(|d| d.type_suffix() == s)) {
                    Some(data_source) => data_source.call(request.operation, request.payload).await,
                    None => HostResponse::failed(None, &unknown_type(&request)),
                }
            }
        }
    }
}

fn unknown_type(request: &HostRequest) -> ProviderError {
    ProviderError::UnknownType {
        kind: request.kind.as_str(),
        type_name: request.type_name.clone(),
    }
}

/// State the host keeps when the request fails before reaching a resource
fn unchanged_state(request: &HostRequest) -> Option<Value> {
    match (request.kind, request.operation) {
        (Kind::DataSource, _) | (_, Operation::Create | Operation::Import) => None,
        (Kind::Resource, Operation::Update) => request
            .prior_state
            .clone()
            .or_else(|| Some(request.payload.clone())),
        (Kind::Resource, Operation::Read | Operation::Delete) => Some(request.payload.clone()),
    }
}

/// Configure the provider from the request's provider block and run the request.
pub async fn serve<F>(request: HostRequest, env: F) -> HostResponse
where
    F: Fn(&str) -> Option<String>,
{
    match Provider::configure(&request.provider, env) {
        Ok(provider) => provider.handle(request).await,
        Err(errors) => HostResponse::failed_all(unchanged_state(&request), &errors),
    }
}
