//! Host adapter
//!
//! Stands in for the Terraform plugin protocol: one JSON [`HostRequest`] in, one
//! JSON [`HostResponse`] out. Resources and data sources are written against the
//! typed [`Resource`] and [`DataSource`] traits; the blanket impls here erase the
//! state types so the provider can keep them in one registry.
//!
//! Failure semantics:
//! - create: no state on failure
//! - read, update, delete: the prior state is returned unchanged on failure
//! - delete: no state on success
//! - import: the imported id is read back; no state on failure

use crate::config::ProviderConfigInput;
use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error};

/// Whether a request targets a resource or a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Resource,
    DataSource,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Resource => "resource",
            Kind::DataSource => "data source",
        }
    }
}

/// Operation requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation requested by the host
///
/// `payload` is the plan for create and update, the current state for read and
/// delete, the data source configuration for data source reads, and
/// `{"id": "..."}` for import. `prior_state` carries the state before an update.
#[derive(Debug, Clone, Deserialize)]
pub struct HostRequest {
    #[serde(default)]
    pub provider: ProviderConfigInput,
    pub type_name: String,
    pub kind: Kind,
    pub operation: Operation,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub prior_state: Option<Value>,
}

/// Result of one operation: the new state (if any) and its diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostResponse {
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl HostResponse {
    pub fn ok(state: Option<Value>) -> Self {
        Self {
            state,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Failed operation returning `state` alongside the error
    pub fn failed(state: Option<Value>, err: &ProviderError) -> Self {
        error!("{}", err);
        Self {
            state,
            diagnostics: err.to_diagnostic().into(),
        }
    }

    /// Failed operation returning several errors
    pub fn failed_all(state: Option<Value>, errors: &[ProviderError]) -> Self {
        for err in errors {
            error!("{}", err);
        }
        Self {
            state,
            diagnostics: errors.iter().map(ProviderError::to_diagnostic).collect(),
        }
    }
}

/// A managed resource with a typed state model
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    type State: Serialize + DeserializeOwned + Send + Sync;

    /// Type name suffix, e.g. `dnszone`
    fn type_suffix(&self) -> &'static str;

    async fn create(&self, plan: Self::State) -> Result<Self::State, ProviderError>;
    async fn read(&self, state: Self::State) -> Result<Self::State, ProviderError>;
    async fn update(&self, plan: Self::State) -> Result<Self::State, ProviderError>;
    async fn delete(&self, state: Self::State) -> Result<(), ProviderError>;

    /// Seed state from an import identifier; the host then reads it back
    fn import(&self, id: &str) -> Result<Self::State, ProviderError> {
        let _ = id;
        Err(ProviderError::UnsupportedOperation {
            type_name: Resource::type_suffix(self).to_string(),
            operation: "import",
        })
    }
}

/// A read-only data source with typed configuration and state
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    type Config: DeserializeOwned + Send;
    type State: Serialize + Send;

    fn type_suffix(&self) -> &'static str;

    async fn read(&self, config: Self::Config) -> Result<Self::State, ProviderError>;
}

/// Type-erased [`Resource`]
#[async_trait::async_trait]
pub trait DynamicResource: Send + Sync {
    fn type_suffix(&self) -> &'static str;
    async fn call(&self, operation: Operation, payload: Value, prior_state: Option<Value>) -> HostResponse;
}

/// Type-erased [`DataSource`]
#[async_trait::async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn type_suffix(&self) -> &'static str;
    async fn call(&self, operation: Operation, payload: Value) -> HostResponse;
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ProviderError> {
    Ok(serde_json::from_value(payload)?)
}

fn encode<T: Serialize>(state: &T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(state)?)
}

fn import_id(payload: &Value) -> Result<&str, ProviderError> {
    payload
        .get("id")
        .and_then(Value::as_str)
        .ok_or(ProviderError::MissingAttribute("id"))
}

#[async_trait::async_trait]
impl<R: Resource> DynamicResource for R {
    fn type_suffix(&self) -> &'static str {
        Resource::type_suffix(self)
    }

    async fn call(&self, operation: Operation, payload: Value, prior_state: Option<Value>) -> HostResponse {
        debug!("{} {}", operation, Resource::type_suffix(self));
        match operation {
            Operation::Create => {
                let result: Result<Value, ProviderError> = async {
                    let plan = decode(payload)?;
                    encode(&self.create(plan).await?)
                }
                .await;
                match result {
                    Ok(state) => HostResponse::ok(Some(state)),
                    Err(err) => HostResponse::failed(None, &err),
                }
            }
            Operation::Read => {
                let prior = payload.clone();
                let result: Result<Value, ProviderError> = async {
                    let state = decode(payload)?;
                    encode(&self.read(state).await?)
                }
                .await;
                match result {
                    Ok(state) => HostResponse::ok(Some(state)),
                    Err(err) => HostResponse::failed(Some(prior), &err),
                }
            }
            Operation::Update => {
                let prior = prior_state.unwrap_or_else(|| payload.clone());
                let result: Result<Value, ProviderError> = async {
                    let plan = decode(payload)?;
                    encode(&self.update(plan).await?)
                }
                .await;
                match result {
                    Ok(state) => HostResponse::ok(Some(state)),
                    Err(err) => HostResponse::failed(Some(prior), &err),
                }
            }
            Operation::Delete => {
                let prior = payload.clone();
                let result: Result<(), ProviderError> = async {
                    let state = decode(payload)?;
                    self.delete(state).await
                }
                .await;
                match result {
                    Ok(()) => HostResponse::ok(None),
                    Err(err) => HostResponse::failed(Some(prior), &err),
                }
            }
            Operation::Import => {
                let result: Result<Value, ProviderError> = async {
                    let seeded = self.import(import_id(&payload)?)?;
                    encode(&self.read(seeded).await?)
                }
                .await;
                match result {
                    Ok(state) => HostResponse::ok(Some(state)),
                    Err(err) => HostResponse::failed(None, &err),
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<D: DataSource> DynamicDataSource for D {
    fn type_suffix(&self) -> &'static str {
        DataSource::type_suffix(self)
    }

    async fn call(&self, operation: Operation, payload: Value) -> HostResponse {
        debug!("{} {}", operation, DataSource::type_suffix(self));
        if operation != Operation::Read {
            let err = ProviderError::UnsupportedOperation {
                type_name: DataSource::type_suffix(self).to_string(),
                operation: operation.as_str(),
            };
            return HostResponse::failed(None, &err);
        }

        let result: Result<Value, ProviderError> = async {
            let config = decode(payload)?;
            encode(&self.read(config).await?)
        }
        .await;
        match result {
            Ok(state) => HostResponse::ok(Some(state)),
            Err(err) => HostResponse::failed(None, &err),
        }
    }
}
