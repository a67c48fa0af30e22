//! `provision6connect_{dns,dhcp}push` and `provision6connect_{dns,dhcp}pushstatus`
//!
//! A push is addressed by exactly one of group, server or the protocol's own
//! object (zone or pool), checked in that order.

use crate::error::ProviderError;
use crate::host::DataSource;
use crate::push::{self, PushScope, StatusMessageState};
use crate::selector::{self, Selector};
use provision_client::{DhcpPushScope, DnsPushScope, ProVisionClientTrait};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Identifier attributes shared by a push and its status lookup
pub trait PushTarget: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Scope: PushScope + 'static;

    const PUSH_SUFFIX: &'static str;
    const STATUS_SUFFIX: &'static str;

    fn target(&self) -> Result<Selector<Self::Scope>, ProviderError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsPushTarget {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub server_id: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl PushTarget for DnsPushTarget {
    type Scope = DnsPushScope;

    const PUSH_SUFFIX: &'static str = "dnspush";
    const STATUS_SUFFIX: &'static str = "dnspushstatus";

    fn target(&self) -> Result<Selector<DnsPushScope>, ProviderError> {
        selector::resolve(&[
            (DnsPushScope::Group, self.group_id.as_deref()),
            (DnsPushScope::Server, self.server_id.as_deref()),
            (DnsPushScope::Zone, self.zone_id.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpPushTarget {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub server_id: Option<String>,
    #[serde(default)]
    pub pool_id: Option<String>,
}

impl PushTarget for DhcpPushTarget {
    type Scope = DhcpPushScope;

    const PUSH_SUFFIX: &'static str = "dhcppush";
    const STATUS_SUFFIX: &'static str = "dhcppushstatus";

    fn target(&self) -> Result<Selector<DhcpPushScope>, ProviderError> {
        selector::resolve(&[
            (DhcpPushScope::Group, self.group_id.as_deref()),
            (DhcpPushScope::Server, self.server_id.as_deref()),
            (DhcpPushScope::Pool, self.pool_id.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushState<T> {
    #[serde(flatten)]
    pub target: T,
    #[serde(default)]
    pub push_pid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushStatusState<T> {
    #[serde(flatten)]
    pub target: T,
    pub push_pid: String,
    /// Milliseconds to wait before asking for the status
    #[serde(default)]
    pub delay: Option<i64>,
    #[serde(default)]
    pub status_messages: Vec<StatusMessageState>,
}

pub type DnsPushState = PushState<DnsPushTarget>;
pub type DnsPushStatusState = PushStatusState<DnsPushTarget>;
pub type DhcpPushState = PushState<DhcpPushTarget>;
pub type DhcpPushStatusState = PushStatusState<DhcpPushTarget>;

pub struct Push<T> {
    client: Arc<dyn ProVisionClientTrait>,
    _target: PhantomData<fn() -> T>,
}

impl<T> Push<T> {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self {
            client,
            _target: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<T: PushTarget> DataSource for Push<T> {
    type Config = PushState<T>;
    type State = PushState<T>;

    fn type_suffix(&self) -> &'static str {
        T::PUSH_SUFFIX
    }

    async fn read(&self, config: PushState<T>) -> Result<PushState<T>, ProviderError> {
        let target = config.target.target()?;
        let pid = push::dispatch(self.client.as_ref(), &target).await?;
        Ok(PushState {
            push_pid: Some(pid),
            ..config
        })
    }
}

pub struct PushStatus<T> {
    client: Arc<dyn ProVisionClientTrait>,
    _target: PhantomData<fn() -> T>,
}

impl<T> PushStatus<T> {
    pub fn new(client: Arc<dyn ProVisionClientTrait>) -> Self {
        Self {
            client,
            _target: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<T: PushTarget> DataSource for PushStatus<T> {
    type Config = PushStatusState<T>;
    type State = PushStatusState<T>;

    fn type_suffix(&self) -> &'static str {
        T::STATUS_SUFFIX
    }

    async fn read(&self, config: PushStatusState<T>) -> Result<PushStatusState<T>, ProviderError> {
        let target = config.target.target()?;
        let status_messages = push::poll_status(self.client.as_ref(), &target, &config.push_pid, config.delay).await?;
        Ok(PushStatusState {
            status_messages,
            ..config
        })
    }
}

pub type DnsPush = Push<DnsPushTarget>;
pub type DnsPushStatus = PushStatus<DnsPushTarget>;
pub type DhcpPush = Push<DhcpPushTarget>;
pub type DhcpPushStatus = PushStatus<DhcpPushTarget>;
