//! Identifier selection
//!
//! Push operations and the first-available-IP lookup accept several mutually
//! exclusive identifiers (`group_id`, `server_id`, `pool_id`, ...). Exactly one is
//! used: the first present in a fixed priority order. When several are present
//! the extra ones are ignored and a warning is logged.

use crate::error::ProviderError;
use provision_client::{DhcpPushScope, DnsPushScope};
use std::fmt::Debug;
use tracing::warn;

/// A kind of identifier that can be selected, named after its schema attribute
pub trait SelectorKind: Copy + Debug + Send + Sync {
    fn field_name(self) -> &'static str;
}

impl SelectorKind for DnsPushScope {
    fn field_name(self) -> &'static str {
        match self {
            DnsPushScope::Group => "group_id",
            DnsPushScope::Server => "server_id",
            DnsPushScope::Zone => "zone_id",
        }
    }
}

impl SelectorKind for DhcpPushScope {
    fn field_name(self) -> &'static str {
        match self {
            DhcpPushScope::Group => "group_id",
            DhcpPushScope::Server => "server_id",
            DhcpPushScope::Pool => "pool_id",
        }
    }
}

/// How the first-available-IP lookup identifies its netblock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetblockLookup {
    Id,
    Cidr,
}

impl SelectorKind for NetblockLookup {
    fn field_name(self) -> &'static str {
        match self {
            NetblockLookup::Id => "netblock_id",
            NetblockLookup::Cidr => "netblock_cidr",
        }
    }
}

/// The chosen identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector<K> {
    pub kind: K,
    pub id: String,
}

/// Pick the first present identifier from `candidates`, which are in priority order.
pub fn resolve<K: SelectorKind>(candidates: &[(K, Option<&str>)]) -> Result<Selector<K>, ProviderError> {
    let mut present = candidates
        .iter()
        .filter_map(|(kind, value)| value.map(|id| (*kind, id)));

    let Some((kind, id)) = present.next() else {
        return Err(ProviderError::MissingSelector {
            accepted: candidates.iter().map(|(kind, _)| kind.field_name()).collect(),
        });
    };

    let ignored: Vec<&'static str> = present.map(|(kind, _)| kind.field_name()).collect();
    if !ignored.is_empty() {
        warn!(
            "Several identifiers set; using {} and ignoring {}",
            kind.field_name(),
            ignored.join(", ")
        );
    }

    Ok(Selector {
        kind,
        id: id.to_string(),
    })
}
