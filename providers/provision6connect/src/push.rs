//! DNS and DHCP configuration pushes
//!
//! A push is fire-and-forget: ProVision starts the job and hands back a push id
//! (PID). The status of the job is fetched separately, once, optionally after a
//! delay. There is no wait-until-finished loop and no retry.

use crate::error::ProviderError;
use crate::selector::{Selector, SelectorKind};
use provision_client::{DhcpPushScope, DnsPushScope, ProVisionClientTrait, ProVisionError, PushStatusMessage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Summary used for every failed push or status request
pub const PUSH_FAILED: &str = "The Push Request has returned an error";

/// A push target family: DNS scopes or DHCP scopes
#[async_trait::async_trait]
pub trait PushScope: SelectorKind {
    /// Module name for logs (`dns`, `dhcp`)
    const MODULE: &'static str;

    async fn push(self, client: &dyn ProVisionClientTrait, id: &str) -> Result<String, ProVisionError>;

    async fn status(
        self,
        client: &dyn ProVisionClientTrait,
        id: &str,
        pid: &str,
    ) -> Result<Vec<PushStatusMessage>, ProVisionError>;
}

#[async_trait::async_trait]
impl PushScope for DnsPushScope {
    const MODULE: &'static str = "dns";

    async fn push(self, client: &dyn ProVisionClientTrait, id: &str) -> Result<String, ProVisionError> {
        client.dns_push(self, id).await
    }

    async fn status(
        self,
        client: &dyn ProVisionClientTrait,
        id: &str,
        pid: &str,
    ) -> Result<Vec<PushStatusMessage>, ProVisionError> {
        client.dns_push_status(self, id, pid).await
    }
}

#[async_trait::async_trait]
impl PushScope for DhcpPushScope {
    const MODULE: &'static str = "dhcp";

    async fn push(self, client: &dyn ProVisionClientTrait, id: &str) -> Result<String, ProVisionError> {
        client.dhcp_push(self, id).await
    }

    async fn status(
        self,
        client: &dyn ProVisionClientTrait,
        id: &str,
        pid: &str,
    ) -> Result<Vec<PushStatusMessage>, ProVisionError> {
        client.dhcp_push_status(self, id, pid).await
    }
}

/// One status message as it appears in state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessageState {
    pub msgid: String,
    pub message: String,
    pub state: String,
    pub date_created: String,
}

impl From<PushStatusMessage> for StatusMessageState {
    fn from(message: PushStatusMessage) -> Self {
        Self {
            msgid: message.msgid,
            message: message.message,
            state: message.state,
            date_created: message.date_created,
        }
    }
}

/// Start a push for the selected object and return its PID unchanged.
pub async fn dispatch<K: PushScope>(
    client: &dyn ProVisionClientTrait,
    selector: &Selector<K>,
) -> Result<String, ProviderError> {
    info!(
        "Requesting {} push for {} {}",
        K::MODULE,
        selector.kind.field_name(),
        selector.id
    );
    let pid = selector
        .kind
        .push(client, &selector.id)
        .await
        .map_err(|e| ProviderError::upstream(PUSH_FAILED, e))?;
    debug!("{} push started with pid {}", K::MODULE, pid);
    Ok(pid)
}

/// Wait `delay_ms` milliseconds if positive, then fetch the status messages of push `pid`.
pub async fn poll_status<K: PushScope>(
    client: &dyn ProVisionClientTrait,
    selector: &Selector<K>,
    pid: &str,
    delay_ms: Option<i64>,
) -> Result<Vec<StatusMessageState>, ProviderError> {
    if let Some(delay) = delay_ms.and_then(|ms| u64::try_from(ms).ok()).filter(|ms| *ms > 0) {
        debug!("Waiting {} ms before reading {} push {} status", delay, K::MODULE, pid);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let messages = selector
        .kind
        .status(client, &selector.id, pid)
        .await
        .map_err(|e| ProviderError::upstream(PUSH_FAILED, e))?;
    debug!("{} push {} has {} status messages", K::MODULE, pid, messages.len());
    Ok(messages.into_iter().map(StatusMessageState::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use provision_client::MockProVisionClient;
    use std::time::{Duration, Instant};

    fn group(id: &str) -> Selector<DhcpPushScope> {
        Selector { kind: DhcpPushScope::Group, id: id.to_string() }
    }

    #[tokio::test]
    async fn test_dispatch_returns_pid_unchanged() {
        let mock = MockProVisionClient::new("http://test-provision");
        let pid = dispatch(&mock, &group("42")).await.unwrap();

        let pushes = mock.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].module, "dhcp");
        assert_eq!(pushes[0].scope, "group");
        assert_eq!(pushes[0].id, "42");
        assert_eq!(pushes[0].pid, pid);
    }

    #[tokio::test]
    async fn test_dispatch_twice_issues_two_pushes() {
        let mock = MockProVisionClient::new("http://test-provision");
        let first = dispatch(&mock, &group("42")).await.unwrap();
        let second = dispatch(&mock, &group("42")).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(mock.pushes().len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_upstream() {
        let mock = MockProVisionClient::new("http://test-provision");
        mock.fail_next(ProVisionError::Api("push refused".to_string()));
        let err = dispatch(&mock, &group("42")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Upstream { .. }));
        assert!(mock.pushes().is_empty());
    }

    #[tokio::test]
    async fn test_poll_without_delay_fetches_immediately() {
        let mock = MockProVisionClient::new("http://test-provision");
        let started = Instant::now();
        let messages = poll_status(&mock, &group("42"), "abc", Some(0)).await.unwrap();
        assert!(messages.is_empty());

        let requests = mock.status_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].at.duration_since(started) < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_poll_waits_for_delay_before_fetching() {
        let mock = MockProVisionClient::new("http://test-provision");
        let started = Instant::now();
        poll_status(&mock, &group("42"), "abc", Some(120)).await.unwrap();

        let requests = mock.status_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].at.duration_since(started) >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_negative_delay_means_no_wait() {
        let mock = MockProVisionClient::new("http://test-provision");
        let started = Instant::now();
        poll_status(&mock, &group("42"), "abc", Some(-500)).await.unwrap();
        assert!(mock.status_requests()[0].at.duration_since(started) < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_poll_maps_messages_in_order() {
        let mock = MockProVisionClient::new("http://test-provision");
        mock.set_push_status(
            "abc",
            vec![
                PushStatusMessage {
                    msgid: "1".to_string(),
                    message: "Push started".to_string(),
                    state: "running".to_string(),
                    date_created: "2024-05-01 10:00:00".to_string(),
                },
                PushStatusMessage {
                    msgid: "2".to_string(),
                    message: "Push finished".to_string(),
                    state: "finished".to_string(),
                    date_created: "2024-05-01 10:00:03".to_string(),
                },
            ],
        );

        let selector = Selector { kind: DnsPushScope::Zone, id: "9".to_string() };
        let messages = poll_status(&mock, &selector, "abc", None).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].msgid, "1");
        assert_eq!(messages[0].state, "running");
        assert_eq!(messages[1].message, "Push finished");
        assert_eq!(messages[1].date_created, "2024-05-01 10:00:03");
        assert_eq!(mock.status_requests()[0].scope, "zone");
    }
}
