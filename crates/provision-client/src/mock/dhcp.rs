//! DHCP push operations for MockProVisionClient

use super::helpers::lock;
use super::{MockProVisionClient, RecordedPush, RecordedStatusRequest};
use crate::models::*;
use std::time::Instant;

pub async fn push(client: &MockProVisionClient, scope: DhcpPushScope, id: &str) -> String {
    let pid = format!("dhcp-{}", client.next_id());
    lock(&client.pushes).push(RecordedPush {
        module: "dhcp",
        scope: scope.as_str(),
        id: id.to_string(),
        pid: pid.clone(),
    });
    pid
}

pub async fn push_status(client: &MockProVisionClient, scope: DhcpPushScope, id: &str, pid: &str) -> Vec<PushStatusMessage> {
    lock(&client.status_requests).push(RecordedStatusRequest {
        module: "dhcp",
        scope: scope.as_str(),
        id: id.to_string(),
        pid: pid.to_string(),
        at: Instant::now(),
    });
    lock(&client.push_statuses).get(pid).cloned().unwrap_or_default()
}
