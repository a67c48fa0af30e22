//! Unit tests for the push and push status data sources

#[cfg(test)]
mod tests {
    use crate::data_sources::pushes::{
        DhcpPushState, DhcpPushStatusState, DhcpPushTarget, DnsPushState, DnsPushStatusState, DnsPushTarget,
    };
    use crate::data_sources::{DhcpPush, DhcpPushStatus, DnsPush, DnsPushStatus};
    use crate::host::DynamicDataSource;
    use crate::error::ProviderError;
    use crate::host::DataSource;
    use crate::test_utils::mock_client;
    use provision_client::PushStatusMessage;
    use std::time::{Duration, Instant};

    fn message(msgid: &str, text: &str, state: &str, at: &str) -> PushStatusMessage {
        PushStatusMessage {
            msgid: msgid.to_string(),
            message: text.to_string(),
            state: state.to_string(),
            date_created: at.to_string(),
        }
    }

    #[tokio::test]
    async fn test_dhcp_push_by_group_returns_pid() {
        let (mock, client) = mock_client();
        let state = DhcpPush::new(client)
            .read(DhcpPushState {
                target: DhcpPushTarget {
                    group_id: Some("42".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();

        let pushes = mock.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].scope, "group");
        assert_eq!(pushes[0].id, "42");
        assert_eq!(state.push_pid.as_deref(), Some(pushes[0].pid.as_str()));
        assert_eq!(state.target.group_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_dhcp_push_prefers_group_over_pool() {
        let (mock, client) = mock_client();
        DhcpPush::new(client)
            .read(DhcpPushState {
                target: DhcpPushTarget {
                    group_id: Some("42".to_string()),
                    server_id: None,
                    pool_id: Some("7".to_string()),
                },
                push_pid: None,
            })
            .await
            .unwrap();
        assert_eq!(mock.pushes()[0].scope, "group");
    }

    #[tokio::test]
    async fn test_dhcp_push_without_target_fails() {
        let (mock, client) = mock_client();
        let err = DhcpPush::new(client).read(DhcpPushState::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Either group_id or server_id or pool_id are required");
        assert!(mock.pushes().is_empty());
    }

    #[tokio::test]
    async fn test_dns_push_by_zone() {
        let (mock, client) = mock_client();
        let state = DnsPush::new(client)
            .read(DnsPushState {
                target: DnsPushTarget {
                    zone_id: Some("9".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();

        let pushes = mock.pushes();
        assert_eq!(pushes[0].module, "dns");
        assert_eq!(pushes[0].scope, "zone");
        assert_eq!(state.push_pid, Some(pushes[0].pid.clone()));
    }

    #[tokio::test]
    async fn test_dhcp_status_waits_and_keeps_order() {
        let (mock, client) = mock_client();
        mock.set_push_status(
            "abc",
            vec![
                message("1", "Push queued", "queued", "2024-05-01 10:00:00"),
                message("2", "Push finished", "finished", "2024-05-01 10:00:01"),
            ],
        );

        let started = Instant::now();
        let state = DhcpPushStatus::new(client)
            .read(DhcpPushStatusState {
                target: DhcpPushTarget {
                    group_id: Some("42".to_string()),
                    ..Default::default()
                },
                push_pid: "abc".to_string(),
                delay: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();

        let requests = mock.status_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].at.duration_since(started) >= Duration::from_millis(500));
        assert_eq!(requests[0].pid, "abc");

        assert_eq!(state.status_messages.len(), 2);
        assert_eq!(state.status_messages[0].msgid, "1");
        assert_eq!(state.status_messages[0].message, "Push queued");
        assert_eq!(state.status_messages[0].state, "queued");
        assert_eq!(state.status_messages[1].date_created, "2024-05-01 10:00:01");
        assert_eq!(state.delay, Some(500));
    }

    #[tokio::test]
    async fn test_dns_status_empty_is_valid() {
        let (_mock, client) = mock_client();
        let state = DnsPushStatus::new(client)
            .read(DnsPushStatusState {
                target: DnsPushTarget {
                    server_id: Some("3".to_string()),
                    ..Default::default()
                },
                push_pid: "dns-1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(state.status_messages.is_empty());
    }

    #[test]
    fn test_status_requires_push_pid() {
        let err = serde_json::from_value::<DnsPushStatusState>(serde_json::json!({ "zone_id": "9" })).unwrap_err();
        assert!(ProviderError::from(err).to_string().contains("push_pid"));
    }

    #[test]
    fn test_state_keeps_flat_attribute_names() {
        let state: DnsPushStatusState = serde_json::from_value(serde_json::json!({
            "zone_id": "9",
            "push_pid": "dns-1",
            "delay": 250,
        }))
        .unwrap();
        assert_eq!(state.target.zone_id.as_deref(), Some("9"));
        assert_eq!(state.delay, Some(250));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["zone_id"], "9");
        assert_eq!(value["push_pid"], "dns-1");
        assert!(value.get("target").is_none());
    }

    #[test]
    fn test_type_suffixes_follow_protocol() {
        let (_mock, client) = mock_client();
        assert_eq!(DynamicDataSource::type_suffix(&DnsPush::new(client.clone())), "dnspush");
        assert_eq!(DynamicDataSource::type_suffix(&DnsPushStatus::new(client.clone())), "dnspushstatus");
        assert_eq!(DynamicDataSource::type_suffix(&DhcpPush::new(client.clone())), "dhcppush");
        assert_eq!(DynamicDataSource::type_suffix(&DhcpPushStatus::new(client)), "dhcppushstatus");
    }
}
