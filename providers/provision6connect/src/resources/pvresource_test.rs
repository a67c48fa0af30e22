//! Unit tests for the resource type

#[cfg(test)]
mod tests {
    use crate::error::ProviderError;
    use crate::host::Resource;
    use crate::models::ResourceState;
    use crate::resources::PvResource;
    use crate::test_utils::{create_test_resource, mock_client};
    use provision_client::ProVisionError;
    use std::collections::BTreeMap;

    fn plan() -> ResourceState {
        ResourceState {
            name: "edge-01".to_string(),
            resource_type: "entry".to_string(),
            attrs: Some(BTreeMap::from([("site".to_string(), "ams".to_string())])),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_read_round_trips() {
        let (_mock, client) = mock_client();
        let resource = PvResource::new(client);

        let created = resource.create(plan()).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.slug.as_deref(), Some("edge-01"));
        assert_eq!(created.parent_id.as_deref(), Some("1"));

        let read = resource.read(created.clone()).await.unwrap();
        assert_eq!(read, created);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (_mock, client) = mock_client();
        let resource = PvResource::new(client);

        let state = ResourceState {
            id: Some("404".to_string()),
            ..plan()
        };
        let err = resource.read(state).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(ref m) if m.contains("ID 404")));
    }

    #[tokio::test]
    async fn test_read_loads_attributes() {
        let (mock, client) = mock_client();
        mock.insert_resource(create_test_resource("12", "Rack7", "entry"));
        let resource = PvResource::new(client);

        let state = ResourceState {
            id: Some("12".to_string()),
            ..Default::default()
        };
        let read = resource.read(state).await.unwrap();
        assert_eq!(read.name, "Rack7");
        assert_eq!(read.attrs.unwrap().get("rack").map(String::as_str), Some("r7"));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_changes_name() {
        let (mock, client) = mock_client();
        mock.insert_resource(create_test_resource("12", "Rack7", "entry"));
        let resource = PvResource::new(client);

        let updated = resource
            .update(ResourceState {
                id: Some("12".to_string()),
                name: "Rack8".to_string(),
                resource_type: "entry".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.id.as_deref(), Some("12"));
        assert_eq!(mock.resource("12").unwrap().name, "Rack8");
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected() {
        let (_mock, client) = mock_client();
        let err = PvResource::new(client).update(plan()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingAttribute("id")));
    }

    #[tokio::test]
    async fn test_create_failure_is_upstream_verbatim() {
        let (mock, client) = mock_client();
        mock.fail_next(ProVisionError::Api("quota exceeded".to_string()));

        let err = PvResource::new(client).create(plan()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Upstream { .. }));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_delete_removes_remote() {
        let (mock, client) = mock_client();
        mock.insert_resource(create_test_resource("12", "Rack7", "entry"));

        let state = ResourceState {
            id: Some("12".to_string()),
            ..Default::default()
        };
        PvResource::new(client).delete(state).await.unwrap();
        assert!(mock.resource("12").is_none());
    }

    #[test]
    fn test_import_seeds_id() {
        let (_mock, client) = mock_client();
        let seeded = PvResource::new(client).import("77").unwrap();
        assert_eq!(seeded.id.as_deref(), Some("77"));
    }
}
