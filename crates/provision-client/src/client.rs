//! ProVision API client
//!
//! Implements the ProVision v1 REST API client for resource, DNS, DHCP and IPAM
//! operations. Endpoints live under `/api/v1/`: `resources`, `dns/zones`,
//! `dns/push`, `dhcp/push` and `ipam/netblocks`.

use crate::common::query::query_list;
use crate::common::HttpClient;
use crate::error::ProVisionError;
use crate::models::*;
use crate::provision_trait::ProVisionClientTrait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Network timeout applied to every ProVision request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// ProVision API client
#[derive(Debug)]
pub struct ProVisionClient {
    http: HttpClient,
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

fn require_id<'a>(id: Option<&'a PvId>, what: &str) -> Result<&'a str, ProVisionError> {
    id.map(PvId::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProVisionError::InvalidRequest(format!("{} has no id", what)))
}

impl ProVisionClient {
    /// Create a new ProVision client
    ///
    /// # Arguments
    /// * `base_url` - ProVision base URL (e.g., "https://provision.example.net")
    /// * `username` - API user
    /// * `password` - API user password
    pub fn new(base_url: String, username: &str, password: &str) -> Result<Self, ProVisionError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ProVisionError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, username, password),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait::async_trait]
impl ProVisionClientTrait for ProVisionClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Makes a one-row resource query, which requires valid credentials.
    async fn validate_credentials(&self) -> Result<(), ProVisionError> {
        debug!("Validating ProVision credentials and connectivity");
        let _: Vec<Resource> = self.http.get("/resources?limit=1").await?;
        debug!("Credentials validated successfully");
        Ok(())
    }

    async fn get_resources(&self, filters: &BTreeMap<String, String>) -> Result<Vec<Resource>, ProVisionError> {
        debug!("Querying resources with {} filters", filters.len());
        query_list(&self.http, "/resources", filters).await
    }

    async fn add_resource(&self, resource: &Resource) -> Result<Resource, ProVisionError> {
        debug!("Creating resource {} of type {}", resource.name, resource.resource_type);
        self.http.post("/resources", resource).await
    }

    async fn update_resource(&self, resource: &Resource) -> Result<Resource, ProVisionError> {
        let id = require_id(resource.id.as_ref(), "resource")?;
        self.http.put(&format!("/resources/{}", segment(id)), resource).await
    }

    async fn delete_resource_by_id(&self, id: &str) -> Result<(), ProVisionError> {
        self.http.delete(&format!("/resources/{}", segment(id))).await
    }

    async fn get_zone_by_id(&self, id: &str) -> Result<Vec<DnsZone>, ProVisionError> {
        let filters = BTreeMap::from([("id".to_string(), id.to_string())]);
        query_list(&self.http, "/dns/zones", &filters).await
    }

    async fn add_zone(&self, zone: &DnsZone) -> Result<DnsZone, ProVisionError> {
        debug!("Creating DNS zone {}", zone.name);
        self.http.post("/dns/zones", zone).await
    }

    async fn update_zone(&self, zone: &DnsZone) -> Result<DnsZone, ProVisionError> {
        let id = require_id(zone.id.as_ref(), "DNS zone")?;
        self.http.put(&format!("/dns/zones/{}", segment(id)), zone).await
    }

    async fn delete_zone_by_id(&self, id: &str) -> Result<(), ProVisionError> {
        self.http.delete(&format!("/dns/zones/{}", segment(id))).await
    }

    async fn get_zone_records(&self, zone_id: &str, filters: &BTreeMap<String, String>) -> Result<Vec<DnsRecord>, ProVisionError> {
        query_list(&self.http, &format!("/dns/zones/{}/records", segment(zone_id)), filters).await
    }

    async fn add_zone_record(&self, record: &DnsRecord) -> Result<DnsRecord, ProVisionError> {
        let zone_id = require_id(record.parent_id.as_ref(), "DNS record zone")?;
        debug!("Creating DNS record {} in zone {}", record.name, zone_id);
        self.http
            .post(&format!("/dns/zones/{}/records", segment(zone_id)), record)
            .await
    }

    async fn update_zone_record(&self, record: &DnsRecord) -> Result<DnsRecord, ProVisionError> {
        let zone_id = require_id(record.parent_id.as_ref(), "DNS record zone")?;
        let id = require_id(record.id.as_ref(), "DNS record")?;
        self.http
            .put(&format!("/dns/zones/{}/records/{}", segment(zone_id), segment(id)), record)
            .await
    }

    async fn delete_zone_record_by_id(&self, zone_id: &str, id: &str) -> Result<(), ProVisionError> {
        self.http
            .delete(&format!("/dns/zones/{}/records/{}", segment(zone_id), segment(id)))
            .await
    }

    async fn dns_push(&self, scope: DnsPushScope, id: &str) -> Result<String, ProVisionError> {
        debug!("Requesting DNS push for {} {}", scope, id);
        let response: PushResponse = self
            .http
            .post(&format!("/dns/push/{}/{}", scope, segment(id)), &serde_json::json!({}))
            .await?;
        Ok(response.pid)
    }

    async fn dns_push_status(&self, scope: DnsPushScope, id: &str, pid: &str) -> Result<Vec<PushStatusMessage>, ProVisionError> {
        self.http
            .get(&format!("/dns/push/{}/{}/status/{}", scope, segment(id), segment(pid)))
            .await
    }

    async fn dhcp_push(&self, scope: DhcpPushScope, id: &str) -> Result<String, ProVisionError> {
        debug!("Requesting DHCP push for {} {}", scope, id);
        let response: PushResponse = self
            .http
            .post(&format!("/dhcp/push/{}/{}", scope, segment(id)), &serde_json::json!({}))
            .await?;
        Ok(response.pid)
    }

    async fn dhcp_push_status(&self, scope: DhcpPushScope, id: &str, pid: &str) -> Result<Vec<PushStatusMessage>, ProVisionError> {
        self.http
            .get(&format!("/dhcp/push/{}/{}/status/{}", scope, segment(id), segment(pid)))
            .await
    }

    async fn get_netblocks(&self, filters: &BTreeMap<String, String>) -> Result<Vec<Netblock>, ProVisionError> {
        query_list(&self.http, "/ipam/netblocks", filters).await
    }

    async fn get_netblock_by_id(&self, id: &str) -> Result<Netblock, ProVisionError> {
        debug!("Fetching netblock {} from ProVision", id);
        self.http.get(&format!("/ipam/netblocks/{}", segment(id))).await
    }

    async fn update_netblock(&self, update: &NetblockUpdate) -> Result<Netblock, ProVisionError> {
        if update.id.as_str().is_empty() {
            return Err(ProVisionError::InvalidRequest("netblock has no id".to_string()));
        }
        self.http
            .put(&format!("/ipam/netblocks/{}", segment(update.id.as_str())), update)
            .await
    }

    async fn smart_assign(&self, request: &SmartAssignRequest) -> Result<Netblock, ProVisionError> {
        debug!(
            "Smart assigning /{} {} block from {} to resource {}",
            request.mask, request.netblock_type, request.rir, request.resource_id
        );
        self.http.post("/ipam/netblocks/smart-assign", request).await
    }

    async fn unassign_netblock_by_id(&self, id: &str, skip_holding: bool) -> Result<UnassignResponse, ProVisionError> {
        self.http
            .post(
                &format!("/ipam/netblocks/{}/unassign", segment(id)),
                &serde_json::json!({ "skip_holding": skip_holding }),
            )
            .await
    }

    async fn get_first_available(&self, search: &str) -> Result<String, ProVisionError> {
        let response: FirstAvailableResponse = self
            .http
            .get(&format!(
                "/ipam/netblocks/first-available?search={}",
                urlencoding::encode(search)
            ))
            .await?;
        Ok(response.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ProVisionClient::new("https://pv.example.net/".to_string(), "u", "p").unwrap();
        assert_eq!(client.base_url(), "https://pv.example.net");
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected_locally() {
        let client = ProVisionClient::new("http://127.0.0.1:9".to_string(), "u", "p").unwrap();
        let result = client.update_resource(&Resource::default()).await;
        assert!(matches!(result, Err(ProVisionError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_record_without_zone_is_rejected_locally() {
        let client = ProVisionClient::new("http://127.0.0.1:9".to_string(), "u", "p").unwrap();
        let result = client.add_zone_record(&DnsRecord::default()).await;
        assert!(matches!(result, Err(ProVisionError::InvalidRequest(_))));
    }
}
