//! Common utilities for ProVision API client
//!
//! Provides shared functionality used across all API modules.

pub mod coerce;
pub mod query;

use crate::error::ProVisionError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Path prefix of the ProVision v1 REST API
pub const API_PREFIX: &str = "/api/v1";

/// HTTP client wrapper with authentication
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper using HTTP basic auth
    pub fn new(client: Client, base_url: String, username: &str, password: &str) -> Self {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from an API path (`/resources`, `/dns/zones/7`, ...)
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> &str {
        &self.auth_header
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
    }

    /// Turn a non-success response into the matching error, passing the body through
    async fn check(method: &str, path: &str, response: Response) -> Result<Response, ProVisionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProVisionError::Authentication(format!(
                "{} {} rejected: {} - {}",
                method, path, status, body
            )),
            StatusCode::NOT_FOUND => ProVisionError::NotFound(format!(
                "Resource not found: {} - {}",
                path, body
            )),
            _ => ProVisionError::Api(format!(
                "{} {} failed: {} - {}",
                method, path, status, body
            )),
        })
    }

    /// Decode a JSON body, keeping the start of the payload in the error for diagnosis
    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, ProVisionError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ProVisionError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Make a GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ProVisionError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(ProVisionError::Http)?;

        let response = Self::check("GET", path, response).await?;
        Self::decode(response).await
    }

    /// Make a POST request
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ProVisionError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.build_url(path);
        debug!("POST {}", url);

        let response = self
            .authorized(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ProVisionError::Http)?;

        let response = Self::check("POST", path, response).await?;
        Self::decode(response).await
    }

    /// Make a PUT request
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ProVisionError>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de>,
    {
        let url = self.build_url(path);
        debug!("PUT {}", url);

        let response = self
            .authorized(self.client.put(&url))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ProVisionError::Http)?;

        let response = Self::check("PUT", path, response).await?;
        Self::decode(response).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), ProVisionError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self
            .authorized(self.client.delete(&url))
            .send()
            .await
            .map_err(ProVisionError::Http)?;

        Self::check("DELETE", path, response).await?;
        Ok(())
    }

    /// Build query string from filters
    pub fn build_query_string<K, V>(&self, filters: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        filters
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k.as_ref()),
                    urlencoding::encode(v.as_ref())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Netblock, PushResponse};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn http() -> HttpClient {
        HttpClient::new(Client::new(), "https://pv.example.net/".to_string(), "admin", "s3cret")
    }

    /// Answer exactly one request with `status` and `body`; the task yields the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (HttpClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);

                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| line.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (HttpClient::new(Client::new(), base_url, "admin", "s3cret"), server)
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let (http, server) = serve_once("404 Not Found", "no such netblock").await;
        let err = http.get::<Netblock>("/ipam/netblocks/7").await.unwrap_err();
        assert!(matches!(err, ProVisionError::NotFound(ref m) if m.contains("/ipam/netblocks/7") && m.contains("no such netblock")));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/v1/ipam/netblocks/7 HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: basic ywrtaw46cznjcmv0"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication() {
        let (http, server) = serve_once("401 Unauthorized", "bad credentials").await;
        let err = http.get::<Vec<Netblock>>("/resources?limit=1").await.unwrap_err();
        assert!(matches!(err, ProVisionError::Authentication(ref m) if m.contains("bad credentials")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_authentication() {
        let (http, server) = serve_once("403 Forbidden", "").await;
        let err = http.delete("/resources/12").await.unwrap_err();
        assert!(matches!(err, ProVisionError::Authentication(_)));
        assert!(server.await.unwrap().starts_with("DELETE /api/v1/resources/12 "));
    }

    #[tokio::test]
    async fn test_server_error_passes_body_through() {
        let (http, server) = serve_once("500 Internal Server Error", "boom").await;
        let err = http
            .post::<_, PushResponse>("/dhcp/push/group/42", &serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            ProVisionError::Api(message) => {
                assert!(message.starts_with("POST /dhcp/push/group/42 failed: 500"));
                assert!(message.ends_with("boom"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_success_decodes_lenient_ids() {
        let (http, server) = serve_once("200 OK", r#"{"pid":1234}"#).await;
        let response: PushResponse = http
            .post("/dhcp/push/pool/a%20b", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(response.pid, "1234");
        assert!(server.await.unwrap().starts_with("POST /api/v1/dhcp/push/pool/a%20b "));
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let (http, server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let err = http.get::<Netblock>("/ipam/netblocks/7").await.unwrap_err();
        assert!(matches!(err, ProVisionError::Api(ref m) if m.starts_with("error decoding response body") && m.contains("<html>maintenance</html>")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_query_list_decodes_bare_array() {
        let (http, server) = serve_once("200 OK", r#"[{"pid":"1"},{"pid":2}]"#).await;
        let filters = std::collections::BTreeMap::from([("name".to_string(), "a b".to_string())]);
        let items: Vec<PushResponse> = query::query_list(&http, "/resources", &filters).await.unwrap();
        assert_eq!(items.iter().map(|i| i.pid.as_str()).collect::<Vec<_>>(), ["1", "2"]);
        assert!(server.await.unwrap().starts_with("GET /api/v1/resources?name=a%20b "));
    }

    #[tokio::test]
    async fn test_query_list_rejects_object_body() {
        let (http, server) = serve_once("200 OK", r#"{"pid":"1"}"#).await;
        let err = query::query_list::<PushResponse>(&http, "/resources", &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProVisionError::Api(ref m) if m.starts_with("error decoding response body")));
        server.await.unwrap();
    }

    #[test]
    fn test_build_url_prefixes_api_path() {
        assert_eq!(
            http().build_url("/dns/zones/7"),
            "https://pv.example.net/api/v1/dns/zones/7"
        );
    }

    #[test]
    fn test_basic_auth_header() {
        // base64("admin:s3cret")
        assert_eq!(http().auth_header(), "Basic YWRtaW46czNjcmV0");
    }

    #[test]
    fn test_query_string_is_encoded() {
        let query = http().build_query_string(&[("name", "edge 01"), ("type", "a&b")]);
        assert_eq!(query, "name=edge%2001&type=a%26b");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let rendered = format!("{:?}", http());
        assert!(!rendered.contains("YWRtaW46czNjcmV0"));
    }
}
