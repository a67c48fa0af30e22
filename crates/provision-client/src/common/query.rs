//! Query utilities for ProVision API
//!
//! ProVision list endpoints take their search filters as plain query parameters and
//! return a bare JSON array.

use crate::common::HttpClient;
use crate::error::ProVisionError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Query a list endpoint with optional filtering
pub async fn query_list<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    endpoint: &str,
    filters: &BTreeMap<String, String>,
) -> Result<Vec<T>, ProVisionError> {
    let mut url = endpoint.to_string();

    if !filters.is_empty() {
        let pairs: Vec<(&String, &String)> = filters.iter().collect();
        url = format!("{}?{}", url, http.build_query_string(&pairs));
    }

    http.get(&url).await
}
