//! REST data source for a PostgREST-style account data service
//!
//! Tables: `user_services` (user_id, price, status) and `api_connections`
//! (id, user_id, tool_name, status, last_used). Every request carries the
//! project API key plus a bearer token for the signed-in user.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{DataSource, READ_ACTIVE_COUNT, READ_CONNECTIONS, READ_PRICES};
use crate::types::{
    ConnectionRecord, DashboardError, DataFetchFailure, Identity, PriceRecord, Result,
};

const SERVICES_TABLE: &str = "user_services";
const CONNECTIONS_TABLE: &str = "api_connections";

/// Parse the total from a `Content-Range` header (`0-0/3`, `*/3`).
/// Returns None when the total is unknown (`*`) or malformed.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

/// Data source backed by the remote REST service
pub struct RestDataSource {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: String,
}

impl RestDataSource {
    /// Create a REST source. `base_url` is the project URL (without `/rest/v1`).
    pub fn new(
        base_url: &str,
        api_key: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Endpoint URL for a table
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
    }

    fn send(
        read: &'static str,
        request: RequestBuilder,
    ) -> std::result::Result<Response, DataFetchFailure> {
        let response = request
            .send()
            .map_err(|e| DataFetchFailure::new(read, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataFetchFailure::new(read, format!("HTTP {}", status)));
        }
        Ok(response)
    }

    fn select_rows<T: DeserializeOwned>(
        &self,
        read: &'static str,
        table: &str,
        columns: &str,
        identity: &Identity,
    ) -> std::result::Result<Vec<T>, DataFetchFailure> {
        tracing::debug!(read, table, user_id = %identity, "requesting rows");

        let request = self.authorize(self.client.get(self.table_url(table)).query(&[
            ("select", columns.to_string()),
            ("user_id", format!("eq.{}", identity.user_id)),
        ]));

        Self::send(read, request)?
            .json()
            .map_err(|e| DataFetchFailure::new(read, format!("JSON parse error: {}", e)))
    }
}

impl DataSource for RestDataSource {
    fn name(&self) -> &str {
        "rest"
    }

    /// HEAD request with an exact count; no rows are transferred
    fn count_active_services(
        &self,
        identity: &Identity,
    ) -> std::result::Result<u64, DataFetchFailure> {
        tracing::debug!(read = READ_ACTIVE_COUNT, user_id = %identity, "requesting count");

        let request = self
            .authorize(self.client.head(self.table_url(SERVICES_TABLE)))
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", identity.user_id)),
                ("status", "eq.active".to_string()),
            ])
            .header("Prefer", "count=exact");

        let response = Self::send(READ_ACTIVE_COUNT, request)?;
        let header = response
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| DataFetchFailure::new(READ_ACTIVE_COUNT, "missing Content-Range"))?;

        parse_content_range_total(header).ok_or_else(|| {
            DataFetchFailure::new(
                READ_ACTIVE_COUNT,
                format!("unreadable Content-Range: {}", header),
            )
        })
    }

    fn list_connections(
        &self,
        identity: &Identity,
    ) -> std::result::Result<Vec<ConnectionRecord>, DataFetchFailure> {
        self.select_rows(READ_CONNECTIONS, CONNECTIONS_TABLE, "*", identity)
    }

    fn list_service_prices(
        &self,
        identity: &Identity,
    ) -> std::result::Result<Vec<PriceRecord>, DataFetchFailure> {
        self.select_rows(READ_PRICES, SERVICES_TABLE, "price", identity)
    }
}
