//! HTTP client for the FreightDesk API
//!
//! Read-only: the assistant can look things up but every change still goes
//! through an operator.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Serialize;

/// HTTP client for communicating with the FreightDesk API
#[derive(Clone)]
pub struct FreightDeskClient {
    client: reqwest::Client,
    base_url: String,
}

/// Filters for `GET /admin/orders`
#[derive(Debug, Default, Serialize)]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Filters for `GET /admin/inventory`
#[derive(Debug, Default, Serialize)]
pub struct InventoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub only_available: bool,
}

impl FreightDeskClient {
    /// Create a new client from environment variables
    ///
    /// Required env vars:
    /// - FREIGHTDESK_API_KEY: an admin API key (fd-...) from `POST /auth/login`
    ///
    /// Optional:
    /// - FREIGHTDESK_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FREIGHTDESK_API_KEY")
            .context("FREIGHTDESK_API_KEY not set. Log in via POST /auth/login to get one.")?;
        let base_url = std::env::var("FREIGHTDESK_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self::new(&base_url, &api_key)
    }

    /// Create a new client with explicit configuration
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public customer view of a tracking code
    pub async fn track(&self, code: &str) -> Result<String> {
        self.get_json(&format!("/track/{}", code.trim())).await
    }

    pub async fn dashboard(&self) -> Result<String> {
        self.get_json("/admin/dashboard").await
    }

    pub async fn list_orders(&self, query: &OrderQuery) -> Result<String> {
        self.get_json_with("/admin/orders", query).await
    }

    /// An order with its cargo lines
    pub async fn get_order(&self, order_id: &str) -> Result<String> {
        self.get_json(&format!("/admin/orders/{}", order_id)).await
    }

    pub async fn list_inventory(&self, query: &InventoryQuery) -> Result<String> {
        self.get_json_with("/admin/inventory", query).await
    }

    /// Rows at or below the threshold; the server default applies when `None`
    pub async fn low_stock(&self, threshold: Option<i32>) -> Result<String> {
        self.get_json_with("/admin/inventory/low-stock", &LowStockQuery { threshold })
            .await
    }

    pub async fn entity_history(&self, entity_type: &str, entity_id: &str) -> Result<String> {
        self.get_json(&format!("/admin/history/{}/{}", entity_type, entity_id))
            .await
    }

    pub async fn recent_history(&self, limit: Option<u64>) -> Result<String> {
        self.get_json_with("/admin/history", &RecentHistoryQuery { limit })
            .await
    }

    // --- Internal helpers ---

    async fn get_json(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))?;

        handle_json_response(response).await
    }

    async fn get_json_with<Q: Serialize>(&self, path: &str, query: &Q) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))?;

        handle_json_response(response).await
    }
}

/// Pretty-print successful JSON bodies; surface the API's error body otherwise
async fn handle_json_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("API error ({}): {}", status, body);
    }

    Ok(pretty(&body))
}

fn pretty(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}

// --- Query Types ---

#[derive(Debug, Serialize)]
struct LowStockQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<i32>,
}

#[derive(Debug, Serialize)]
struct RecentHistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
}
