//! FreightDesk MCP Server implementation
//!
//! Every tool is a lookup. Orders, stock and payments are changed by
//! operators through the admin API, never from here.

use crate::client::{FreightDeskClient, InventoryQuery, OrderQuery};
use anyhow::Result;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// FreightDesk MCP Server
#[derive(Clone)]
pub struct FreightDeskServer {
    client: FreightDeskClient,
    tool_router: ToolRouter<Self>,
}

impl FreightDeskServer {
    pub fn from_env() -> Result<Self> {
        let client = FreightDeskClient::from_env()?;
        Ok(Self {
            client,
            tool_router: Self::tool_router(),
        })
    }

    #[cfg(test)]
    #[allow(dead_code)]
    pub fn new(client: FreightDeskClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }
}

fn into_tool_result(result: Result<String>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(content) => Ok(CallToolResult::success(vec![Content::text(content)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TrackParams {
    /// 10-character customer tracking code, case-insensitive
    pub code: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListOrdersParams {
    /// Status filter: new, processing, in_transit, arrived, delivered or cancelled
    #[serde(default)]
    pub status: Option<String>,
    /// Matches order number, origin, destination and comment
    #[serde(default)]
    pub search: Option<String>,
    /// Page size (1-100, default 20)
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderParams {
    /// Order UUID
    pub order_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct InventoryParams {
    /// Only rows in this warehouse (UUID)
    #[serde(default)]
    pub warehouse_id: Option<String>,
    /// Matches product name and SKU
    #[serde(default)]
    pub search: Option<String>,
    /// Hide rows with nothing available
    #[serde(default)]
    pub only_available: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct LowStockParams {
    /// Availability at or below this counts as low; server default when omitted
    #[serde(default)]
    pub threshold: Option<i32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EntityHistoryParams {
    /// One of: order, order_item, warehouse, inventory, counterparty, admin_user, tracking
    pub entity_type: String,
    /// Entity UUID
    pub entity_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecentHistoryParams {
    /// Number of entries (default 20)
    #[serde(default)]
    pub limit: Option<u64>,
}

#[tool_router]
impl FreightDeskServer {
    // === Customer view ===

    #[tool(description = "Look up a customer tracking code and show what the customer sees.")]
    async fn track(&self, params: Parameters<TrackParams>) -> Result<CallToolResult, McpError> {
        into_tool_result(self.client.track(&params.0.code).await)
    }

    // === Orders ===

    #[tool(description = "Back-office overview: orders per status, outstanding amount, low stock and latest changes. Call this first.")]
    async fn dashboard(&self) -> Result<CallToolResult, McpError> {
        into_tool_result(self.client.dashboard().await)
    }

    #[tool(description = "List orders, newest first, optionally filtered by status or a search term.")]
    async fn list_orders(
        &self,
        params: Parameters<ListOrdersParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let query = OrderQuery {
            status: p.status,
            search: p.search,
            limit: p.limit,
            offset: p.offset,
        };
        into_tool_result(self.client.list_orders(&query).await)
    }

    #[tool(description = "Get one order with its cargo lines, totals and payment state.")]
    async fn get_order(&self, params: Parameters<OrderParams>) -> Result<CallToolResult, McpError> {
        into_tool_result(self.client.get_order(&params.0.order_id).await)
    }

    // === Stock ===

    #[tool(description = "List warehouse stock with total and available quantities.")]
    async fn inventory(
        &self,
        params: Parameters<InventoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let query = InventoryQuery {
            warehouse_id: p.warehouse_id,
            search: p.search,
            only_available: p.only_available,
        };
        into_tool_result(self.client.list_inventory(&query).await)
    }

    #[tool(description = "List stock rows whose available quantity is at or below a threshold.")]
    async fn low_stock(
        &self,
        params: Parameters<LowStockParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result(self.client.low_stock(params.0.threshold).await)
    }

    // === History ===

    #[tool(description = "Field-level change history of one entity, newest first.")]
    async fn history(
        &self,
        params: Parameters<EntityHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result(
            self.client
                .entity_history(&params.0.entity_type, &params.0.entity_id)
                .await,
        )
    }

    #[tool(description = "Latest changes across all orders, stock and directories.")]
    async fn recent_changes(
        &self,
        params: Parameters<RecentHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result(self.client.recent_history(params.0.limit).await)
    }
}

#[tool_handler]
impl ServerHandler for FreightDeskServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "freightdesk".into(),
                title: Some("FreightDesk MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"FreightDesk - freight brokerage back office (read-only)

SETUP: set FREIGHTDESK_API_KEY to an admin API key and FREIGHTDESK_API_URL
to the API base URL.

TOOLS:
- 'dashboard' - overview of orders, money outstanding and stock
- 'list_orders' / 'get_order' - find an order and its cargo lines
- 'inventory' / 'low_stock' - warehouse stock and shortages
- 'history' / 'recent_changes' - who changed what, field by field
- 'track' - what a customer sees for a tracking code

Amounts, weights (kg) and volumes (m3) are decimal strings."#
                    .into(),
            ),
        }
    }
}
