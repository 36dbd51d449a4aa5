//! FreightDesk MCP Server
//!
//! Gives an operator's assistant read-only access to the FreightDesk back
//! office over the REST API. Authentication comes from environment variables.
//! Exposed tools cover:
//! - Dashboard and order lookup
//! - Warehouse stock and shortages
//! - Change history
//! - Customer tracking codes

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::FreightDeskServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting FreightDesk MCP server");

    let server = FreightDeskServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    service.waiting().await?;

    Ok(())
}
