//! MSSQL MCP Server entry point.
//!
//! This binary starts the MCP server using stdio transport for integration
//! with Claude Desktop, Cursor, and other MCP clients.

use anyhow::Result;
use mssql_mcp_server::{Config, MssqlMcpServer};
use rmcp::ServiceExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is reserved for JSON-RPC)
    init_logging();

    info!("Starting MSSQL MCP server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().inspect_err(|e| error!("Invalid configuration: {}", e))?;
    info!(
        "Database config: {}/{} as {}",
        config.database.address(),
        config.database.database,
        config.database.user
    );

    let server = MssqlMcpServer::new(config);

    let transport = rmcp::transport::stdio();
    let service = server.serve(transport).await?;
    info!("Server initialized. Ready to accept requests...");

    tokio::select! {
        quit_reason = service.waiting() => {
            match quit_reason {
                Ok(reason) => info!("Service stopped: {:?}", reason),
                Err(e) => error!("Service error: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber with stderr output.
///
/// Logs MUST go to stderr because stdout is used for JSON-RPC communication.
fn init_logging() {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn,mssql_mcp_server=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
