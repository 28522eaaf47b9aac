//! ServerHandler implementation for the MSSQL MCP Server.
//!
//! This module implements the rmcp `ServerHandler` trait which defines how
//! the server responds to MCP protocol requests.

use crate::constants::SERVER_NAME;
use crate::resources::{list_resources, read_resource};
use crate::server::MssqlMcpServer;
use crate::tools::{call_tool, list_tools};
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListResourcesResult, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ErrorData;
use tracing::{info, warn};

impl ServerHandler for MssqlMcpServer {
    /// Server identification - called during initialization handshake.
    fn get_info(&self) -> ServerInfo {
        info!("MCP client requesting server info");

        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,

            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),

            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("MSSQL MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },

            instructions: Some(build_instructions(self)),
        }
    }

    /// List one resource per table.
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(list_resources(self).await))
    }

    /// Read a table preview.
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        read_resource(self, &request.uri).await.map_err(|e| {
            warn!("Resource read failed: {}", e);
            ErrorData::from(e)
        })
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        call_tool(self, &request.name, request.arguments)
            .await
            .map_err(|e| {
                warn!("Tool {} failed: {}", request.name, e);
                ErrorData::from(e)
            })
    }
}

/// Build server instructions based on current configuration.
pub fn build_instructions(server: &MssqlMcpServer) -> String {
    let mut instructions = String::new();

    instructions.push_str("# MSSQL MCP Server\n\n");
    instructions.push_str(&format!(
        "Connected to database `{}` on `{}`.\n\n",
        server.database_config().database,
        server.database_config().address()
    ));

    instructions.push_str("### Resources\n");
    instructions.push_str("- `mssql://<table>/data`: first 100 rows of a table as CSV\n\n");

    instructions.push_str("### Tools\n");
    instructions.push_str("- `execute_sql`: run one SQL statement\n");
    if server.is_read_only() {
        instructions.push_str("- **Read-only mode**: Only SELECT queries are allowed\n");
    } else {
        instructions.push_str("- SELECT returns rows as CSV\n");
        instructions.push_str("- Other statements are committed and report the affected row count\n");
    }

    instructions
}
