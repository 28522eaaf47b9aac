//! Centralized constants for the MSSQL MCP Server.
//!
//! Names, defaults, and fixed limits used across the crate live here so that
//! protocol-visible strings are defined exactly once.

use std::time::Duration;

// =============================================================================
// Protocol Identity
// =============================================================================

/// Server name advertised in the MCP initialize handshake.
pub const SERVER_NAME: &str = "mssql_mcp_server";

/// URI scheme used for table resources.
pub const RESOURCE_SCHEME: &str = "mssql://";

/// Path suffix of a table resource URI (`mssql://<table>/data`).
pub const RESOURCE_DATA_PATH: &str = "data";

/// MIME type of table resource contents.
pub const RESOURCE_MIME_TYPE: &str = "text/plain";

/// Name of the single SQL execution tool.
pub const EXECUTE_SQL_TOOL: &str = "execute_sql";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_SERVER: &str = "MSSQL_SERVER";
pub const ENV_USER: &str = "MSSQL_USER";
pub const ENV_PASSWORD: &str = "MSSQL_PASSWORD";
pub const ENV_DATABASE: &str = "MSSQL_DATABASE";
pub const ENV_PORT: &str = "MSSQL_PORT";
pub const ENV_CONNECT_TIMEOUT: &str = "MSSQL_CONNECT_TIMEOUT";
pub const ENV_QUERY_TIMEOUT: &str = "MSSQL_QUERY_TIMEOUT";
pub const ENV_ENCRYPT: &str = "MSSQL_ENCRYPT";
pub const ENV_TRUST_CERT: &str = "MSSQL_TRUST_CERT";
pub const ENV_READ_ONLY: &str = "MSSQL_READ_ONLY";

// =============================================================================
// Connection Defaults
// =============================================================================

/// Default SQL Server port.
pub const DEFAULT_PORT: u16 = 1433;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Default statement timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout as Duration.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration =
    Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS);

/// Default statement timeout as Duration.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS);

/// Application name reported to SQL Server.
pub const APPLICATION_NAME: &str = "mssql-mcp-server";

// =============================================================================
// Result Limits
// =============================================================================

/// Number of rows returned when reading a table resource.
pub const RESOURCE_PREVIEW_ROWS: usize = 100;

/// Maximum query length shown in debug logs.
pub const LOG_QUERY_PREVIEW_LEN: usize = 100;
