//! Error types for the MSSQL MCP Server.
//!
//! A single domain error, [`ServerError`], covers configuration, connectivity,
//! resource reads, tool dispatch, and statement execution. It converts into
//! the protocol-level [`ErrorData`] at the handler boundary.

use rmcp::ErrorData;
use serde_json::json;
use thiserror::Error;

/// Domain-specific errors for the MSSQL MCP Server.
///
/// Named `ServerError` to avoid collision with the protocol's error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// One or more required settings are unset or empty.
    #[error("Missing required database configuration: {}", .missing.join(", "))]
    MissingConfig { missing: Vec<&'static str> },

    /// A setting is present but unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network, TLS, or login failure while establishing a connection.
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Resource URI could not be interpreted.
    #[error("Invalid resource URI '{uri}': {reason}")]
    InvalidResourceUri { uri: String, reason: String },

    /// Reading a table resource failed.
    #[error("Error reading resource {uri}: {message}")]
    Resource { uri: String, message: String },

    /// Tool name not advertised by this server.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Statement rejected before execution.
    #[error("Query validation failed: {0}")]
    ValidationFailed(String),

    /// Statement failed on the server.
    #[error("Error executing query: {message}")]
    QueryExecution {
        message: String,
        sql_error_code: Option<u32>,
    },

    /// Connection or statement exceeded its time budget.
    #[error("Timeout: operation exceeded {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a connection error with a source.
    pub fn connection_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid resource URI error.
    pub fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResourceUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Create a resource read error.
    pub fn resource(uri: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Resource {
            uri: uri.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown tool error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Create a query execution error.
    pub fn query_error(msg: impl Into<String>) -> Self {
        Self::QueryExecution {
            message: msg.into(),
            sql_error_code: None,
        }
    }

    /// Create a query execution error carrying the server error number.
    pub fn query_error_with_code(msg: impl Into<String>, code: u32) -> Self {
        Self::QueryExecution {
            message: msg.into(),
            sql_error_code: Some(code),
        }
    }

    /// Create a timeout error.
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout {
            timeout_seconds: seconds,
        }
    }

    /// Whether the caller supplied something unusable, as opposed to a server-side failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTool(_)
                | Self::InvalidArgument(_)
                | Self::ValidationFailed(_)
                | Self::InvalidResourceUri { .. }
        )
    }

    /// Get a user-friendly suggestion for how to fix this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingConfig { .. } | Self::Config(_) => {
                Some("Check the MSSQL_* environment variables")
            }
            Self::Connection { .. } => {
                Some("Check server hostname, port, credentials, and network connectivity")
            }
            Self::InvalidResourceUri { .. } => Some("Use a URI of the form mssql://<table>/data"),
            Self::UnknownTool(_) => Some("Call tools/list to see available tools"),
            Self::ValidationFailed(_) => {
                Some("The server is in read-only mode; only SELECT statements are allowed")
            }
            Self::Timeout { .. } => {
                Some("Try a simpler query or raise MSSQL_QUERY_TIMEOUT / MSSQL_CONNECT_TIMEOUT")
            }
            _ => None,
        }
    }
}

/// Map a SQL Server error number and message to a [`ServerError`].
///
/// Login and missing-database failures surface as connection errors;
/// everything else raised by the server is a statement failure.
pub fn from_sql_error(code: u32, message: &str) -> ServerError {
    match code {
        // Login failed
        18456 => ServerError::connection(format!("Login failed: {}", message)),
        // Cannot open database requested by the login
        4060 => ServerError::connection(format!("Cannot open database: {}", message)),
        _ => ServerError::query_error_with_code(message, code),
    }
}

impl From<tiberius::error::Error> for ServerError {
    fn from(e: tiberius::error::Error) -> Self {
        use tiberius::error::Error;

        match &e {
            Error::Server(token) => from_sql_error(token.code(), token.message()),
            Error::Io { .. } => ServerError::connection(format!("IO error: {}", e)),
            Error::Tls(_) => ServerError::connection(format!("TLS error: {}", e)),
            Error::Routing { host, port } => ServerError::connection(format!(
                "Server requested routing to {}:{}, which is not supported",
                host, port
            )),
            _ => ServerError::query_error(e.to_string()),
        }
    }
}

/// Convert [`ServerError`] to the protocol error returned to the client.
impl From<ServerError> for ErrorData {
    fn from(e: ServerError) -> Self {
        let data = e.suggestion().map(|s| json!({ "suggestion": s }));
        let message = e.to_string();

        match e {
            ServerError::InvalidResourceUri { .. } => ErrorData::resource_not_found(message, data),
            _ if e.is_caller_error() => ErrorData::invalid_params(message, data),
            _ => ErrorData::internal_error(message, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_missing_config_lists_every_field() {
        let err = ServerError::MissingConfig {
            missing: vec!["MSSQL_USER", "MSSQL_DATABASE"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required database configuration: MSSQL_USER, MSSQL_DATABASE"
        );
    }

    #[test]
    fn test_sql_error_mapping() {
        let err = from_sql_error(18456, "Login failed for user 'test'");
        assert!(matches!(err, ServerError::Connection { .. }));

        let err = from_sql_error(208, "Invalid object name 'foo'");
        assert!(matches!(
            err,
            ServerError::QueryExecution {
                sql_error_code: Some(208),
                ..
            }
        ));
    }

    #[test]
    fn test_driver_io_error_is_connection_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset");
        let err = ServerError::from(tiberius::error::Error::from(io));
        assert!(matches!(err, ServerError::Connection { .. }));
        assert!(err.to_string().contains("peer reset"));
    }

    #[test]
    fn test_protocol_error_codes() {
        let data: ErrorData = ServerError::unknown_tool("bogus").into();
        assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
        assert!(data.message.contains("Unknown tool: bogus"));

        let data: ErrorData = ServerError::invalid_uri("x://t", "bad scheme").into();
        assert_eq!(data.code, ErrorCode::RESOURCE_NOT_FOUND);

        let data: ErrorData = ServerError::query_error("Incorrect syntax").into();
        assert_eq!(data.code, ErrorCode::INTERNAL_ERROR);
        assert!(data.message.contains("Incorrect syntax"));
    }

    #[test]
    fn test_error_suggestions() {
        assert!(ServerError::connection("refused").suggestion().is_some());
        assert!(ServerError::query_error("boom").suggestion().is_none());
    }
}
