//! Configuration management for the MSSQL MCP Server.
//!
//! Configuration is loaded from environment variables following the 12-factor app pattern.
//! Resolution is never cached: every call re-reads the environment.

use crate::constants::{
    APPLICATION_NAME, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_PORT, DEFAULT_QUERY_TIMEOUT,
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_QUERY_TIMEOUT_SECS, ENV_CONNECT_TIMEOUT, ENV_DATABASE,
    ENV_ENCRYPT, ENV_PASSWORD, ENV_PORT, ENV_QUERY_TIMEOUT, ENV_READ_ONLY, ENV_SERVER,
    ENV_TRUST_CERT, ENV_USER,
};
use crate::error::ServerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection target and credentials
    pub database: DatabaseConfig,

    /// Transport and timeout settings
    pub connection: ConnectionConfig,

    /// Security configuration
    pub security: SecurityConfig,
}

/// Database connection target and credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQL Server hostname or IP address (`MSSQL_SERVER`)
    pub host: String,

    /// SQL Server login (`MSSQL_USER`)
    pub user: String,

    /// SQL Server password (`MSSQL_PASSWORD`)
    pub password: String,

    /// Database name (`MSSQL_DATABASE`)
    pub database: String,

    /// SQL Server port (`MSSQL_PORT`, default: 1433)
    pub port: u16,
}

/// Transport and timeout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Per-statement timeout
    pub query_timeout: Duration,

    /// Enable TLS encryption
    pub encrypt: bool,

    /// Trust server certificate (for self-signed certs)
    pub trust_server_certificate: bool,

    /// Application name sent to SQL Server
    pub application_name: String,
}

/// Security configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Reject statements that are not reads
    pub read_only: bool,
}

/// Resolve the database configuration from the process environment.
///
/// Fails with [`ServerError::MissingConfig`] naming every required variable
/// that is unset or empty.
pub fn get_db_config() -> Result<DatabaseConfig, ServerError> {
    DatabaseConfig::from_env()
}

impl DatabaseConfig {
    /// Load the database configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// ## Required
    /// - `MSSQL_SERVER`: SQL Server hostname
    /// - `MSSQL_USER`: SQL Server login
    /// - `MSSQL_PASSWORD`: SQL Server password
    /// - `MSSQL_DATABASE`: Database name
    ///
    /// ## Optional
    /// - `MSSQL_PORT`: Port number (default: 1433)
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(env_lookup)
    }

    /// Resolve the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &'static str| match lookup(key) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let host = required(ENV_SERVER);
        let user = required(ENV_USER);
        let password = required(ENV_PASSWORD);
        let database = required(ENV_DATABASE);

        if !missing.is_empty() {
            return Err(ServerError::MissingConfig { missing });
        }

        let port = match lookup(ENV_PORT) {
            Some(p) if !p.is_empty() => p.trim().parse::<u16>().map_err(|_| {
                ServerError::config(format!("{} must be a valid port number, got '{}'", ENV_PORT, p))
            })?,
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            user,
            password,
            database,
            port,
        })
    }

    /// `host:port` socket address of the server.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In addition to the variables read by [`DatabaseConfig::from_env`]:
    ///
    /// - `MSSQL_CONNECT_TIMEOUT`: Connection timeout in seconds (default: 30)
    /// - `MSSQL_QUERY_TIMEOUT`: Statement timeout in seconds (default: 30)
    /// - `MSSQL_ENCRYPT`: Enable TLS (default: true)
    /// - `MSSQL_TRUST_CERT`: Trust server certificate (default: false)
    /// - `MSSQL_READ_ONLY`: Only allow SELECT statements (default: false)
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(env_lookup)
    }

    /// Resolve the full configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig::from_lookup(&lookup)?;

        let connect_timeout_secs = lookup(ENV_CONNECT_TIMEOUT)
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS);

        let query_timeout_secs = lookup(ENV_QUERY_TIMEOUT)
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);

        let encrypt = lookup(ENV_ENCRYPT)
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let trust_server_certificate = lookup(ENV_TRUST_CERT)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let read_only = lookup(ENV_READ_ONLY)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Config {
            database,
            connection: ConnectionConfig {
                connect_timeout: Duration::from_secs(connect_timeout_secs),
                query_timeout: Duration::from_secs(query_timeout_secs),
                encrypt,
                trust_server_certificate,
                application_name: APPLICATION_NAME.to_string(),
            },
            security: SecurityConfig { read_only },
        })
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECTION_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            encrypt: true,
            trust_server_certificate: false,
            application_name: APPLICATION_NAME.to_string(),
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
