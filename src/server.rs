//! MCP server struct definition and initialization.

use crate::config::{Config, DatabaseConfig};
use crate::database::{Connector, DbConnection, TdsConnector};
use crate::error::ServerError;
use crate::security::{SelectPrefixClassifier, StatementClassifier};
use std::sync::Arc;

/// The MSSQL MCP Server instance.
///
/// This struct is cloned for each request; everything it holds is shared
/// via `Arc` and read-only. The server provides:
///
/// - **Resources**: one `mssql://<table>/data` entry per base table
/// - **Tools**: `execute_sql` for arbitrary statements
///
/// No connection outlives a request. Each operation opens its own through
/// the [`Connector`] and closes it before returning.
#[derive(Clone)]
pub struct MssqlMcpServer {
    /// Configuration.
    pub(crate) config: Arc<Config>,

    /// Opens one connection per operation.
    pub(crate) connector: Arc<dyn Connector>,

    /// Decides which statements return rows.
    pub(crate) classifier: Arc<dyn StatementClassifier>,
}

impl MssqlMcpServer {
    /// Create a server that talks to SQL Server over TDS.
    pub fn new(config: Config) -> Self {
        let connector = Arc::new(TdsConnector::new(config.connection.clone()));
        Self::with_connector(config, connector)
    }

    /// Create a server with a caller-supplied connector.
    pub fn with_connector(config: Config, connector: Arc<dyn Connector>) -> Self {
        Self {
            config: Arc::new(config),
            connector,
            classifier: Arc::new(SelectPrefixClassifier),
        }
    }

    /// Replace the statement classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn StatementClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the database target.
    pub fn database_config(&self) -> &DatabaseConfig {
        &self.config.database
    }

    /// Check if non-read statements are rejected.
    pub fn is_read_only(&self) -> bool {
        self.config.security.read_only
    }

    /// Get the statement classifier.
    pub fn classifier(&self) -> &dyn StatementClassifier {
        self.classifier.as_ref()
    }

    /// Open a connection owned by the calling operation.
    pub async fn open_connection(&self) -> Result<Box<dyn DbConnection>, ServerError> {
        self.connector.connect(&self.config.database).await
    }
}

impl std::fmt::Debug for MssqlMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlMcpServer")
            .field("database", &self.config.database)
            .field("read_only", &self.is_read_only())
            .finish_non_exhaustive()
    }
}
