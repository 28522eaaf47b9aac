//! Connection gateway for SQL Server.
//!
//! Every operation opens its own connection through a [`Connector`], uses it,
//! and closes it with [`release`]. The production connector speaks TDS via
//! tiberius; tests substitute an in-memory connector.

use crate::config::{ConnectionConfig, DatabaseConfig};
use crate::constants::LOG_QUERY_PREVIEW_LEN;
use crate::database::query::{truncate_for_log, RowSet};
use crate::database::types::TypeMapper;
use crate::error::ServerError;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use std::future::Future;
use std::time::Duration;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, QueryItem};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, warn};

/// Type alias for a raw tiberius connection.
pub type RawConnection = Client<Compat<TcpStream>>;

/// Opens database connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish a new connection to the configured database.
    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn DbConnection>, ServerError>;
}

/// A single open database connection owned by one operation.
#[async_trait]
pub trait DbConnection: Send {
    /// Run a statement and drain its first result set.
    async fn query(&mut self, sql: &str) -> Result<RowSet, ServerError>;

    /// Run a statement and return the number of affected rows.
    async fn execute(&mut self, sql: &str) -> Result<u64, ServerError>;

    /// Commit the open transaction, if any.
    async fn commit(&mut self) -> Result<(), ServerError>;

    /// Roll back the open transaction, if any.
    async fn rollback(&mut self) -> Result<(), ServerError>;

    /// Close the connection.
    async fn close(self: Box<Self>) -> Result<(), ServerError>;
}

/// Close `conn` and hand back the operation's outcome.
///
/// A failure to close is logged and never replaces `outcome`.
pub async fn release<T>(
    conn: Box<dyn DbConnection>,
    outcome: Result<T, ServerError>,
) -> Result<T, ServerError> {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection: {}", e);
    }
    outcome
}

/// [`Connector`] that speaks TDS to a real SQL Server.
#[derive(Debug, Clone)]
pub struct TdsConnector {
    options: ConnectionConfig,
}

impl TdsConnector {
    /// Create a connector with the given transport and timeout settings.
    pub fn new(options: ConnectionConfig) -> Self {
        Self { options }
    }

    /// Build the tiberius client configuration for a database target.
    pub fn client_config(&self, db_config: &DatabaseConfig) -> Config {
        let mut config = Config::new();

        config.host(&db_config.host);
        config.port(db_config.port);
        config.database(&db_config.database);
        config.authentication(AuthMethod::sql_server(&db_config.user, &db_config.password));

        if self.options.encrypt {
            config.encryption(EncryptionLevel::Required);
        } else {
            config.encryption(EncryptionLevel::Off);
        }

        if self.options.trust_server_certificate {
            config.trust_cert();
        }

        config.application_name(&self.options.application_name);

        config
    }

    /// Establish a raw tiberius connection, bounded by the connect timeout.
    pub async fn open_raw(&self, db_config: &DatabaseConfig) -> Result<RawConnection, ServerError> {
        let address = db_config.address();
        let config = self.client_config(db_config);

        debug!("Creating connection to {}", address);

        let connect = async {
            let tcp = TcpStream::connect(&address).await.map_err(|e| {
                let message = format!("Failed to connect to {}: {}", address, e);
                ServerError::connection_with_source(message, e)
            })?;

            tcp.set_nodelay(true)
                .map_err(|e| ServerError::connection(format!("Failed to set TCP_NODELAY: {}", e)))?;

            Client::connect(config, tcp.compat_write())
                .await
                .map_err(|e| ServerError::connection(format!("Failed to connect to SQL Server: {}", e)))
        };

        let limit = self.options.connect_timeout;
        let client = if limit.is_zero() {
            connect.await?
        } else {
            tokio::time::timeout(limit, connect)
                .await
                .map_err(|_| ServerError::timeout(limit.as_secs()))??
        };

        debug!("Connection established successfully");
        Ok(client)
    }
}

#[async_trait]
impl Connector for TdsConnector {
    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn DbConnection>, ServerError> {
        let client = self.open_raw(config).await?;
        let mut conn = TdsConnection {
            client,
            query_timeout: self.options.query_timeout,
        };

        // Writes stay pending until an explicit commit.
        conn.run_batch("SET IMPLICIT_TRANSACTIONS ON")
            .await
            .map_err(|e| ServerError::connection(format!("Failed to initialise session: {}", e)))?;

        Ok(Box::new(conn))
    }
}

/// An open TDS connection.
struct TdsConnection {
    client: RawConnection,
    query_timeout: Duration,
}

impl TdsConnection {
    /// Run a batch and discard any results.
    async fn run_batch(&mut self, sql: &str) -> Result<(), ServerError> {
        let limit = self.query_timeout;
        let client = &mut self.client;
        with_timeout(limit, async move {
            client.simple_query(sql).await?.into_results().await?;
            Ok::<_, tiberius::error::Error>(())
        })
        .await
    }
}

#[async_trait]
impl DbConnection for TdsConnection {
    async fn query(&mut self, sql: &str) -> Result<RowSet, ServerError> {
        debug!("Executing query: {}", truncate_for_log(sql, LOG_QUERY_PREVIEW_LEN));

        let limit = self.query_timeout;
        let client = &mut self.client;
        let result = with_timeout(limit, async move {
            let mut stream = client.simple_query(sql).await?;
            let mut result = RowSet::default();

            // The stream must be drained completely before the connection is reused.
            while let Some(item) = stream.try_next().await? {
                match item {
                    QueryItem::Metadata(meta) if meta.result_index() == 0 => {
                        result.columns = meta
                            .columns()
                            .iter()
                            .map(|col| col.name().to_string())
                            .collect();
                    }
                    QueryItem::Row(row) if row.result_index() == 0 => {
                        result.rows.push(TypeMapper::extract_row(&row));
                    }
                    _ => {}
                }
            }

            Ok::<_, tiberius::error::Error>(result)
        })
        .await?;

        debug!("Query completed: {} rows", result.rows.len());
        Ok(result)
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, ServerError> {
        debug!("Executing non-query: {}", truncate_for_log(sql, LOG_QUERY_PREVIEW_LEN));

        let limit = self.query_timeout;
        let client = &mut self.client;
        let rows_affected = with_timeout(limit, async move {
            let result = client.execute(sql, &[]).await?;
            Ok::<_, tiberius::error::Error>(result.rows_affected().iter().sum::<u64>())
        })
        .await?;

        debug!("Non-query completed: {} rows affected", rows_affected);
        Ok(rows_affected)
    }

    async fn commit(&mut self) -> Result<(), ServerError> {
        self.run_batch("IF @@TRANCOUNT > 0 COMMIT TRANSACTION").await
    }

    async fn rollback(&mut self) -> Result<(), ServerError> {
        self.run_batch("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION").await
    }

    async fn close(self: Box<Self>) -> Result<(), ServerError> {
        self.client
            .close()
            .await
            .map_err(|e| ServerError::connection(format!("Failed to close connection: {}", e)))
    }
}

/// Await a driver future, failing with [`ServerError::Timeout`] once `limit` elapses.
///
/// A zero limit disables the timeout.
async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, ServerError>
where
    F: Future<Output = Result<T, tiberius::error::Error>>,
{
    if limit.is_zero() {
        return fut.await.map_err(ServerError::from);
    }

    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ServerError::from),
        Err(_) => Err(ServerError::timeout(limit.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            user: "sa".to_string(),
            password: "test".to_string(),
            database: "master".to_string(),
            port: 1433,
        }
    }

    #[test]
    fn test_client_config() {
        let connector = TdsConnector::new(ConnectionConfig::default());
        let _config = connector.client_config(&test_db_config());
        // Config doesn't expose getters, so we just verify it doesn't panic
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: Result<(), ServerError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, tiberius::error::Error>(())
        })
        .await;
        assert!(matches!(result, Err(ServerError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_with_timeout_zero_disables_limit() {
        let result = with_timeout(Duration::ZERO, async { Ok::<_, tiberius::error::Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        let connector = TdsConnector::new(ConnectionConfig {
            connect_timeout: Duration::from_secs(5),
            ..ConnectionConfig::default()
        });
        let mut config = test_db_config();
        config.host = "127.0.0.1".to_string();
        config.port = 1;

        match connector.connect(&config).await {
            Err(err @ ServerError::Connection { .. }) => {
                let text = err.to_string();
                assert!(text.contains("127.0.0.1:1"));
                // OS cause survives into the client-facing text
                assert!(text.to_lowercase().contains("refused"), "{}", text);
            }
            Err(other) => panic!("Expected connection error, got {}", other),
            Ok(_) => panic!("Expected connection to port 1 to fail"),
        }
    }
}
