//! In-memory database double shared by the behavioural tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mssql_mcp_server::config::{Config, ConnectionConfig, DatabaseConfig, SecurityConfig};
use mssql_mcp_server::database::{Connector, DbConnection, RowSet, SqlValue};
use mssql_mcp_server::{MssqlMcpServer, ServerError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Everything the mock saw, across all connections it opened.
#[derive(Debug, Default, Clone)]
pub struct Journal {
    pub statements: Vec<String>,
    pub commits: usize,
    pub rollbacks: usize,
    pub opened: usize,
    pub closed: usize,
}

#[derive(Debug)]
struct MockState {
    journal: Mutex<Journal>,
    tables: Vec<String>,
    fail_connect: bool,
    fail_statements: Option<String>,
    rows_affected: u64,
}

/// Connector that answers from fixed data instead of SQL Server.
///
/// - catalog queries return the configured table names
/// - any other read returns `id,name,value` rows `(1,test1,100)`, `(2,test2,200)`
/// - writes report the configured affected-row count (default 2)
#[derive(Debug, Clone)]
pub struct MockConnector {
    state: Arc<MockState>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new(&["test_table1", "test_table2"])
    }
}

impl MockConnector {
    pub fn new(tables: &[&str]) -> Self {
        Self::build(tables, false, None, 2)
    }

    /// Every connection attempt fails.
    pub fn unreachable() -> Self {
        Self::build(&[], true, None, 0)
    }

    /// Connections open, but every statement fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::build(&[], false, Some(message.to_string()), 0)
    }

    pub fn with_rows_affected(self, rows_affected: u64) -> Self {
        let tables: Vec<&str> = self.state.tables.iter().map(String::as_str).collect();
        Self::build(
            &tables,
            self.state.fail_connect,
            self.state.fail_statements.clone(),
            rows_affected,
        )
    }

    fn build(tables: &[&str], fail_connect: bool, fail_statements: Option<String>, rows_affected: u64) -> Self {
        Self {
            state: Arc::new(MockState {
                journal: Mutex::new(Journal::default()),
                tables: tables.iter().map(|t| t.to_string()).collect(),
                fail_connect,
                fail_statements,
                rows_affected,
            }),
        }
    }

    /// Snapshot of the journal.
    pub fn journal(&self) -> Journal {
        self.state.journal.lock().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, config: &DatabaseConfig) -> Result<Box<dyn DbConnection>, ServerError> {
        if self.state.fail_connect {
            return Err(ServerError::connection(format!(
                "Failed to connect to {}",
                config.address()
            )));
        }

        self.state.journal.lock().opened += 1;
        Ok(Box::new(MockConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    state: Arc<MockState>,
}

impl MockConnection {
    fn record(&self, sql: &str) -> Result<(), ServerError> {
        self.state.journal.lock().statements.push(sql.to_string());
        match &self.state.fail_statements {
            Some(message) => Err(ServerError::query_error(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DbConnection for MockConnection {
    async fn query(&mut self, sql: &str) -> Result<RowSet, ServerError> {
        self.record(sql)?;

        if sql.contains("FROM INFORMATION_SCHEMA.TABLES") {
            let mut rows = RowSet::new(["TABLE_NAME"]);
            for table in &self.state.tables {
                rows.push_row(vec![SqlValue::String(table.clone())]);
            }
            return Ok(rows);
        }

        Ok(sample_rows())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, ServerError> {
        self.record(sql)?;
        Ok(self.state.rows_affected)
    }

    async fn commit(&mut self) -> Result<(), ServerError> {
        self.state.journal.lock().commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), ServerError> {
        self.state.journal.lock().rollbacks += 1;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), ServerError> {
        self.state.journal.lock().closed += 1;
        Ok(())
    }
}

/// The two rows every non-catalog read returns.
pub fn sample_rows() -> RowSet {
    let mut rows = RowSet::new(["id", "name", "value"]);
    rows.push_row(vec![
        SqlValue::I32(1),
        SqlValue::String("test1".to_string()),
        SqlValue::I32(100),
    ]);
    rows.push_row(vec![
        SqlValue::I32(2),
        SqlValue::String("test2".to_string()),
        SqlValue::I32(200),
    ]);
    rows
}

pub fn test_config(read_only: bool) -> Config {
    Config {
        database: DatabaseConfig {
            host: "localhost".to_string(),
            user: "test_user".to_string(),
            password: "test_password".to_string(),
            database: "test_db".to_string(),
            port: 1433,
        },
        connection: ConnectionConfig::default(),
        security: SecurityConfig { read_only },
    }
}

pub fn test_server(connector: &MockConnector) -> MssqlMcpServer {
    MssqlMcpServer::with_connector(test_config(false), Arc::new(connector.clone()))
}

pub fn read_only_server(connector: &MockConnector) -> MssqlMcpServer {
    MssqlMcpServer::with_connector(test_config(true), Arc::new(connector.clone()))
}
