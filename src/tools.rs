//! MCP Tools for SQL Server operations.
//!
//! A single tool, `execute_sql`, runs an arbitrary statement. Reads come back
//! as comma-separated rows; anything else is committed and reported as an
//! affected-row count. A failed statement is rolled back.

pub mod inputs;

use crate::constants::{EXECUTE_SQL_TOOL, LOG_QUERY_PREVIEW_LEN};
use crate::database::{release, truncate_for_log, DbConnection};
use crate::error::ServerError;
use crate::server::MssqlMcpServer;
use inputs::ExecuteSqlInput;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use inputs::QUERY_REQUIRED;

/// Describe the tools this server offers.
pub fn list_tools() -> Vec<Tool> {
    vec![Tool::new(
        EXECUTE_SQL_TOOL,
        "Execute an SQL query on the SQL Server",
        Arc::new(ExecuteSqlInput::input_schema()),
    )]
}

/// Dispatch a tool call by name.
pub async fn call_tool(
    server: &MssqlMcpServer,
    name: &str,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, ServerError> {
    if name != EXECUTE_SQL_TOOL {
        return Err(ServerError::unknown_tool(name));
    }

    let input = ExecuteSqlInput::from_arguments(arguments)?;
    let text = execute_sql(server, &input.query).await?;

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Run one statement on a fresh connection and render its outcome.
pub async fn execute_sql(server: &MssqlMcpServer, sql: &str) -> Result<String, ServerError> {
    let is_read = server.classifier().is_read(sql);

    if server.is_read_only() && !is_read {
        return Err(ServerError::validation(
            "Only SELECT statements are allowed in read-only mode",
        ));
    }

    info!("Executing SQL: {}", truncate_for_log(sql, LOG_QUERY_PREVIEW_LEN));

    let mut conn = server.open_connection().await?;

    let result = run_statement(conn.as_mut(), sql, is_read).await;
    let outcome = match result {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Statement failed, rolling back: {}", e);
            if let Err(rollback_err) = conn.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    };

    release(conn, outcome).await
}

async fn run_statement(
    conn: &mut dyn DbConnection,
    sql: &str,
    is_read: bool,
) -> Result<String, ServerError> {
    if is_read {
        let rows = conn.query(sql).await?;
        debug!("Read returned {} rows", rows.rows.len());
        return Ok(rows.to_csv());
    }

    let rows_affected = conn.execute(sql).await?;
    conn.commit().await?;

    Ok(format!(
        "Query executed successfully. Rows affected: {}",
        rows_affected
    ))
}
