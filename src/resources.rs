//! MCP Resources for SQL Server tables.
//!
//! Every base table in the configured database is exposed as one resource.
//! Reading it returns a preview of the table's rows as comma-separated text.
//!
//! ## URI Scheme
//!
//! - `mssql://{table}/data` - First rows of `{table}`
//!
//! The table name is everything between the scheme and the trailing `/data`,
//! so names containing `/` survive the trip. Without that suffix, the name
//! runs up to the first `/`. Names are bracket-quoted when read, so any name
//! the catalog lists can be read back.

use crate::constants::{
    RESOURCE_DATA_PATH, RESOURCE_MIME_TYPE, RESOURCE_PREVIEW_ROWS, RESOURCE_SCHEME,
};
use crate::database::release;
use crate::error::ServerError;
use crate::security::quote_identifier;
use crate::server::MssqlMcpServer;
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};
use tracing::{debug, warn};

/// Catalog query for base tables; views are excluded.
pub const LIST_TABLES_QUERY: &str =
    "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE'";

/// List one resource per base table.
///
/// Never fails: a connection or catalog error is logged and an empty list
/// is returned instead.
pub async fn list_resources(server: &MssqlMcpServer) -> Vec<Resource> {
    match list_table_names(server).await {
        Ok(tables) => {
            debug!("Found {} tables", tables.len());
            tables.iter().map(|t| table_resource(t)).collect()
        }
        Err(e) => {
            warn!("Failed to list resources: {}", e);
            Vec::new()
        }
    }
}

async fn list_table_names(server: &MssqlMcpServer) -> Result<Vec<String>, ServerError> {
    let mut conn = server.open_connection().await?;
    let outcome = conn
        .query(LIST_TABLES_QUERY)
        .await
        .map(|rows| rows.first_column());
    release(conn, outcome).await
}

/// Read a table resource by URI.
pub async fn read_resource(
    server: &MssqlMcpServer,
    uri: &str,
) -> Result<ReadResourceResult, ServerError> {
    let content = read_table_preview(server, uri).await?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(content, uri.to_string())],
    })
}

/// Read the first rows of the table named by `uri`, formatted as CSV.
pub async fn read_table_preview(server: &MssqlMcpServer, uri: &str) -> Result<String, ServerError> {
    let table = parse_resource_uri(uri)?;
    let quoted = quote_identifier(&table).map_err(|e| ServerError::invalid_uri(uri, reason(e)))?;
    let sql = format!("SELECT TOP {} * FROM {}", RESOURCE_PREVIEW_ROWS, quoted);

    debug!("Reading resource {}", uri);

    let mut conn = server.open_connection().await?;
    let outcome = conn
        .query(&sql)
        .await
        .map(|rows| rows.to_csv())
        .map_err(|e| ServerError::resource(uri, reason(e)));
    release(conn, outcome).await
}

/// Extract the table name from a resource URI.
///
/// # Examples
///
/// ```
/// use mssql_mcp_server::resources::parse_resource_uri;
///
/// assert_eq!(parse_resource_uri("mssql://orders/data").unwrap(), "orders");
/// assert!(parse_resource_uri("postgres://orders/data").is_err());
/// ```
pub fn parse_resource_uri(uri: &str) -> Result<String, ServerError> {
    let path = uri.strip_prefix(RESOURCE_SCHEME).ok_or_else(|| {
        ServerError::invalid_uri(uri, format!("URI must start with '{}'", RESOURCE_SCHEME))
    })?;

    let data_suffix = format!("/{}", RESOURCE_DATA_PATH);
    let table = match path.strip_suffix(data_suffix.as_str()) {
        Some(table) => table,
        None => path.split('/').next().unwrap_or_default(),
    };

    if table.is_empty() {
        return Err(ServerError::invalid_uri(uri, "missing table name"));
    }

    Ok(table.to_string())
}

/// Build the resource URI for a table.
pub fn table_uri(table: &str) -> String {
    format!("{}{}/{}", RESOURCE_SCHEME, table, RESOURCE_DATA_PATH)
}

/// Create the resource definition for a table.
fn table_resource(table: &str) -> Resource {
    let mut resource = RawResource::new(table_uri(table), format!("Table: {}", table));
    resource.description = Some(format!("Data in table: {}", table));
    resource.mime_type = Some(RESOURCE_MIME_TYPE.to_string());
    resource.no_annotation()
}

/// The bare message of an error, without its category prefix.
fn reason(e: ServerError) -> String {
    match e {
        ServerError::InvalidArgument(msg) => msg,
        ServerError::QueryExecution { message, .. } => message,
        other => other.to_string(),
    }
}
