//! Connectivity check for SQL Server.
//!
//! Connects with the given credentials, prints the server version, and exits
//! with status 0 on success or 1 on failure.

use clap::Parser;
use mssql_mcp_server::config::{ConnectionConfig, DatabaseConfig};
use mssql_mcp_server::constants::DEFAULT_PORT;
use mssql_mcp_server::database::{release, Connector, TdsConnector};
use mssql_mcp_server::ServerError;
use std::process::ExitCode;
use std::time::Duration;

/// Test the connection to a SQL Server instance.
#[derive(Debug, Parser)]
#[command(name = "mssql-test-connection", version, about)]
struct Args {
    /// SQL Server hostname
    #[arg(long, env = "MSSQL_SERVER", default_value = "localhost")]
    server: String,

    /// SQL Server login
    #[arg(long, env = "MSSQL_USER")]
    user: String,

    /// SQL Server password
    #[arg(long, env = "MSSQL_PASSWORD", hide_env_values = true)]
    password: String,

    /// Database name
    #[arg(long, env = "MSSQL_DATABASE")]
    database: String,

    /// SQL Server port
    #[arg(long, env = "MSSQL_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Trust the server certificate (for self-signed certs)
    #[arg(long)]
    trust_cert: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    println!(
        "Connecting to {}:{}/{} as {}...",
        args.server, args.port, args.database, args.user
    );

    match server_version(&args).await {
        Ok(version) => {
            println!("Connection successful!");
            println!("SQL Server Version: {}", version);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error connecting to SQL Server: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn server_version(args: &Args) -> Result<String, ServerError> {
    let target = DatabaseConfig {
        host: args.server.clone(),
        user: args.user.clone(),
        password: args.password.clone(),
        database: args.database.clone(),
        port: args.port,
    };

    let connector = TdsConnector::new(ConnectionConfig {
        connect_timeout: Duration::from_secs(args.timeout),
        trust_server_certificate: args.trust_cert,
        ..ConnectionConfig::default()
    });

    let mut conn = connector.connect(&target).await?;
    let outcome = conn.query("SELECT @@VERSION").await.map(|rows| {
        rows.first_column()
            .into_iter()
            .next()
            .unwrap_or_else(|| "unknown".to_string())
    });
    release(conn, outcome).await
}
