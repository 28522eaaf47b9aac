//! # MSSQL MCP Server
//!
//! A Model Context Protocol (MCP) server that exposes a Microsoft SQL Server
//! database to MCP clients.
//!
//! This crate provides:
//! - **Resources**: one `mssql://<table>/data` resource per base table, read
//!   as a CSV preview of its first rows
//! - **Tools**: `execute_sql`, which runs an arbitrary statement and returns
//!   either CSV rows or an affected-row count
//!
//! ## Architecture
//!
//! Every request opens its own database connection through a
//! [`database::Connector`] and closes it before responding. The connector is
//! injected into [`MssqlMcpServer`], so tests can replace SQL Server with an
//! in-memory double.

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod handlers;
pub mod resources;
pub mod security;
pub mod server;
pub mod tools;

pub use config::{get_db_config, Config, DatabaseConfig};
pub use error::ServerError;
pub use server::MssqlMcpServer;
