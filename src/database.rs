//! Database connectivity and query execution.

mod connection;
mod query;
pub mod types;

pub use connection::{release, Connector, DbConnection, RawConnection, TdsConnector};
pub use query::{truncate_for_log, RowSet};
pub use types::{SqlValue, TypeMapper};
