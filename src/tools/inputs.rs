//! Tool input types with JSON Schema generation.

use crate::error::ServerError;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned when `execute_sql` is called without a usable query.
pub const QUERY_REQUIRED: &str = "Query is required";

/// Input for the `execute_sql` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteSqlInput {
    /// The SQL statement to execute.
    #[schemars(description = "The SQL query to execute")]
    pub query: String,
}

impl ExecuteSqlInput {
    /// Parse tool-call arguments.
    ///
    /// Fails when `query` is absent, not a string, or blank.
    pub fn from_arguments(arguments: Option<JsonObject>) -> Result<Self, ServerError> {
        let arguments = Value::Object(arguments.unwrap_or_default());
        let input: Self = serde_json::from_value(arguments)
            .map_err(|_| ServerError::invalid_argument(QUERY_REQUIRED))?;

        if input.query.trim().is_empty() {
            return Err(ServerError::invalid_argument(QUERY_REQUIRED));
        }

        Ok(input)
    }

    /// JSON Schema for the tool's input, as advertised in `tools/list`.
    pub fn input_schema() -> JsonObject {
        match serde_json::to_value(schemars::schema_for!(ExecuteSqlInput)) {
            Ok(Value::Object(schema)) => schema,
            _ => JsonObject::new(),
        }
    }
}
