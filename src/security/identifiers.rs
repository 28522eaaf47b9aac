//! SQL Server identifier quoting.
//!
//! Uses SQL Server's bracket notation `[identifier]` so that a table name
//! taken from a resource URI is always interpreted as a single identifier.

use crate::error::ServerError;

/// Maximum length for SQL Server identifiers.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Quote a single table name using bracket notation.
///
/// Embedded right brackets are doubled. Dots are kept inside the brackets,
/// so `a.b` names one table called `a.b`, not table `b` in schema `a`.
///
/// # Examples
///
/// ```
/// use mssql_mcp_server::security::quote_identifier;
///
/// assert_eq!(quote_identifier("Users").unwrap(), "[Users]");
/// assert_eq!(quote_identifier("My Table").unwrap(), "[My Table]");
/// assert_eq!(quote_identifier("odd]name").unwrap(), "[odd]]name]");
/// ```
pub fn quote_identifier(identifier: &str) -> Result<String, ServerError> {
    validate_length(identifier)?;
    Ok(format!("[{}]", identifier.replace(']', "]]")))
}

fn validate_length(identifier: &str) -> Result<(), ServerError> {
    if identifier.trim().is_empty() {
        return Err(ServerError::invalid_argument("Identifier cannot be empty"));
    }

    if identifier.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(ServerError::invalid_argument(format!(
            "Identifier exceeds maximum length of {} characters",
            MAX_IDENTIFIER_LENGTH
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_simple_identifier() {
        assert_eq!(quote_identifier("Users").unwrap(), "[Users]");
        assert_eq!(quote_identifier("test_table").unwrap(), "[test_table]");
    }

    #[test]
    fn test_quote_keeps_dots_inside() {
        assert_eq!(quote_identifier("dbo.Users").unwrap(), "[dbo.Users]");
    }

    #[test]
    fn test_quote_with_brackets() {
        assert_eq!(quote_identifier("Table[1]").unwrap(), "[Table[1]]]");
    }

    #[test]
    fn test_empty_identifier() {
        assert!(quote_identifier("").is_err());
        assert!(quote_identifier("   ").is_err());
    }

    #[test]
    fn test_overlong_identifier() {
        let name = "x".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(quote_identifier(&name).is_err());
        assert!(quote_identifier(&name[1..]).is_ok());
    }

    #[test]
    fn test_quote_neutralises_punctuation() {
        // Nothing inside the brackets can end the identifier early
        assert_eq!(quote_identifier("O'Brien").unwrap(), "[O'Brien]");
        assert_eq!(quote_identifier("t];DROP TABLE x--").unwrap(), "[t]];DROP TABLE x--]");
    }
}
