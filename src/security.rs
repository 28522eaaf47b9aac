//! Identifier quoting and statement classification.

mod identifiers;
mod validation;

pub use identifiers::{quote_identifier, MAX_IDENTIFIER_LENGTH};
pub use validation::{starts_with_keyword, SelectPrefixClassifier, StatementClassifier};
