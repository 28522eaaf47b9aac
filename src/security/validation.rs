//! Statement classification.
//!
//! Decides whether a statement is a read (rows come back) or a write (an
//! affected-row count comes back and the transaction is committed). The
//! decision looks at the statement text only; nothing is parsed.

/// Classifies SQL text as a read or a write.
///
/// Alternate dialects can supply their own implementation without touching
/// tool dispatch.
pub trait StatementClassifier: Send + Sync {
    /// Whether `sql` returns rows rather than an affected-row count.
    fn is_read(&self, sql: &str) -> bool;
}

/// Treats a statement as a read when it begins with `SELECT`, ignoring case
/// and leading whitespace.
///
/// `WITH ... SELECT` and `EXEC` are classified as writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectPrefixClassifier;

impl StatementClassifier for SelectPrefixClassifier {
    fn is_read(&self, sql: &str) -> bool {
        starts_with_keyword(sql, "SELECT")
    }
}

/// Case-insensitive prefix test after trimming leading whitespace.
pub fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    sql.trim_start()
        .get(..keyword.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_read() {
        let classifier = SelectPrefixClassifier;
        assert!(classifier.is_read("SELECT * FROM test_table"));
        assert!(classifier.is_read("select 1"));
        assert!(classifier.is_read("  \n\tSeLeCt name FROM t"));
    }

    #[test]
    fn test_other_statements_are_writes() {
        let classifier = SelectPrefixClassifier;
        assert!(!classifier.is_read("UPDATE test_table SET value = 0"));
        assert!(!classifier.is_read("INSERT INTO t VALUES (1)"));
        assert!(!classifier.is_read("CREATE TABLE t (id INT)"));
        assert!(!classifier.is_read("WITH x AS (SELECT 1 AS a) SELECT a FROM x"));
        assert!(!classifier.is_read(""));
        assert!(!classifier.is_read("SEL"));
    }

    #[test]
    fn test_starts_with_keyword_multibyte() {
        assert!(!starts_with_keyword("é SELECT", "SELECT"));
        assert!(!starts_with_keyword("ééé", "SELECT"));
    }
}
