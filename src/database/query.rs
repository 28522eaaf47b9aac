//! Query results and their text rendering.

use crate::database::types::SqlValue;

/// Rows returned by a single statement.
///
/// Both columns and rows keep the order the server produced them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column names in order.
    pub columns: Vec<String>,

    /// Row values, positionally aligned with `columns`.
    pub rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    /// Create an empty row set with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<SqlValue>) {
        self.rows.push(row);
    }

    /// Values of the first column, rendered as text.
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first())
            .map(SqlValue::to_display_string)
            .collect()
    }

    /// Format the result as comma-separated text.
    ///
    /// The first line holds the column names, each following line one row.
    /// Each value is rendered with [`SqlValue::to_display_string`]: SQL NULL
    /// becomes `NULL` and binary becomes `0x`-prefixed hex. Values are written
    /// as-is: embedded commas, quotes, and newlines are not escaped, so values
    /// containing them make the output ambiguous. There is no trailing newline.
    pub fn to_csv(&self) -> String {
        if self.columns.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.columns.join(","));

        for row in &self.rows {
            let values: Vec<String> = row.iter().map(SqlValue::to_display_string).collect();
            lines.push(values.join(","));
        }

        lines.join("\n")
    }
}

/// Truncate a string for logging purposes.
pub fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowSet {
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

    #[test]
    fn test_csv_output() {
        assert_eq!(sample().to_csv(), "id,name,value\n1,test1,100\n2,test2,200");
    }

    #[test]
    fn test_csv_header_only_when_no_rows() {
        let rows = RowSet::new(["id", "name"]);
        assert_eq!(rows.to_csv(), "id,name");
    }

    #[test]
    fn test_csv_without_columns_is_empty() {
        assert_eq!(RowSet::default().to_csv(), "");
    }

    #[test]
    fn test_csv_does_not_escape_delimiters() {
        let mut rows = RowSet::new(["note"]);
        rows.push_row(vec![SqlValue::String("value, with comma".to_string())]);
        assert_eq!(rows.to_csv(), "note\nvalue, with comma");
    }

    #[test]
    fn test_csv_renders_null_as_literal() {
        let mut rows = RowSet::new(["id", "note"]);
        rows.push_row(vec![SqlValue::I32(1), SqlValue::Null]);
        assert_eq!(rows.to_csv(), "id,note\n1,NULL");
    }

    #[test]
    fn test_first_column() {
        let mut rows = RowSet::new(["TABLE_NAME"]);
        rows.push_row(vec![SqlValue::String("t1".to_string())]);
        rows.push_row(vec![SqlValue::String("t2".to_string())]);
        assert_eq!(rows.first_column(), vec!["t1", "t2"]);
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("this is a long string", 10), "this is a ...");
        assert_eq!(truncate_for_log("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_for_log("héllo", 2), "h...");
    }
}
