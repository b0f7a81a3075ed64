//! 📦 Common data structures: the things that cross module lines.
//!
//! 🎬 *[a query runs. rows come back. each value has been stringified for uniform display,
//! like a wedding where everyone was told to wear beige.]*
//!
//! `QueryResult` is what the engine hands back, what the supervisor prints, and what the
//! export serializes. `PresignMethod` is what you ask the store to sign. Nobody here does I/O.

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

/// 📄 Content type for every delimited object we upload.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// 📊 A query result: column names plus rows of stringified values.
///
/// NULLs arrive as empty strings. Rows are in the order the engine produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 🏷️ Header row first, then data rows. The shape the result has "conceptually".
    pub fn with_header(&self) -> Vec<Vec<String>> {
        let mut all = Vec::with_capacity(self.rows.len() + 1);
        all.push(self.columns.clone());
        all.extend(self.rows.iter().cloned());
        all
    }

    /// 🔍 Position of a column by name, case-insensitive like the engine.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    /// 🎯 Value at `(row, column name)`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// 🍽️ Render as a comfy table for humans. Machines should use `rows`.
    pub fn render_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(self.columns.iter().map(Cell::new));
        for row in &self.rows {
            table.add_row(row.iter().map(Cell::new));
        }
        table
    }
}

/// 🏛️ One column as the engine describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: String,
}

/// ✍️ Which HTTP verb a presigned URL is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresignMethod {
    #[default]
    Get,
    Put,
    Delete,
}

impl std::fmt::Display for PresignMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            PresignMethod::Get => "GET",
            PresignMethod::Put => "PUT",
            PresignMethod::Delete => "DELETE",
        };
        write!(f, "{verb}")
    }
}
