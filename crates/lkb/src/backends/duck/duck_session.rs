//! 🦆📊 DuckDbSession: one in-memory analytical database, scoped to one owner.
//!
//! 🎬 *[a CSV file sits on local disk, freshly downloaded from a bucket. it does not know it is
//! about to become a table. it does not know about GROUP BY. it will learn.]*
//!
//! 🧠 Knowledge graph:
//! - Schema inference is DuckDB's `read_csv_auto` (header names, types by sampling).
//! - Before DuckDB sees a file, `delimited::scan_shape` checks the column-count invariant, so a
//!   ragged file fails loud with `SchemaInference` and leaves no half-built table behind.
//! - Loading into a name that's taken is `TableExists`. The object store overwrites; we don't.
//! - Results come back through Arrow, every value rendered to a string by Arrow's display
//!   formatting. NULL renders as the empty string.
//! - `close()` takes the connection out of the `Option`. Every call after that is `SessionClosed`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use duckdb::Connection;
use duckdb::arrow::util::display::array_value_to_string;
use tracing::{debug, info};

use super::duck_errors::classify;
use crate::common::{ColumnInfo, QueryResult};
use crate::delimited::{record_writer, scan_shape};
use crate::error::{LakeError, LakeResult};

/// 🔒 Double-quote an identifier so table names with spaces (or worse) stay one token.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 🔒 Single-quote a string literal for inlining into SQL.
fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// 🦆 One analytical session. Owns every table loaded into it.
pub struct DuckDbSession {
    conn: Option<Connection>,
}

impl std::fmt::Debug for DuckDbSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbSession")
            .field("open", &self.conn.is_some())
            .finish()
    }
}

impl DuckDbSession {
    /// 🚀 Open a fresh in-memory session. No file, no server, no persistence.
    pub fn open() -> LakeResult<Self> {
        let conn = Connection::open_in_memory().map_err(classify)?;
        info!("🦆 DuckDB session opened (in-memory)");
        Ok(Self { conn: Some(conn) })
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> LakeResult<&Connection> {
        self.conn.as_ref().ok_or(LakeError::SessionClosed)
    }

    /// 🔍 Is `name` bound in this session? Case-insensitive, like DuckDB identifiers.
    pub fn table_exists(&self, name: &str) -> LakeResult<bool> {
        let count: i64 = self
            .conn()?
            .query_row(
                "SELECT count(*) FROM information_schema.tables WHERE lower(table_name) = lower(?)",
                [name],
                |row| row.get(0),
            )
            .map_err(classify)?;
        Ok(count > 0)
    }

    /// 📥 Load a delimited file into a new table. Returns the number of data rows loaded.
    ///
    /// The file is read once up front for the shape check, so it is held in memory briefly.
    pub fn load_delimited_file(&self, table: &str, path: &Path) -> LakeResult<usize> {
        let conn = self.conn()?;
        if self.table_exists(table)? {
            return Err(LakeError::TableExists {
                table: table.to_string(),
            });
        }

        let bytes = std::fs::read(path).map_err(|err| LakeError::IoRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let shape = scan_shape(&bytes).map_err(|err| LakeError::SchemaInference {
            table: table.to_string(),
            message: err.to_string(),
        })?;

        let path_text = path.to_string_lossy().replace('\\', "/");
        let sql = format!(
            "CREATE TABLE {} AS SELECT * FROM read_csv_auto({}, header = true, delim = ',')",
            quote_identifier(table),
            quote_literal(&path_text)
        );
        conn.execute_batch(&sql)
            .map_err(|err| LakeError::SchemaInference {
                table: table.to_string(),
                message: err.to_string(),
            })?;

        // -- 📊 the table is the source of truth for how many rows made it in, not our pre-scan
        let loaded: i64 = conn
            .query_row(
                &format!("SELECT count(*) FROM {}", quote_identifier(table)),
                [],
                |row| row.get(0),
            )
            .map_err(classify)?;
        let loaded = usize::try_from(loaded).unwrap_or_default();
        if loaded != shape.data_rows {
            debug!(
                "🦆 pre-scan counted {} rows in {}, the engine kept {}",
                shape.data_rows,
                path.display(),
                loaded
            );
        }

        info!(
            "🦆 loaded {} ({} columns, {} rows) into table {}",
            path.display(),
            shape.columns,
            loaded,
            table
        );
        Ok(loaded)
    }

    /// 📥 Load an in-memory buffer by staging it to a temp file first.
    ///
    /// The temp file is deleted when this returns, success or not.
    pub fn load_delimited_bytes(&self, table: &str, bytes: &[u8]) -> LakeResult<usize> {
        self.conn()?;
        let mut staged = tempfile::Builder::new()
            .prefix("lkb_")
            .suffix(".csv")
            .tempfile()
            .map_err(|err| LakeError::io_write(std::env::temp_dir(), err))?;
        staged
            .write_all(bytes)
            .and_then(|_| staged.flush())
            .map_err(|err| LakeError::io_write(staged.path(), err))?;
        debug!(
            "🦆 staged {} bytes at {} for table {}",
            bytes.len(),
            staged.path().display(),
            table
        );
        self.load_delimited_file(table, staged.path())
    }

    /// 📊 Run a read query. Values come back stringified, header in `columns`.
    pub fn execute_query(&self, sql: &str) -> LakeResult<QueryResult> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(classify)?;
        let arrow = stmt.query_arrow([]).map_err(classify)?;

        let columns: Vec<String> = arrow
            .get_schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();

        let mut rows = Vec::new();
        for batch in arrow {
            for row in 0..batch.num_rows() {
                let mut values = Vec::with_capacity(batch.num_columns());
                for column in batch.columns() {
                    let value = array_value_to_string(column.as_ref(), row).map_err(|err| {
                        LakeError::TypeMismatch {
                            message: err.to_string(),
                        }
                    })?;
                    values.push(value);
                }
                rows.push(values);
            }
        }

        debug!("🦆 query returned {} rows", rows.len());
        Ok(QueryResult { columns, rows })
    }

    /// 🔧 Run a statement that doesn't return rows (CREATE, DROP, INSERT, ...).
    pub fn execute_statement(&self, sql: &str) -> LakeResult<()> {
        self.conn()?.execute_batch(sql).map_err(classify)?;
        debug!("🦆 executed statement: {}", sql);
        Ok(())
    }

    /// 💾 Run a query and write header + rows to `path` as a delimited file. Returns data rows written.
    pub fn export_query_to_delimited_file(&self, sql: &str, path: &Path) -> LakeResult<usize> {
        let result = self.execute_query(sql)?;

        let file = File::create(path).map_err(|err| LakeError::io_write(path, err))?;
        let mut writer = record_writer(BufWriter::new(file));
        writer
            .write_record(&result.columns)
            .map_err(|err| LakeError::io_write(path, err.into()))?;
        for row in &result.rows {
            writer
                .write_record(row)
                .map_err(|err| LakeError::io_write(path, err.into()))?;
        }
        writer
            .flush()
            .map_err(|err| LakeError::io_write(path, err))?;

        info!(
            "💾 exported {} rows to {}",
            result.row_count(),
            path.display()
        );
        Ok(result.row_count())
    }

    /// 📚 Tables in this session, sorted by name.
    pub fn list_tables(&self) -> LakeResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT table_name FROM information_schema.tables \
                 WHERE table_schema = 'main' ORDER BY table_name",
            )
            .map_err(classify)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(classify)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(classify)?;
        Ok(names)
    }

    /// 🗑️ Drop `name` if it exists. Absent is fine.
    pub fn drop_table(&self, name: &str) -> LakeResult<()> {
        self.execute_statement(&format!("DROP TABLE IF EXISTS {}", quote_identifier(name)))?;
        info!("🗑️ dropped table: {}", name);
        Ok(())
    }

    /// 🏛️ Column names and types of `name`.
    pub fn describe_table(&self, name: &str) -> LakeResult<Vec<ColumnInfo>> {
        if !self.table_exists(name)? {
            return Err(LakeError::UnknownTable {
                message: format!("table '{name}' does not exist in this session"),
            });
        }
        let described = self.execute_query(&format!("DESCRIBE {}", quote_identifier(name)))?;
        let columns = (0..described.row_count())
            .map(|row| ColumnInfo {
                name: described.value(row, "column_name").unwrap_or_default().to_string(),
                column_type: described.value(row, "column_type").unwrap_or_default().to_string(),
            })
            .collect();
        Ok(columns)
    }

    /// 📈 `COUNT(*)` and `AVG(agg_column)` per `group_column`, busiest group first.
    pub fn aggregate_by(
        &self,
        table: &str,
        group_column: &str,
        agg_column: &str,
    ) -> LakeResult<QueryResult> {
        let group = quote_identifier(group_column);
        self.execute_query(&format!(
            "SELECT {group}, COUNT(*) AS count, AVG({}) AS avg_value FROM {} \
             GROUP BY {group} ORDER BY count DESC, {group}",
            quote_identifier(agg_column),
            quote_identifier(table),
        ))
    }

    /// 🔗 Inner equi-join of two tables on one shared column (the join column appears once).
    pub fn join_tables(&self, left: &str, right: &str, column: &str) -> LakeResult<QueryResult> {
        self.execute_query(&format!(
            "SELECT * FROM {} JOIN {} USING ({})",
            quote_identifier(left),
            quote_identifier(right),
            quote_identifier(column)
        ))
    }

    /// 🔒 Release the session. Closing twice is a no-op; using it after is `SessionClosed`.
    pub fn close(&mut self) -> LakeResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        conn.close().map_err(|(_, err)| classify(err))?;
        info!("🦆 DuckDB session closed");
        Ok(())
    }
}

// ============================================================
//  🧪 Tests: a real duck, in RAM, quacking on command
// ============================================================
