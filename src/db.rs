//! SQLite session owned by the REPL.
//!
//! Wraps a [`rusqlite::Connection`] and turns executed statements into
//! display-ready results: rows-returning statements collect column names and
//! stringified values, everything else reports its affected row count.
//! Introspection queries over `sqlite_master` back the dot commands and the
//! completer's table-name vocabulary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

const BLOB_PREVIEW_BYTES: usize = 16;

/// Result of executing one statement, reduced to what the REPL prints.
#[derive(Debug, PartialEq, Eq)]
pub enum Execution {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Affected {
        count: usize,
    },
}

pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a file-backed database, creating the file if it does not exist,
    /// or a transient in-memory database when no path is given. Foreign key
    /// enforcement is switched on in both cases so constraint behavior does
    /// not depend on where the data lives.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let conn = match path {
            Some(path) => Connection::open(path)
                .with_context(|| format!("failed to open database at {}", path.display()))?,
            None => Connection::open_in_memory().context("failed to open in-memory database")?,
        };
        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("failed to enable foreign keys")?;

        Ok(Database {
            conn,
            path: path.map(Path::to_path_buf),
        })
    }

    /// `None` means the session is in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Execute a single SQL statement. Statements that return columns go
    /// through the query path and collect every row; all others go through
    /// [`Connection::execute`], which also rejects trailing statements.
    pub fn execute(&self, sql: &str) -> Result<Execution> {
        let mut stmt = self.conn.prepare(sql)?;

        if stmt.column_count() == 0 {
            drop(stmt);
            let count = self.conn.execute(sql, [])?;
            log::debug!("statement affected {count} rows");
            return Ok(Execution::Affected { count });
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut rows = Vec::new();
        let mut raw = stmt.query([])?;
        while let Some(row) = raw.next()? {
            let mut rendered = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                rendered.push(format_value(row.get_ref(i)?));
            }
            rows.push(rendered);
        }
        log::debug!("query returned {} rows", rows.len());

        Ok(Execution::Rows { columns, rows })
    }

    /// Names of user tables and views, sorted. SQLite's internal objects are
    /// hidden, matching what the stock sqlite3 shell shows.
    pub fn table_names(&self) -> Result<Vec<String>> {
        self.select_first_column(
            "SELECT name FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
            None,
        )
        .context("failed to list tables")
    }

    /// CREATE statements for one table (and its indexes) or for everything.
    pub fn schema_sql(&self, table: Option<&str>) -> Result<Vec<String>> {
        match table {
            Some(table) => self
                .select_first_column(
                    "SELECT sql FROM sqlite_master
                     WHERE tbl_name = ?1 AND sql NOT NULL
                     ORDER BY rowid",
                    Some(table),
                )
                .with_context(|| format!("failed to read schema for '{table}'")),
            None => self
                .select_first_column(
                    "SELECT sql FROM sqlite_master
                     WHERE sql NOT NULL AND name NOT LIKE 'sqlite_%'
                     ORDER BY rowid",
                    None,
                )
                .context("failed to read schema"),
        }
    }

    /// `INDEX name ON table` lines, optionally restricted to one table.
    pub fn indexes(&self, table: Option<&str>) -> Result<Vec<String>> {
        let (sql, param) = match table {
            Some(table) => (
                "SELECT name || ' ON ' || tbl_name FROM sqlite_master
                 WHERE type = 'index' AND tbl_name = ?1 AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
                Some(table),
            ),
            None => (
                "SELECT name || ' ON ' || tbl_name FROM sqlite_master
                 WHERE type = 'index' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
                None,
            ),
        };
        self.select_first_column(sql, param)
            .context("failed to list indexes")
    }

    fn select_first_column(&self, sql: &str, param: Option<&str>) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let collected = match param {
            Some(param) => stmt
                .query_map([param], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(collected)
    }
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => {
            let formatted = format!("{f:.6}");
            let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
            trimmed.to_string()
        }
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        ValueRef::Blob(bytes) => format_blob(bytes),
    }
}

fn format_blob(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(2 + 2 * BLOB_PREVIEW_BYTES);
    hex.push_str("x'");
    for byte in bytes.iter().take(BLOB_PREVIEW_BYTES) {
        hex.push_str(&format!("{byte:02X}"));
    }
    hex.push('\'');
    if bytes.len() > BLOB_PREVIEW_BYTES {
        hex.push_str(&format!(" ({} bytes)", bytes.len()));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> Database {
        Database::open(None).unwrap()
    }

    #[test]
    fn select_collects_headers_and_rows() {
        let db = scratch();
        db.execute("CREATE TABLE t (id INTEGER, name TEXT)").unwrap();
        db.execute("INSERT INTO t VALUES (1, 'a'), (2, NULL)").unwrap();

        match db.execute("SELECT id, name FROM t ORDER BY id").unwrap() {
            Execution::Rows { columns, rows } => {
                assert_eq!(columns, vec!["id", "name"]);
                assert_eq!(rows, vec![vec!["1", "a"], vec!["2", "NULL"]]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn dml_reports_affected_count() {
        let db = scratch();
        db.execute("CREATE TABLE t (id INTEGER)").unwrap();
        let result = db.execute("INSERT INTO t VALUES (1), (2), (3)").unwrap();
        assert_eq!(result, Execution::Affected { count: 3 });
    }

    #[test]
    fn malformed_statement_is_an_error_not_a_panic() {
        let db = scratch();
        assert!(db.execute("SELEC 1").is_err());
    }

    #[test]
    fn table_names_hide_sqlite_internals() {
        let db = scratch();
        db.execute("CREATE TABLE b (id INTEGER PRIMARY KEY AUTOINCREMENT)")
            .unwrap();
        db.execute("CREATE TABLE a (id INTEGER)").unwrap();

        // AUTOINCREMENT creates sqlite_sequence, which must stay hidden.
        assert_eq!(db.table_names().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn schema_for_one_table_includes_its_indexes() {
        let db = scratch();
        db.execute("CREATE TABLE t (id INTEGER)").unwrap();
        db.execute("CREATE INDEX t_id ON t (id)").unwrap();
        db.execute("CREATE TABLE other (id INTEGER)").unwrap();

        let schema = db.schema_sql(Some("t")).unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema[0].contains("CREATE TABLE t"));
        assert!(schema[1].contains("CREATE INDEX t_id"));
    }

    #[test]
    fn real_values_trim_trailing_zeros() {
        let db = scratch();
        match db.execute("SELECT 1.5, 2.0").unwrap() {
            Execution::Rows { rows, .. } => {
                assert_eq!(rows[0], vec!["1.5", "2"]);
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn blob_values_render_as_bounded_hex() {
        let db = scratch();
        match db.execute("SELECT x'00FF'").unwrap() {
            Execution::Rows { rows, .. } => assert_eq!(rows[0][0], "x'00FF'"),
            other => panic!("expected rows, got {other:?}"),
        }

        match db.execute("SELECT zeroblob(32)").unwrap() {
            Execution::Rows { rows, .. } => {
                assert!(rows[0][0].ends_with("(32 bytes)"));
            }
            other => panic!("expected rows, got {other:?}"),
        }
    }
}
