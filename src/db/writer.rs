//! SQLite writer - `SheetTable` → replace-mode table

use crate::error::{LoadError, LoadResult};
use crate::types::{CellValue, ColumnInfo, ColumnKind, SheetTable};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags, Transaction};
use std::path::Path;
use tracing::debug;

/// Owns the destination connection for the duration of one import.
///
/// The connection closes when the writer is dropped.
pub struct SqliteWriter {
    conn: Connection,
    path: String,
}

impl SqliteWriter {
    /// Open (or create) the database file at `path`.
    ///
    /// The schema is probed once so that a file which is not a SQLite
    /// database fails here instead of on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref().display().to_string();
        let conn = Connection::open(&path).map_err(|source| LoadError::Connection {
            path: path.clone(),
            source,
        })?;
        Self::probe(conn, path)
    }

    /// Open an existing database file for inspection only; a missing file
    /// is a `Connection` error and is never created.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref().display().to_string();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| LoadError::Connection {
            path: path.clone(),
            source,
        })?;
        Self::probe(conn, path)
    }

    pub fn open_in_memory() -> LoadResult<Self> {
        let path = ":memory:".to_string();
        let conn = Connection::open_in_memory().map_err(|source| LoadError::Connection {
            path: path.clone(),
            source,
        })?;
        Self::probe(conn, path)
    }

    fn probe(conn: Connection, path: String) -> LoadResult<Self> {
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .map_err(|source| LoadError::Connection {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path, tables, "database opened");
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Drop `table` if it exists, recreate it from `data` and insert every row.
    ///
    /// Nothing is durable until [`PendingWrite::commit`] is called; dropping
    /// the returned value rolls the transaction back.
    pub fn write_table(&mut self, table: &str, data: &SheetTable) -> LoadResult<PendingWrite<'_>> {
        let write_err = |source: rusqlite::Error| LoadError::Write {
            table: table.to_string(),
            source,
        };

        let tx = self.conn.transaction().map_err(write_err)?;

        tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))
            .map_err(write_err)?;
        tx.execute_batch(&create_table_sql(table, data))
            .map_err(write_err)?;

        let rows = data.row_count();
        {
            let mut stmt = tx.prepare(&insert_sql(table, data)).map_err(write_err)?;
            for row in 0..rows {
                let values = data
                    .columns
                    .iter()
                    .map(|col| sql_value(&col.values[row], col.kind));
                stmt.execute(params_from_iter(values)).map_err(write_err)?;
            }
        }
        debug!(table, rows, columns = data.column_count(), "rows staged");

        Ok(PendingWrite {
            tx,
            table: table.to_string(),
            rows,
        })
    }

    /// Column metadata of `table` in ordinal order (empty if it does not exist)
    pub fn table_info(&self, table: &str) -> LoadResult<Vec<ColumnInfo>> {
        let read_err = |source: rusqlite::Error| LoadError::Write {
            table: table.to_string(),
            source,
        };

        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))
            .map_err(read_err)?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    declared_type: row.get(2)?,
                })
            })
            .map_err(read_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        Ok(columns)
    }

    pub fn row_count(&self, table: &str) -> LoadResult<usize> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
                [],
                |row| row.get(0),
            )
            .map_err(|source| LoadError::Write {
                table: table.to_string(),
                source,
            })?;
        Ok(count as usize)
    }
}

/// Uncommitted table write
pub struct PendingWrite<'conn> {
    tx: Transaction<'conn>,
    table: String,
    rows: usize,
}

impl PendingWrite<'_> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Make the write durable, returning the number of rows written
    pub fn commit(self) -> LoadResult<usize> {
        let PendingWrite { tx, table, rows } = self;
        tx.commit()
            .map_err(|source| LoadError::Write { table, source })?;
        Ok(rows)
    }
}

/// Double-quote an identifier for interpolation into SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(table: &str, data: &SheetTable) -> String {
    let columns: Vec<String> = data
        .columns
        .iter()
        .map(|col| format!("{} {}", quote_identifier(&col.name), col.kind.sql_type()))
        .collect();
    format!(
        "CREATE TABLE {} ({})",
        quote_identifier(table),
        columns.join(", ")
    )
}

fn insert_sql(table: &str, data: &SheetTable) -> String {
    let names: Vec<String> = data
        .columns
        .iter()
        .map(|col| quote_identifier(&col.name))
        .collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Storage value for a cell in a column of the given kind
fn sql_value(value: &CellValue, kind: ColumnKind) -> Value {
    match (value, kind) {
        (CellValue::Null, _) => Value::Null,
        (v, ColumnKind::Text) => v.to_text().map(Value::Text).unwrap_or(Value::Null),
        (CellValue::Integer(i), ColumnKind::Real) => Value::Real(*i as f64),
        (CellValue::Integer(i), _) => Value::Integer(*i),
        (CellValue::Real(f), _) => Value::Real(*f),
        (CellValue::Boolean(b), _) => Value::Integer(i64::from(*b)),
        (CellValue::Text(s), _) | (CellValue::DateTime(s), _) => Value::Text(s.clone()),
    }
}
