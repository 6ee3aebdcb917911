use std::collections::VecDeque;
use std::sync::Arc;

use rusqlite::Connection;

use crate::driver::{DriverConnection, DriverCursor};
use crate::error::WarehouseError;
use crate::types::{Parameters, SqlValue};

use super::params::{extract_value, to_sqlite_value};

/// One `rusqlite` connection with DBAPI-style transaction handling: a
/// transaction begins implicitly at the first statement and ends at
/// commit/rollback.
pub struct SqliteConnection {
    conn: Option<Connection>,
    in_transaction: bool,
}

impl SqliteConnection {
    pub(crate) fn open(path: &str) -> Result<Self, WarehouseError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Some(conn),
            in_transaction: false,
        })
    }

    fn conn(&mut self) -> Result<&mut Connection, WarehouseError> {
        self.conn
            .as_mut()
            .ok_or_else(|| WarehouseError::ConnectionError("connection is closed".to_string()))
    }
}

impl DriverConnection for SqliteConnection {
    type Cursor = SqliteCursor;

    fn execute(&mut self, sql: &str, params: &Parameters) -> Result<Self::Cursor, WarehouseError> {
        if !self.in_transaction {
            self.conn()?.execute_batch("BEGIN")?;
            self.in_transaction = true;
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        bind_named(&mut stmt, params)?;

        if stmt.column_count() > 0 {
            let columns: Arc<Vec<String>> = Arc::new(
                stmt.column_names()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            );
            let mut buffered = VecDeque::new();
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(columns.len());
                for idx in 0..columns.len() {
                    values.push(extract_value(row, idx)?);
                }
                buffered.push_back(values);
            }
            Ok(SqliteCursor::with_rows(columns, buffered))
        } else {
            let affected = stmt.raw_execute()?;
            Ok(SqliteCursor::for_dml(affected))
        }
    }

    fn commit(&mut self) -> Result<(), WarehouseError> {
        if self.in_transaction {
            self.conn()?.execute_batch("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), WarehouseError> {
        if self.in_transaction {
            self.conn()?.execute_batch("ROLLBACK")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), WarehouseError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| WarehouseError::Sqlite(err))?;
        }
        Ok(())
    }
}

/// Bind named placeholders from the parameter list.
///
/// Only placeholders that occur in the statement are bound, so bindings used
/// solely for command templating do not have to match the statement text.
fn bind_named(
    stmt: &mut rusqlite::Statement<'_>,
    params: &Parameters,
) -> Result<(), WarehouseError> {
    for index in 1..=stmt.parameter_count() {
        let Some(name) = stmt.parameter_name(index).map(str::to_string) else {
            return Err(WarehouseError::ExecutionError(format!(
                "placeholder {index} is positional; bind parameters by name"
            )));
        };
        let bare = name.trim_start_matches([':', '@', '$']);
        let Some(value) = params.get(bare) else {
            return Err(WarehouseError::ExecutionError(format!(
                "no binding provided for placeholder `{name}`"
            )));
        };
        stmt.raw_bind_parameter(index, to_sqlite_value(value))?;
    }
    Ok(())
}

/// Cursor over one statement's results, buffered at execution time.
#[derive(Debug)]
pub struct SqliteCursor {
    columns: Arc<Vec<String>>,
    rows: VecDeque<Vec<SqlValue>>,
    rows_affected: usize,
}

impl SqliteCursor {
    fn with_rows(columns: Arc<Vec<String>>, rows: VecDeque<Vec<SqlValue>>) -> Self {
        let rows_affected = rows.len();
        Self {
            columns,
            rows,
            rows_affected,
        }
    }

    fn for_dml(rows_affected: usize) -> Self {
        Self {
            columns: Arc::new(Vec::new()),
            rows: VecDeque::new(),
            rows_affected,
        }
    }
}

impl DriverCursor for SqliteCursor {
    fn columns(&self) -> Arc<Vec<String>> {
        self.columns.clone()
    }

    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, WarehouseError> {
        Ok(self.rows.pop_front())
    }

    fn fetch_many(&mut self, n: usize) -> Result<Vec<Vec<SqlValue>>, WarehouseError> {
        let take = n.min(self.rows.len());
        Ok(self.rows.drain(..take).collect())
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>, WarehouseError> {
        Ok(self.rows.drain(..).collect())
    }

    fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    fn close(&mut self) -> Result<(), WarehouseError> {
        self.rows.clear();
        Ok(())
    }
}
