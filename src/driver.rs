use std::sync::Arc;

use crate::config::WarehouseConfig;
use crate::error::WarehouseError;
use crate::placeholders::PlaceholderStyle;
use crate::types::{Parameters, SqlValue};

/// Entry point a driver exposes: open a connection from credentials and
/// report the placeholder convention its SQL dialect expects.
pub trait WarehouseDriver {
    type Connection: DriverConnection;

    /// Open a connection to the warehouse described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `WarehouseError::ConnectionError` (or a driver error) if the
    /// connection cannot be established.
    fn connect(&self, config: &WarehouseConfig) -> Result<Self::Connection, WarehouseError>;

    fn placeholder_style(&self) -> PlaceholderStyle;
}

/// One physical connection.
///
/// Statement execution returns an owned cursor over the results; cursor
/// acquisition and execution are a single call because a detached live
/// cursor would have to borrow the connection it came from.
pub trait DriverConnection {
    type Cursor: DriverCursor;

    /// Execute `sql` with the given named bindings.
    ///
    /// # Errors
    ///
    /// Returns a driver error if preparation, binding, or execution fails.
    fn execute(&mut self, sql: &str, params: &Parameters) -> Result<Self::Cursor, WarehouseError>;

    /// Commit the current transaction.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the commit fails.
    fn commit(&mut self) -> Result<(), WarehouseError>;

    /// Roll back the current transaction.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the rollback fails.
    fn rollback(&mut self) -> Result<(), WarehouseError>;

    /// Close the connection. Called exactly once at session exit.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the close fails.
    fn close(&mut self) -> Result<(), WarehouseError>;
}

/// Forward-only cursor over one statement's results.
///
/// End-of-data is `Ok(None)`, never an error.
pub trait DriverCursor {
    /// Column names for the result, shared across rows. Empty for DML.
    fn columns(&self) -> Arc<Vec<String>>;

    /// Pull the next row, or `None` once the results are exhausted.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the fetch fails.
    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, WarehouseError>;

    /// Pull up to `n` rows.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the fetch fails.
    fn fetch_many(&mut self, n: usize) -> Result<Vec<Vec<SqlValue>>, WarehouseError>;

    /// Pull all remaining rows.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the fetch fails.
    fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>, WarehouseError>;

    /// Rows affected, for DML statements.
    fn rows_affected(&self) -> usize;

    /// Release the cursor. Fetches after close return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the close fails.
    fn close(&mut self) -> Result<(), WarehouseError>;
}
