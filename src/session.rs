use tracing::{debug, warn};

use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::config::WarehouseConfig;
use crate::cursor::Rows;
use crate::driver::{DriverConnection, WarehouseDriver};
use crate::error::WarehouseError;
use crate::loader::CommandLoader;
use crate::placeholders::PlaceholderStyle;
use crate::results::Page;
use crate::types::Parameters;

/// A scoped warehouse session owning one driver connection.
///
/// The connection opens in [`open`](Session::open) and is released exactly
/// once: [`commit`](Session::commit) and [`rollback`](Session::rollback)
/// consume the session, and dropping an unfinished session rolls back. The
/// usual entry point is [`transact`](Session::transact), which commits when
/// the body returns `Ok` and rolls back when it returns `Err` (or unwinds):
///
/// ```rust,no_run
/// use sql_warehouse::prelude::*;
///
/// # fn demo(config: WarehouseConfig) -> Result<(), WarehouseError> {
/// let inserted = Session::transact(&SqliteDriver::new(), config, |session| {
///     let rows = session
///         .insert("orders")
///         .set("id", 1)
///         .set("status", "open")
///         .execute()?;
///     Ok(rows.rows_affected())
/// })?;
/// # let _ = inserted;
/// # Ok(())
/// # }
/// ```
pub struct Session<C: DriverConnection> {
    connection: Option<C>,
    loader: CommandLoader,
    style: PlaceholderStyle,
    config: WarehouseConfig,
}

impl<C: DriverConnection> Session<C> {
    /// Open a session; the connection is established immediately.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the connection cannot be established.
    pub fn open<D>(driver: &D, config: WarehouseConfig) -> Result<Self, WarehouseError>
    where
        D: WarehouseDriver<Connection = C>,
    {
        let connection = driver.connect(&config)?;
        let loader = CommandLoader::new(config.command_directory());
        Ok(Self {
            connection: Some(connection),
            loader,
            style: driver.placeholder_style(),
            config,
        })
    }

    /// Run `body` inside a session scope: commit on `Ok`, roll back on
    /// `Err`. A panic unwinding through `body` reaches the drop guard, which
    /// also rolls back. The connection is closed on every path.
    ///
    /// # Errors
    ///
    /// Returns the body's error (after rollback), or a driver error from
    /// opening, committing, or closing the connection.
    pub fn transact<D, T, F>(
        driver: &D,
        config: WarehouseConfig,
        body: F,
    ) -> Result<T, WarehouseError>
    where
        D: WarehouseDriver<Connection = C>,
        F: FnOnce(&mut Session<C>) -> Result<T, WarehouseError>,
    {
        let mut session = Session::open(driver, config)?;
        match body(&mut session) {
            Ok(value) => {
                session.commit()?;
                Ok(value)
            }
            Err(err) => {
                let _ = session.rollback();
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Execute a command: literal SQL when `skip_load`, otherwise resolved
    /// through the command loader first.
    ///
    /// # Errors
    ///
    /// Returns a loader error for file failures or a driver error if
    /// execution fails.
    pub fn execute(
        &mut self,
        command: &str,
        parameters: &Parameters,
        skip_load: bool,
    ) -> Result<Rows<C::Cursor>, WarehouseError> {
        let resolved = self.resolve(command, parameters, skip_load)?;
        self.run(&resolved, parameters)
    }

    /// Fetch one page of an arbitrary command, using the same
    /// size-plus-one lookahead as [`SelectBuilder::paging`].
    ///
    /// # Errors
    ///
    /// Returns a loader error for file failures or a driver error if
    /// execution or fetching fails.
    pub fn paging(
        &mut self,
        command: &str,
        page: u64,
        parameters: &Parameters,
        size: u64,
        skip_load: bool,
    ) -> Result<Page, WarehouseError> {
        let resolved = self.resolve(command, parameters, skip_load)?;
        let sql = format!("{resolved} LIMIT {} OFFSET {}", size + 1, page * size);
        let rows = self.run(&sql, parameters)?.fetch_all()?;
        Ok(Page::from_lookahead(page, size, rows))
    }

    /// Start a SELECT builder for `table`.
    pub fn select(&mut self, table: &str) -> SelectBuilder<'_, C> {
        SelectBuilder::new(self, table)
    }

    /// Start an INSERT builder for `table`.
    pub fn insert(&mut self, table: &str) -> InsertBuilder<'_, C> {
        InsertBuilder::new(self, table)
    }

    /// Start an UPDATE builder for `table`.
    pub fn update(&mut self, table: &str) -> UpdateBuilder<'_, C> {
        UpdateBuilder::new(self, table)
    }

    /// Start a DELETE builder for `table`.
    pub fn delete(&mut self, table: &str) -> DeleteBuilder<'_, C> {
        DeleteBuilder::new(self, table)
    }

    /// Commit and close the session.
    ///
    /// # Errors
    ///
    /// Returns the commit error if the commit fails (the connection is still
    /// closed), or the close error.
    pub fn commit(mut self) -> Result<(), WarehouseError> {
        self.finish(true)
    }

    /// Roll back and close the session.
    ///
    /// # Errors
    ///
    /// Returns the rollback error if the rollback fails (the connection is
    /// still closed), or the close error.
    pub fn rollback(mut self) -> Result<(), WarehouseError> {
        self.finish(false)
    }

    pub(crate) fn run(
        &mut self,
        sql: &str,
        parameters: &Parameters,
    ) -> Result<Rows<C::Cursor>, WarehouseError> {
        debug!(sql, "executing warehouse command");
        let cursor = self.conn()?.execute(sql, parameters)?;
        Ok(Rows::new(cursor))
    }

    fn resolve(
        &self,
        command: &str,
        parameters: &Parameters,
        skip_load: bool,
    ) -> Result<String, WarehouseError> {
        if skip_load {
            Ok(command.to_string())
        } else {
            self.loader.load(command, parameters)
        }
    }

    fn conn(&mut self) -> Result<&mut C, WarehouseError> {
        self.connection
            .as_mut()
            .ok_or_else(|| WarehouseError::ConnectionError("session is closed".to_string()))
    }

    fn finish(&mut self, commit: bool) -> Result<(), WarehouseError> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };
        let outcome = if commit {
            connection.commit()
        } else {
            connection.rollback()
        };
        let closed = connection.close();
        outcome?;
        closed
    }
}

impl<C: DriverConnection> Drop for Session<C> {
    fn drop(&mut self) {
        if self.connection.is_some() {
            warn!("session dropped without commit or rollback; rolling back");
            let _ = self.finish(false);
        }
    }
}
