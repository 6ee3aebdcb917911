use crate::cursor::Rows;
use crate::driver::DriverConnection;
use crate::error::WarehouseError;
use crate::results::Page;
use crate::session::Session;

use super::{BuilderCore, impl_where_methods};

/// Fluent SELECT builder bound to a session and table.
///
/// ```rust,no_run
/// # use sql_warehouse::prelude::*;
/// # fn demo(session: &mut Session<SqliteConnection>) -> Result<(), WarehouseError> {
/// let open_orders = session
///     .select("orders")
///     .fields(&["id", "total"])
///     .where_eq("status", "open")
///     .order_by(&["id"])
///     .execute()?
///     .fetch_all()?;
/// # let _ = open_orders;
/// # Ok(())
/// # }
/// ```
pub struct SelectBuilder<'s, C: DriverConnection> {
    session: &'s mut Session<C>,
    core: BuilderCore,
    fields: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    page_clause: String,
}

impl<'s, C: DriverConnection> SelectBuilder<'s, C> {
    pub(crate) fn new(session: &'s mut Session<C>, table: &str) -> Self {
        let core = BuilderCore::new(table, session.placeholder_style());
        Self {
            session,
            core,
            fields: vec!["*".to_string()],
            group_by: Vec::new(),
            order_by: Vec::new(),
            page_clause: String::new(),
        }
    }

    /// Replace the selected fields (default `*`).
    #[must_use]
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the GROUP BY field list.
    #[must_use]
    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.group_by = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// Replace the ORDER BY field list.
    #[must_use]
    pub fn order_by(mut self, fields: &[&str]) -> Self {
        self.order_by = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// The generated command. Clause order is fixed: WHERE, GROUP BY,
    /// ORDER BY, paging.
    #[must_use]
    pub fn command(&self) -> String {
        let mut parts = vec![format!(
            "SELECT {} FROM {}",
            self.fields.join(", "),
            self.core.table
        )];
        let where_clause = self.core.where_clause();
        if !where_clause.is_empty() {
            parts.push(where_clause);
        }
        if !self.group_by.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by.join(", ")));
        }
        if !self.page_clause.is_empty() {
            parts.push(self.page_clause.clone());
        }
        parts.join(" ")
    }

    /// Execute the generated command as literal SQL.
    ///
    /// # Errors
    ///
    /// Returns a driver error if execution fails.
    pub fn execute(self) -> Result<Rows<C::Cursor>, WarehouseError> {
        let sql = self.command();
        self.session.run(&sql, &self.core.params)
    }

    /// Fetch one page, requesting `size + 1` rows at offset `page * size`
    /// so the last page is detected without a COUNT query.
    ///
    /// # Errors
    ///
    /// Returns a driver error if execution or fetching fails.
    pub fn paging(mut self, page: u64, size: u64) -> Result<Page, WarehouseError> {
        self.page_clause = format!("LIMIT {} OFFSET {}", size + 1, page * size);
        let sql = self.command();
        let rows = self.session.run(&sql, &self.core.params)?.fetch_all()?;
        Ok(Page::from_lookahead(page, size, rows))
    }
}

impl_where_methods!(SelectBuilder);
