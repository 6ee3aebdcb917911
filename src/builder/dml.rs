use crate::cursor::Rows;
use crate::driver::DriverConnection;
use crate::error::WarehouseError;
use crate::placeholders::PlaceholderStyle;
use crate::session::Session;
use crate::types::{Parameters, SqlValue};

use super::{BuilderCore, impl_where_methods};

/// Fluent INSERT builder.
///
/// Constant columns and bound-parameter columns live in separate maps; a
/// field bound in both is rejected at command-generation time because it is
/// ambiguous which value would win.
pub struct InsertBuilder<'s, C: DriverConnection> {
    session: &'s mut Session<C>,
    table: String,
    style: PlaceholderStyle,
    constants: Vec<(String, String)>,
    params: Parameters,
}

impl<'s, C: DriverConnection> InsertBuilder<'s, C> {
    pub(crate) fn new(session: &'s mut Session<C>, table: &str) -> Self {
        let style = session.placeholder_style();
        Self {
            session,
            table: table.to_string(),
            style,
            constants: Vec::new(),
            params: Parameters::new(),
        }
    }

    /// Bind `field` as a parameter column. Last write for a field wins.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.params.set(field, value);
        self
    }

    /// Set `field` to a literal value, interpolated as-is. Last write for a
    /// field wins.
    #[must_use]
    pub fn set_raw(mut self, field: &str, literal: &str) -> Self {
        if let Some(entry) = self.constants.iter_mut().find(|(name, _)| name == field) {
            entry.1 = literal.to_string();
        } else {
            self.constants.push((field.to_string(), literal.to_string()));
        }
        self
    }

    /// Bind every entry as a parameter column, in order.
    #[must_use]
    pub fn set_all<K, V, I>(mut self, entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (field, value) in entries {
            self.params.set(field.as_ref(), value.into());
        }
        self
    }

    /// The accumulated bound parameters.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// The generated command: constant columns first, then parameter
    /// columns, each group in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `WarehouseError::ValidationError` if a field is set as both a
    /// constant and a parameter.
    pub fn command(&self) -> Result<String, WarehouseError> {
        for (field, _) in &self.constants {
            if self.params.get(field).is_some() {
                return Err(WarehouseError::ValidationError(format!(
                    "field `{field}` is set as both a constant and a parameter"
                )));
            }
        }
        let mut columns: Vec<&str> = self.constants.iter().map(|(name, _)| name.as_str()).collect();
        let mut values: Vec<String> = self
            .constants
            .iter()
            .map(|(_, literal)| literal.clone())
            .collect();
        for (name, _) in self.params.iter() {
            columns.push(name);
            values.push(self.style.fragment(name));
        }
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            values.join(", ")
        ))
    }

    /// Execute the generated command as literal SQL.
    ///
    /// # Errors
    ///
    /// Returns `WarehouseError::ValidationError` for a field set both ways,
    /// or a driver error if execution fails.
    pub fn execute(self) -> Result<Rows<C::Cursor>, WarehouseError> {
        let sql = self.command()?;
        self.session.run(&sql, &self.params)
    }
}

/// Fluent UPDATE builder.
///
/// SET fragments accumulate in one ordered list, so repeated calls for the
/// same field emit repeated fragments rather than overwriting.
pub struct UpdateBuilder<'s, C: DriverConnection> {
    session: &'s mut Session<C>,
    core: BuilderCore,
    assignments: Vec<String>,
}

impl<'s, C: DriverConnection> UpdateBuilder<'s, C> {
    pub(crate) fn new(session: &'s mut Session<C>, table: &str) -> Self {
        let core = BuilderCore::new(table, session.placeholder_style());
        Self {
            session,
            core,
            assignments: Vec::new(),
        }
    }

    /// Append `field = :field` and bind the value.
    #[must_use]
    pub fn set(mut self, field: &str, value: impl Into<SqlValue>) -> Self {
        self.assignments
            .push(format!("{field} = {}", self.core.style.fragment(field)));
        self.core.params.set(field, value);
        self
    }

    /// Append `field = <literal>`, interpolated as-is.
    #[must_use]
    pub fn set_raw(mut self, field: &str, literal: &str) -> Self {
        self.assignments.push(format!("{field} = {literal}"));
        self
    }

    /// Append a bound assignment per entry, in order.
    #[must_use]
    pub fn set_all<K, V, I>(mut self, entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (field, value) in entries {
            self = self.set(field.as_ref(), value.into());
        }
        self
    }

    /// The generated command.
    #[must_use]
    pub fn command(&self) -> String {
        let mut parts = vec![format!("UPDATE {}", self.core.table)];
        if !self.assignments.is_empty() {
            parts.push(format!("SET {}", self.assignments.join(", ")));
        }
        let where_clause = self.core.where_clause();
        if !where_clause.is_empty() {
            parts.push(where_clause);
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
}

/// Fluent DELETE builder.
pub struct DeleteBuilder<'s, C: DriverConnection> {
    session: &'s mut Session<C>,
    core: BuilderCore,
}

impl<'s, C: DriverConnection> DeleteBuilder<'s, C> {
    pub(crate) fn new(session: &'s mut Session<C>, table: &str) -> Self {
        let core = BuilderCore::new(table, session.placeholder_style());
        Self { session, core }
    }

    /// The generated command.
    #[must_use]
    pub fn command(&self) -> String {
        let where_clause = self.core.where_clause();
        if where_clause.is_empty() {
            format!("DELETE FROM {}", self.core.table)
        } else {
            format!("DELETE FROM {} {where_clause}", self.core.table)
        }
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
}

impl_where_methods!(UpdateBuilder, DeleteBuilder);
