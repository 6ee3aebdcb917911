use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::types::SqlValue;

/// A row from a warehouse query result
///
/// Holds the shared column names for its result set and the values for this
/// row. Values that arrive as JSON objects are converted into nested
/// [`Row`] records once, at construction, so repeated reads return the same
/// converted instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// The column names for this row (shared across all rows in a result set)
    columns: Arc<Vec<String>>,
    /// The values for this row
    values: Vec<SqlValue>,
    // Cache for column lookups, shared across rows of the same result set
    index: Arc<HashMap<String, usize>>,
}

impl Row {
    #[must_use]
    pub fn new(columns: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let index = Arc::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        Self::with_index(columns, values, index)
    }

    /// Build a row reusing a prepared column-index cache.
    #[must_use]
    pub(crate) fn with_index(
        columns: Arc<Vec<String>>,
        values: Vec<SqlValue>,
        index: Arc<HashMap<String, usize>>,
    ) -> Self {
        let values = values.into_iter().map(convert_nested).collect();
        Self {
            columns,
            values,
            index,
        }
    }

    /// Build a nested row from a JSON object.
    #[must_use]
    pub fn from_json_object(map: JsonMap<String, JsonValue>) -> Self {
        let (columns, values): (Vec<String>, Vec<SqlValue>) = map
            .into_iter()
            .map(|(name, value)| (name, SqlValue::from_json(value)))
            .unzip();
        Self::new(Arc::new(columns), values)
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(&idx) = self.index.get(name) {
            return Some(idx);
        }
        self.columns.iter().position(|col| col == name)
    }

    /// Get a value by column name, or `None` if the column is absent
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.column_index(name).and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Set a column's value, appending the column if it is absent.
    ///
    /// Appending unshares the column names, so other rows from the same
    /// result set are unaffected.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        let name = name.into();
        let value = convert_nested(value.into());
        if let Some(idx) = self.column_index(&name) {
            self.values[idx] = value;
        } else {
            Arc::make_mut(&mut self.columns).push(name.clone());
            let mut index = (*self.index).clone();
            index.insert(name, self.values.len());
            self.index = Arc::new(index);
            self.values.push(value);
        }
    }

    #[must_use]
    pub fn columns(&self) -> &Arc<Vec<String>> {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the row as a JSON object in column order.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = JsonMap::with_capacity(self.columns.len());
        for (name, value) in self.columns.iter().zip(&self.values) {
            map.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(map)
    }
}

fn convert_nested(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Json(JsonValue::Object(map)) => {
            SqlValue::Record(Box::new(Row::from_json_object(map)))
        }
        other => other,
    }
}
