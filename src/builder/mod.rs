use crate::placeholders::PlaceholderStyle;
use crate::types::{Parameters, SqlValue};

mod dml;
mod select;

pub use dml::{DeleteBuilder, InsertBuilder, UpdateBuilder};
pub use select::SelectBuilder;

/// State shared by the filtering builders: the target table, the WHERE
/// fragments in insertion order, and the bound parameters.
#[derive(Debug, Clone)]
pub(crate) struct BuilderCore {
    pub(crate) table: String,
    pub(crate) style: PlaceholderStyle,
    pub(crate) conditions: Vec<String>,
    pub(crate) params: Parameters,
}

impl BuilderCore {
    pub(crate) fn new(table: &str, style: PlaceholderStyle) -> Self {
        Self {
            table: table.to_string(),
            style,
            conditions: Vec::new(),
            params: Parameters::new(),
        }
    }

    pub(crate) fn push_bound(&mut self, field: &str, operator: &str, value: SqlValue) {
        self.conditions
            .push(format!("{field} {operator} {}", self.style.fragment(field)));
        self.params.set(field, value);
    }

    pub(crate) fn push_raw(&mut self, field: &str, operator: &str, literal: &str) {
        self.conditions.push(format!("{field} {operator} {literal}"));
    }

    /// `WHERE` + fragments joined by ` AND `, or empty when no conditions.
    pub(crate) fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }
}

/// Stamp the shared condition methods onto a filtering builder.
macro_rules! impl_where_methods {
    ($($builder:ident),+ $(,)?) => {$(
        impl<C: $crate::driver::DriverConnection> $builder<'_, C> {
            /// Add a bound equality condition on `field`.
            #[must_use]
            pub fn where_eq(self, field: &str, value: impl Into<$crate::types::SqlValue>) -> Self {
                self.where_op(field, "=", value)
            }

            /// Add a bound condition with an explicit operator.
            #[must_use]
            pub fn where_op(
                mut self,
                field: &str,
                operator: &str,
                value: impl Into<$crate::types::SqlValue>,
            ) -> Self {
                self.core.push_bound(field, operator, value.into());
                self
            }

            /// Append a literal condition. `literal` is interpolated as-is;
            /// the caller is responsible for its safety.
            #[must_use]
            pub fn where_raw(mut self, field: &str, operator: &str, literal: &str) -> Self {
                self.core.push_raw(field, operator, literal);
                self
            }

            /// Add a bound equality condition per entry, in order.
            #[must_use]
            pub fn where_all<K, V, I>(mut self, entries: I) -> Self
            where
                K: AsRef<str>,
                V: Into<$crate::types::SqlValue>,
                I: IntoIterator<Item = (K, V)>,
            {
                for (field, value) in entries {
                    self.core.push_bound(field.as_ref(), "=", value.into());
                }
                self
            }

            /// The accumulated bound parameters.
            #[must_use]
            pub fn parameters(&self) -> &$crate::types::Parameters {
                &self.core.params
            }
        }
    )+};
}

pub(crate) use impl_where_methods;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_joins_in_insertion_order() {
        let mut core = BuilderCore::new("t", PlaceholderStyle::Colon);
        core.push_bound("a", "=", SqlValue::Int(1));
        core.push_raw("b", ">", "10");
        core.push_bound("c", "<>", SqlValue::Text("x".into()));
        assert_eq!(core.where_clause(), "WHERE a = :a AND b > 10 AND c <> :c");
        assert_eq!(core.params.get("a"), Some(&SqlValue::Int(1)));
        assert_eq!(core.params.get("b"), None);
    }

    #[test]
    fn empty_conditions_emit_empty_clause() {
        let core = BuilderCore::new("t", PlaceholderStyle::Colon);
        assert_eq!(core.where_clause(), "");
    }
}
