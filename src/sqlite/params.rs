use rusqlite::types::Value;

use crate::error::WarehouseError;
use crate::types::SqlValue;

/// Convert a bound value to a `SQLite` value.
#[must_use]
pub(crate) fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => Value::Integer(*i),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => Value::Null,
        SqlValue::Json(jval) => Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => Value::Blob(bytes.clone()),
        SqlValue::Record(row) => Value::Text(row.to_json().to_string()),
    }
}

/// Extract a [`SqlValue`] from a `SQLite` row.
pub(crate) fn extract_value(row: &rusqlite::Row<'_>, idx: usize) -> Result<SqlValue, WarehouseError> {
    let value: Value = row.get(idx).map_err(WarehouseError::Sqlite)?;
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Integer(i) => Ok(SqlValue::Int(i)),
        Value::Real(f) => Ok(SqlValue::Float(f)),
        Value::Text(s) => Ok(SqlValue::Text(s)),
        Value::Blob(b) => Ok(SqlValue::Blob(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn bool_binds_as_integer() {
        assert_eq!(to_sqlite_value(&SqlValue::Bool(true)), Value::Integer(1));
        assert_eq!(to_sqlite_value(&SqlValue::Bool(false)), Value::Integer(0));
    }

    #[test]
    fn timestamp_binds_as_formatted_text() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 1)
            .unwrap();
        assert_eq!(
            to_sqlite_value(&SqlValue::Timestamp(dt)),
            Value::Text("2024-01-01 08:00:01".to_string())
        );
    }
}
