use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::results::Row;

/// Values that can be bound as query parameters or read back from a result
/// row.
///
/// One enum serves both directions so helper code never branches on driver
/// types:
/// ```rust
/// use sql_warehouse::prelude::*;
///
/// let mut params = Parameters::new();
/// params.set("id", 1);
/// params.set("name", "alice");
/// params.set("active", true);
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
    /// Nested row, produced when a result value is a JSON object
    Record(Box<Row>),
}

impl SqlValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let SqlValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let SqlValue::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let SqlValue::Json(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Row> {
        if let SqlValue::Record(row) = self {
            Some(row)
        } else {
            None
        }
    }

    /// Build a value from a JSON fragment. Objects become nested [`Row`]
    /// records, recursively.
    #[must_use]
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => SqlValue::Null,
            JsonValue::Bool(b) => SqlValue::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Int(i)
                } else if let Some(f) = n.as_f64() {
                    SqlValue::Float(f)
                } else {
                    SqlValue::Json(JsonValue::Number(n))
                }
            }
            JsonValue::String(s) => SqlValue::Text(s),
            JsonValue::Array(items) => SqlValue::Json(JsonValue::Array(items)),
            JsonValue::Object(map) => SqlValue::Record(Box::new(Row::from_json_object(map))),
        }
    }

    /// Render the value back into a JSON fragment.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            SqlValue::Int(i) => JsonValue::from(*i),
            SqlValue::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(JsonValue::Null, JsonValue::Number),
            SqlValue::Text(s) => JsonValue::String(s.clone()),
            SqlValue::Bool(b) => JsonValue::Bool(*b),
            SqlValue::Timestamp(dt) => JsonValue::String(dt.format("%F %T%.f").to_string()),
            SqlValue::Null => JsonValue::Null,
            SqlValue::Json(v) => v.clone(),
            SqlValue::Blob(bytes) => JsonValue::String(hex_string(bytes)),
            SqlValue::Record(row) => row.to_json(),
        }
    }
}

fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Textual rendering used by command templating. Text renders bare (no
/// quoting), NULL renders empty.
impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Timestamp(dt) => write!(f, "{}", dt.format("%F %T%.f")),
            SqlValue::Null => Ok(()),
            SqlValue::Json(v) => write!(f, "{v}"),
            SqlValue::Blob(bytes) => f.write_str(&hex_string(bytes)),
            SqlValue::Record(row) => write!(f, "{}", row.to_json()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<JsonValue> for SqlValue {
    fn from(value: JsonValue) -> Self {
        SqlValue::Json(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

/// Named parameter bindings in insertion order.
///
/// Setting a name that is already bound replaces the value in place, keeping
/// the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, SqlValue)>,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, overwriting any earlier binding in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Fluent form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_preserve_insertion_order() {
        let mut params = Parameters::new();
        params.set("b", 2);
        params.set("a", 1);
        params.set("c", 3);
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn parameters_upsert_keeps_position() {
        let mut params = Parameters::new();
        params.set("a", 1);
        params.set("b", 2);
        params.set("a", 9);
        let entries: Vec<(&str, &SqlValue)> = params.iter().collect();
        assert_eq!(entries[0], ("a", &SqlValue::Int(9)));
        assert_eq!(entries[1], ("b", &SqlValue::Int(2)));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn bool_coerces_from_int() {
        assert_eq!(SqlValue::Int(1).as_bool(), Some(&true));
        assert_eq!(SqlValue::Int(0).as_bool(), Some(&false));
        assert_eq!(SqlValue::Int(7).as_bool(), None);
    }

    #[test]
    fn timestamp_parses_from_text() {
        let value = SqlValue::Text("2024-01-01 08:00:01".to_string());
        let dt = value.as_timestamp().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-01 08:00:01");
    }

    #[test]
    fn display_renders_template_text() {
        assert_eq!(SqlValue::Int(10).to_string(), "10");
        assert_eq!(SqlValue::Text("abc".into()).to_string(), "abc");
        assert_eq!(SqlValue::Null.to_string(), "");
        assert_eq!(SqlValue::Blob(vec![0xab, 0x01]).to_string(), "ab01");
    }
}
