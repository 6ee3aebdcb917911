//! Reference driver over `rusqlite`.
//!
//! `server_hostname` doubles as the database path (`:memory:` works), so the
//! same configuration shape serves remote drivers and this in-process one;
//! `access_token` and `http_path` are ignored.

mod connection;
mod params;

pub use connection::{SqliteConnection, SqliteCursor};

use crate::config::WarehouseConfig;
use crate::driver::WarehouseDriver;
use crate::error::WarehouseError;
use crate::placeholders::PlaceholderStyle;

#[derive(Debug, Clone, Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl WarehouseDriver for SqliteDriver {
    type Connection = SqliteConnection;

    fn connect(&self, config: &WarehouseConfig) -> Result<Self::Connection, WarehouseError> {
        SqliteConnection::open(config.server_hostname())
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Colon
    }
}
