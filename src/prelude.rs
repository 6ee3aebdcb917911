//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types
//! to make it easier to get started with the library.

pub use crate::builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
pub use crate::config::{WarehouseConfig, WarehouseConfigBuilder};
pub use crate::cursor::Rows;
pub use crate::driver::{DriverConnection, DriverCursor, WarehouseDriver};
pub use crate::error::WarehouseError;
pub use crate::loader::CommandLoader;
pub use crate::placeholders::PlaceholderStyle;
pub use crate::results::{DEFAULT_PAGE_SIZE, Page, Row};
pub use crate::session::Session;
pub use crate::types::{Parameters, SqlValue};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConnection, SqliteCursor, SqliteDriver};
