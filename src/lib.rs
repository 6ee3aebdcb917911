//! Lightweight synchronous convenience wrappers for SQL warehouse
//! connections: a scoped session with commit-on-success semantics, fluent
//! select/insert/update/delete builders, file-backed templated commands,
//! and lookahead-based pagination. Connections and statement execution are
//! delegated to a pluggable [`driver`].

pub mod builder;
pub mod config;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod loader;
pub mod placeholders;
pub mod results;
pub mod session;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod prelude;

pub use error::WarehouseError;
