use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}
