use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WarehouseError;

/// Connection and command-loading configuration for a warehouse session.
///
/// Immutable once built; construct one per process (or per target warehouse)
/// and pass it into [`Session::open`](crate::session::Session::open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    access_token: String,
    command_directory: PathBuf,
    http_path: String,
    server_hostname: String,
}

impl WarehouseConfig {
    #[must_use]
    pub fn builder() -> WarehouseConfigBuilder {
        WarehouseConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `WarehouseError::Io` if the file cannot be read, or
    /// `WarehouseError::ConfigError` if it does not parse as a configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, WarehouseError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| WarehouseError::ConfigError(format!("invalid configuration file: {e}")))
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    #[must_use]
    pub fn command_directory(&self) -> &Path {
        &self.command_directory
    }

    #[must_use]
    pub fn http_path(&self) -> &str {
        &self.http_path
    }

    #[must_use]
    pub fn server_hostname(&self) -> &str {
        &self.server_hostname
    }
}

/// Fluent builder for [`WarehouseConfig`].
#[derive(Debug, Clone, Default)]
pub struct WarehouseConfigBuilder {
    access_token: String,
    command_directory: PathBuf,
    http_path: String,
    server_hostname: String,
}

impl WarehouseConfigBuilder {
    #[must_use]
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    #[must_use]
    pub fn command_directory(mut self, command_directory: impl Into<PathBuf>) -> Self {
        self.command_directory = command_directory.into();
        self
    }

    #[must_use]
    pub fn http_path(mut self, http_path: impl Into<String>) -> Self {
        self.http_path = http_path.into();
        self
    }

    #[must_use]
    pub fn server_hostname(mut self, server_hostname: impl Into<String>) -> Self {
        self.server_hostname = server_hostname.into();
        self
    }

    #[must_use]
    pub fn finish(self) -> WarehouseConfig {
        WarehouseConfig {
            access_token: self.access_token,
            command_directory: self.command_directory,
            http_path: self.http_path,
            server_hostname: self.server_hostname,
        }
    }
}
