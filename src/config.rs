//! Connection parameters for CardDB
//!
//! Fixed constants in this version; there is no environment-variable or
//! config-file override.

use std::path::PathBuf;

/// Default database file, created on first connect
pub const DATABASE_PATH: &str = "carddb.sqlite";

/// Connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Path to the database file
    pub database: PathBuf,
    /// Provision the constrained schema variant and turn on referential
    /// enforcement after the base tables exist
    pub enforce_foreign_keys: bool,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self {
            database: PathBuf::from(DATABASE_PATH),
            enforce_foreign_keys: true,
        }
    }

    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = path.into();
        self
    }

    pub fn enforce_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
