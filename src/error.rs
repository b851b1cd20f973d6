//! Error types for CardDB
//!
//! This module defines all error types used throughout the tool.

use thiserror::Error;

/// The main error type for CardDB
#[derive(Error, Debug)]
pub enum Error {
    // ========== Connection Errors ==========
    #[error("Cannot connect to the database: {0}")]
    Connection(rusqlite::Error),

    // ========== Catalog Errors ==========
    #[error("Catalog error: table '{0}' not found")]
    TableNotFound(String),

    #[error("Catalog error: column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Catalog error: got {values} value(s) for {columns} column(s)")]
    ColumnValueMismatch { columns: usize, values: usize },

    // ========== Input Errors ==========
    #[error("Input error: unknown aggregate function '{0}', expected SUM, AVG, COUNT, MIN or MAX")]
    UnknownAggregate(String),

    #[error("Input error: unknown sort order '{0}', expected ASC or DESC")]
    UnknownSortOrder(String),

    #[error("Input error: unrecognized menu choice '{0}'")]
    UnknownChoice(String),

    // ========== Execution Errors ==========
    #[error("Error executing query: {0}")]
    Execution(#[from] rusqlite::Error),

    // ========== CSV Import Errors ==========
    #[error("CSV import error: row {row} has {found} field(s), import needs field index {needed}")]
    ShortRow {
        row: usize,
        found: usize,
        /// 0-based index of the first missing field
        needed: usize,
    },

    #[error("CSV import error: {0}")]
    Csv(#[from] csv::Error),

    // ========== I/O Errors ==========
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// A specialized Result type for CardDB operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::TableNotFound("Orders".to_string());
        assert_eq!(err.to_string(), "Catalog error: table 'Orders' not found");

        let err = Error::ColumnValueMismatch {
            columns: 2,
            values: 3,
        };
        assert!(err.to_string().contains("got 3 value(s) for 2 column(s)"));
    }
}
