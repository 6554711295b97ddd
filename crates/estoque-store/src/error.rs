//! # Store Error Types
//!
//! Error types for table store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / csv::Error / bad cell                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds table/row/column context              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in app) ← Message + exit code                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Operator sees the fault verbatim                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing table is NOT an error: the adapter recovers it as the
//! canonical empty table. Everything else surfaces unchanged.

use estoque_core::CoreError;
use thiserror::Error;

use crate::table::TableName;

/// Table store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure on the backing file.
    ///
    /// ## When This Occurs
    /// - Data directory not writable
    /// - Disk full during the temp-file write
    /// - Rename over the target failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader/writer failed (bad quoting, ragged record, ...).
    #[error("CSV error in {table}: {source}")]
    Csv {
        table: TableName,
        #[source]
        source: csv::Error,
    },

    /// A cell could not be decoded into its domain type.
    ///
    /// `row` is 1-based and counts data rows only (the header is row 0).
    #[error("Malformed {table} row {row}, column '{column}': {reason}")]
    MalformedRow {
        table: TableName,
        row: usize,
        column: String,
        reason: String,
    },

    /// A required column is absent from the header.
    #[error("Table {table} is missing column '{column}'")]
    SchemaMismatch { table: TableName, column: String },

    /// A business rule failed while committing.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates an Io error for a given path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Creates a Csv error for a given table.
    pub fn csv(table: TableName, source: csv::Error) -> Self {
        StoreError::Csv { table, source }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
