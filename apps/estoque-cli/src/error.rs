//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Estoque                                │
//! │                                                                         │
//! │  Command Function ── Result<(), CliError>                               │
//! │         │                                                               │
//! │         ├── StoreError::Io / Csv / MalformedRow ──► Storage   (exit 4)  │
//! │         ├── CoreError::Validation ────────────────► Validation (exit 2) │
//! │         ├── CoreError::ProductNotFound ───────────► NotFound  (exit 3)  │
//! │         ├── CoreError::InsufficientStock / ... ──► Conflict  (exit 6)   │
//! │         └── ConfigError ──────────────────────────► Config    (exit 5)  │
//! │                                                                         │
//! │  main() prints "error: <message>" to stderr and exits with the code    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejected sale lines are NOT errors: they are printed as warnings and
//! the rest of the batch goes on.

use estoque_core::CoreError;
use estoque_store::StoreError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from commands.
///
/// ## Serialization
/// With `--json` this is what lands on stderr:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: CAFE"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Operator input rejected
    ValidationError,

    /// Product or lot does not exist
    NotFound,

    /// Stock changed under a pending sale
    StockConflict,

    /// Table file could not be read or written
    StorageError,

    /// Config file or environment is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub const fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::StorageError => 4,
            ErrorCode::ConfigError => 5,
            ErrorCode::StockConflict => 6,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::LotNotAvailable { .. }
            | CoreError::InsufficientStock { .. }
            | CoreError::PriceBelowFloor { .. } => ErrorCode::StockConflict,
            CoreError::EmptyData { .. } => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        CliError::new(code, err.to_string())
    }
}

/// Converts store errors to CLI errors. Persistence faults keep their
/// full message so the operator sees which file and row failed.
impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(core) => core.into(),
            other => {
                tracing::error!(error = %other, "Storage failure");
                CliError::new(ErrorCode::StorageError, other.to_string())
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("Failed to write output: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to encode JSON: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}
