//! Error types for sheetcalc core.

use thiserror::Error;

/// Errors that can occur while editing, loading or saving a sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid sheet dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Data row count mismatch: expected {expected}, found {found}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("Cell out of bounds: {0}")]
    OutOfBounds(String),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, SheetError>;
