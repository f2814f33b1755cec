//! Error types for cellpic-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellpic-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid column letters
    #[error("Invalid column letters: {0}")]
    InvalidColumn(String),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u32, u32),

    /// An image reference was built without a file name
    #[error("Image reference at {0} has an empty file name")]
    EmptyFileName(String),

    /// Boundary offsets violate the sequence invariants
    #[error("Invalid boundary sequence: {0}")]
    InvalidBoundaries(String),
}
