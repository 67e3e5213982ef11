//! Error types for grid construction and queries

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The grid is not rectangular, is empty, or contains a value other than 0/1.
    #[error("Invalid parking grid: {reason}")]
    InvalidGrid { reason: String },

    /// A coordinate lies outside of the grid.
    #[error("Invalid position ({row}, {col}): grid is {rows}x{cols}")]
    InvalidPosition {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },
}

impl GridError {
    pub(crate) fn invalid_grid(reason: impl Into<String>) -> Self {
        GridError::InvalidGrid {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
