// src/error.rs

use thiserror::Error;

/// Every failure the detector can report. Validation failures are raised
/// before any scanning happens and never leave a record behind.
#[derive(Error, Debug)]
pub enum MutantError {
    /// Empty grid, empty rows, or a grid that is not N×N.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A cell holds something other than A, C, G or T after uppercasing.
    #[error("invalid nucleotide {found:?} at row {row}, column {col}")]
    InvalidAlphabet { row: usize, col: usize, found: char },

    /// The record backend could not complete a read or write.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// Sample file I/O (CLI path only).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MutantError {
    /// True when the caller supplied bad input, false for server-side faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MutantError::InvalidShape(_) | MutantError::InvalidAlphabet { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MutantError>;
