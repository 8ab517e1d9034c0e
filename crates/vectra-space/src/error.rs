//! Error types for grid construction.

use thiserror::Error;

/// Errors arising from grid construction or field assembly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero rows or columns.
    #[error("grid must have at least one cell")]
    EmptyGrid,
    /// The cell width is not a positive finite number.
    #[error("invalid cell width {width}: must be finite and > 0")]
    InvalidCellWidth {
        /// The offending width.
        width: f64,
    },
    /// A data buffer does not match the size implied by its grid.
    #[error("{what} has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Which buffer was being assembled.
        what: &'static str,
        /// Required number of values.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
    /// A value that must be non-negative is not.
    #[error("{what} contains a negative or non-finite value at index {index}")]
    NegativeValue {
        /// Which buffer was being assembled.
        what: &'static str,
        /// Flat index of the first bad value.
        index: usize,
    },
}
