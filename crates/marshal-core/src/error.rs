//! Error types for building safe layout views.
//!
//! The C boundary has no error channel: a wrong shape there is undefined
//! behaviour by contract. These errors only surface when Rust code builds
//! a [`RowMajor`](crate::RowMajor) or [`RowSlices`](crate::RowSlices)
//! from owned data.

use std::error::Error;
use std::fmt;

/// A buffer does not describe the matrix shape it was paired with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A contiguous buffer's length is not `rows * cols`.
    ShapeMismatch {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
        /// Actual number of elements supplied.
        len: usize,
    },
    /// A row in a row-pointer table does not hold exactly `cols` elements.
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Declared column count.
        expected: usize,
        /// Number of elements the row actually holds.
        found: usize,
    },
    /// `rows * cols` does not fit in `usize`.
    ShapeOverflow {
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        cols: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { rows, cols, len } => {
                write!(
                    f,
                    "{rows}x{cols} matrix needs {} elements, got {len}",
                    rows.saturating_mul(*cols)
                )
            }
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} holds {found} elements, expected {expected}"),
            Self::ShapeOverflow { rows, cols } => {
                write!(f, "{rows}x{cols} matrix overflows the address space")
            }
        }
    }
}

impl Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_shape() {
        let e = LayoutError::ShapeMismatch {
            rows: 2,
            cols: 3,
            len: 5,
        };
        assert_eq!(e.to_string(), "2x3 matrix needs 6 elements, got 5");
    }

    #[test]
    fn display_ragged_row() {
        let e = LayoutError::RaggedRow {
            row: 1,
            expected: 3,
            found: 2,
        };
        assert_eq!(e.to_string(), "row 1 holds 2 elements, expected 3");
    }
}
