//! Two-dimensional views over the two layouts foreign binders use.
//!
//! A [`RowMajor`] view reads one contiguous run indexed `r * cols + c`.
//! A [`RowSlices`] view reads an array of row references, one level of
//! indirection deeper. [`sum_matrix`] walks any [`MatrixView`] in row-major
//! order, so both layouts produce bit-identical sums for the same logical
//! data, including float sums.

use crate::accumulate::{Accumulate, Element};
use crate::error::LayoutError;

/// Logical matrix dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl Shape {
    /// Create a shape of `rows` by `cols`.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total element count, or [`LayoutError::ShapeOverflow`] if it does
    /// not fit in `usize`.
    pub fn len(&self) -> Result<usize, LayoutError> {
        self.rows
            .checked_mul(self.cols)
            .ok_or(LayoutError::ShapeOverflow {
                rows: self.rows,
                cols: self.cols,
            })
    }

    /// Whether the shape holds no elements.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// Row-wise read access to a 2D block of `T`.
pub trait MatrixView<T> {
    /// Dimensions of the view.
    fn shape(&self) -> Shape;

    /// Row `r`, exactly `shape().cols` elements long.
    ///
    /// Callers only ask for `r < shape().rows`.
    fn row(&self, r: usize) -> &[T];
}

/// A contiguous, row-major matrix borrowed from one flat slice.
#[derive(Clone, Copy, Debug)]
pub struct RowMajor<'a, T> {
    shape: Shape,
    data: &'a [T],
}

impl<'a, T> RowMajor<'a, T> {
    /// Wrap `data` as a `shape` matrix. `data` must hold exactly
    /// `rows * cols` elements.
    pub fn new(shape: Shape, data: &'a [T]) -> Result<Self, LayoutError> {
        let len = shape.len()?;
        if data.len() != len {
            return Err(LayoutError::ShapeMismatch {
                rows: shape.rows,
                cols: shape.cols,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }
}

impl<T> MatrixView<T> for RowMajor<'_, T> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn row(&self, r: usize) -> &[T] {
        let start = r * self.shape.cols;
        &self.data[start..start + self.shape.cols]
    }
}

/// A matrix described by one borrowed slice per row.
#[derive(Clone, Copy, Debug)]
pub struct RowSlices<'a, T> {
    cols: usize,
    rows: &'a [&'a [T]],
}

impl<'a, T> RowSlices<'a, T> {
    /// Wrap `rows` as a matrix of `cols` columns. Every row must hold
    /// exactly `cols` elements.
    pub fn new(cols: usize, rows: &'a [&'a [T]]) -> Result<Self, LayoutError> {
        if let Some((row, found)) = rows
            .iter()
            .map(|r| r.len())
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(LayoutError::RaggedRow {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Self { cols, rows })
    }
}

impl<T> MatrixView<T> for RowSlices<'_, T> {
    fn shape(&self) -> Shape {
        Shape::new(self.rows.len(), self.cols)
    }

    fn row(&self, r: usize) -> &[T] {
        self.rows[r]
    }
}

/// Sum every element of `matrix`, widening each into `T::Wide`.
///
/// Traversal is row-major regardless of layout.
pub fn sum_matrix<T, M>(matrix: &M) -> T::Wide
where
    T: Element,
    M: MatrixView<T> + ?Sized,
{
    let rows = matrix.shape().rows;
    (0..rows).fold(T::Wide::ZERO, |acc, r| {
        matrix
            .row(r)
            .iter()
            .fold(acc, |acc, &v| acc.accumulate(T::Wide::from(v)))
    })
}
