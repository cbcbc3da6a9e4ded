//! Core kernels for the marshal ABI conformance fixture.
//!
//! This is the leaf crate with zero internal dependencies. It holds the
//! safe side of every entry point: width-exact accumulation, the two
//! matrix layouts behind a common [`MatrixView`], byte-wise ASCII case
//! shifting, and the fixed sequences the allocation entry points fill.
//! The C surface in `marshal-ffi` only turns raw pointers into the views
//! defined here.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accumulate;
pub mod error;
pub mod matrix;
pub mod sequence;
pub mod text;

pub use accumulate::{sum_pairwise, sum_slice, Accumulate, Element};
pub use error::LayoutError;
pub use matrix::{sum_matrix, MatrixView, RowMajor, RowSlices, Shape};
pub use sequence::{fixed_steps, ramp, FIXED_LEN};
pub use text::{shift_to_upper, UPPER_CASE_OFFSET};
