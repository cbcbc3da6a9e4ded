//! Matrix marshalling: the same row-major sum over two memory layouts.
//!
//! `marshal_sum_matrix_*` reads one contiguous block of `rows * cols`
//! elements. `marshal_sum_matrix_rows_*` reads an array of `rows` pointers,
//! each to `cols` elements. Both walk the data in row-major order through
//! [`marshal_core::sum_matrix`], so they return identical results for the
//! same logical matrix; only the memory shape the caller builds differs.
//!
//! 8- and 16-bit elements accumulate into `int`. Every other element type
//! accumulates at its own width. Integer accumulation wraps.

use marshal_core::{sum_matrix, Accumulate, Element, RowMajor, RowSlices, Shape};

use crate::raw::{element_count, slice};

fn shape_of(rows: i32, cols: i32) -> Shape {
    Shape::new(element_count(rows), element_count(cols))
}

/// # Safety
///
/// `data` must point to `rows * cols` readable elements.
#[allow(unsafe_code)]
unsafe fn sum_contiguous<T: Element>(rows: i32, cols: i32, data: *const T) -> T::Wide {
    let shape = shape_of(rows, cols);
    let Ok(len) = shape.len() else {
        return T::Wide::ZERO;
    };
    // SAFETY: data holds rows * cols elements per this function's contract.
    let flat = unsafe { slice(data, len) };
    RowMajor::new(shape, flat).map_or(T::Wide::ZERO, |m| sum_matrix(&m))
}

/// # Safety
///
/// Unless the shape is empty, `table` must point to `rows` row pointers,
/// each to `cols` readable elements.
#[allow(unsafe_code)]
unsafe fn sum_indirect<T: Element>(rows: i32, cols: i32, table: *const *const T) -> T::Wide {
    let shape = shape_of(rows, cols);
    if shape.is_empty() {
        return T::Wide::ZERO;
    }
    // SAFETY: table holds shape.rows pointers per this function's contract.
    let pointers = unsafe { slice(table, shape.rows) };
    let row_slices: Vec<&[T]> = pointers
        .iter()
        // SAFETY: each row pointer addresses shape.cols elements per this
        // function's contract.
        .map(|&row| unsafe { slice(row, shape.cols) })
        .collect();
    RowSlices::new(shape.cols, &row_slices).map_or(T::Wide::ZERO, |m| sum_matrix(&m))
}

/// Sum of a contiguous `rows x cols` matrix of doubles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_d(rows: i32, cols: i32, mat: *const f64) -> f64 {
    // SAFETY: mat holds rows * cols doubles per caller contract.
    unsafe { sum_contiguous(rows, cols, mat) }
}

/// Sum of a `rows x cols` matrix of doubles given as row pointers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_rows_d(rows: i32, cols: i32, mat: *const *const f64) -> f64 {
    // SAFETY: mat holds rows pointers to cols doubles per caller contract.
    unsafe { sum_indirect(rows, cols, mat) }
}

/// Sum of a contiguous `rows x cols` matrix of floats.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_f(rows: i32, cols: i32, mat: *const f32) -> f32 {
    // SAFETY: mat holds rows * cols floats per caller contract.
    unsafe { sum_contiguous(rows, cols, mat) }
}

/// Sum of a `rows x cols` matrix of floats given as row pointers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_rows_f(rows: i32, cols: i32, mat: *const *const f32) -> f32 {
    // SAFETY: mat holds rows pointers to cols floats per caller contract.
    unsafe { sum_indirect(rows, cols, mat) }
}

/// Sum of a contiguous `rows x cols` matrix of 64-bit integers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_l(rows: i32, cols: i32, mat: *const i64) -> i64 {
    // SAFETY: mat holds rows * cols i64 values per caller contract.
    unsafe { sum_contiguous(rows, cols, mat) }
}

/// Sum of a `rows x cols` matrix of 64-bit integers given as row pointers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_rows_l(rows: i32, cols: i32, mat: *const *const i64) -> i64 {
    // SAFETY: mat holds rows pointers to cols i64 values per caller contract.
    unsafe { sum_indirect(rows, cols, mat) }
}

/// Sum of a contiguous `rows x cols` matrix of 32-bit integers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_i(rows: i32, cols: i32, mat: *const i32) -> i32 {
    // SAFETY: mat holds rows * cols i32 values per caller contract.
    unsafe { sum_contiguous(rows, cols, mat) }
}

/// Sum of a `rows x cols` matrix of 32-bit integers given as row pointers.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_rows_i(rows: i32, cols: i32, mat: *const *const i32) -> i32 {
    // SAFETY: mat holds rows pointers to cols i32 values per caller contract.
    unsafe { sum_indirect(rows, cols, mat) }
}

/// Sum of a contiguous `rows x cols` matrix of 16-bit integers, in `int`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_s(rows: i32, cols: i32, mat: *const i16) -> i32 {
    // SAFETY: mat holds rows * cols i16 values per caller contract.
    unsafe { sum_contiguous(rows, cols, mat) }
}

/// Sum of a `rows x cols` matrix of 16-bit integers given as row
/// pointers, in `int`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_rows_s(rows: i32, cols: i32, mat: *const *const i16) -> i32 {
    // SAFETY: mat holds rows pointers to cols i16 values per caller contract.
    unsafe { sum_indirect(rows, cols, mat) }
}

/// Sum of a contiguous `rows x cols` matrix of 8-bit integers, in `int`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_b(rows: i32, cols: i32, mat: *const i8) -> i32 {
    // SAFETY: mat holds rows * cols i8 values per caller contract.
    unsafe { sum_contiguous(rows, cols, mat) }
}

/// Sum of a `rows x cols` matrix of 8-bit integers given as row pointers,
/// in `int`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_matrix_rows_b(rows: i32, cols: i32, mat: *const *const i8) -> i32 {
    // SAFETY: mat holds rows pointers to cols i8 values per caller contract.
    unsafe { sum_indirect(rows, cols, mat) }
}
