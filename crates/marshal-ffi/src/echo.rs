//! Scalar and vector echo: width-exact sums, array sums, and `read`
//! mutators that write a value into a caller-supplied slot.
//!
//! Every integer sum wraps at the declared C width. A caller that
//! describes a parameter at the wrong width sees a wrapped or garbled
//! result rather than a panic.
//!
//! Array counts keep the width of each function's C signature
//! (`short` for 16-bit arrays, `char` for 8-bit arrays, `long long` for
//! 64-bit arrays) since the count's width is under test too.

use std::ffi::c_long;

use marshal_core::{sum_pairwise, sum_slice};

use crate::raw::{element_count, slice, slice_mut};

/// `a + b` in `double`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_d(a: f64, b: f64) -> f64 {
    a + b
}

/// `a + b` in `float`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_f(a: f32, b: f32) -> f32 {
    a + b
}

/// `a + b` in `long long`, wrapping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_l(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

/// `a + b` in `int`, wrapping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_i(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// `a + b` in `short`, wrapping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_s(a: i16, b: i16) -> i16 {
    a.wrapping_add(b)
}

/// `a + b` in signed `char`, wrapping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_b(a: i8, b: i8) -> i8 {
    a.wrapping_add(b)
}

/// `a + b` for an `int` and a `long long`, returned as `double`.
///
/// The addition happens in 64-bit integers (wrapping) before conversion.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_mixed(a: i32, b: i64) -> f64 {
    i64::from(a).wrapping_add(b) as f64
}

/// `a + b` at the platform's native `long` width, wrapping.
///
/// `long` is 64-bit on LP64 targets and 32-bit on Windows; a caller that
/// hard-codes either width is caught on the other.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_native_long(a: c_long, b: i32) -> c_long {
    a.wrapping_add(c_long::from(b))
}

/// Sum of `count` doubles.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_d(arr: *const f64, count: i32) -> f64 {
    // SAFETY: arr points to count readable doubles per caller contract.
    sum_slice(unsafe { slice(arr, element_count(count)) })
}

/// Sum of `count` floats, accumulated in `float`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_f(arr: *const f32, count: i32) -> f32 {
    // SAFETY: arr points to count readable floats per caller contract.
    sum_slice(unsafe { slice(arr, element_count(count)) })
}

/// Sum of `count` 64-bit integers, wrapping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_l(arr: *const i64, count: i64) -> i64 {
    // SAFETY: arr points to count readable i64 values per caller contract.
    sum_slice(unsafe { slice(arr, element_count(count)) })
}

/// Sum of `count` 32-bit integers, wrapping.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_i(arr: *const i32, count: i32) -> i32 {
    // SAFETY: arr points to count readable i32 values per caller contract.
    sum_slice(unsafe { slice(arr, element_count(count)) })
}

/// Sum of `count` 16-bit integers, wrapping at 16 bits.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_s(arr: *const i16, count: i16) -> i16 {
    // SAFETY: arr points to count readable i16 values per caller contract.
    sum_slice(unsafe { slice(arr, element_count(count)) })
}

/// Sum of `count` 8-bit integers, wrapping at 8 bits.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_b(arr: *const i8, count: i8) -> i8 {
    // SAFETY: arr points to count readable i8 values per caller contract.
    sum_slice(unsafe { slice(arr, element_count(count)) })
}

/// `Σ (arr1[i] + arr2[i])` over `count` elements of each array.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_sum_array_pair_d(arr1: *const f64, arr2: *const f64, count: i32) -> f64 {
    let len = element_count(count);
    // SAFETY: arr1 and arr2 each point to count readable doubles per
    // caller contract.
    let (a, b) = unsafe { (slice(arr1, len), slice(arr2, len)) };
    sum_pairwise(a, b)
}

/// Write `value`, promoted from `int` to `double`, into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_read_d(out: *mut f64, value: i32) {
    // SAFETY: out is a valid, writable double slot per caller contract.
    unsafe { *out = f64::from(value) };
}

/// Write `value` into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_read_f(out: *mut f32, value: f32) {
    // SAFETY: out is a valid, writable float slot per caller contract.
    unsafe { *out = value };
}

/// Write `value` into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_read_l(out: *mut i64, value: i64) {
    // SAFETY: out is a valid, writable i64 slot per caller contract.
    unsafe { *out = value };
}

/// Write `value` into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_read_i(out: *mut i32, value: i32) {
    // SAFETY: out is a valid, writable i32 slot per caller contract.
    unsafe { *out = value };
}

/// Write `value` into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_read_s(out: *mut i16, value: i16) {
    // SAFETY: out is a valid, writable i16 slot per caller contract.
    unsafe { *out = value };
}

/// Write `value` into `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_read_b(out: *mut i8, value: i8) {
    // SAFETY: out is a valid, writable i8 slot per caller contract.
    unsafe { *out = value };
}

/// Add 1.0 to each of the `len` doubles at `arr`, in place.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_increment_in_place(arr: *mut f64, len: i32) {
    // SAFETY: arr points to len writable doubles, not aliased elsewhere for
    // the duration of the call, per caller contract.
    let values = unsafe { slice_mut(arr, element_count(len)) };
    for v in values {
        *v += 1.0;
    }
}
