//! Turning caller-supplied pointer/count pairs into slices.
//!
//! Counts arrive at whatever width the entry point's C signature uses.
//! A count that is zero or negative yields an empty slice, matching a C
//! `for (n = 0; n < count; ++n)` loop that never runs. A null pointer with
//! a non-positive count is accepted for the same reason.

#![allow(unsafe_code)]

/// Number of elements a C-side count describes.
pub(crate) fn element_count<N: TryInto<usize>>(count: N) -> usize {
    count.try_into().unwrap_or(0)
}

/// Borrow `len` elements starting at `ptr`.
///
/// # Safety
///
/// When `len > 0`, `ptr` must be non-null, aligned, and point to `len`
/// initialised `T` values that stay unmodified for `'a`.
pub(crate) unsafe fn slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if len == 0 || ptr.is_null() {
        return &[];
    }
    // SAFETY: upheld by the caller per this function's contract.
    unsafe { std::slice::from_raw_parts(ptr, len) }
}

/// Mutably borrow `len` elements starting at `ptr`.
///
/// # Safety
///
/// As [`slice`], and no other reference to the range may be live for `'a`.
pub(crate) unsafe fn slice_mut<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if len == 0 || ptr.is_null() {
        return &mut [];
    }
    // SAFETY: upheld by the caller per this function's contract.
    unsafe { std::slice::from_raw_parts_mut(ptr, len) }
}

/// The bytes of a NUL-terminated C string, without the terminator.
///
/// A null pointer reads as the empty string.
///
/// # Safety
///
/// When non-null, `ptr` must point to a NUL-terminated byte sequence that
/// stays valid and unmodified for `'a`.
pub(crate) unsafe fn c_str_bytes<'a>(ptr: *const std::ffi::c_char) -> &'a [u8] {
    if ptr.is_null() {
        return &[];
    }
    // SAFETY: upheld by the caller per this function's contract.
    unsafe { std::ffi::CStr::from_ptr(ptr) }.to_bytes()
}
