//! Heap blocks whose ownership transfers to the caller.
//!
//! Every block comes from the Rust global allocator linked into this
//! library and carries a small header recording its payload length, so a
//! single [`marshal_release`] can return any block to the allocator that
//! produced it. Callers must never hand these blocks to their own `free`,
//! and must never pass foreign memory to `marshal_release`: both are
//! undefined behaviour by contract.
//!
//! [`marshal_allocate_string`] deliberately allocates exactly `strlen`
//! bytes and writes no terminator. [`marshal_allocation_size`] exposes the
//! recorded payload length so callers can test that boundary directly.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ffi::{c_char, c_void};
use std::ptr;

use marshal_core::ramp;
use tracing::trace;

use crate::raw::{c_str_bytes, element_count};

/// Header size and block alignment. Keeps the payload aligned for any
/// primitive the fixture hands out.
const HEADER: usize = 16;

fn block_layout(payload: usize) -> Option<Layout> {
    Layout::from_size_align(payload.checked_add(HEADER)?, HEADER).ok()
}

/// Allocate a block with `payload` usable bytes. Returns null on
/// allocation failure or size overflow.
fn allocate(payload: usize) -> *mut u8 {
    let Some(layout) = block_layout(payload) else {
        return ptr::null_mut();
    };
    // SAFETY: layout has non-zero size (at least HEADER bytes).
    let base = unsafe { alloc::alloc(layout) };
    if base.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: base is HEADER-aligned and holds at least HEADER bytes, so the
    // usize header write and the payload offset are both in bounds.
    let block = unsafe {
        base.cast::<usize>().write(payload);
        base.add(HEADER)
    };
    trace!(target: "marshal::heap", bytes = payload, "block allocated");
    block
}

/// # Safety
///
/// `payload` must be a non-null pointer returned by [`allocate`] that has
/// not been released.
unsafe fn header_of(payload: *const u8) -> (*mut u8, usize) {
    // SAFETY: payload sits HEADER bytes past the start of its block.
    unsafe {
        let base = payload.sub(HEADER).cast_mut();
        (base, base.cast::<usize>().read())
    }
}

/// Length of the NUL-terminated string at `s`, excluding the terminator.
#[no_mangle]
pub extern "C" fn marshal_string_length(s: *const c_char) -> i32 {
    // SAFETY: s is null or a NUL-terminated string per caller contract.
    let bytes = unsafe { c_str_bytes(s) };
    i32::try_from(bytes.len()).unwrap_or(i32::MAX)
}

/// Copy the characters of `source` into a new block of exactly
/// `strlen(source)` bytes.
///
/// No terminator byte is allocated or written: reading the result as a C
/// string runs off the end of the block. Release with [`marshal_release`].
/// Returns null if allocation fails.
#[no_mangle]
pub extern "C" fn marshal_allocate_string(source: *const c_char) -> *mut c_char {
    // SAFETY: source is null or a NUL-terminated string per caller contract.
    let bytes = unsafe { c_str_bytes(source) };
    let block = allocate(bytes.len());
    if block.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: block has room for bytes.len() bytes and cannot overlap the
    // caller's string, which it was just allocated apart from.
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), block, bytes.len()) };
    block.cast()
}

/// Allocate `count` doubles holding `0.0, 1.0, ..., count - 1`.
///
/// A non-positive count yields a valid, empty block. Release with
/// [`marshal_release`]. Returns null if allocation fails.
#[no_mangle]
pub extern "C" fn marshal_allocate_doubles(count: i32) -> *mut f64 {
    let len = element_count(count);
    let Some(bytes) = len.checked_mul(std::mem::size_of::<f64>()) else {
        return ptr::null_mut();
    };
    let block = allocate(bytes).cast::<f64>();
    if block.is_null() {
        return ptr::null_mut();
    }
    for (i, v) in ramp(len).enumerate() {
        // SAFETY: block is f64-aligned with room for len doubles.
        unsafe { block.add(i).write(v) };
    }
    block
}

/// Payload length in bytes of a block from [`marshal_allocate_string`] or
/// [`marshal_allocate_doubles`]. Returns 0 for null.
#[no_mangle]
pub extern "C" fn marshal_allocation_size(block: *const c_void) -> usize {
    if block.is_null() {
        return 0;
    }
    // SAFETY: block came from this allocation domain and is still live, per
    // caller contract.
    unsafe { header_of(block.cast()) }.1
}

/// Release a block from [`marshal_allocate_string`] or
/// [`marshal_allocate_doubles`]. Null is a no-op.
///
/// Releasing the same block twice, or memory from any other allocator, is
/// undefined behaviour.
#[no_mangle]
pub extern "C" fn marshal_release(block: *mut c_void) {
    if block.is_null() {
        return;
    }
    // SAFETY: block came from this allocation domain and has not been
    // released, per caller contract.
    let (base, payload) = unsafe { header_of(block.cast()) };
    let Some(layout) = block_layout(payload) else {
        return;
    };
    trace!(target: "marshal::heap", bytes = payload, "block released");
    // SAFETY: base and layout are exactly what `allocate` obtained.
    unsafe { alloc::dealloc(base, layout) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn string_length_matches_strlen() {
        let s = CString::new("hello").unwrap();
        assert_eq!(marshal_string_length(s.as_ptr()), 5);
        assert_eq!(marshal_string_length(ptr::null()), 0);
    }

    #[test]
    fn allocated_string_holds_characters_without_terminator() {
        let s = CString::new("AB").unwrap();
        let copy = marshal_allocate_string(s.as_ptr());
        assert!(!copy.is_null());
        assert_eq!(marshal_allocation_size(copy.cast()), 2);
        let bytes = unsafe { std::slice::from_raw_parts(copy.cast::<u8>(), 2) };
        assert_eq!(bytes, b"AB");
        marshal_release(copy.cast());
    }

    #[test]
    fn empty_string_gives_zero_length_block() {
        let s = CString::new("").unwrap();
        let copy = marshal_allocate_string(s.as_ptr());
        assert!(!copy.is_null());
        assert_eq!(marshal_allocation_size(copy.cast()), 0);
        marshal_release(copy.cast());
    }

    #[test]
    fn copy_is_independent_of_source() {
        let mut source = *b"abc\0";
        let copy = marshal_allocate_string(source.as_ptr().cast());
        source[0] = b'z';
        let bytes = unsafe { std::slice::from_raw_parts(copy.cast::<u8>(), 3) };
        assert_eq!(bytes, b"abc");
        marshal_release(copy.cast());
    }

    #[test]
    fn doubles_are_index_valued() {
        let block = marshal_allocate_doubles(5);
        assert_eq!(marshal_allocation_size(block.cast()), 40);
        let values = unsafe { std::slice::from_raw_parts(block, 5) };
        assert_eq!(values, &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(block as usize % std::mem::align_of::<f64>(), 0);
        marshal_release(block.cast());
    }

    #[test]
    fn non_positive_count_gives_empty_block() {
        for count in [0, -4] {
            let block = marshal_allocate_doubles(count);
            assert!(!block.is_null());
            assert_eq!(marshal_allocation_size(block.cast()), 0);
            marshal_release(block.cast());
        }
    }

    #[test]
    fn allocation_and_release_are_traced() {
        let (_, log) = marshal_test_utils::capture_trace(|| {
            let block = marshal_allocate_doubles(3);
            marshal_release(block.cast());
        });
        assert!(log.contains("block allocated"), "{log}");
        assert!(log.contains("block released"), "{log}");
        assert!(log.contains("bytes=24"), "{log}");
    }

    #[test]
    fn null_is_accepted_by_release_and_size() {
        marshal_release(ptr::null_mut());
        assert_eq!(marshal_allocation_size(ptr::null()), 0);
    }
}
