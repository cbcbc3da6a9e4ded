//! A global allocator that counts live bytes per thread.
//!
//! Integration tests install it with `#[global_allocator]` and compare
//! [`outstanding_bytes`] before and after an allocate/release pair. The
//! count is per thread, so tests running in parallel on other threads do
//! not disturb it.

#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

thread_local! {
    static OUTSTANDING: Cell<isize> = const { Cell::new(0) };
}

fn adjust(delta: isize) {
    // Fails only while the thread's locals are being torn down.
    let _ = OUTSTANDING.try_with(|n| n.set(n.get().wrapping_add(delta)));
}

fn signed(size: usize) -> isize {
    isize::try_from(size).unwrap_or(isize::MAX)
}

/// Bytes this thread has allocated through [`CountingAllocator`] and not
/// yet freed. Negative if the thread freed memory another thread allocated.
pub fn outstanding_bytes() -> isize {
    OUTSTANDING.try_with(Cell::get).unwrap_or(0)
}

/// Forwards to [`System`] and tracks live bytes per thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountingAllocator;

// SAFETY: every method forwards to System with the caller's arguments
// unchanged; the bookkeeping never touches the returned memory.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded contract.
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            adjust(signed(layout.size()));
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // SAFETY: forwarded contract.
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            adjust(signed(layout.size()));
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: forwarded contract.
        unsafe { System.dealloc(ptr, layout) };
        adjust(-signed(layout.size()));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: forwarded contract.
        let new = unsafe { System.realloc(ptr, layout, new_size) };
        if !new.is_null() {
            adjust(signed(new_size).wrapping_sub(signed(layout.size())));
        }
        new
    }
}
