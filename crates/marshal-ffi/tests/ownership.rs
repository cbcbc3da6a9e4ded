//! Integration test: every allocating entry point has exactly one release
//! partner, and the pair leaves this thread's live byte count where it
//! started.
//!
//! The counting allocator tracks bytes per thread, so each test measures
//! only its own allocations even when the harness runs tests in parallel.

use std::ffi::CString;

use marshal::heap::{
    marshal_allocate_doubles, marshal_allocate_string, marshal_allocation_size, marshal_release,
};
use marshal::record::{marshal_allocate_struct, marshal_free_struct};
use marshal_test_utils::{outstanding_bytes, CountingAllocator};

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator;

/// Run `f` and return how many bytes it left live on this thread.
fn leaked_by(f: impl FnOnce()) -> isize {
    let before = outstanding_bytes();
    f();
    outstanding_bytes() - before
}

#[test]
fn string_copy_released_through_fixture_leaves_no_bytes() {
    let source = CString::new("hello, marshal").unwrap();
    let leaked = leaked_by(|| {
        let copy = marshal_allocate_string(source.as_ptr());
        assert!(!copy.is_null());
        marshal_release(copy.cast());
    });
    assert_eq!(leaked, 0);
}

#[test]
fn string_copy_is_live_until_released() {
    let source = CString::new("AB").unwrap();
    let before = outstanding_bytes();
    let copy = marshal_allocate_string(source.as_ptr());
    assert!(outstanding_bytes() > before);
    assert_eq!(marshal_allocation_size(copy.cast()), 2);
    let bytes = unsafe { std::slice::from_raw_parts(copy.cast::<u8>(), 2) };
    assert_eq!(bytes, b"AB");
    marshal_release(copy.cast());
    assert_eq!(outstanding_bytes(), before);
}

#[test]
fn doubles_released_through_fixture_leave_no_bytes() {
    for count in [0, 1, 5, 1000] {
        let leaked = leaked_by(|| {
            let block = marshal_allocate_doubles(count);
            assert!(!block.is_null());
            let values = unsafe { std::slice::from_raw_parts(block, count as usize) };
            assert!(values.iter().copied().eq((0..count).map(f64::from)));
            marshal_release(block.cast());
        });
        assert_eq!(leaked, 0, "count {count}");
    }
}

#[test]
fn struct_and_pointee_released_together() {
    let leaked = leaked_by(|| {
        let s = marshal_allocate_struct();
        let v = unsafe { *s };
        assert_eq!((v.a, v.b, v.c), (1, 2, 3));
        assert_eq!(unsafe { *v.d }, 4);
        marshal_free_struct(s);
    });
    assert_eq!(leaked, 0);
}

#[test]
fn allocated_struct_holds_two_blocks() {
    let before = outstanding_bytes();
    let s = marshal_allocate_struct();
    let live = outstanding_bytes() - before;
    assert_eq!(
        live as usize,
        std::mem::size_of::<marshal::SimpleStruct>() + std::mem::size_of::<i32>()
    );
    marshal_free_struct(s);
    assert_eq!(outstanding_bytes(), before);
}

#[test]
fn repeated_pairs_do_not_accumulate() {
    let source = CString::new("abc").unwrap();
    let leaked = leaked_by(|| {
        for _ in 0..100 {
            marshal_release(marshal_allocate_string(source.as_ptr()).cast());
            marshal_release(marshal_allocate_doubles(8).cast());
            marshal_free_struct(marshal_allocate_struct());
        }
    });
    assert_eq!(leaked, 0);
}

#[test]
fn null_release_is_a_no_op() {
    let leaked = leaked_by(|| {
        marshal_release(std::ptr::null_mut());
        marshal_free_struct(std::ptr::null_mut());
    });
    assert_eq!(leaked, 0);
}
