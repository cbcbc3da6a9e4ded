//! Composite structs that mix copied fields with borrowed pointers.
//!
//! Each pointer field a composite does not own is typed [`Borrowed`], so
//! the copy/alias split is part of the declared layout rather than a
//! calling convention. Writes through a borrowed field reach the caller's
//! original object. Copied fields are snapshots taken when the composite
//! was built.

use std::ffi::c_char;

use marshal_core::shift_to_upper;

use crate::raw::{c_str_bytes, slice_mut};
use crate::record::{PassingData, SimpleStruct};
use crate::types::Borrowed;

/// Identity field, an embedded [`PassingData`], a borrowed pointer to
/// another one, and a borrowed C string.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
#[allow(non_snake_case)]
pub struct ComplexPassing {
    /// Identity field.
    pub s_ID: i32,
    /// Embedded by value; lives inside the composite's own memory.
    pub s_passingData: PassingData,
    /// Borrowed; the composite never frees it.
    pub s_ptrPassingData: Borrowed<PassingData>,
    /// Borrowed NUL-terminated string; the composite never frees it.
    pub s_string: Borrowed<c_char>,
}

/// A borrowed [`SimpleStruct`], three copied ones, and a borrowed string.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ComplexStruct {
    /// Borrowed; aliases the first struct passed to
    /// [`marshal_build_composite`].
    pub a: Borrowed<SimpleStruct>,
    /// Copied: `b[0]` from the second argument, `b[1]` from the first,
    /// `b[2]` zeroed. Each copy's `d` still aliases the original pointee.
    pub b: [SimpleStruct; 3],
    /// Borrowed; the string passed in, not a copy of it.
    pub message: Borrowed<c_char>,
}

#[cfg(all(target_pointer_width = "64", not(windows)))]
mod lp64_layout {
    use super::*;

    const _: () = assert!(std::mem::size_of::<ComplexPassing>() == 56);
    const _: () = assert!(std::mem::align_of::<ComplexPassing>() == 8);
    const _: () = assert!(std::mem::size_of::<ComplexStruct>() == 112);
    const _: () = assert!(std::mem::align_of::<ComplexStruct>() == 8);
}

/// Build a [`ComplexStruct`] that borrows `first` and `message` and
/// copies `*second` and `*first` into `b[0]` and `b[1]`.
///
/// A null `first` or `second` leaves the corresponding slot zeroed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_build_composite(
    first: *mut SimpleStruct,
    second: *mut SimpleStruct,
    message: *mut c_char,
) -> ComplexStruct {
    let mut b = [SimpleStruct::zeroed(); 3];
    // SAFETY: first and second are null or readable per caller contract.
    if let Some(s) = unsafe { second.as_ref() } {
        b[0] = *s;
    }
    // SAFETY: as above.
    if let Some(s) = unsafe { first.as_ref() } {
        b[1] = *s;
    }
    ComplexStruct {
        a: Borrowed(first),
        b,
        message: Borrowed(message),
    }
}

/// Sum both [`PassingData`] totals, then mutate through every level of
/// the composite. Returns the sum taken before any mutation.
///
/// Mutations: every byte of `s_string` has 32 subtracted (lowercase ASCII
/// becomes uppercase; anything else is out of contract), `s_ID` and
/// `s_passingData.s_int` grow by 10, and `s_ptrPassingData->s_int` grows by
/// 20. Integer additions wrap. A null borrowed field is skipped.
///
/// The borrowed fields may point back into the composite itself. When
/// `s_ptrPassingData` addresses `s_passingData`, that struct is counted
/// twice and its `s_int` grows by 30.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_mutate_composite(composite: *mut ComplexPassing) -> f64 {
    // SAFETY: composite points to a writable ComplexPassing whose borrowed
    // fields are null or valid per caller contract. Those fields may alias
    // the composite, so all access goes through raw places and no two live
    // references overlap.
    unsafe {
        let linked = (*composite).s_ptrPassingData.as_ptr();
        let mut total = (*composite).s_passingData.total();
        if !linked.is_null() {
            total += (*linked).total();
        }

        let text = (*composite).s_string.as_ptr();
        shift_to_upper(slice_mut(text.cast::<u8>(), c_str_bytes(text).len()));

        (*composite).s_ID = (*composite).s_ID.wrapping_add(10);
        (*composite).s_passingData.s_int = (*composite).s_passingData.s_int.wrapping_add(10);
        if !linked.is_null() {
            (*linked).s_int = (*linked).s_int.wrapping_add(20);
        }
        total
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn passing(s_int: i32, s_long: i64, s_float: f32, s_double: f64) -> PassingData {
        PassingData {
            s_int,
            s_long,
            s_float,
            s_double,
        }
    }

    #[test]
    fn mutate_composite_reference_scenario() {
        let mut linked = passing(5, 6, 7.0, 8.0);
        let mut message = *b"hello\0";
        let mut composite = ComplexPassing {
            s_ID: 1,
            s_passingData: passing(1, 2, 3.0, 4.0),
            s_ptrPassingData: Borrowed(&mut linked),
            s_string: Borrowed(message.as_mut_ptr().cast()),
        };

        let total = marshal_mutate_composite(&mut composite);

        assert_eq!(total, 36.0);
        assert_eq!(composite.s_ID, 11);
        assert_eq!(composite.s_passingData.s_int, 11);
        assert_eq!(linked.s_int, 25);
        assert_eq!(&message, b"HELLO\0");
    }

    #[test]
    fn mutate_composite_leaves_other_fields_alone() {
        let mut linked = passing(5, 6, 7.0, 8.0);
        let mut message = *b"x\0";
        let mut composite = ComplexPassing {
            s_ID: 0,
            s_passingData: passing(1, 2, 3.0, 4.0),
            s_ptrPassingData: Borrowed(&mut linked),
            s_string: Borrowed(message.as_mut_ptr().cast()),
        };
        marshal_mutate_composite(&mut composite);

        assert_eq!(composite.s_passingData.s_long, 2);
        assert_eq!(composite.s_passingData.s_float, 3.0);
        assert_eq!(composite.s_passingData.s_double, 4.0);
        assert_eq!(linked.s_long, 6);
        assert_eq!(linked.s_double, 8.0);
    }

    #[test]
    fn mutate_composite_twice_compounds() {
        let mut linked = passing(0, 0, 0.0, 0.0);
        let mut message = *b"\0";
        let mut composite = ComplexPassing {
            s_ID: 0,
            s_passingData: passing(0, 0, 0.0, 0.0),
            s_ptrPassingData: Borrowed(&mut linked),
            s_string: Borrowed(message.as_mut_ptr().cast()),
        };
        assert_eq!(marshal_mutate_composite(&mut composite), 0.0);
        // Second call sees the first call's increments.
        assert_eq!(marshal_mutate_composite(&mut composite), 30.0);
        assert_eq!(composite.s_ID, 20);
        assert_eq!(linked.s_int, 40);
    }

    #[test]
    fn mutate_composite_when_linked_struct_is_embedded_one() {
        let mut message = *b"ab\0";
        let mut composite = ComplexPassing {
            s_ID: 0,
            s_passingData: passing(1, 2, 3.0, 4.0),
            s_ptrPassingData: Borrowed::null(),
            s_string: Borrowed(message.as_mut_ptr().cast()),
        };
        let p = std::ptr::addr_of_mut!(composite);
        unsafe {
            (*p).s_ptrPassingData = Borrowed(std::ptr::addr_of_mut!((*p).s_passingData));
            assert_eq!(marshal_mutate_composite(p), 20.0);
            assert_eq!((*p).s_passingData.s_int, 31);
            assert_eq!((*p).s_ID, 10);
        }
        assert_eq!(&message, b"AB\0");
    }

    #[test]
    fn mutate_composite_when_string_lives_in_linked_struct() {
        // The string bytes sit inside s_double of the linked struct.
        let mut linked = passing(0, 0, 0.0, 0.0);
        let mut composite = ComplexPassing {
            s_ID: 0,
            s_passingData: passing(0, 0, 0.0, 0.0),
            s_ptrPassingData: Borrowed::null(),
            s_string: Borrowed::null(),
        };
        let l = std::ptr::addr_of_mut!(linked);
        unsafe {
            let text = std::ptr::addr_of_mut!((*l).s_double).cast::<u8>();
            text.copy_from_nonoverlapping(b"xy\0".as_ptr(), 3);
            composite.s_ptrPassingData = Borrowed(l);
            composite.s_string = Borrowed(text.cast());
            marshal_mutate_composite(&mut composite);
            assert_eq!(std::slice::from_raw_parts(text, 3), b"XY\0");
            assert_eq!((*l).s_int, 20);
        }
    }

    #[test]
    fn mutate_composite_skips_null_borrows() {
        let mut composite = ComplexPassing {
            s_ID: 0,
            s_passingData: passing(1, 1, 1.0, 1.0),
            s_ptrPassingData: Borrowed::null(),
            s_string: Borrowed::null(),
        };
        assert_eq!(marshal_mutate_composite(&mut composite), 4.0);
        assert_eq!(composite.s_ID, 10);
    }

    #[test]
    fn build_composite_borrows_and_copies() {
        let mut d1 = 4;
        let mut d2 = 8;
        let mut first = SimpleStruct {
            a: 1,
            b: 2,
            c: 3,
            d: &mut d1,
        };
        let mut second = SimpleStruct {
            a: 5,
            b: 6,
            c: 7,
            d: &mut d2,
        };
        let mut message = *b"hello\0";

        let composite =
            marshal_build_composite(&mut first, &mut second, message.as_mut_ptr().cast());

        assert_eq!(composite.a.as_ptr(), &mut first as *mut SimpleStruct);
        assert_eq!(composite.b[0], second);
        assert_eq!(composite.b[1], first);
        assert_eq!(composite.b[2], SimpleStruct::zeroed());
        assert_eq!(composite.message.as_ptr(), message.as_mut_ptr().cast::<c_char>());

        // Writes through the borrowed field reach the caller's struct...
        unsafe { (*composite.a.as_ptr()).a = 100 };
        assert_eq!(first.a, 100);
        // ...but the copy taken at build time does not follow.
        assert_eq!(composite.b[1].a, 1);
        // The copies' pointers still alias the original pointees.
        unsafe { *composite.b[0].d = 80 };
        assert_eq!(d2, 80);

        let text = unsafe { CStr::from_ptr(composite.message.as_ptr()) };
        assert_eq!(text.to_bytes(), b"hello");
    }

    #[test]
    fn build_composite_with_nulls_leaves_slots_zeroed() {
        let composite = marshal_build_composite(
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        );
        assert!(composite.a.is_null());
        assert!(composite.message.is_null());
        assert!(composite.b.iter().all(|s| *s == SimpleStruct::zeroed()));
    }
}
