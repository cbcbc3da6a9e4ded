//! Flat struct transfer: by value, by pointer, and heap-allocated.
//!
//! [`SimpleStruct`] embeds a raw pointer. Passing it by value copies the
//! pointer but not the pointee, so [`marshal_pass_by_value`] leaves the
//! caller's `a`, `b` and `c` untouched while its write through `d` is
//! visible to the caller. That copy-versus-alias split is what callers
//! check here.

use std::ffi::c_long;
use std::ptr;

use marshal_core::{fixed_steps, FIXED_LEN};
use tracing::trace;

/// Flat struct of one field per common width class.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassingData {
    /// 32-bit integer.
    pub s_int: i32,
    /// 64-bit integer.
    pub s_long: i64,
    /// 32-bit float.
    pub s_float: f32,
    /// 64-bit float.
    pub s_double: f64,
}

impl PassingData {
    /// `s_long + s_float + s_int + s_double`, accumulated in `double` in
    /// that order.
    pub fn total(&self) -> f64 {
        let mut total = 0.0;
        total += self.s_long as f64;
        total += f64::from(self.s_float);
        total += f64::from(self.s_int);
        total += self.s_double;
        total
    }
}

/// Flat struct with a platform-width `long` and an embedded pointer.
///
/// `d` aliases caller memory when the struct is built by the caller. When
/// the struct comes from [`marshal_allocate_struct`], `d` is owned by the
/// caller along with the struct and both go back through
/// [`marshal_free_struct`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleStruct {
    /// 32-bit integer.
    pub a: i32,
    /// Native `long`: 64-bit on LP64 targets, 32-bit on Windows.
    pub b: c_long,
    /// 64-bit integer.
    pub c: i64,
    /// Pointer to a 32-bit integer outside the struct.
    pub d: *mut i32,
}

impl SimpleStruct {
    /// All fields zero, `d` null.
    pub const fn zeroed() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            d: ptr::null_mut(),
        }
    }

    /// Add `inc` to `a`, `b`, `c`, and then to `*d` when `d` is non-null.
    /// All additions wrap.
    ///
    /// `d` may point into `*s` itself, so every update goes through a raw
    /// place and no reference to `*s` is formed.
    ///
    /// # Safety
    ///
    /// `s` must point to a writable `SimpleStruct` whose `d` is null or
    /// points to a writable `i32`.
    #[allow(unsafe_code)]
    unsafe fn increment(s: *mut Self, inc: i32) {
        // SAFETY: s and its d are writable per this function's contract.
        unsafe {
            (*s).a = (*s).a.wrapping_add(inc);
            (*s).b = (*s).b.wrapping_add(c_long::from(inc));
            (*s).c = (*s).c.wrapping_add(i64::from(inc));
            let d = (*s).d;
            if !d.is_null() {
                *d = (*d).wrapping_add(inc);
            }
        }
    }
}

impl Default for SimpleStruct {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Ten doubles returned by value.
///
/// Same ABI as a by-value `std::array<double, 10>`: a struct whose only
/// member is the array.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedArray {
    /// The elements.
    pub values: [f64; FIXED_LEN],
}

#[cfg(all(target_pointer_width = "64", not(windows)))]
mod lp64_layout {
    use super::*;

    const _: () = assert!(std::mem::size_of::<PassingData>() == 32);
    const _: () = assert!(std::mem::align_of::<PassingData>() == 8);
    const _: () = assert!(std::mem::size_of::<SimpleStruct>() == 32);
    const _: () = assert!(std::mem::align_of::<SimpleStruct>() == 8);
    const _: () = assert!(std::mem::size_of::<FixedArray>() == 80);
}

/// Weighted total of the struct at `data`; see [`PassingData::total`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_pass_struct(data: *const PassingData) -> f64 {
    // SAFETY: data points to a readable PassingData per caller contract.
    unsafe { (*data).total() }
}

/// Allocate a [`SimpleStruct`] holding `{a: 1, b: 2, c: 3, d: -> 4}`.
///
/// The struct and its separately allocated `d` both transfer to the
/// caller. Release the pair with [`marshal_free_struct`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_allocate_struct() -> *mut SimpleStruct {
    let d = Box::into_raw(Box::new(4i32));
    let s = Box::into_raw(Box::new(SimpleStruct { a: 1, b: 2, c: 3, d }));
    trace!(target: "marshal::record", "struct allocated");
    s
}

/// Release a struct from [`marshal_allocate_struct`] together with its
/// `d` field. Null is a no-op.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_free_struct(s: *mut SimpleStruct) {
    if s.is_null() {
        return;
    }
    // SAFETY: s came from marshal_allocate_struct and has not been freed,
    // per caller contract; its d was boxed there too (or nulled by the
    // caller, which is skipped).
    let s = unsafe { Box::from_raw(s) };
    if !s.d.is_null() {
        // SAFETY: see above.
        drop(unsafe { Box::from_raw(s.d) });
    }
    trace!(target: "marshal::record", "struct freed");
}

/// Take `s` by value, add `inc` to every field of the copy (and to the
/// integer `d` points at), and return the copy.
///
/// The caller's `a`, `b` and `c` are unchanged afterwards. Its `*d` is
/// not, because the copy's `d` points at the same integer.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_pass_by_value(mut s: SimpleStruct, inc: i32) -> SimpleStruct {
    // SAFETY: d is null or points to a writable i32 per caller contract.
    unsafe { SimpleStruct::increment(ptr::addr_of_mut!(s), inc) };
    s
}

/// Add `inc` to every field of `*s` and to the integer `s->d` points at.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_mutate_by_pointer(s: *mut SimpleStruct, inc: i32) {
    // SAFETY: s points to a writable SimpleStruct whose d is null or
    // writable, per caller contract. d may alias a field of *s.
    unsafe { SimpleStruct::increment(s, inc) };
}

/// Ten doubles where element `i` is `lower + i * step`, returned by value.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_fixed_array(lower: f64, step: f64) -> FixedArray {
    FixedArray {
        values: fixed_steps(lower, step),
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn pass_struct_sums_every_width() {
        let data = PassingData {
            s_int: 1,
            s_long: 2,
            s_float: 3.0,
            s_double: 4.0,
        };
        assert_eq!(marshal_pass_struct(&data), 10.0);
    }

    #[test]
    fn pass_struct_keeps_long_precision_in_double() {
        let data = PassingData {
            s_long: 1 << 40,
            ..PassingData::default()
        };
        assert_eq!(marshal_pass_struct(&data), (1u64 << 40) as f64);
    }

    #[test]
    fn allocated_struct_carries_sentinels() {
        let s = marshal_allocate_struct();
        let v = unsafe { *s };
        assert_eq!((v.a, v.b, v.c), (1, 2, 3));
        assert_eq!(unsafe { *v.d }, 4);
        marshal_free_struct(s);
    }

    #[test]
    fn pass_by_value_copies_fields_but_aliases_pointee() {
        let mut pointee = 4;
        let original = SimpleStruct {
            a: 1,
            b: 2,
            c: 3,
            d: &mut pointee,
        };
        let returned = marshal_pass_by_value(original, 5);

        assert_eq!((original.a, original.b, original.c), (1, 2, 3));
        assert_eq!(pointee, 9);
        assert_eq!((returned.a, returned.b, returned.c), (6, 7, 8));
        assert_eq!(returned.d, original.d);
    }

    #[test]
    fn mutate_by_pointer_is_visible_everywhere() {
        let mut pointee = 4;
        let mut s = SimpleStruct {
            a: 1,
            b: 2,
            c: 3,
            d: &mut pointee,
        };
        marshal_mutate_by_pointer(&mut s, 10);
        marshal_mutate_by_pointer(&mut s, 10);
        assert_eq!((s.a, s.b, s.c), (21, 22, 23));
        assert_eq!(pointee, 24);
    }

    #[test]
    fn mutate_by_pointer_when_d_points_into_the_struct() {
        let mut s = SimpleStruct {
            a: 1,
            b: 2,
            c: 3,
            ..SimpleStruct::zeroed()
        };
        let p = ptr::addr_of_mut!(s);
        unsafe {
            (*p).d = ptr::addr_of_mut!((*p).a);
            marshal_mutate_by_pointer(p, 4);
            // `a` is bumped once as a field and once through `d`.
            assert_eq!(((*p).a, (*p).b, (*p).c), (9, 6, 7));
            assert_eq!(*(*p).d, 9);
        }
    }

    #[test]
    fn increments_wrap() {
        let mut s = SimpleStruct {
            a: i32::MAX,
            ..SimpleStruct::zeroed()
        };
        marshal_mutate_by_pointer(&mut s, 1);
        assert_eq!(s.a, i32::MIN);
    }

    #[test]
    fn null_pointee_is_skipped() {
        let s = marshal_pass_by_value(SimpleStruct::zeroed(), 3);
        assert_eq!((s.a, s.b, s.c), (3, 3, 3));
        assert!(s.d.is_null());
        marshal_free_struct(std::ptr::null_mut());
    }

    #[test]
    fn fixed_array_half_steps() {
        let arr = marshal_fixed_array(0.0, 0.5);
        assert_eq!(
            arr.values,
            [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5]
        );
    }

    #[test]
    fn fixed_array_length_is_ten() {
        assert_eq!(marshal_fixed_array(1.0, 1.0).values.len(), 10);
        assert_eq!(
            std::mem::size_of::<FixedArray>(),
            10 * std::mem::size_of::<f64>()
        );
    }
}
