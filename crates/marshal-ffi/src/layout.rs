//! Runtime description of the exported struct layouts.
//!
//! A foreign caller declares its own mirror of every struct. Before it runs
//! any behavioural check it can walk these tables and compare field names,
//! offsets, sizes, and ownership one by one, so a layout mismatch fails
//! loudly instead of surfacing as a wrong sum.

use std::ffi::{c_char, CStr};
use std::mem::{offset_of, size_of};

use crate::composite::{ComplexPassing, ComplexStruct};
use crate::record::{FixedArray, PassingData, SimpleStruct};
use crate::types::{MarshalOwnership, MarshalStructKind};

/// One field of an exported struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared in C.
    pub name: &'static CStr,
    /// Byte offset from the start of the struct.
    pub offset: usize,
    /// Byte size of the field.
    pub size: usize,
    /// Whether the struct owns, borrows, or hands over what the field
    /// describes.
    pub ownership: MarshalOwnership,
}

/// C view of a [`FieldDescriptor`], filled by [`marshal_layout_field`].
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct MarshalFieldInfo {
    /// NUL-terminated field name with static lifetime. Never freed.
    pub name: *const c_char,
    /// Byte offset from the start of the struct.
    pub offset: usize,
    /// Byte size of the field.
    pub size: usize,
    /// Ownership of the field.
    pub ownership: MarshalOwnership,
}

impl From<&FieldDescriptor> for MarshalFieldInfo {
    fn from(d: &FieldDescriptor) -> Self {
        Self {
            name: d.name.as_ptr(),
            offset: d.offset,
            size: d.size,
            ownership: d.ownership,
        }
    }
}

macro_rules! field {
    ($ty:ty, $field:ident: $fty:ty, $own:ident) => {
        FieldDescriptor {
            name: match CStr::from_bytes_with_nul(concat!(stringify!($field), "\0").as_bytes()) {
                Ok(name) => name,
                Err(_) => panic!("field name contains NUL"),
            },
            offset: offset_of!($ty, $field),
            size: size_of::<$fty>(),
            ownership: MarshalOwnership::$own,
        }
    };
}

const PASSING_DATA: &[FieldDescriptor] = &[
    field!(PassingData, s_int: i32, Copied),
    field!(PassingData, s_long: i64, Copied),
    field!(PassingData, s_float: f32, Copied),
    field!(PassingData, s_double: f64, Copied),
];

const SIMPLE_STRUCT: &[FieldDescriptor] = &[
    field!(SimpleStruct, a: i32, Copied),
    field!(SimpleStruct, b: std::ffi::c_long, Copied),
    field!(SimpleStruct, c: i64, Copied),
    field!(SimpleStruct, d: *mut i32, Transferred),
];

const COMPLEX_PASSING: &[FieldDescriptor] = &[
    field!(ComplexPassing, s_ID: i32, Copied),
    field!(ComplexPassing, s_passingData: PassingData, Copied),
    field!(ComplexPassing, s_ptrPassingData: *mut PassingData, Borrowed),
    field!(ComplexPassing, s_string: *mut c_char, Borrowed),
];

const COMPLEX_STRUCT: &[FieldDescriptor] = &[
    field!(ComplexStruct, a: *mut SimpleStruct, Borrowed),
    field!(ComplexStruct, b: [SimpleStruct; 3], Copied),
    field!(ComplexStruct, message: *mut c_char, Borrowed),
];

const FIXED_ARRAY: &[FieldDescriptor] = &[field!(
    FixedArray,
    values: [f64; marshal_core::FIXED_LEN],
    Copied
)];

impl MarshalStructKind {
    /// Every field of the struct, in declaration order.
    pub fn fields(self) -> &'static [FieldDescriptor] {
        match self {
            Self::PassingData => PASSING_DATA,
            Self::SimpleStruct => SIMPLE_STRUCT,
            Self::ComplexPassing => COMPLEX_PASSING,
            Self::ComplexStruct => COMPLEX_STRUCT,
            Self::FixedArray => FIXED_ARRAY,
        }
    }

    /// `size_of` the struct on this target.
    pub fn size(self) -> usize {
        match self {
            Self::PassingData => size_of::<PassingData>(),
            Self::SimpleStruct => size_of::<SimpleStruct>(),
            Self::ComplexPassing => size_of::<ComplexPassing>(),
            Self::ComplexStruct => size_of::<ComplexStruct>(),
            Self::FixedArray => size_of::<FixedArray>(),
        }
    }
}

/// Size in bytes of the struct `kind` names, or 0 for an unknown kind.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_layout_size(kind: i32) -> usize {
    MarshalStructKind::from_raw(kind).map_or(0, MarshalStructKind::size)
}

/// Describe field `index` of the struct `kind` names.
///
/// Returns 1 and writes `*out` when both are valid. Returns 0 and leaves
/// `*out` untouched for an unknown kind, an index past the last field, or
/// a null `out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn marshal_layout_field(kind: i32, index: u32, out: *mut MarshalFieldInfo) -> u8 {
    let Some(kind) = MarshalStructKind::from_raw(kind) else {
        return 0;
    };
    let Some(field) = usize::try_from(index)
        .ok()
        .and_then(|i| kind.fields().get(i))
    else {
        return 0;
    };
    if out.is_null() {
        return 0;
    }
    // SAFETY: out is non-null and points to writable storage for a
    // MarshalFieldInfo per caller contract.
    unsafe { out.write(MarshalFieldInfo::from(field)) };
    1
}
