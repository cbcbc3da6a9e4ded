//! Ownership markers and C-compatible enums shared by the struct layouts.

/// A pointer field whose pointee the enclosing struct does not own.
///
/// ABI-identical to `T*`. Writes through it land in memory the caller
/// still owns, so they are visible through the caller's original object.
#[repr(transparent)]
#[derive(Debug)]
pub struct Borrowed<T>(pub *mut T);

impl<T> Borrowed<T> {
    /// A borrowed field that points nowhere.
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// The raw pointer.
    pub fn as_ptr(self) -> *mut T {
        self.0
    }

    /// Whether the field points nowhere.
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl<T> Clone for Borrowed<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Borrowed<T> {}

impl<T> Default for Borrowed<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> PartialEq for Borrowed<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<T> Eq for Borrowed<T> {}

impl<T> From<*mut T> for Borrowed<T> {
    fn from(ptr: *mut T) -> Self {
        Self(ptr)
    }
}

/// How a struct field relates to the memory it describes.
///
/// Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarshalOwnership {
    /// The field holds its own value; copying the struct copies it.
    Copied = 0,
    /// The field points at caller-owned memory; the struct never frees it.
    Borrowed = 1,
    /// The field points at memory whose ownership moved to the caller
    /// along with the struct, to be released through the fixture.
    Transferred = 2,
}

/// Struct layouts exported by the fixture, for layout introspection.
///
/// Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarshalStructKind {
    /// [`PassingData`](crate::record::PassingData).
    PassingData = 0,
    /// [`SimpleStruct`](crate::record::SimpleStruct).
    SimpleStruct = 1,
    /// [`ComplexPassing`](crate::composite::ComplexPassing).
    ComplexPassing = 2,
    /// [`ComplexStruct`](crate::composite::ComplexStruct).
    ComplexStruct = 3,
    /// [`FixedArray`](crate::record::FixedArray).
    FixedArray = 4,
}

impl MarshalStructKind {
    /// Decode a raw discriminator from C. Unknown values yield `None`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::PassingData),
            1 => Some(Self::SimpleStruct),
            2 => Some(Self::ComplexPassing),
            3 => Some(Self::ComplexStruct),
            4 => Some(Self::FixedArray),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_values_are_stable() {
        assert_eq!(MarshalOwnership::Copied as i32, 0);
        assert_eq!(MarshalOwnership::Borrowed as i32, 1);
        assert_eq!(MarshalOwnership::Transferred as i32, 2);

        assert_eq!(MarshalStructKind::PassingData as i32, 0);
        assert_eq!(MarshalStructKind::SimpleStruct as i32, 1);
        assert_eq!(MarshalStructKind::ComplexPassing as i32, 2);
        assert_eq!(MarshalStructKind::ComplexStruct as i32, 3);
        assert_eq!(MarshalStructKind::FixedArray as i32, 4);
    }

    #[test]
    fn from_raw_round_trips_known_kinds() {
        for raw in 0..5 {
            let kind = MarshalStructKind::from_raw(raw).unwrap();
            assert_eq!(kind as i32, raw);
        }
        assert_eq!(MarshalStructKind::from_raw(5), None);
        assert_eq!(MarshalStructKind::from_raw(-1), None);
    }

    #[test]
    fn borrowed_is_pointer_sized() {
        assert_eq!(
            std::mem::size_of::<Borrowed<u8>>(),
            std::mem::size_of::<*mut u8>()
        );
        assert!(Borrowed::<u8>::default().is_null());
    }
}
