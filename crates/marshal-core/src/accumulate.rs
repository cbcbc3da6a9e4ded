//! Width-exact accumulation.
//!
//! Integer accumulators wrap at their native width, exactly as a C `+=`
//! on that type would after truncation. Float accumulators add in index
//! order so that two layouts traversed the same way agree bit-for-bit.
//! Overflow is never an error here: a caller that passes the wrong width
//! is expected to see the wrapped result.

use std::fmt::Debug;

/// A value that can be summed at its own width.
pub trait Accumulate: Copy + PartialEq + Debug {
    /// The additive identity.
    const ZERO: Self;

    /// `self + rhs` at this type's width, wrapping for integers.
    fn accumulate(self, rhs: Self) -> Self;
}

macro_rules! wrapping_accumulate {
    ($($t:ty),*) => {
        $(
            impl Accumulate for $t {
                const ZERO: Self = 0;

                #[inline]
                fn accumulate(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }
            }
        )*
    };
}

macro_rules! float_accumulate {
    ($($t:ty),*) => {
        $(
            impl Accumulate for $t {
                const ZERO: Self = 0.0;

                #[inline]
                fn accumulate(self, rhs: Self) -> Self {
                    self + rhs
                }
            }
        )*
    };
}

wrapping_accumulate!(i8, i16, i32, i64);
float_accumulate!(f32, f64);

/// A matrix element type and the accumulator its sums widen into.
///
/// 8- and 16-bit elements widen into `i32`; every other element type
/// accumulates at its own width.
pub trait Element: Accumulate {
    /// Accumulator type for matrix sums over this element.
    type Wide: Accumulate + From<Self>;
}

impl Element for i8 {
    type Wide = i32;
}

impl Element for i16 {
    type Wide = i32;
}

impl Element for i32 {
    type Wide = i32;
}

impl Element for i64 {
    type Wide = i64;
}

impl Element for f32 {
    type Wide = f32;
}

impl Element for f64 {
    type Wide = f64;
}

/// Sum every element of `values` at the element's width.
pub fn sum_slice<T: Accumulate>(values: &[T]) -> T {
    values.iter().fold(T::ZERO, |acc, &v| acc.accumulate(v))
}

/// Sum `a[i] + b[i]` over the shorter of the two slices.
///
/// Each pair is added first, then folded into the running total, which
/// is the evaluation order of `r += a[i] + b[i]`.
pub fn sum_pairwise<T: Accumulate>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b)
        .fold(T::ZERO, |acc, (&x, &y)| acc.accumulate(x.accumulate(y)))
}
