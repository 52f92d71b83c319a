// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! By-value saturating arithmetic.
//!
//! The standard library exposes `saturating_add` and friends as inherent
//! methods only, which generic code cannot name. These traits forward to the
//! inherent methods so a generic objective type can accumulate costs that
//! clamp at the numeric bounds instead of wrapping.

use core::ops::{Add, Mul};

macro_rules! saturating_impl_binary_val {
    ($trait_name:ident, $method:ident, $src_method:ident, $($t:ty),+) => {
        $(
            impl $trait_name for $t {
                #[inline(always)]
                fn $method(self, v: Self) -> Self {
                    <$t>::$src_method(self, v)
                }
            }
        )+
    };
}

pub trait SaturatingAddVal: Sized + Add<Self, Output = Self> {
    /// Performs saturating addition by value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use srflp_core::num::ops::saturating_arithmetic::SaturatingAddVal;
    ///
    /// let a: i32 = i32::MAX - 1;
    /// assert_eq!(a.saturating_add_val(10), i32::MAX);
    /// ```
    fn saturating_add_val(self, v: Self) -> Self;
}

pub trait SaturatingMulVal: Sized + Mul<Self, Output = Self> {
    /// Performs saturating multiplication by value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use srflp_core::num::ops::saturating_arithmetic::SaturatingMulVal;
    ///
    /// let a: i16 = 300;
    /// assert_eq!(a.saturating_mul_val(300), i16::MAX);
    /// ```
    fn saturating_mul_val(self, v: Self) -> Self;
}

saturating_impl_binary_val!(
    SaturatingAddVal,
    saturating_add_val,
    saturating_add,
    u8,
    u16,
    u32,
    u64,
    usize,
    u128,
    i8,
    i16,
    i32,
    i64,
    isize,
    i128
);

saturating_impl_binary_val!(
    SaturatingMulVal,
    saturating_mul_val,
    saturating_mul,
    u8,
    u16,
    u32,
    u64,
    usize,
    u128,
    i8,
    i16,
    i32,
    i64,
    isize,
    i128
);

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate<T>(values: &[T], start: T) -> T
    where
        T: SaturatingAddVal + Copy,
    {
        values.iter().fold(start, |acc, &v| acc.saturating_add_val(v))
    }

    #[test]
    fn test_add_clamps_at_max() {
        assert_eq!(accumulate(&[i64::MAX, 1, 1], 0), i64::MAX);
        assert_eq!(accumulate(&[200u8, 100u8], 0), u8::MAX);
    }

    #[test]
    fn test_add_clamps_at_min() {
        assert_eq!(i32::MIN.saturating_add_val(-1), i32::MIN);
    }

    #[test]
    fn test_add_regular_values() {
        assert_eq!(accumulate(&[1i32, 2, 3, 4], 0), 10);
    }

    #[test]
    fn test_mul_clamps() {
        assert_eq!(i64::MAX.saturating_mul_val(2), i64::MAX);
        assert_eq!(i64::MIN.saturating_mul_val(2), i64::MIN);
        assert_eq!(7i32.saturating_mul_val(6), 42);
    }
}
