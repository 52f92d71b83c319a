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

//! Associated constants for primitive integers.
//!
//! `num_traits::Zero` is a function; having the value as an associated
//! constant lets it appear in `const` contexts and in `Default` impls of
//! generic statistics and bounds.

/// Provides the additive identity as an associated constant.
pub trait Zero {
    /// The constant representing 0 for the implementing type.
    const ZERO: Self;
}

/// Provides the multiplicative identity as an associated constant.
pub trait PlusOne {
    /// The constant representing +1 for the implementing type.
    const PLUS_ONE: Self;
}

macro_rules! impl_const_for {
    ($trait_name:ident, $const_name:ident, $value:expr, $($t:ty),+) => {
        $(
            impl $trait_name for $t {
                const $const_name: Self = $value;
            }
        )+
    };
}

impl_const_for!(Zero, ZERO, 0, i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize);
impl_const_for!(PlusOne, PLUS_ONE, 1, i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_of<T: Zero>() -> T {
        T::ZERO
    }

    #[test]
    fn test_zero_constants() {
        assert_eq!(zero_of::<i32>(), 0);
        assert_eq!(zero_of::<u64>(), 0);
        assert_eq!(zero_of::<usize>(), 0);
    }

    #[test]
    fn test_plus_one_constants() {
        assert_eq!(<i64 as PlusOne>::PLUS_ONE, 1);
        assert_eq!(<u8 as PlusOne>::PLUS_ONE, 1);
    }
}
