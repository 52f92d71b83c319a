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

//! # Solver Numeric Trait
//!
//! Unified numeric bounds for the layout search. `SolverNumeric` collects the
//! integer capabilities the engine needs: `PrimInt + Signed` fundamentals,
//! lossless widening into `i64` for the shared incumbent, fallible narrowing
//! back from it, and the by-value saturating arithmetic from `srflp_core`
//! that keeps cost accumulation overflow-free.
//!
//! All signed primitive integers up to `i64` qualify. `i128` and `isize` do
//! not, since neither widens losslessly into `i64` on every platform.

use num_traits::{FromPrimitive, PrimInt, Signed};
use srflp_core::num::{
    constants::{PlusOne, Zero},
    ops::saturating_arithmetic,
};
use std::hash::Hash;

/// A trait alias for numeric types that can be used as layout costs.
///
/// These are the signed integer types `i8`, `i16`, `i32` and `i64`.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + Into<i64>
    + TryFrom<i64>
    + std::fmt::Debug
    + std::fmt::Display
    + Zero
    + PlusOne
    + saturating_arithmetic::SaturatingAddVal
    + saturating_arithmetic::SaturatingMulVal
    + Send
    + Sync
    + Hash
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + Into<i64>
        + TryFrom<i64>
        + std::fmt::Debug
        + std::fmt::Display
        + Zero
        + PlusOne
        + saturating_arithmetic::SaturatingAddVal
        + saturating_arithmetic::SaturatingMulVal
        + Send
        + Sync
        + Hash
{
}

#[cfg(test)]
mod tests {
    use super::SolverNumeric;

    fn widen<T: SolverNumeric>(v: T) -> i64 {
        v.into()
    }

    #[test]
    fn test_signed_primitives_qualify() {
        assert_eq!(widen(-3i8), -3);
        assert_eq!(widen(1_000i16), 1_000);
        assert_eq!(widen(i32::MAX), i32::MAX as i64);
        assert_eq!(widen(i64::MIN), i64::MIN);
    }
}
