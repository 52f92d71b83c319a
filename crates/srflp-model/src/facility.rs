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

use crate::index::FacilityIndex;
use num_traits::{PrimInt, Signed};

/// A facility to be placed in the row.
///
/// The `index` identifies the facility in the weight matrix. The `width` is
/// carried for reporting; the layout objective measures distance by ordinal
/// position, so widths do not enter the cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Facility<T> {
    width: T,
    index: FacilityIndex,
}

impl<T> Facility<T>
where
    T: PrimInt + Signed,
{
    /// Creates a new facility.
    #[inline]
    pub fn new(width: T, index: FacilityIndex) -> Self {
        Self { width, index }
    }

    /// Returns the physical width of the facility.
    #[inline]
    pub fn width(&self) -> T {
        self.width
    }

    /// Returns the weight-matrix index of the facility.
    #[inline]
    pub fn index(&self) -> FacilityIndex {
        self.index
    }
}

impl<T> std::fmt::Display for Facility<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Facility(index: {}, width: {})", self.index.get(), self.width)
    }
}
