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

/// A complete layout together with its cost.
///
/// `layout[p]` is the facility placed at position `p` of the row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<T> {
    objective_value: T,
    layout: Vec<FacilityIndex>,
}

impl<T> Solution<T>
where
    T: PrimInt + Signed,
{
    /// Constructs a new `Solution`.
    pub fn new(objective_value: T, layout: Vec<FacilityIndex>) -> Self {
        Self {
            objective_value,
            layout,
        }
    }

    /// Returns the total layout cost.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    /// Returns the facilities in row order.
    #[inline]
    pub fn layout(&self) -> &[FacilityIndex] {
        &self.layout
    }

    /// Returns the number of placed facilities.
    #[inline]
    pub fn num_facilities(&self) -> usize {
        self.layout.len()
    }

    /// Returns the facility at row position `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in `0..num_facilities()`.
    #[inline]
    pub fn facility_at(&self, position: usize) -> FacilityIndex {
        debug_assert!(
            position < self.num_facilities(),
            "called `Solution::facility_at` with position out of bounds: the len is {} but the position is {}",
            self.num_facilities(),
            position
        );

        self.layout[position]
    }

    /// Returns the row position of `facility`, if it is placed.
    pub fn position_of(&self, facility: FacilityIndex) -> Option<usize> {
        self.layout.iter().position(|&f| f == facility)
    }

    /// Consumes the solution and returns the layout.
    #[inline]
    pub fn into_layout(self) -> Vec<FacilityIndex> {
        self.layout
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution Summary")?;
        writeln!(f, "   Objective Value: {}", self.objective_value)?;
        writeln!(f)?;

        if self.layout.is_empty() {
            writeln!(f, "   (No facilities placed)")?;
            return Ok(());
        }

        writeln!(f, "   {:<10} | {:<10}", "Position", "Facility")?;
        writeln!(f, "   {:-<10}-+-{:-<10}", "", "")?;
        for (position, facility) in self.layout.iter().enumerate() {
            writeln!(f, "   {:<10} | {:<10}", position, facility.get())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fi(i: usize) -> FacilityIndex {
        FacilityIndex::new(i)
    }

    #[test]
    fn test_accessors() {
        let sol = Solution::new(7i64, vec![fi(1), fi(0), fi(2)]);
        assert_eq!(sol.objective_value(), 7);
        assert_eq!(sol.num_facilities(), 3);
        assert_eq!(sol.facility_at(0), fi(1));
        assert_eq!(sol.position_of(fi(2)), Some(2));
        assert_eq!(sol.position_of(fi(9)), None);
        assert_eq!(sol.into_layout(), vec![fi(1), fi(0), fi(2)]);
    }

    #[test]
    fn test_empty_solution_display() {
        let sol = Solution::<i64>::new(0, Vec::new());
        assert_eq!(
            format!("{}", sol),
            "Solution Summary\n   Objective Value: 0\n\n   (No facilities placed)\n"
        );
    }

    #[test]
    fn test_display_formatting_example() {
        let sol = Solution::new(7i64, vec![fi(1), fi(0)]);

        let mut expected = String::new();
        expected.push_str("Solution Summary\n");
        expected.push_str("   Objective Value: 7\n");
        expected.push('\n');
        expected.push_str("   Position   | Facility  \n");
        expected.push_str("   -----------+-----------\n");
        expected.push_str("   0          | 1         \n");
        expected.push_str("   1          | 0         \n");

        assert_eq!(format!("{}", sol), expected);
    }
}
