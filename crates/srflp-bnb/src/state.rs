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

//! Search state for the layout tree search.
//!
//! `SearchState` is the single mutable buffer a search branch owns. It holds
//! the partial layout (left to right), a placement bitset indexed by
//! `FacilityIndex`, and a cost trail so that `pop` restores the objective of
//! the parent node without re-evaluation.
//!
//! Invariants (debug-checked):
//! - `layout.len() == cost_trail.len() <= num_facilities`
//! - a facility is marked placed iff it occurs in `layout`
//!
//! The `*_unchecked` variants skip those checks for the hot loop; callers
//! must uphold the preconditions themselves.

use fixedbitset::FixedBitSet;
use num_traits::{PrimInt, Signed};
use srflp_model::{index::FacilityIndex, solution::Solution};

/// The partial layout under construction together with its cost.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    layout: Vec<FacilityIndex>,
    cost_trail: Vec<T>, // objective before each push
    placed: FixedBitSet,
    current_objective: T,
    num_facilities: usize,
}

impl<T> SearchState<T>
where
    T: PrimInt + Signed,
{
    /// Creates an empty state for `num_facilities` facilities whose indices
    /// are below `dimension`.
    #[inline]
    pub fn new(num_facilities: usize, dimension: usize) -> Self {
        debug_assert!(
            num_facilities <= dimension,
            "called `SearchState::new` with more facilities than matrix rows: {} > {}",
            num_facilities,
            dimension
        );

        Self {
            layout: Vec::with_capacity(num_facilities),
            cost_trail: Vec::with_capacity(num_facilities),
            placed: FixedBitSet::with_capacity(dimension),
            current_objective: T::zero(),
            num_facilities,
        }
    }

    /// Empties the state and resizes it for another instance, keeping the
    /// allocations it already holds.
    #[inline]
    pub fn prepare(&mut self, num_facilities: usize, dimension: usize) {
        debug_assert!(
            num_facilities <= dimension,
            "called `SearchState::prepare` with more facilities than matrix rows: {} > {}",
            num_facilities,
            dimension
        );

        self.reset();
        self.num_facilities = num_facilities;
        self.layout.reserve(num_facilities);
        self.cost_trail.reserve(num_facilities);
        self.placed.grow(dimension);
    }

    /// Returns the number of facilities a complete layout contains.
    #[inline]
    pub fn num_facilities(&self) -> usize {
        self.num_facilities
    }

    /// Returns the number of placed facilities.
    #[inline]
    pub fn depth(&self) -> usize {
        self.layout.len()
    }

    /// Returns `true` if no facility is placed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Returns `true` if every facility is placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.layout.len() == self.num_facilities
    }

    /// Returns the partial layout, left to right.
    #[inline]
    pub fn layout(&self) -> &[FacilityIndex] {
        &self.layout
    }

    /// Returns the cost of the partial layout.
    #[inline]
    pub fn current_objective(&self) -> T {
        self.current_objective
    }

    /// Returns the most recently placed facility.
    #[inline]
    pub fn last_placed(&self) -> Option<FacilityIndex> {
        self.layout.last().copied()
    }

    /// Returns whether `facility` is already part of the layout.
    ///
    /// # Panics
    ///
    /// Panics if `facility` is not below the matrix dimension.
    #[inline]
    pub fn is_placed(&self, facility: FacilityIndex) -> bool {
        let index = facility.get();
        debug_assert!(
            index < self.placed.len(),
            "called `SearchState::is_placed` with facility index out of bounds: the len is {} but the index is {}",
            self.placed.len(),
            index
        );

        self.placed.contains(index)
    }

    /// Returns whether `facility` is already part of the layout, without
    /// bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure `facility` is below the matrix dimension.
    #[inline]
    pub unsafe fn is_placed_unchecked(&self, facility: FacilityIndex) -> bool {
        debug_assert!(
            facility.get() < self.placed.len(),
            "called `SearchState::is_placed_unchecked` with facility index out of bounds: the len is {} but the index is {}",
            self.placed.len(),
            facility.get()
        );

        unsafe { self.placed.contains_unchecked(facility.get()) }
    }

    /// Appends `facility` to the layout and sets the objective to `new_objective`.
    ///
    /// # Panics
    ///
    /// Panics if the layout is complete, or `facility` is out of bounds or
    /// already placed.
    #[inline]
    pub fn push(&mut self, facility: FacilityIndex, new_objective: T) {
        assert!(
            !self.is_complete(),
            "called `SearchState::push` on a complete layout of len {}",
            self.num_facilities
        );
        assert!(
            !self.placed.put(facility.get()),
            "called `SearchState::push` with facility {} that is already placed",
            facility.get()
        );

        self.layout.push(facility);
        self.cost_trail.push(self.current_objective);
        self.current_objective = new_objective;
    }

    /// Removes the last facility and restores the parent objective.
    /// Returns `None` when the layout is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<FacilityIndex> {
        let facility = self.layout.pop()?;
        debug_assert!(
            self.placed.contains(facility.get()),
            "called `SearchState::pop` with facility {} missing from the placement set",
            facility.get()
        );

        self.placed.set(facility.get(), false);
        if let Some(previous) = self.cost_trail.pop() {
            self.current_objective = previous;
        }
        Some(facility)
    }

    /// Empties the layout so the buffer can be reused for another root.
    #[inline]
    pub fn reset(&mut self) {
        self.layout.clear();
        self.cost_trail.clear();
        self.placed.clear();
        self.current_objective = T::zero();
    }

    /// Copies the current layout into a `Solution`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the layout is not complete.
    #[inline]
    pub fn to_solution(&self) -> Solution<T> {
        debug_assert!(
            self.is_complete(),
            "called `SearchState::to_solution` on a partial layout: the len is {} but {} facilities are required",
            self.layout.len(),
            self.num_facilities
        );

        Solution::new(self.current_objective, self.layout.clone())
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchState(layout: [")?;
        for (i, facility) in self.layout.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", facility.get())?;
        }
        write!(
            f,
            "], objective: {}, depth: {}/{})",
            self.current_objective,
            self.layout.len(),
            self.num_facilities
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fi(i: usize) -> FacilityIndex {
        FacilityIndex::new(i)
    }

    #[test]
    fn test_push_pop_restores_objective_and_placement() {
        let mut state = SearchState::<i64>::new(3, 3);
        assert!(state.is_empty());

        state.push(fi(2), 0);
        state.push(fi(0), 4);
        assert_eq!(state.depth(), 2);
        assert_eq!(state.current_objective(), 4);
        assert!(state.is_placed(fi(0)));
        assert!(!state.is_placed(fi(1)));
        assert_eq!(state.last_placed(), Some(fi(0)));

        assert_eq!(state.pop(), Some(fi(0)));
        assert_eq!(state.current_objective(), 0);
        assert!(!state.is_placed(fi(0)));
        assert_eq!(state.layout(), &[fi(2)]);

        assert_eq!(state.pop(), Some(fi(2)));
        assert_eq!(state.pop(), None);
        assert_eq!(state.current_objective(), 0);
    }

    #[test]
    fn test_complete_layout_to_solution() {
        let mut state = SearchState::<i32>::new(2, 4);
        state.push(fi(3), 0);
        assert!(!state.is_complete());
        state.push(fi(1), 9);
        assert!(state.is_complete());
        assert!(unsafe { state.is_placed_unchecked(fi(3)) });

        let solution = state.to_solution();
        assert_eq!(solution.objective_value(), 9);
        assert_eq!(solution.layout(), &[fi(3), fi(1)]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = SearchState::<i64>::new(2, 2);
        state.push(fi(0), 0);
        state.push(fi(1), 5);
        state.reset();
        assert!(state.is_empty());
        assert_eq!(state.current_objective(), 0);
        assert!(!state.is_placed(fi(0)));
        assert!(!state.is_placed(fi(1)));
    }

    #[test]
    fn test_prepare_resizes_for_a_larger_instance() {
        let mut state = SearchState::<i64>::new(1, 1);
        state.push(fi(0), 0);
        state.prepare(3, 5);
        assert!(state.is_empty());
        assert_eq!(state.num_facilities(), 3);

        state.push(fi(4), 0);
        state.push(fi(2), 1);
        assert!(state.is_placed(fi(4)));
        assert!(!state.is_complete());
    }

    #[test]
    #[should_panic(expected = "already placed")]
    fn test_push_duplicate_panics() {
        let mut state = SearchState::<i64>::new(3, 3);
        state.push(fi(1), 0);
        state.push(fi(1), 0);
    }

    #[test]
    fn test_display() {
        let mut state = SearchState::<i64>::new(3, 3);
        state.push(fi(1), 0);
        state.push(fi(2), 6);
        assert_eq!(
            format!("{}", state),
            "SearchState(layout: [1, 2], objective: 6, depth: 2/3)"
        );
    }
}
