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

//! Incumbent management for branch-and-bound
//!
//! The incumbent is the best complete layout found so far. Its cost is the
//! pruning bound every search branch reads in its hot loop, and it is the only
//! state shared between branches.
//!
//! `SharedIncumbent<T>` keeps that bound in an `AtomicI64` for lock-free
//! reads and stores the authoritative `Solution<T>` behind a `Mutex`.
//! Installation is a compare-then-set under the lock, so concurrent
//! improvements are never lost, and the atomic is written inside the critical
//! section so the bound never runs ahead of the stored solution. Reads and
//! writes of the atomic are `SeqCst`; a reader may still observe a bound that
//! is about to be lowered, which only weakens pruning for one step.
//!
//! `IncumbentStore<T>` abstracts over where the bound lives:
//! - `NoSharedIncumbent<T>`: local only. `initial_upper_bound = T::MAX`,
//!   `tighten(x) = x`, and `on_solution_found` is a no-op.
//! - `SharedIncumbentAdapter<'a, T>`: borrows a `SharedIncumbent<T>`;
//!   `tighten(x)` returns `min(shared, x)` and `on_solution_found` attempts
//!   installation.
//!
//! ## Usage
//!
//! ```rust
//! use srflp_bnb::incumbent::SharedIncumbent;
//! use srflp_model::{index::FacilityIndex, solution::Solution};
//!
//! let inc: SharedIncumbent<i64> = SharedIncumbent::new();
//! let candidate = Solution::new(7, vec![FacilityIndex::new(0), FacilityIndex::new(1)]);
//!
//! assert!(inc.try_install(&candidate));
//! assert_eq!(inc.upper_bound(), 7);
//! assert!(inc.snapshot().is_some());
//! ```

use crate::num::SolverNumeric;
use num_traits::{PrimInt, Signed};
use srflp_model::solution::Solution;
use std::{
    marker::PhantomData,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicI64, Ordering},
    },
};

/// A concurrent holder for the best (incumbent) solution found during search.
///
/// - `upper_bound`: objective of the incumbent as `i64`, `i64::MAX` while
///   nothing is installed. Monotonically non-increasing.
/// - `solution`: the incumbent itself; the source of truth.
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    upper_bound: AtomicI64,
    solution: Mutex<Option<Solution<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates a new shared incumbent with no solution installed.
    #[inline]
    pub fn new() -> Self {
        SharedIncumbent {
            upper_bound: AtomicI64::new(i64::MAX),
            solution: Mutex::new(None),
        }
    }

    /// Returns the current upper bound, `i64::MAX` if nothing is installed.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::SeqCst)
    }

    /// Returns the current upper bound converted to `T`.
    #[inline]
    pub fn upper_bound_as(&self) -> Result<T, <T as TryFrom<i64>>::Error>
    where
        T: TryFrom<i64>,
    {
        T::try_from(self.upper_bound())
    }

    /// Returns `true` once a solution has been installed.
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.upper_bound() != i64::MAX || self.lock().is_some()
    }

    /// Returns a snapshot of the current incumbent solution, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution<T>>
    where
        T: Clone,
    {
        self.lock().clone()
    }

    /// Consumes the holder and returns the incumbent solution, if any.
    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        self.solution
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Attempts to install the given candidate as the new incumbent.
    /// Only strictly better candidates are installed. Returns `true` if the
    /// candidate was installed.
    pub fn try_install(&self, candidate: &Solution<T>) -> bool
    where
        T: PrimInt + Signed + Into<i64>,
    {
        let candidate_objective: i64 = candidate.objective_value().into();

        // Minimizing; the atomic may be stale but never below the truth.
        if candidate_objective >= self.upper_bound() {
            return false;
        }

        let mut guard = self.lock();
        if let Some(current) = guard.as_ref() {
            let current_objective: i64 = current.objective_value().into();
            if candidate_objective >= current_objective {
                return false;
            }
        }

        *guard = Some(candidate.clone());
        self.upper_bound
            .store(candidate_objective, Ordering::SeqCst);

        true
    }

    /// A panicking branch must not hide the incumbent from the others.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, Option<Solution<T>>> {
        self.solution.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Access to the pruning bound and the sink for new solutions of one search.
pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// Returns the upper bound the search starts with.
    fn initial_upper_bound(&self) -> T;
    /// Merges the local best objective with any externally known bound.
    fn tighten(&self, current_local_best: T) -> T;
    /// Publishes a newly found solution.
    fn on_solution_found(&self, solution: &Solution<T>);
}

/// An `IncumbentStore` that keeps the bound local to one search.
#[repr(transparent)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    /// Creates a new `NoSharedIncumbent` instance.
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        T::max_value()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution<T>) {}
}

/// An `IncumbentStore` backed by a `SharedIncumbent` that other searches
/// read and update concurrently.
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    /// Creates a new `SharedIncumbentAdapter` that wraps the given
    /// `SharedIncumbent`.
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }

    #[inline(always)]
    fn shared_bound(&self) -> T
    where
        T: SolverNumeric,
    {
        // The sentinel does not fit narrow types; it still means "unbounded".
        T::try_from(self.inner.upper_bound()).unwrap_or_else(|_| T::max_value())
    }
}

impl<T> IncumbentStore<T> for SharedIncumbentAdapter<'_, T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> T {
        self.shared_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: T) -> T {
        self.shared_bound().min(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution<T>) {
        self.inner.try_install(solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srflp_model::index::FacilityIndex;
    use std::{sync::Arc, thread};

    fn make_solution<T: PrimInt + Signed>(objective: T, n: usize) -> Solution<T> {
        Solution::new(objective, (0..n).map(FacilityIndex::new).collect())
    }

    #[test]
    fn test_initial_state() {
        let inc: SharedIncumbent<i64> = SharedIncumbent::new();
        assert_eq!(inc.upper_bound(), i64::MAX);
        assert!(inc.snapshot().is_none());
        assert!(!inc.has_solution());
        assert_eq!(format!("{}", inc), format!("Incumbent(upper_bound: {})", i64::MAX));
    }

    #[test]
    fn test_install_better_and_reject_worse_or_equal() {
        let inc: SharedIncumbent<i64> = SharedIncumbent::new();

        assert!(inc.try_install(&make_solution(100, 3)));
        assert_eq!(inc.upper_bound(), 100);
        assert!(inc.has_solution());

        assert!(!inc.try_install(&make_solution(150, 3)));
        assert!(!inc.try_install(&make_solution(100, 3)));
        assert_eq!(inc.upper_bound(), 100);

        assert!(inc.try_install(&make_solution(40, 3)));
        let snap = inc.snapshot().expect("snapshot should be Some");
        assert_eq!(snap.objective_value(), 40);
        assert_eq!(snap.num_facilities(), 3);
    }

    #[test]
    fn test_zero_cost_solution_is_installed() {
        let inc: SharedIncumbent<i32> = SharedIncumbent::new();
        assert!(inc.try_install(&make_solution(0, 1)));
        assert_eq!(inc.upper_bound_as(), Ok(0));
        assert_eq!(inc.into_solution().map(|s| s.objective_value()), Some(0));
    }

    #[test]
    fn test_concurrent_installs_minimum_wins() {
        let inc = Arc::new(SharedIncumbent::<i64>::new());
        let objectives = vec![300, 200, 400, 50, 120, 75, 500, 60, 90];

        let handles: Vec<_> = objectives
            .iter()
            .copied()
            .map(|obj| {
                let inc = Arc::clone(&inc);
                thread::spawn(move || inc.try_install(&make_solution(obj, 4)))
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.iter().any(|&r| r));

        let min_obj = *objectives.iter().min().unwrap();
        assert_eq!(inc.upper_bound(), min_obj);
        assert_eq!(inc.snapshot().unwrap().objective_value(), min_obj);
    }

    #[test]
    fn test_many_threads_descending_race() {
        let inc = SharedIncumbent::<i64>::new();
        thread::scope(|s| {
            for t in 0..8i64 {
                let inc = &inc;
                s.spawn(move || {
                    for k in (0..200i64).rev() {
                        inc.try_install(&make_solution(k * 8 + t, 2));
                    }
                });
            }
        });
        assert_eq!(inc.upper_bound(), 0);
        assert_eq!(inc.snapshot().unwrap().objective_value(), 0);
    }

    #[test]
    fn test_no_shared_incumbent_is_passthrough() {
        let store: NoSharedIncumbent<i64> = NoSharedIncumbent::new();
        assert_eq!(store.initial_upper_bound(), i64::MAX);
        for val in [0, 1, 42, i64::MAX - 1] {
            assert_eq!(store.tighten(val), val);
        }
        store.on_solution_found(&make_solution(1, 1));
    }

    #[test]
    fn test_adapter_reads_and_publishes() {
        let shared = SharedIncumbent::<i64>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_upper_bound(), i64::MAX);

        adapter.on_solution_found(&make_solution(200, 2));
        assert_eq!(shared.upper_bound(), 200);
        assert_eq!(adapter.initial_upper_bound(), 200);
        assert_eq!(adapter.tighten(350), 200);
        assert_eq!(adapter.tighten(150), 150);
    }

    #[test]
    fn test_adapter_maps_sentinel_for_narrow_types() {
        let shared = SharedIncumbent::<i16>::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert_eq!(adapter.initial_upper_bound(), i16::MAX);

        adapter.on_solution_found(&make_solution(50i16, 3));
        assert_eq!(adapter.tighten(i16::MAX), 50);
    }
}
