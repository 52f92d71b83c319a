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

//! # Srflp-Bnb
//!
//! Exact branch-and-bound search for the Single Row Facility Layout Problem:
//! order facilities along a line so that the sum of `weight × distance` over
//! all facility pairs is minimal, where the distance is the difference of
//! the two positions in the ordering.
//!
//! ## Modules
//!
//! - `bnb`: the single-threaded engine (`BnbSolver`) and its recursive search.
//! - `parallel`: `ParallelSolver`, one scoped thread per root facility.
//! - `eval`: cost functions (`LayoutEvaluator`) and regularity checks.
//! - `incumbent`: the best solution shared across threads.
//! - `monitor`: search observers and limits (time, solutions, interrupt).
//! - `state`: the layout buffer owned by one search.
//! - `stats`, `result`: counters and outcome types.
//! - `num`: the `SolverNumeric` bound over supported cost types.
//!
//! ## Quick start
//!
//! ```rust
//! use srflp_model::{facility::Facility, index::FacilityIndex};
//!
//! let facilities = vec![
//!     Facility::new(5, FacilityIndex::new(0)),
//!     Facility::new(3, FacilityIndex::new(1)),
//!     Facility::new(4, FacilityIndex::new(2)),
//! ];
//! let weights = vec![vec![0, 3, 1], vec![3, 0, 2], vec![1, 2, 0]];
//!
//! assert_eq!(srflp_bnb::solve(facilities, &weights).unwrap(), 7);
//! ```

pub mod bnb;
pub mod eval;
pub mod incumbent;
pub mod monitor;
pub mod num;
pub mod parallel;
pub mod result;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

use crate::{eval::ordinal::OrdinalDistanceEvaluator, parallel::ParallelSolver};
use srflp_model::{
    facility::Facility,
    model::{Model, ModelError},
    solution::Solution,
};

/// Returns the minimum total cost over all orderings of `facilities`.
///
/// # Errors
///
/// Returns a `ModelError` if the facilities and the matrix do not form a
/// valid instance; see `Model::from_parts`.
pub fn solve<R>(facilities: Vec<Facility<i64>>, weights: &[R]) -> Result<i64, ModelError>
where
    R: AsRef<[i64]>,
{
    solve_layout(facilities, weights).map(|solution| solution.objective_value())
}

/// Like `solve`, but returns an optimal ordering together with its cost.
///
/// # Errors
///
/// Returns a `ModelError` if the facilities and the matrix do not form a
/// valid instance, including `ModelError::CostOverflow` when some ordering
/// would cost more than `i64` can hold; see `Model::from_parts`.
pub fn solve_layout<R>(
    facilities: Vec<Facility<i64>>,
    weights: &[R],
) -> Result<Solution<i64>, ModelError>
where
    R: AsRef<[i64]>,
{
    let model = Model::from_parts(facilities, weights)?;
    let outcome = ParallelSolver::default().solve(&model, &OrdinalDistanceEvaluator);

    // An unlimited search only ends without a layout if every complete
    // ordering costs `i64::MAX`, which validation already excludes.
    outcome
        .result
        .into_solution()
        .ok_or(ModelError::CostOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{brute_force, fi, random_model};

    fn facilities(n: usize) -> Vec<Facility<i64>> {
        (0..n).map(|i| Facility::new(1 + i as i64, fi(i))).collect()
    }

    #[test]
    fn test_reference_scenario() {
        let weights = [[0, 3, 1], [3, 0, 2], [1, 2, 0]];
        assert_eq!(solve(facilities(3), &weights), Ok(7));

        let solution = solve_layout(facilities(3), &weights).unwrap();
        assert_eq!(solution.objective_value(), 7);
        let layout: Vec<usize> = solution.layout().iter().map(|f| f.get()).collect();
        assert!(layout == vec![0, 1, 2] || layout == vec![2, 1, 0]);
    }

    #[test]
    fn test_single_facility() {
        assert_eq!(solve(facilities(1), &[[0]]), Ok(0));
    }

    #[test]
    fn test_all_zero_weights() {
        let weights = vec![vec![0; 5]; 5];
        assert_eq!(solve(facilities(5), &weights), Ok(0));
    }

    #[test]
    fn test_matches_brute_force() {
        for seed in 200..215u64 {
            let model = random_model(seed, 7, 100);
            let weights: Vec<Vec<i64>> = (0..7)
                .map(|r| (0..7).map(|c| model.weight(fi(r), fi(c))).collect())
                .collect();
            assert_eq!(
                solve(model.facilities().to_vec(), &weights),
                Ok(brute_force(&model))
            );
        }
    }

    #[test]
    fn test_facility_order_in_input_does_not_matter() {
        let weights = [[0, 4, 1, 0], [4, 0, 2, 3], [1, 2, 0, 5], [0, 3, 5, 0]];
        let mut shuffled = facilities(4);
        shuffled.reverse();
        assert_eq!(solve(facilities(4), &weights), solve(shuffled, &weights));
    }

    #[test]
    fn test_invalid_instances_are_rejected() {
        assert_eq!(solve(Vec::new(), &[[0i64; 0]; 0]), Err(ModelError::Empty));
        assert!(matches!(
            solve(facilities(3), &[[0, 1], [1, 0]]),
            Err(ModelError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            solve(vec![Facility::new(1, fi(0)), Facility::new(1, fi(0))], &[[0, 1], [1, 0]]),
            Err(ModelError::DuplicateIndex { .. })
        ));
        assert!(matches!(
            solve(vec![Facility::new(1, fi(0)), Facility::new(1, fi(5))], &[[0, 1], [1, 0]]),
            Err(ModelError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            solve(facilities(2), &[vec![0, 1], vec![1]]),
            Err(ModelError::NonSquareMatrix { .. })
        ));
        assert!(matches!(
            solve(facilities(2), &[[0, -1], [-1, 0]]),
            Err(ModelError::NegativeWeight { .. })
        ));
    }

    #[test]
    fn test_weights_beyond_i64_are_rejected() {
        assert_eq!(
            solve(facilities(2), &[[0, i64::MAX], [i64::MAX, 0]]),
            Err(ModelError::CostOverflow)
        );

        let half = i64::MAX / 2;
        let weights = [[0, half, half], [half, 0, half], [half, half, 0]];
        assert_eq!(solve(facilities(3), &weights), Err(ModelError::CostOverflow));
        assert!(solve_layout(facilities(3), &weights).is_err());
    }

    #[test]
    fn test_largest_representable_cost_is_solved() {
        let w = i64::MAX - 1;
        assert_eq!(solve(facilities(2), &[[0, w], [w, 0]]), Ok(w));

        // 3 pairs at distance at most 2 stay below i64::MAX.
        let w = i64::MAX / 6;
        let weights = [[0, w, w], [w, 0, w], [w, w, 0]];
        assert_eq!(solve(facilities(3), &weights), Ok(4 * w));
    }
}
