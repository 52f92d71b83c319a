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

use crate::stats::BnbSolverStatistics;
use num_traits::{PrimInt, Signed};
use srflp_model::solution::Solution;

/// What a search knows about the best layout when it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// A layout that is proven to be optimal.
    Optimal(Solution<T>),
    /// The best layout found before the search was aborted.
    Feasible(Solution<T>),
    /// No layout was recorded.
    ///
    /// For a single branch that ran to completion this means the subtree
    /// holds nothing better than the bound it was given.
    Unknown,
}

impl<T> SolverResult<T> {
    /// Returns the contained solution, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Unknown => None,
        }
    }

    /// Consumes the result and returns the contained solution, if any.
    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            SolverResult::Unknown => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(objective={})", solution.objective_value())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective_value())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search tree was exhausted.
    OptimalityProven,
    /// The search was stopped by a monitor (time limit, solution limit,
    /// interrupt). The string describes the cause.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of a single-engine search after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T> {
    /// The search exhausted its tree. `solution` is the best layout it
    /// installed itself, if any.
    #[inline]
    pub fn exhausted(solution: Option<Solution<T>>, statistics: BnbSolverStatistics) -> Self {
        let result = match solution {
            Some(sol) => SolverResult::Optimal(sol),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(
        solution: Option<Solution<T>>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(sol) => SolverResult::Feasible(sol),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solver result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the termination reason.
    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self.termination_reason, TerminationReason::Aborted(_))
    }

    /// Splits the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason, BnbSolverStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

/// Aggregate result of a parallel solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome<T> {
    pub result: SolverResult<T>,
    pub reason: TerminationReason,
    pub statistics: BnbSolverStatistics,
    pub used_threads: usize,
}

impl<T> SolverOutcome<T> {
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        reason: TerminationReason,
        statistics: BnbSolverStatistics,
        used_threads: usize,
    ) -> Self {
        Self {
            result,
            reason,
            statistics,
            used_threads,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self.result, SolverResult::Feasible(_))
    }

    #[inline]
    pub fn has_solution(&self) -> bool {
        self.result.solution().is_some()
    }

    /// Returns the best layout found, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        self.result.solution()
    }

    /// Returns the cost of the best layout found, if any.
    #[inline]
    pub fn best_cost(&self) -> Option<T>
    where
        T: PrimInt + Signed,
    {
        self.result.solution().map(Solution::objective_value)
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {} threads)",
            self.result, self.reason, self.used_threads
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srflp_model::index::FacilityIndex;

    fn solution(objective: i64) -> Solution<i64> {
        Solution::new(objective, vec![FacilityIndex::new(0), FacilityIndex::new(1)])
    }

    #[test]
    fn test_exhausted_with_and_without_solution() {
        let outcome = BnbSolverOutcome::exhausted(Some(solution(7)), BnbSolverStatistics::default());
        assert!(matches!(outcome.result(), SolverResult::Optimal(s) if s.objective_value() == 7));
        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
        assert!(!outcome.is_aborted());

        let outcome = BnbSolverOutcome::<i64>::exhausted(None, BnbSolverStatistics::default());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(outcome.termination_reason(), &TerminationReason::OptimalityProven);
    }

    #[test]
    fn test_aborted_keeps_reason_and_downgrades_solution() {
        let outcome = BnbSolverOutcome::aborted(
            Some(solution(9)),
            "time limit",
            BnbSolverStatistics::default(),
        );
        assert!(outcome.is_aborted());
        assert!(matches!(outcome.result(), SolverResult::Feasible(_)));

        let (result, reason, _) = outcome.into_parts();
        assert_eq!(result.into_solution().map(|s| s.objective_value()), Some(9));
        assert_eq!(reason.to_string(), "Aborted: time limit");
    }

    #[test]
    fn test_solver_outcome_accessors_and_display() {
        let outcome = SolverOutcome::new(
            SolverResult::Optimal(solution(7)),
            TerminationReason::OptimalityProven,
            BnbSolverStatistics::default(),
            3,
        );
        assert!(outcome.is_optimal());
        assert!(!outcome.is_feasible());
        assert!(outcome.has_solution());
        assert_eq!(outcome.best_cost(), Some(7));
        assert_eq!(
            outcome.to_string(),
            "Optimal(objective=7) (Optimality Proven, 3 threads)"
        );

        let unknown = SolverOutcome::<i64>::new(
            SolverResult::Unknown,
            TerminationReason::Aborted("interrupted".into()),
            BnbSolverStatistics::default(),
            2,
        );
        assert!(!unknown.has_solution());
        assert_eq!(unknown.best_cost(), None);
    }
}
