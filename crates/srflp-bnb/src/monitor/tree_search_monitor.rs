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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait and `SearchCommand` for observing
//! and controlling the layout search. Callbacks track the solver lifecycle,
//! and a monitor can stop the search via `search_command`.
//!
//! Lifecycle
//! - enter → { command → (prune | descend … backtrack) }* → solution* → exit
//! - `BnbSolverStatistics` is provided to every callback for telemetry.
//!
//! Design notes
//! - Methods take `&mut self`; each search thread owns its monitor stack.
//! - `search_command` runs once per node; keep it cheap.

use crate::{state::SearchState, stats::BnbSolverStatistics};
use num_traits::{PrimInt, Signed};
use srflp_model::{index::FacilityIndex, model::Model, solution::Solution};

/// What the search should do next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    /// Stop the search. The string names the cause.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Called when a complete layout improved the incumbent.
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics);
    /// Called at every node to determine the next action of the search.
    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called after `facility` was appended; `state` is the child node.
    fn on_descend(
        &mut self,
        _state: &SearchState<T>,
        _facility: FacilityIndex,
        _statistics: &BnbSolverStatistics,
    ) {
    }
    /// Called after returning from a child; `state` is the parent node again.
    fn on_backtrack(&mut self, _state: &SearchState<T>, _statistics: &BnbSolverStatistics) {}
    /// Called when appending `facility` to `state` was rejected because
    /// `cost` is not below the incumbent.
    fn on_prune(
        &mut self,
        _state: &SearchState<T>,
        _facility: FacilityIndex,
        _cost: T,
        _statistics: &BnbSolverStatistics,
    ) {
    }
}

impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: PrimInt + Signed,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics) {
        (**self).on_enter_search(model, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(solution, statistics)
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        facility: FacilityIndex,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_descend(state, facility, statistics)
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        (**self).on_backtrack(state, statistics)
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        facility: FacilityIndex,
        cost: T,
        statistics: &BnbSolverStatistics,
    ) {
        (**self).on_prune(state, facility, cost, statistics)
    }
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command_default_and_display() {
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
        assert_eq!(SearchCommand::Continue.to_string(), "Continue");
        assert_eq!(
            SearchCommand::Terminate("time limit exceeded".into()).to_string(),
            "Terminate: time limit exceeded"
        );
    }
}
