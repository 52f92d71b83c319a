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

//! Solution limit monitor for tree search
//!
//! `SolutionLimitMonitor` stops the search once a configured number of
//! improving solutions has been found. The count lives in an `AtomicU64` that
//! may be shared by several searches, so the limit applies to all branches of
//! a parallel solve together.

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use srflp_model::{model::Model, solution::Solution};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct SolutionLimitMonitor<'a, T> {
    solution_count: &'a AtomicU64,
    solution_limit: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<'a, T> SolutionLimitMonitor<'a, T> {
    /// Creates a new `SolutionLimitMonitor` counting into `solution_count`.
    pub fn new(solution_count: &'a AtomicU64, solution_limit: u64) -> Self {
        Self {
            solution_count,
            solution_limit,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> TreeSearchMonitor<T> for SolutionLimitMonitor<'_, T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics) {
        self.solution_count.fetch_add(1, Ordering::Relaxed);
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if self.solution_count.load(Ordering::Relaxed) >= self.solution_limit {
            SearchCommand::Terminate(format!(
                "solution limit of {} reached",
                self.solution_limit
            ))
        } else {
            SearchCommand::Continue
        }
    }
}
