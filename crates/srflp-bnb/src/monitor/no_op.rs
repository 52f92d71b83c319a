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

//! A monitor that observes nothing. The engine is generic over its monitor,
//! so searching with `NoOperationMonitor` compiles every hook away.

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, stats::BnbSolverStatistics};
use num_traits::{PrimInt, Signed};
use srflp_model::{model::Model, solution::Solution};

/// Ignores every event; `search_command` keeps its `Continue` default.
#[repr(transparent)]
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> NoOperationMonitor<T> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> TreeSearchMonitor<T> for NoOperationMonitor<T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    #[inline(always)]
    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{monitor::tree_search_monitor::SearchCommand, state::SearchState};
    use srflp_model::index::FacilityIndex;

    #[test]
    fn test_never_stops_the_search() {
        let mut monitor = NoOperationMonitor::<i32>::new();
        let mut state = SearchState::new(2, 2);
        let stats = BnbSolverStatistics::default();

        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        state.push(FacilityIndex::new(1), 0);
        monitor.on_descend(&state, FacilityIndex::new(1), &stats);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert_eq!(monitor.name(), "NoOperationMonitor");
    }
}
