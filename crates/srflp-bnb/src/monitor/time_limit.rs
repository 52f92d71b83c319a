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

//! Time limit monitor for tree search
//!
//! `TimeLimitMonitor` enforces a wall-clock budget. It resets its clock when
//! the search starts, reads the clock only at masked node counts to keep the
//! hot loop cheap, and asks the search to terminate once the limit is reached.
//!
//! Construct with `new(limit)` or `with_clock_check_mask(limit, mask)` to
//! trade clock precision against search throughput.

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use srflp_model::{model::Model, solution::Solution};
use std::time::{Duration, Instant};

/// A tree search monitor that enforces a time limit on the search process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLimitMonitor<T> {
    start_time: Instant,
    time_limit: Duration,
    clock_check_mask: u64,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Checks the clock every 16384 nodes.
    const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    /// Creates a new `TimeLimitMonitor` with the specified time limit.
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_STEP_CLOCK_CHECK_MASK)
    }

    /// Creates a new `TimeLimitMonitor` with the specified time limit and clock check mask.
    pub fn with_clock_check_mask(time_limit: Duration, mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask: mask,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the configured limit.
    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _model: &Model<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, _solution: &Solution<T>, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate(format!(
                "time limit of {:.2?} exceeded",
                self.time_limit
            ));
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_terminates_on_checked_node() {
        let mut monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::ZERO, 0);
        let model = srflp_model::model::ModelBuilder::<i64>::new(1).build();
        let stats = BnbSolverStatistics::default();
        monitor.on_enter_search(&model, &stats);

        let state = SearchState::new(1, 1);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_mask_skips_clock_reads() {
        let mut monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::ZERO, 0xF);
        let state = SearchState::new(1, 1);
        let stats = BnbSolverStatistics {
            nodes_explored: 3,
            ..Default::default()
        };
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
    }

    #[test]
    fn test_generous_limit_continues() {
        let mut monitor = TimeLimitMonitor::<i64>::with_clock_check_mask(Duration::from_secs(3600), 0);
        let state = SearchState::new(1, 1);
        assert_eq!(
            monitor.search_command(&state, &BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
        assert_eq!(monitor.time_limit(), Duration::from_secs(3600));
    }
}
