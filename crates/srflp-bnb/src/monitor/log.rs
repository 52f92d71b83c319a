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

//! Progress logging for tree search
//!
//! `LogTreeSearchMonitor` writes a header when the search starts and one
//! progress line per `log_interval` through the `log` facade at `info`
//! level. The clock is only consulted when `nodes_explored & clock_check_mask == 0`,
//! so the monitor stays cheap on the hot path. Every search thread owns its
//! monitor; lines carry a label to tell branches apart.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use srflp_model::{
    index::FacilityIndex,
    model::{Complexity, Model},
    solution::Solution,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    label: String,
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<T>,
    tree_size: Option<Complexity>, // set on enter
}

impl<T> LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    /// Default mask for clock checks; the clock is read every 4096 nodes.
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0xFFF;

    pub fn new(label: impl Into<String>, log_interval: Duration) -> Self {
        Self::with_clock_check_mask(label, log_interval, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    pub fn with_clock_check_mask(
        label: impl Into<String>,
        log_interval: Duration,
        clock_check_mask: u64,
    ) -> Self {
        let now = Instant::now();
        Self {
            label: label.into(),
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_objective: None,
            tree_size: None,
        }
    }

    /// Returns the best objective this monitor has seen.
    #[inline]
    pub fn best_objective(&self) -> Option<T> {
        self.best_objective
    }

    /// Returns the percentage of the search tree covered by the explored
    /// nodes, or `None` before the search started or if the tree is too
    /// large for the ratio to be meaningful.
    #[inline]
    pub fn coverage(&self, statistics: &BnbSolverStatistics) -> Option<f64> {
        self.tree_size?.coverage(statistics.nodes_explored)
    }

    #[inline(always)]
    fn log_header(&self) {
        log::info!(
            "[{}] {:<9} | {:<14} | {:<7} | {:<14} | {:<17} | {:<10} | {:<10}",
            self.label,
            "Elapsed",
            "Nodes",
            "Depth",
            "Best Solution",
            "Current Objective",
            "Backtracks",
            "Pruned"
        );
    }

    #[inline(always)]
    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let best = match self.best_objective {
            Some(obj) => obj.to_string(),
            None => "Inf".to_string(),
        };

        log::info!(
            "[{}] {:<9} | {:<14} | {:<7} | {:<14} | {:<17} | {:<10} | {:<10}",
            self.label,
            elapsed,
            stats.nodes_explored,
            state.depth(),
            best,
            state.current_objective(),
            stats.backtracks,
            stats.prunings_bound
        );

        self.last_log_time = now;
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(label: {}, log_interval: {:?}, clock_check_mask: {})",
            self.label, self.log_interval, self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, model: &Model<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        let tree_size = model.complexity();
        self.tree_size = Some(tree_size);
        log::info!(
            "[{}] searching {} facilities, tree size {}",
            self.label,
            model.num_facilities(),
            tree_size
        );
        self.log_header();
    }

    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        _facility: FacilityIndex,
        statistics: &BnbSolverStatistics,
    ) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, statistics);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution<T>, _statistics: &BnbSolverStatistics) {
        let obj = solution.objective_value();
        self.best_objective = Some(self.best_objective.map_or(obj, |best| best.min(obj)));
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        match self.coverage(statistics) {
            Some(percent) => log::info!(
                "[{}] search finished after {} nodes ({:.4}% of the tree) in {:.2?}",
                self.label,
                statistics.nodes_explored,
                percent,
                self.start_time.elapsed()
            ),
            None => log::info!(
                "[{}] search finished after {} nodes in {:.2?}",
                self.label,
                statistics.nodes_explored,
                self.start_time.elapsed()
            ),
        }
    }
}
