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

use srflp_core::num::ops::saturating_arithmetic::SaturatingAddVal;
use std::time::Duration;

/// Statistics collected during the execution of the SRFLP branch-and-bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Total returns from a child node to its parent.
    pub backtracks: u64,
    /// Children discarded because their partial cost reached the incumbent.
    pub prunings_bound: u64,
    /// Complete layouts that improved the incumbent.
    pub solutions_found: u64,
    /// The deepest level reached in the tree (number of placed facilities).
    pub max_depth: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    /// Records a child discarded by the incumbent bound.
    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Folds the counters of another (concurrent) search into this one.
    ///
    /// Counters are summed and depth is maximized. `time_total` is maximized
    /// as well, since concurrent searches overlap in wall-clock time.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(other.nodes_explored);
        self.backtracks = self.backtracks.saturating_add_val(other.backtracks);
        self.prunings_bound = self.prunings_bound.saturating_add_val(other.prunings_bound);
        self.solutions_found = self
            .solutions_found
            .saturating_add_val(other.solutions_found);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.time_total = self.time_total.max(other.time_total);
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SRFLP-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_saturate() {
        let mut stats = BnbSolverStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        stats.on_backtrack();
        stats.on_depth_update(3);
        stats.on_depth_update(1);
        assert_eq!(stats.nodes_explored, u64::MAX);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_merge_sums_counters_and_maximizes_depth_and_time() {
        let mut a = BnbSolverStatistics {
            nodes_explored: 10,
            backtracks: 9,
            prunings_bound: 4,
            solutions_found: 1,
            max_depth: 5,
            time_total: Duration::from_millis(30),
        };
        let b = BnbSolverStatistics {
            nodes_explored: 7,
            backtracks: 6,
            prunings_bound: 2,
            solutions_found: 2,
            max_depth: 4,
            time_total: Duration::from_millis(50),
        };
        a.merge(&b);

        assert_eq!(a.nodes_explored, 17);
        assert_eq!(a.backtracks, 15);
        assert_eq!(a.prunings_bound, 6);
        assert_eq!(a.solutions_found, 3);
        assert_eq!(a.max_depth, 5);
        assert_eq!(a.time_total, Duration::from_millis(50));
    }

    #[test]
    fn test_display_lists_counters() {
        let stats = BnbSolverStatistics {
            nodes_explored: 16,
            ..Default::default()
        };
        let text = format!("{}", stats);
        assert!(text.starts_with("SRFLP-BnB Solver Statistics:\n"));
        assert!(text.contains("  Nodes explored:       16\n"));
    }
}
