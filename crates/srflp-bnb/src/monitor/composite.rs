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

//! Monitoring combinators for tree search
//!
//! Provides `CompositeTreeSearchMonitor`, a fan-out monitor that forwards every
//! event to its children. This lets limits and logging be stacked per search
//! thread without coupling them to the solver.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.
//! - Other callbacks always fan out to all children.

use crate::{
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use num_traits::{PrimInt, Signed};
use srflp_model::{index::FacilityIndex, model::Model, solution::Solution};

/// A tree search monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<T> Default for CompositeTreeSearchMonitor<'_, T>
where
    T: PrimInt + Signed,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeTreeSearchMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the number of monitors contained in the composite monitor.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite monitor contains no monitors.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>>
    for CompositeTreeSearchMonitor<'a, T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'_, T>
where
    T: PrimInt + Signed,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, model: &Model<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(model, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(solution, statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(state, statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        facility: FacilityIndex,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_descend(state, facility, statistics);
        }
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_backtrack(state, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        facility: FacilityIndex,
        cost: T,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(state, facility, cost, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records the order of calls into a shared journal.
    struct Recorder {
        tag: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
        command: SearchCommand,
    }

    impl Recorder {
        fn new(tag: &'static str, journal: &Arc<Mutex<Vec<String>>>, command: SearchCommand) -> Self {
            Self {
                tag,
                journal: Arc::clone(journal),
                command,
            }
        }

        fn log(&self, event: &str) {
            self.journal
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, event));
        }
    }

    impl TreeSearchMonitor<i64> for Recorder {
        fn name(&self) -> &str {
            self.tag
        }

        fn on_enter_search(&mut self, _model: &Model<i64>, _statistics: &BnbSolverStatistics) {
            self.log("enter");
        }

        fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
            self.log("exit");
        }

        fn on_solution_found(&mut self, _solution: &Solution<i64>, _statistics: &BnbSolverStatistics) {
            self.log("solution");
        }

        fn search_command(
            &mut self,
            _state: &SearchState<i64>,
            _statistics: &BnbSolverStatistics,
        ) -> SearchCommand {
            self.log("command");
            self.command.clone()
        }
    }

    #[test]
    fn test_events_fan_out_in_insertion_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut composite = CompositeTreeSearchMonitor::new();
        composite.add_monitor(Recorder::new("a", &journal, SearchCommand::Continue));
        composite.add_monitor(Recorder::new("b", &journal, SearchCommand::Continue));
        assert_eq!(composite.len(), 2);

        let model = srflp_model::model::ModelBuilder::<i64>::new(1).build();
        let stats = BnbSolverStatistics::default();
        composite.on_enter_search(&model, &stats);
        composite.on_solution_found(&Solution::new(0, vec![FacilityIndex::new(0)]), &stats);
        composite.on_exit_search(&stats);

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["a:enter", "b:enter", "a:solution", "b:solution", "a:exit", "b:exit"]
        );
    }

    #[test]
    fn test_search_command_short_circuits() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut composite = CompositeTreeSearchMonitor::with_capacity(3);
        composite.add_monitor(Recorder::new("a", &journal, SearchCommand::Continue));
        composite.add_monitor(Recorder::new(
            "b",
            &journal,
            SearchCommand::Terminate("stop".into()),
        ));
        composite.add_monitor(Recorder::new("c", &journal, SearchCommand::Continue));

        let state = SearchState::<i64>::new(1, 1);
        let cmd = composite.search_command(&state, &BnbSolverStatistics::default());

        assert_eq!(cmd, SearchCommand::Terminate("stop".into()));
        assert_eq!(*journal.lock().unwrap(), vec!["a:command", "b:command"]);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<i64>::default();
        assert!(composite.is_empty());
        let state = SearchState::new(1, 1);
        assert_eq!(
            composite.search_command(&state, &BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }
}
