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

//! Branch-and-Bound engine for the Single Row Facility Layout Problem.
//!
//! The engine explores the permutation tree depth first. A node is a partial
//! layout; its children append one facility that is not yet placed, in
//! facility declaration order. A child is only entered when its cost is
//! strictly below the incumbent bound, and since costs never decrease along
//! a path this pruning is exact.
//!
//! One `SearchState` buffer is reused for the whole run: append before
//! descending, pop after returning. Recursion depth equals the number of
//! facilities. A search session object holds the per-run state, statistics,
//! and timing so the solver itself only owns reusable storage.
//!
//! `solve_branch` explores the subtree below a single root facility and is
//! the unit of work of the parallel solver. `solve` explores every root in
//! turn on the calling thread.

use crate::{
    eval::{self, evaluator::LayoutEvaluator},
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    num::SolverNumeric,
    result::BnbSolverOutcome,
    state::SearchState,
    stats::BnbSolverStatistics,
};
use srflp_model::{index::FacilityIndex, model::Model, solution::Solution};
use std::ops::ControlFlow;

/// Reusable single-threaded branch-and-bound engine.
///
/// The engine owns the layout buffer only; the cost function is supplied by a
/// `LayoutEvaluator` and search control by a `TreeSearchMonitor`.
#[derive(Debug, Clone)]
pub struct BnbSolver<T>
where
    T: SolverNumeric,
{
    state: SearchState<T>,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    /// Creates a new solver instance.
    #[inline]
    pub fn new() -> Self {
        Self {
            state: SearchState::new(0, 0),
        }
    }

    /// Creates a new solver instance with storage for instances of up to
    /// `num_facilities` facilities and matrix dimension `dimension`.
    ///
    /// The solver grows its storage on demand; preallocation only moves the
    /// allocation to construction time.
    #[inline]
    pub fn preallocated(num_facilities: usize, dimension: usize) -> Self {
        Self {
            state: SearchState::new(num_facilities, dimension),
        }
    }

    /// Explores every root in declaration order on the calling thread.
    /// This variant does not use a shared incumbent.
    pub fn solve<E, S>(
        &mut self,
        model: &Model<T>,
        evaluator: &E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        E: LayoutEvaluator<T> + ?Sized,
        S: TreeSearchMonitor<T>,
    {
        let roots: Vec<FacilityIndex> = model.facilities().iter().map(|f| f.index()).collect();
        let backing = NoSharedIncumbent::new();
        self.solve_internal(model, &roots, evaluator, monitor, backing)
    }

    /// Explores every root in declaration order, pruning against and
    /// publishing to `incumbent`.
    pub fn solve_with_incumbent<E, S>(
        &mut self,
        model: &Model<T>,
        evaluator: &E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        E: LayoutEvaluator<T> + ?Sized,
        S: TreeSearchMonitor<T>,
    {
        let roots: Vec<FacilityIndex> = model.facilities().iter().map(|f| f.index()).collect();
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(model, &roots, evaluator, monitor, backing)
    }

    /// Explores the subtree of layouts that start with `root`, pruning
    /// against and publishing to `incumbent`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not a facility of `model`.
    pub fn solve_branch<E, S>(
        &mut self,
        model: &Model<T>,
        evaluator: &E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
        root: FacilityIndex,
    ) -> BnbSolverOutcome<T>
    where
        E: LayoutEvaluator<T> + ?Sized,
        S: TreeSearchMonitor<T>,
    {
        assert!(
            model.facility_by_index(root).is_some(),
            "called `BnbSolver::solve_branch` with root {} that is not a facility of the model",
            root.get()
        );

        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(model, &[root], evaluator, monitor, backing)
    }

    /// # Panics
    ///
    /// In debug builds, panics if `evaluator` is not regular on `model`.
    #[inline(always)]
    fn solve_internal<E, S, I>(
        &mut self,
        model: &Model<T>,
        roots: &[FacilityIndex],
        evaluator: &E,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        E: LayoutEvaluator<T> + ?Sized,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
    {
        debug_assert!(
            eval::validation::is_regular_evaluator_exhaustive(evaluator, model, 10_000),
            "LayoutEvaluator '{}' is not regular. Monotonicity violated.",
            evaluator.name()
        );

        self.state.prepare(model.num_facilities(), model.dimension());
        let session =
            BnbSolverSearchSession::new(model, evaluator, &mut monitor, backing, &mut self.state);
        let outcome = session.run(roots);
        self.state.reset();
        outcome
    }
}

/// Per-run state of one search.
struct BnbSolverSearchSession<'a, T, E, S, I>
where
    T: SolverNumeric,
    E: LayoutEvaluator<T> + ?Sized,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    model: &'a Model<T>,
    evaluator: &'a E,
    monitor: &'a mut S,
    incumbent: I,
    state: &'a mut SearchState<T>,
    best_objective: T,
    best_solution: Option<Solution<T>>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<T, E, S, I> std::fmt::Debug for BnbSolverSearchSession<'_, T, E, S, I>
where
    T: SolverNumeric,
    E: LayoutEvaluator<T> + ?Sized,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("evaluator", &self.evaluator.name())
            .field("monitor", &self.monitor.name())
            .field("state", &self.state)
            .field("best_objective", &self.best_objective)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, E, S, I> BnbSolverSearchSession<'a, T, E, S, I>
where
    T: SolverNumeric,
    E: LayoutEvaluator<T> + ?Sized,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        model: &'a Model<T>,
        evaluator: &'a E,
        monitor: &'a mut S,
        incumbent: I,
        state: &'a mut SearchState<T>,
    ) -> Self {
        let best_objective = incumbent.initial_upper_bound();
        Self {
            model,
            evaluator,
            monitor,
            incumbent,
            state,
            best_objective,
            best_solution: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Explores the subtrees of `roots` one after the other.
    fn run(mut self, roots: &[FacilityIndex]) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.model, &self.stats);

        let mut aborted = None;
        for &root in roots {
            log::debug!("exploring layouts starting with facility {}", root.get());

            // A lone facility costs nothing.
            self.state.push(root, T::ZERO);
            let flow = self.explore();
            self.state.pop();

            if let ControlFlow::Break(reason) = flow {
                log::debug!(
                    "branch of facility {} stopped: {}",
                    root.get(),
                    reason
                );
                aborted = Some(reason);
                break;
            }
            log::debug!(
                "branch of facility {} exhausted after {} nodes",
                root.get(),
                self.stats.nodes_explored
            );
        }

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        match aborted {
            Some(reason) => BnbSolverOutcome::aborted(self.best_solution, reason, self.stats),
            None => BnbSolverOutcome::exhausted(self.best_solution, self.stats),
        }
    }

    /// Explores the subtree below the current layout.
    fn explore(&mut self) -> ControlFlow<String> {
        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);

        if let SearchCommand::Terminate(reason) =
            self.monitor.search_command(self.state, &self.stats)
        {
            return ControlFlow::Break(reason);
        }

        if self.state.is_complete() {
            self.handle_complete_solution();
            return ControlFlow::Continue(());
        }

        let model = self.model;
        for facility in model.facilities() {
            let index = facility.index();
            // SAFETY: `Model` guarantees every facility index is below its
            // dimension, and the state was prepared with that dimension.
            if unsafe { self.state.is_placed_unchecked(index) } {
                continue;
            }

            let cost = self.evaluator.evaluate_append(
                model,
                self.state.layout(),
                self.state.current_objective(),
                index,
            );

            self.best_objective = self.incumbent.tighten(self.best_objective);
            if cost >= self.best_objective {
                self.stats.on_pruning_bound();
                self.monitor.on_prune(self.state, index, cost, &self.stats);
                continue;
            }

            self.state.push(index, cost);
            self.monitor.on_descend(self.state, index, &self.stats);
            let flow = self.explore();
            self.state.pop();
            self.stats.on_backtrack();
            self.monitor.on_backtrack(self.state, &self.stats);

            if flow.is_break() {
                return flow;
            }
        }

        ControlFlow::Continue(())
    }

    /// Installs the current complete layout if it still beats the bound.
    #[inline(always)]
    fn handle_complete_solution(&mut self) {
        let objective = self.state.current_objective();
        self.best_objective = self.incumbent.tighten(self.best_objective);

        if objective < self.best_objective {
            let solution = self.state.to_solution();
            self.best_objective = objective;
            self.incumbent.on_solution_found(&solution);
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&solution, &self.stats);
            self.best_solution = Some(solution);
        } else {
            self.stats.on_pruning_bound();
        }
    }
}
