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

//! # Parallel Branch-and-Bound
//!
//! Runs one branch-and-bound search per facility, each rooted at the layout
//! that starts with that facility, on scoped threads that share a single
//! `SharedIncumbent`. A cost found in one branch immediately tightens the
//! pruning bound of all others.
//!
//! ## Highlights
//!
//! - Fan-out:
//!   - One `std::thread::scope` thread per facility, each with its own
//!     `BnbSolver` buffer and monitor stack.
//!   - The evaluator and the model are shared read-only.
//! - Monitor stack per thread:
//!   - `InterruptMonitor` on the solver's stop flag (always present).
//!   - `SolutionLimitMonitor` on a global counter, if a limit is set.
//!   - `TimeLimitMonitor`, if a limit is set.
//!   - `LogTreeSearchMonitor`, if a log interval is set.
//! - Outcome:
//!   - `Optimal` when every branch exhausted its subtree.
//!   - `Feasible` or `Unknown` with the first abort reason otherwise.
//!   - A panicking branch is re-raised on the calling thread.
//!
//! ## Usage
//!
//! ```rust
//! use srflp_bnb::{eval::ordinal::OrdinalDistanceEvaluator, parallel::SolverBuilder};
//! use srflp_model::{index::FacilityIndex, model::ModelBuilder};
//!
//! let mut builder = ModelBuilder::<i64>::new(3);
//! builder
//!     .set_weight(FacilityIndex::new(0), FacilityIndex::new(1), 3)
//!     .set_weight(FacilityIndex::new(0), FacilityIndex::new(2), 1)
//!     .set_weight(FacilityIndex::new(1), FacilityIndex::new(2), 2);
//! let model = builder.build();
//!
//! let solver = SolverBuilder::<i64>::new().build();
//! let outcome = solver.solve(&model, &OrdinalDistanceEvaluator);
//! assert_eq!(outcome.best_cost(), Some(7));
//! ```

use crate::{
    bnb::BnbSolver,
    eval::evaluator::LayoutEvaluator,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor, solution_limit::SolutionLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
    num::SolverNumeric,
    result::{BnbSolverOutcome, SolverOutcome, SolverResult, TerminationReason},
    stats::BnbSolverStatistics,
};
use log::{debug, info};
use srflp_model::{model::Model, solution::Solution};
use std::{
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64},
    },
    time::{Duration, Instant},
};

/// Multi-threaded solver that explores one root facility per thread.
#[derive(Debug)]
pub struct ParallelSolver<T> {
    stop_signal: Arc<AtomicBool>,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    log_interval: Option<Duration>,
    _phantom: PhantomData<T>,
}

impl<T> Default for ParallelSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        SolverBuilder::new().build()
    }
}

impl<T> ParallelSolver<T>
where
    T: SolverNumeric,
{
    /// Returns the flag that stops a running solve when set to `true`.
    #[inline]
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_signal)
    }

    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval
    }

    /// Solves `model` to optimality unless a limit or the interrupt flag
    /// stops it first.
    pub fn solve<E>(&self, model: &Model<T>, evaluator: &E) -> SolverOutcome<T>
    where
        E: LayoutEvaluator<T> + Sync + ?Sized,
    {
        let incumbent = SharedIncumbent::new();
        self.solve_with_incumbent(model, evaluator, &incumbent)
    }

    /// Like `solve`, but prunes against and publishes to `incumbent`, which
    /// may already hold a known layout.
    pub fn solve_with_incumbent<E>(
        &self,
        model: &Model<T>,
        evaluator: &E,
        incumbent: &SharedIncumbent<T>,
    ) -> SolverOutcome<T>
    where
        E: LayoutEvaluator<T> + Sync + ?Sized,
    {
        let start_time = Instant::now();
        let num_threads = model.num_facilities();
        info!(
            "solving {} facilities on {} threads ({} layouts)",
            model.num_facilities(),
            num_threads,
            model.complexity()
        );

        let global_solution_count = AtomicU64::new(0);
        let results = self.run_branches(model, evaluator, incumbent, &global_solution_count);
        let outcome = self.construct_outcome(start_time, incumbent, results, num_threads);

        info!("{}", outcome);
        outcome
    }

    fn run_branches<E>(
        &self,
        model: &Model<T>,
        evaluator: &E,
        incumbent: &SharedIncumbent<T>,
        global_solution_count: &AtomicU64,
    ) -> Vec<BnbSolverOutcome<T>>
    where
        E: LayoutEvaluator<T> + Sync + ?Sized,
    {
        let stop_signal: &AtomicBool = &self.stop_signal;
        let solution_limit = self.solution_limit;
        let time_limit = self.time_limit;
        let log_interval = self.log_interval;

        std::thread::scope(|scope| {
            let handles: Vec<_> = model
                .facilities()
                .iter()
                .map(|facility| {
                    let root = facility.index();
                    scope.spawn(move || {
                        let mut monitor = CompositeTreeSearchMonitor::<T>::with_capacity(4);
                        monitor.add_monitor(InterruptMonitor::new(stop_signal));
                        if let Some(limit) = solution_limit {
                            monitor.add_monitor(SolutionLimitMonitor::new(
                                global_solution_count,
                                limit,
                            ));
                        }
                        if let Some(limit) = time_limit {
                            monitor.add_monitor(TimeLimitMonitor::new(limit));
                        }
                        if let Some(interval) = log_interval {
                            monitor.add_monitor(LogTreeSearchMonitor::new(
                                format!("branch {}", root.get()),
                                interval,
                            ));
                        }

                        let mut solver =
                            BnbSolver::preallocated(model.num_facilities(), model.dimension());
                        solver.solve_branch(model, evaluator, monitor, incumbent, root)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(outcome) => outcome,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        })
    }

    fn construct_outcome(
        &self,
        start_time: Instant,
        incumbent: &SharedIncumbent<T>,
        results: Vec<BnbSolverOutcome<T>>,
        used_threads: usize,
    ) -> SolverOutcome<T> {
        let mut statistics = BnbSolverStatistics::default();
        for outcome in &results {
            statistics.merge(outcome.statistics());
        }
        statistics.set_total_time(start_time.elapsed());

        let best_solution = Self::find_best_solution(incumbent, &results);
        let abort_reason = results.iter().find_map(|r| match r.termination_reason() {
            TerminationReason::Aborted(reason) => Some(reason.clone()),
            TerminationReason::OptimalityProven => None,
        });

        let (result, reason) = match (best_solution, abort_reason) {
            (Some(solution), None) => (
                SolverResult::Optimal(solution),
                TerminationReason::OptimalityProven,
            ),
            (Some(solution), Some(reason)) => (
                SolverResult::Feasible(solution),
                TerminationReason::Aborted(reason),
            ),
            (None, None) => (SolverResult::Unknown, TerminationReason::OptimalityProven),
            (None, Some(reason)) => (SolverResult::Unknown, TerminationReason::Aborted(reason)),
        };

        debug!(
            "{} branches finished, {} aborted",
            results.len(),
            results.iter().filter(|r| r.is_aborted()).count()
        );
        SolverOutcome::new(result, reason, statistics, used_threads)
    }

    /// The best solution among all branch results and the shared incumbent.
    fn find_best_solution(
        incumbent: &SharedIncumbent<T>,
        results: &[BnbSolverOutcome<T>],
    ) -> Option<Solution<T>> {
        let snapshot = incumbent.snapshot();
        results
            .iter()
            .filter_map(|r| r.result().solution())
            .chain(snapshot.as_ref())
            .min_by_key(|s| s.objective_value())
            .cloned()
    }
}

/// Configures a `ParallelSolver`.
#[derive(Debug)]
pub struct SolverBuilder<T> {
    stop_signal: Option<Arc<AtomicBool>>,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    log_interval: Option<Duration>,
    _phantom: PhantomData<T>,
}

impl<T> Default for SolverBuilder<T>
where
    T: SolverNumeric,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SolverBuilder<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            stop_signal: None,
            solution_limit: None,
            time_limit: None,
            log_interval: None,
            _phantom: PhantomData,
        }
    }

    /// Stops every branch after `limit` of wall-clock time.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stops every branch once `limit` improving solutions were found in
    /// total.
    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// Uses `flag` as the stop signal instead of a private one.
    #[inline]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_signal = Some(flag);
        self
    }

    /// Enables per-branch progress logging at `interval`.
    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    #[inline]
    pub fn build(self) -> ParallelSolver<T> {
        ParallelSolver {
            stop_signal: self
                .stop_signal
                .unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
            solution_limit: self.solution_limit,
            time_limit: self.time_limit,
            log_interval: self.log_interval,
            _phantom: PhantomData,
        }
    }
}
