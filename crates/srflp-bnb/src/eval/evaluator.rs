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

use crate::num::SolverNumeric;
use srflp_model::{index::FacilityIndex, model::Model};

/// A strategy for scoring layouts.
///
/// `LayoutEvaluator` decouples the search from a particular cost function.
/// The solver calls `evaluate_append` once per child node to obtain the cost
/// of the parent layout extended by one facility, and prunes the child when
/// that cost already reaches the incumbent.
///
/// Pruning on partial costs is only exact if the evaluator is regular:
/// appending a facility never lowers the cost. See
/// `validation::is_regular_evaluator_exhaustive`.
pub trait LayoutEvaluator<T>
where
    T: SolverNumeric,
{
    /// Returns the name of the evaluator.
    fn name(&self) -> &str;

    /// Computes the cost of a (possibly partial) layout from scratch.
    ///
    /// # Panics
    ///
    /// Panics if `layout` contains an index outside `0..model.dimension()`.
    fn evaluate(&self, model: &Model<T>, layout: &[FacilityIndex]) -> T;

    /// Returns the cost of `layout` with `facility` appended on the right,
    /// given that `current` is the cost of `layout`.
    ///
    /// The default re-derives the cost from scratch. Implementations should
    /// override it with an incremental update.
    fn evaluate_append(
        &self,
        model: &Model<T>,
        layout: &[FacilityIndex],
        current: T,
        facility: FacilityIndex,
    ) -> T {
        let _ = current;
        let mut extended = Vec::with_capacity(layout.len() + 1);
        extended.extend_from_slice(layout);
        extended.push(facility);
        self.evaluate(model, &extended)
    }
}

impl<T> std::fmt::Debug for dyn LayoutEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LayoutEvaluator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn LayoutEvaluator<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LayoutEvaluator({})", self.name())
    }
}
