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

//! Validation utilities for layout evaluators. The branch-and-bound prunes a
//! child as soon as its partial cost reaches the incumbent, which is only
//! exact when the evaluator is regular: extending a layout never lowers its
//! cost. The solver also trusts `evaluate_append` to agree with a full
//! `evaluate` of the extended layout.
//!
//! `is_regular_evaluator_exhaustive` walks the permutation tree of a model in
//! declaration order and checks both properties on every edge it visits. The
//! walk is bounded by a node budget so it stays cheap on large instances; for
//! small instances with a generous budget the check is exhaustive. These
//! routines are diagnostics for development and testing and do not prove
//! anything beyond the visited nodes.

use crate::{eval::evaluator::LayoutEvaluator, num::SolverNumeric};
use srflp_model::{index::FacilityIndex, model::Model};

/// Checks whether `evaluator` is regular on `model` by visiting at most
/// `max_nodes` nodes of the permutation tree.
///
/// For every visited parent layout `p` with cost `c` and every facility `f`
/// not in `p`, the check requires
/// - `evaluate_append(p, c, f) >= c`, and
/// - `evaluate_append(p, c, f) == evaluate(p ++ [f])`.
///
/// Returns `true` when no violation is detected and `false` at the first one.
pub fn is_regular_evaluator_exhaustive<T, E>(
    evaluator: &E,
    model: &Model<T>,
    max_nodes: usize,
) -> bool
where
    T: SolverNumeric,
    E: LayoutEvaluator<T> + ?Sized,
{
    let mut walk = RegularityWalk {
        evaluator,
        model,
        layout: Vec::with_capacity(model.num_facilities()),
        budget: max_nodes,
    };
    walk.visit(T::zero())
}

struct RegularityWalk<'a, T, E>
where
    T: SolverNumeric,
    E: LayoutEvaluator<T> + ?Sized,
{
    evaluator: &'a E,
    model: &'a Model<T>,
    layout: Vec<FacilityIndex>,
    budget: usize,
}

impl<T, E> RegularityWalk<'_, T, E>
where
    T: SolverNumeric,
    E: LayoutEvaluator<T> + ?Sized,
{
    fn visit(&mut self, current: T) -> bool {
        if self.budget == 0 {
            return true;
        }
        self.budget -= 1;

        let model = self.model;
        for facility in model.facilities() {
            let index = facility.index();
            if self.layout.contains(&index) {
                continue;
            }

            let appended = self
                .evaluator
                .evaluate_append(model, &self.layout, current, index);
            if appended < current {
                return false;
            }

            self.layout.push(index);
            let full = self.evaluator.evaluate(model, &self.layout);
            let ok = full == appended && self.visit(appended);
            self.layout.pop();

            if !ok {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ordinal::OrdinalDistanceEvaluator;
    use srflp_model::model::ModelBuilder;

    fn fi(i: usize) -> FacilityIndex {
        FacilityIndex::new(i)
    }

    fn dense_model(n: usize) -> Model<i64> {
        let mut builder = ModelBuilder::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                builder.set_weight(fi(i), fi(j), ((i * 7 + j * 3) % 11) as i64);
            }
        }
        builder.build()
    }

    /// Rewards long layouts, which makes pruning on partial costs unsound.
    struct Decreasing;

    impl LayoutEvaluator<i64> for Decreasing {
        fn name(&self) -> &str {
            "Decreasing"
        }

        fn evaluate(&self, _model: &Model<i64>, layout: &[FacilityIndex]) -> i64 {
            -(layout.len() as i64)
        }
    }

    /// Correct full evaluation, but an incremental update that forgets the distance.
    struct SloppyAppend;

    impl LayoutEvaluator<i64> for SloppyAppend {
        fn name(&self) -> &str {
            "SloppyAppend"
        }

        fn evaluate(&self, model: &Model<i64>, layout: &[FacilityIndex]) -> i64 {
            LayoutEvaluator::<i64>::evaluate(&OrdinalDistanceEvaluator, model, layout)
        }

        fn evaluate_append(
            &self,
            model: &Model<i64>,
            layout: &[FacilityIndex],
            current: i64,
            facility: FacilityIndex,
        ) -> i64 {
            current
                + layout
                    .iter()
                    .map(|&l| model.weight(l, facility))
                    .sum::<i64>()
        }
    }

    #[test]
    fn test_ordinal_evaluator_is_regular() {
        let model = dense_model(6);
        assert!(is_regular_evaluator_exhaustive(
            &OrdinalDistanceEvaluator,
            &model,
            usize::MAX
        ));
    }

    #[test]
    fn test_decreasing_evaluator_is_rejected() {
        let model = dense_model(3);
        assert!(!is_regular_evaluator_exhaustive(&Decreasing, &model, 100));
    }

    #[test]
    fn test_inconsistent_append_is_rejected() {
        let model = dense_model(4);
        assert!(!is_regular_evaluator_exhaustive(&SloppyAppend, &model, 1_000));
    }

    #[test]
    fn test_zero_budget_accepts_anything() {
        let model = dense_model(3);
        assert!(is_regular_evaluator_exhaustive(&Decreasing, &model, 0));
    }
}
