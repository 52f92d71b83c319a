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

//! Ordinal distance objective.
//!
//! The cost of a layout `l` is
//!
//! ```text
//! Σ_{i < j} weight[l[i]][l[j]] * (j - i)
//! ```
//!
//! where the distance between two facilities is the difference of their
//! positions in the row, not the distance between their centers. Widths do
//! not enter the cost.
//!
//! Appending `f` to a layout of length `k` adds `Σ_{i < k} weight[l[i]][f] * (k - i)`,
//! which `evaluate_append` computes in `O(k)`. All arithmetic saturates at
//! `T::max_value()`.

use crate::{eval::evaluator::LayoutEvaluator, num::SolverNumeric};
use srflp_model::{index::FacilityIndex, model::Model};

/// Evaluates layouts with the ordinal distance objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdinalDistanceEvaluator;

impl OrdinalDistanceEvaluator {
    /// Creates a new evaluator.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    #[inline(always)]
    fn distance<T: SolverNumeric>(positions: usize) -> T {
        T::from_usize(positions).unwrap_or_else(T::max_value)
    }
}

impl<T> LayoutEvaluator<T> for OrdinalDistanceEvaluator
where
    T: SolverNumeric,
{
    fn name(&self) -> &str {
        "OrdinalDistanceEvaluator"
    }

    fn evaluate(&self, model: &Model<T>, layout: &[FacilityIndex]) -> T {
        let mut total = T::ZERO;
        for (i, &left) in layout.iter().enumerate() {
            let mut distance = T::PLUS_ONE;
            for &right in &layout[i + 1..] {
                let term = model.weight(left, right).saturating_mul_val(distance);
                total = total.saturating_add_val(term);
                distance = distance.saturating_add_val(T::PLUS_ONE);
            }
        }
        total
    }

    #[inline]
    fn evaluate_append(
        &self,
        model: &Model<T>,
        layout: &[FacilityIndex],
        current: T,
        facility: FacilityIndex,
    ) -> T {
        let len = layout.len();
        let mut total = current;
        for (i, &left) in layout.iter().enumerate() {
            let term = model
                .weight(left, facility)
                .saturating_mul_val(Self::distance(len - i));
            total = total.saturating_add_val(term);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_chacha::ChaCha8Rng;
    use srflp_model::{facility::Facility, model::ModelBuilder};

    fn fi(i: usize) -> FacilityIndex {
        FacilityIndex::new(i)
    }

    fn reference_model() -> Model<i64> {
        let facilities = vec![
            Facility::new(5, fi(0)),
            Facility::new(3, fi(1)),
            Facility::new(4, fi(2)),
        ];
        Model::from_parts(facilities, &[[0, 3, 1], [3, 0, 2], [1, 2, 0]]).unwrap()
    }

    fn random_model(rng: &mut ChaCha8Rng, n: usize) -> Model<i64> {
        let mut builder = ModelBuilder::new(n);
        for i in 0..n {
            builder.set_facility_width(fi(i), rng.random_range(1..10));
            for j in (i + 1)..n {
                builder.set_weight(fi(i), fi(j), rng.random_range(0..20));
            }
        }
        builder.build()
    }

    #[test]
    fn test_reference_instance_costs() {
        let model = reference_model();
        let e = OrdinalDistanceEvaluator::new();

        assert_eq!(e.evaluate(&model, &[fi(0), fi(1), fi(2)]), 7);
        assert_eq!(e.evaluate(&model, &[fi(2), fi(1), fi(0)]), 7);
        assert_eq!(e.evaluate(&model, &[fi(0), fi(2), fi(1)]), 9);
        assert_eq!(e.evaluate(&model, &[fi(1), fi(0), fi(2)]), 8);
    }

    #[test]
    fn test_empty_and_singleton_layouts_cost_nothing() {
        let model = reference_model();
        let e = OrdinalDistanceEvaluator::new();
        assert_eq!(e.evaluate(&model, &[]), 0);
        assert_eq!(e.evaluate(&model, &[fi(1)]), 0);
    }

    #[test]
    fn test_widths_do_not_matter() {
        let mut narrow = ModelBuilder::<i64>::new(3);
        let mut wide = ModelBuilder::<i64>::new(3);
        for (a, b, w) in [(0, 1, 4), (0, 2, 1), (1, 2, 6)] {
            narrow.set_weight(fi(a), fi(b), w);
            wide.set_weight(fi(a), fi(b), w);
        }
        wide.set_facility_width(fi(0), 100)
            .set_facility_width(fi(2), 37);

        let e = OrdinalDistanceEvaluator::new();
        let layout = [fi(2), fi(0), fi(1)];
        assert_eq!(
            e.evaluate(&narrow.build(), &layout),
            e.evaluate(&wide.build(), &layout)
        );
    }

    #[test]
    fn test_append_matches_full_evaluation_on_random_instances() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0001);
        let e = OrdinalDistanceEvaluator::new();

        for _ in 0..50 {
            let n = rng.random_range(1..=9);
            let model = random_model(&mut rng, n);
            let mut order: Vec<FacilityIndex> = (0..n).map(fi).collect();
            order.shuffle(&mut rng);

            let mut current = 0i64;
            for k in 0..n {
                let next = e.evaluate_append(&model, &order[..k], current, order[k]);
                assert!(next >= current);
                assert_eq!(next, e.evaluate(&model, &order[..=k]));
                current = next;
            }
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let model = random_model(&mut rng, 8);
        let layout: Vec<_> = (0..8).rev().map(fi).collect();
        let e = OrdinalDistanceEvaluator::new();

        let first = e.evaluate(&model, &layout);
        for _ in 0..10 {
            assert_eq!(e.evaluate(&model, &layout), first);
        }
    }

    #[test]
    fn test_arithmetic_saturates() {
        let mut builder = ModelBuilder::<i8>::new(3);
        builder
            .set_weight(fi(0), fi(1), 100)
            .set_weight(fi(0), fi(2), 100)
            .set_weight(fi(1), fi(2), 100);
        let model = builder.build();
        let e = OrdinalDistanceEvaluator::new();

        assert_eq!(e.evaluate(&model, &[fi(0), fi(1), fi(2)]), i8::MAX);
        assert_eq!(e.evaluate_append(&model, &[fi(0), fi(1)], 100, fi(2)), i8::MAX);
    }
}
