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

//! Instance generators and an exhaustive reference solver for tests.

use crate::eval::{evaluator::LayoutEvaluator, ordinal::OrdinalDistanceEvaluator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use srflp_model::{
    facility::Facility,
    index::FacilityIndex,
    model::{Model, ModelBuilder},
};

pub(crate) fn fi(i: usize) -> FacilityIndex {
    FacilityIndex::new(i)
}

/// Three facilities with weights `[[0,3,1],[3,0,2],[1,2,0]]`; optimum 7.
pub(crate) fn reference_model() -> Model<i64> {
    let facilities = vec![
        Facility::new(5, fi(0)),
        Facility::new(3, fi(1)),
        Facility::new(4, fi(2)),
    ];
    Model::from_parts(facilities, &[[0, 3, 1], [3, 0, 2], [1, 2, 0]])
        .expect("reference instance is valid")
}

/// A symmetric instance with weights drawn from `0..max_weight`.
pub(crate) fn random_model(seed: u64, n: usize, max_weight: i64) -> Model<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = ModelBuilder::new(n);
    for i in 0..n {
        builder.set_facility_width(fi(i), rng.random_range(1..10));
        for j in (i + 1)..n {
            builder.set_weight(fi(i), fi(j), rng.random_range(0..max_weight));
        }
    }
    builder.build()
}

/// Rebuilds `model` with every weight transformed by `f(row, col, weight)`.
pub(crate) fn map_weights<F>(model: &Model<i64>, f: F) -> Model<i64>
where
    F: Fn(usize, usize, i64) -> i64,
{
    let n = model.dimension();
    let weights: Vec<Vec<i64>> = (0..n)
        .map(|r| {
            (0..n)
                .map(|c| f(r, c, model.weight(fi(r), fi(c))))
                .collect()
        })
        .collect();
    Model::from_parts(model.facilities().to_vec(), &weights).expect("mapped instance is valid")
}

/// Minimum cost over every permutation, with no pruning at all.
pub(crate) fn brute_force(model: &Model<i64>) -> i64 {
    fn go(
        model: &Model<i64>,
        layout: &mut Vec<FacilityIndex>,
        remaining: &mut Vec<FacilityIndex>,
        best: &mut i64,
    ) {
        if remaining.is_empty() {
            let cost = OrdinalDistanceEvaluator.evaluate(model, layout);
            *best = (*best).min(cost);
            return;
        }
        for k in 0..remaining.len() {
            let f = remaining.remove(k);
            layout.push(f);
            go(model, layout, remaining, best);
            layout.pop();
            remaining.insert(k, f);
        }
    }

    let mut remaining: Vec<_> = model.facilities().iter().map(|f| f.index()).collect();
    let mut best = i64::MAX;
    go(model, &mut Vec::new(), &mut remaining, &mut best);
    best
}
