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

use crate::{facility::Facility, index::FacilityIndex};
use num_traits::{PrimInt, Signed};
use thiserror::Error;

/// Reasons a problem instance is rejected before any search runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// There is nothing to lay out.
    #[error("the facility set is empty")]
    Empty,
    /// A row of the weight matrix does not have as many entries as there are rows.
    #[error("weight matrix is not square: row {row} has {found} entries but {expected} were expected")]
    NonSquareMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The weight matrix is too small for the facility set.
    #[error("weight matrix of dimension {matrix} cannot hold {facilities} facilities")]
    DimensionMismatch { facilities: usize, matrix: usize },
    /// A facility refers to a row outside of the weight matrix.
    #[error(
        "facility at position {position} has index {index} but the weight matrix dimension is {len}"
    )]
    IndexOutOfBounds {
        position: usize,
        index: usize,
        len: usize,
    },
    /// Two facilities share the same weight-matrix index.
    #[error("facility index {index} is used more than once")]
    DuplicateIndex { index: usize },
    /// Interaction weights must be non-negative.
    #[error("weight at ({row}, {col}) is negative")]
    NegativeWeight { row: usize, col: usize },
    /// Facility widths must be non-negative.
    #[error("facility with index {index} has a negative width")]
    NegativeWidth { index: usize },
    /// Some layout could cost more than the cost type can represent.
    #[error("the worst-case layout cost does not fit the cost type")]
    CostOverflow,
}

/// Size of the permutation search tree of an instance.
///
/// For `n` facilities the tree has `Σ_{k=0..n} n! / (n-k)!` nodes: the root
/// plus every ordered partial layout. The value is kept as `log10` since it
/// leaves the `f64` range for moderately sized instances.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct Complexity {
    log_val: f64,
}

impl Complexity {
    /// Calculates the tree size for the given number of facilities.
    pub fn new(num_facilities: usize) -> Self {
        let log10_add = |a: f64, b: f64| -> f64 {
            let max = a.max(b);
            let min = a.min(b);
            max + (1.0 + 10.0_f64.powf(min - max)).log10()
        };

        // Level 0 is the root with a single node.
        let mut level_log = 0.0;
        let mut total_log = 0.0;
        for k in 1..=num_facilities {
            level_log += ((num_facilities - k + 1) as f64).log10();
            total_log = log10_add(total_log, level_log);
        }

        Complexity { log_val: total_log }
    }

    /// Returns the percentage of the tree covered by `nodes_explored`, or `None`
    /// when the tree is too large for the ratio to be meaningful.
    pub fn coverage(&self, nodes_explored: u64) -> Option<f64> {
        if self.log_val > 15.0 {
            return None;
        }
        let total = 10.0_f64.powf(self.log_val);
        Some((nodes_explored as f64 / total) * 100.0)
    }

    /// Returns the order of magnitude.
    #[inline]
    pub fn exponent(&self) -> u64 {
        self.log_val.floor() as u64
    }

    /// Returns the coefficient in `[1, 10)`.
    #[inline]
    pub fn mantissa(&self) -> f64 {
        10.0_f64.powf(self.log_val - self.log_val.floor())
    }

    /// Returns the raw `log10` value.
    #[inline]
    pub fn raw(&self) -> f64 {
        self.log_val
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} × 10^{}", self.mantissa(), self.exponent())
    }
}

impl std::fmt::Debug for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Complexity")
            .field("log10", &self.log_val)
            .finish()
    }
}

/// A read-only SRFLP instance.
///
/// Holds the facilities in declaration order and a square, row-major weight
/// matrix indexed by `FacilityIndex`. Instances are immutable and are shared
/// by reference between all search branches.
///
/// Construction:
/// - `ModelBuilder` for programmatic instances (dense indices by construction).
/// - `Model::from_parts` for externally supplied data, which is validated.
#[derive(Clone)]
pub struct Model<T>
where
    T: PrimInt + Signed,
{
    facilities: Vec<Facility<T>>, // declaration order
    weights: Vec<T>,              // len = dimension * dimension
    dimension: usize,
}

impl<T> Model<T>
where
    T: PrimInt + Signed,
{
    /// Builds a model from a facility list and a weight matrix, rejecting
    /// malformed instances.
    ///
    /// The matrix must be square with a dimension of at least the number of
    /// facilities. Every facility index must address a row of the matrix and
    /// no index may repeat. Weights and widths must be non-negative.
    /// The cost of every ordering must stay below `T::max_value()`, which is
    /// reserved as the "no layout yet" bound of the search.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use srflp_model::{facility::Facility, index::FacilityIndex, model::Model};
    ///
    /// let facilities = vec![
    ///     Facility::new(5i64, FacilityIndex::new(0)),
    ///     Facility::new(3, FacilityIndex::new(1)),
    ///     Facility::new(4, FacilityIndex::new(2)),
    /// ];
    /// let model = Model::from_parts(facilities, &[[0, 3, 1], [3, 0, 2], [1, 2, 0]]).unwrap();
    /// assert_eq!(model.num_facilities(), 3);
    /// assert_eq!(model.weight(FacilityIndex::new(0), FacilityIndex::new(1)), 3);
    /// ```
    pub fn from_parts<R>(facilities: Vec<Facility<T>>, weights: &[R]) -> Result<Self, ModelError>
    where
        R: AsRef<[T]>,
    {
        if facilities.is_empty() {
            return Err(ModelError::Empty);
        }

        let dimension = weights.len();
        if dimension < facilities.len() {
            return Err(ModelError::DimensionMismatch {
                facilities: facilities.len(),
                matrix: dimension,
            });
        }

        let mut flat = Vec::with_capacity(dimension * dimension);
        for (row, values) in weights.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dimension {
                return Err(ModelError::NonSquareMatrix {
                    row,
                    expected: dimension,
                    found: values.len(),
                });
            }
            if let Some(col) = values.iter().position(|w| *w < T::zero()) {
                return Err(ModelError::NegativeWeight { row, col });
            }
            flat.extend_from_slice(values);
        }

        let mut seen = vec![false; dimension];
        for (position, facility) in facilities.iter().enumerate() {
            let index = facility.index().get();
            if index >= dimension {
                return Err(ModelError::IndexOutOfBounds {
                    position,
                    index,
                    len: dimension,
                });
            }
            if seen[index] {
                return Err(ModelError::DuplicateIndex { index });
            }
            seen[index] = true;
            if facility.width() < T::zero() {
                return Err(ModelError::NegativeWidth { index });
            }
        }

        Self {
            facilities,
            weights: flat,
            dimension,
        }
        .check_cost_range()
    }

    /// `T::max_value()` stays reserved for "no layout found yet".
    fn check_cost_range(self) -> Result<Self, ModelError> {
        match self.worst_case_cost() {
            Some(bound) if bound < T::max_value() => Ok(self),
            _ => Err(ModelError::CostOverflow),
        }
    }

    /// Returns the number of facilities to be placed.
    #[inline]
    pub fn num_facilities(&self) -> usize {
        self.facilities.len()
    }

    /// Returns the dimension of the weight matrix.
    ///
    /// This is at least `num_facilities()`; every facility index is below it.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns all facilities in declaration order.
    #[inline]
    pub fn facilities(&self) -> &[Facility<T>] {
        &self.facilities
    }

    /// Returns the facility declared at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not in `0..num_facilities()`.
    #[inline]
    pub fn facility(&self, position: usize) -> Facility<T> {
        debug_assert!(
            position < self.num_facilities(),
            "called `Model::facility` with position out of bounds: the len is {} but the position is {}",
            self.num_facilities(),
            position
        );

        self.facilities[position]
    }

    /// Returns the facility with the given weight-matrix index, if it is part
    /// of the instance.
    #[inline]
    pub fn facility_by_index(&self, index: FacilityIndex) -> Option<Facility<T>> {
        self.facilities.iter().copied().find(|f| f.index() == index)
    }

    /// Returns the interaction weight between `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not in `0..dimension()`.
    #[inline]
    pub fn weight(&self, a: FacilityIndex, b: FacilityIndex) -> T {
        debug_assert!(
            a.get() < self.dimension && b.get() < self.dimension,
            "called `Model::weight` with index out of bounds: the dimension is {} but the indices are ({}, {})",
            self.dimension,
            a.get(),
            b.get()
        );

        self.weights[a.get() * self.dimension + b.get()]
    }

    /// Returns `true` if `weight(a, b) == weight(b, a)` for every pair of
    /// facilities in the instance.
    pub fn is_symmetric(&self) -> bool {
        self.facilities.iter().all(|a| {
            self.facilities
                .iter()
                .all(|b| self.weight(a.index(), b.index()) == self.weight(b.index(), a.index()))
        })
    }

    /// Returns an upper bound on the cost of any ordering, or `None` if the
    /// bound does not fit into `T`.
    ///
    /// Every pair contributes at most its larger directed weight times the
    /// largest possible distance `num_facilities() - 1`.
    pub fn worst_case_cost(&self) -> Option<T> {
        let mut pair_sum = T::zero();
        for (i, a) in self.facilities.iter().enumerate() {
            for b in &self.facilities[i + 1..] {
                let w = self
                    .weight(a.index(), b.index())
                    .max(self.weight(b.index(), a.index()));
                pair_sum = pair_sum.checked_add(&w)?;
            }
        }
        let max_distance: T = num_traits::cast(self.num_facilities().saturating_sub(1))?;
        pair_sum.checked_mul(&max_distance)
    }

    /// Returns the size of the permutation search tree.
    #[inline]
    pub fn complexity(&self) -> Complexity {
        Complexity::new(self.num_facilities())
    }
}

impl<T> std::fmt::Debug for Model<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("facilities", &self.facilities)
            .field("dimension", &self.dimension)
            .field("weights", &self.weights)
            .finish()
    }
}

impl<T> std::fmt::Display for Model<T>
where
    T: PrimInt + Signed,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_facilities: {}, dimension: {})",
            self.num_facilities(),
            self.dimension
        )
    }
}

/// Incremental constructor for `Model`.
///
/// Facility `i` receives the weight-matrix index `i`, so the builder always
/// produces dense, unique indices.
///
/// | Field     | Default |
/// | :-------- | :------ |
/// | `width`   | `1`     |
/// | `weights` | `0`     |
#[derive(Clone)]
pub struct ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    widths: Vec<T>,
    weights: Vec<T>, // len = num_facilities * num_facilities
}

impl<T> ModelBuilder<T>
where
    T: PrimInt + Signed,
{
    /// Creates a builder for `num_facilities` facilities.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use srflp_model::{index::FacilityIndex, model::ModelBuilder};
    ///
    /// let mut builder = ModelBuilder::<i64>::new(3);
    /// builder.set_weight(FacilityIndex::new(0), FacilityIndex::new(2), 4);
    /// let model = builder.build();
    /// assert_eq!(model.weight(FacilityIndex::new(2), FacilityIndex::new(0)), 4);
    /// ```
    pub fn new(num_facilities: usize) -> Self {
        Self {
            widths: vec![T::one(); num_facilities],
            weights: vec![T::zero(); num_facilities * num_facilities],
        }
    }

    /// Returns the number of facilities.
    #[inline]
    pub fn num_facilities(&self) -> usize {
        self.widths.len()
    }

    /// Sets the width of a facility.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_facilities()`.
    #[inline]
    pub fn set_facility_width(&mut self, index: FacilityIndex, width: T) -> &mut Self {
        debug_assert!(
            width >= T::zero(),
            "called `ModelBuilder::set_facility_width` with a negative width"
        );

        self.widths[index.get()] = width;
        self
    }

    /// Sets the interaction weight of the pair `{a, b}` in both directions.
    ///
    /// # Panics
    ///
    /// Panics if either index is not in `0..num_facilities()`.
    #[inline]
    pub fn set_weight(&mut self, a: FacilityIndex, b: FacilityIndex, weight: T) -> &mut Self {
        self.set_weight_directed(a, b, weight);
        self.set_weight_directed(b, a, weight)
    }

    /// Sets the single matrix entry `(a, b)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not in `0..num_facilities()`.
    #[inline]
    pub fn set_weight_directed(
        &mut self,
        a: FacilityIndex,
        b: FacilityIndex,
        weight: T,
    ) -> &mut Self {
        let n = self.num_facilities();
        assert!(
            a.get() < n && b.get() < n,
            "called `ModelBuilder::set_weight_directed` with index out of bounds: the len is {} but the indices are ({}, {})",
            n,
            a.get(),
            b.get()
        );
        debug_assert!(
            weight >= T::zero(),
            "called `ModelBuilder::set_weight_directed` with a negative weight"
        );

        self.weights[a.get() * n + b.get()] = weight;
        self
    }

    /// Builds the `Model` and checks that no ordering can overflow `T`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::CostOverflow` if `Model::worst_case_cost` does
    /// not stay below `T::max_value()`.
    pub fn try_build(self) -> Result<Model<T>, ModelError> {
        self.build().check_cost_range()
    }

    /// Builds the `Model` without checking the cost range.
    ///
    /// Costs of models whose weights are too large for `T` saturate at
    /// `T::max_value()`; use `try_build` to reject them instead.
    pub fn build(self) -> Model<T> {
        let dimension = self.widths.len();
        let facilities = self
            .widths
            .into_iter()
            .enumerate()
            .map(|(i, width)| Facility::new(width, FacilityIndex::new(i)))
            .collect();

        Model {
            facilities,
            weights: self.weights,
            dimension,
        }
    }
}

impl<T> std::fmt::Debug for ModelBuilder<T>
where
    T: PrimInt + Signed + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBuilder")
            .field("widths", &self.widths)
            .field("weights", &self.weights)
            .finish()
    }
}
