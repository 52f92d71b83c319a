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

//! Layout evaluation
//!
//! Provides the cost functions used by the branch-and-bound solver.
//!
//! Regularity requirement:
//! - Every `LayoutEvaluator` must be regular: appending a facility to a
//!   layout must not decrease its cost. The solver prunes on partial costs
//!   and relies on this for correctness; it asserts it in debug builds.
//! - `evaluate_append` must agree with `evaluate` on the extended layout.
//!
//! Submodules:
//! - `evaluator`: the `LayoutEvaluator` trait.
//! - `ordinal`: the ordinal distance objective.
//! - `validation`: checks for regularity and incremental consistency (see
//!   `is_regular_evaluator_exhaustive`).

pub mod evaluator;
pub mod ordinal;
pub mod validation;
