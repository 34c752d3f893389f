//! HybridFit - Two-stage global/local nonlinear optimization
//!
//! Copyright (C) 2025 Pierre Aubert pierre(at)spinorama(dot)org
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.
//!
//! This crate orchestrates two small optimization pipelines over the problem
//! definitions of `hybridfit_problems`:
//!
//! - a nonlinear least-squares fit of a logistic growth curve, and
//! - a constrained non-convex 2-D minimization.
//!
//! Both share the same two-stage shape: a seeded differential-evolution
//! global search over the bounded box, then local refinement from the global
//! candidate with the true objective, gradient and constraints.

/// Common CLI argument definitions shared across binaries
pub mod cli;
/// Constraint encodings for the local and global stages
pub mod constraints;
/// Core data model: bounds, results, method registry, errors
pub mod optim;
/// Global search stage (differential evolution)
pub mod optim_mh;
/// Local refinement stage (NLopt)
pub mod optim_nlopt;
/// Shared pipeline steps used by binaries
pub mod workflow;

// Re-export commonly used items
pub use constraints::{
    Constraint, IneqConstraint, LinearConstraint, NonlinearConstraint, constraint_violation,
    prototype_constraints, prototype_constraints_ineq, to_ineq_form,
};
pub use optim::{Bounds, FitError, LocalMethod, MethodCaps, SolveResult};
pub use optim_mh::{GlobalConfig, GlobalObjective, solve_global};
pub use optim_nlopt::solve_local;
pub use workflow::*;
