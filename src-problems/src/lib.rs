//! Problem definitions for the HybridFit optimization pipelines
//!
//! This crate holds the pure mathematical material consumed by the solver
//! crate: objective functions, hand-derived analytic gradients, raw
//! constraint functions, box bounds, and the seeded synthetic-data
//! generator. Nothing in here calls a solver; everything is a pure function
//! of its inputs.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use hybridfit_problems::prototype::{prototype_objective, prototype_is_feasible};
//!
//! let x = Array1::from_vec(vec![1.0, 1.0]);
//! let f = prototype_objective(&x);
//! assert!(f.is_finite());
//! assert!(prototype_is_feasible(&x, 1e-9));
//! ```

pub mod logistic;
pub mod prototype;

pub use logistic::{SyntheticDataset, logistic, logistic_bounds, logistic_sse, make_synthetic_data};
pub use prototype::{
    prototype_ball, prototype_bounds, prototype_gradient, prototype_is_feasible,
    prototype_objective,
};
