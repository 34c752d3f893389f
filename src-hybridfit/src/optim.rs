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

use ndarray::Array1;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Errors raised for misconfigured problems.
///
/// These mark programming errors (malformed bounds, mismatched dimensions,
/// non-finite starting objective) and fail at call time. A solver that merely
/// fails to converge is not an error: it comes back as a [`SolveResult`] with
/// `success = false`.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("bounds length mismatch: lower has {lower} entries, upper has {upper}")]
    BoundsLength { lower: usize, upper: usize },

    #[error("invalid bounds at index {index}: lower {lower} > upper {upper}")]
    BoundsOrder { index: usize, lower: f64, upper: f64 },

    #[error("start point has {got} entries, problem expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("objective is not finite at the start point")]
    NonFiniteStart,

    #[error("method {0} does not accept a constraint set")]
    UnsupportedConstraints(LocalMethod),

    #[error("solver setup failed: {0}")]
    Solver(String),
}

/// Closed set of local refinement methods.
///
/// The selector drives the constraint encoding and gradient handling through
/// [`LocalMethod::caps`]; free-form algorithm strings exist only at the CLI
/// boundary via `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocalMethod {
    /// Bounded low-storage quasi-Newton (NLopt LD_LBFGS). No constraints.
    Lbfgs,
    /// Sequential quadratic programming (NLopt LD_SLSQP). Consumes the legacy
    /// `g(x) >= 0` inequality encoding.
    Slsqp,
    /// Derivative-free trust-region with general constraint support
    /// (NLopt LN_COBYLA).
    Cobyla,
}

/// What a chosen method can consume. Resolved once per solver call.
#[derive(Debug, Clone, Copy)]
pub struct MethodCaps {
    /// The solver asks the objective callback for derivatives.
    pub accepts_gradient: bool,
    /// The solver takes the general `lo <= g(x) <= hi` encoding directly;
    /// otherwise constraints must be transformed to the inequality form.
    pub accepts_general_constraints: bool,
    /// Objective evaluations can be traced into the result path.
    pub supports_callback: bool,
}

impl LocalMethod {
    /// Capability descriptor for this method.
    pub fn caps(self) -> MethodCaps {
        match self {
            LocalMethod::Lbfgs => MethodCaps {
                accepts_gradient: true,
                accepts_general_constraints: false,
                supports_callback: false,
            },
            LocalMethod::Slsqp => MethodCaps {
                accepts_gradient: true,
                accepts_general_constraints: false,
                supports_callback: true,
            },
            LocalMethod::Cobyla => MethodCaps {
                accepts_gradient: false,
                accepts_general_constraints: true,
                supports_callback: true,
            },
        }
    }

    /// Method identifier used in result records and reports.
    pub fn name(self) -> &'static str {
        match self {
            LocalMethod::Lbfgs => "nlopt:lbfgs",
            LocalMethod::Slsqp => "nlopt:slsqp",
            LocalMethod::Cobyla => "nlopt:cobyla",
        }
    }
}

impl fmt::Display for LocalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lbfgs" | "nlopt:lbfgs" => Ok(LocalMethod::Lbfgs),
            "slsqp" | "nlopt:slsqp" => Ok(LocalMethod::Slsqp),
            "cobyla" | "nlopt:cobyla" => Ok(LocalMethod::Cobyla),
            _ => Err(format!("unknown local method: {s}")),
        }
    }
}

/// Closed box constraining all search. `lower[i] <= upper[i]` is enforced at
/// construction and holds for the lifetime of the value.
#[derive(Debug, Clone, Serialize)]
pub struct Bounds {
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl Bounds {
    pub fn new(lower: Array1<f64>, upper: Array1<f64>) -> Result<Self, FitError> {
        if lower.len() != upper.len() {
            return Err(FitError::BoundsLength {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        for (index, (lo, hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if lo > hi {
                return Err(FitError::BoundsOrder {
                    index,
                    lower: *lo,
                    upper: *hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Build from the `(lower, upper)` pair convention used by the problem
    /// definitions.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, FitError> {
        let lower = Array1::from_iter(pairs.iter().map(|p| p.0));
        let upper = Array1::from_iter(pairs.iter().map(|p| p.1));
        Self::new(lower, upper)
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// Component-wise membership check with tolerance.
    pub fn contains(&self, x: &Array1<f64>, tol: f64) -> bool {
        x.len() == self.len()
            && x.iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(xi, (lo, hi))| *xi >= lo - tol && *xi <= hi + tol)
    }

    /// Bounds as `[lo, hi]` pairs, the format the global backend consumes.
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(lo, hi)| [*lo, *hi])
            .collect()
    }
}

/// Outcome of one solver invocation.
///
/// Immutable after construction; the orchestrator never merges the global and
/// local records, it returns both. `path` is `Some` only when the chosen
/// local method supports evaluation tracing; a method without that hook
/// yields an absent path, not an empty one. Global results never carry one.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// Identifier of the algorithm that produced this record.
    pub method: String,
    /// Resulting parameter vector.
    pub x: Array1<f64>,
    /// Achieved objective value (always the true, unpenalized objective).
    pub fun: f64,
    /// Whether the solver reported normal termination.
    pub success: bool,
    /// Human-readable termination status.
    pub message: String,
    /// Ordered objective-evaluation points, when the method traces them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Array1<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_reject_length_mismatch() {
        let err = Bounds::new(Array1::zeros(2), Array1::zeros(3)).unwrap_err();
        assert!(matches!(err, FitError::BoundsLength { lower: 2, upper: 3 }));
    }

    #[test]
    fn bounds_reject_inverted_interval() {
        let err = Bounds::from_pairs(&[(0.0, 1.0), (2.0, -2.0)]).unwrap_err();
        assert!(matches!(err, FitError::BoundsOrder { index: 1, .. }));
    }

    #[test]
    fn bounds_membership_uses_tolerance() {
        let b = Bounds::from_pairs(&[(-3.0, 3.0), (-3.0, 3.0)]).unwrap();
        assert!(b.contains(&Array1::from_vec(vec![3.0, -3.0]), 0.0));
        assert!(b.contains(&Array1::from_vec(vec![3.0 + 1e-10, 0.0]), 1e-9));
        assert!(!b.contains(&Array1::from_vec(vec![3.1, 0.0]), 1e-9));
    }

    #[test]
    fn method_caps_are_consistent() {
        assert!(!LocalMethod::Lbfgs.caps().supports_callback);
        assert!(LocalMethod::Slsqp.caps().accepts_gradient);
        assert!(!LocalMethod::Slsqp.caps().accepts_general_constraints);
        assert!(LocalMethod::Cobyla.caps().accepts_general_constraints);
        assert!(!LocalMethod::Cobyla.caps().accepts_gradient);
    }

    #[test]
    fn method_parses_from_cli_spellings() {
        assert_eq!("slsqp".parse::<LocalMethod>().unwrap(), LocalMethod::Slsqp);
        assert_eq!(
            "NLOPT:COBYLA".parse::<LocalMethod>().unwrap(),
            LocalMethod::Cobyla
        );
        assert!("bogus".parse::<LocalMethod>().is_err());
    }
}
