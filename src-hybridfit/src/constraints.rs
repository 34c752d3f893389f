//! Constraint encodings shared by the local and global stages
//!
//! Two mathematically equivalent encodings of the same feasible region:
//!
//! - the general bound-style form `lo <= g(x) <= hi` / `lo <= A x <= hi`,
//!   consumed directly by methods with general constraint support, and
//! - the legacy inequality form `g(x) >= 0`, required by the SQP interface.
//!
//! The legacy form is always derived from the general form through
//! [`to_ineq_form`]; nothing re-derives constraints by hand.

use ndarray::{Array1, Array2, array};
use std::sync::Arc;

use hybridfit_problems::prototype::{BALL_MAX, SUM_MIN, prototype_ball};

/// Scalar constraint function, stateless and reusable across calls.
pub type ConstraintFn = Arc<dyn Fn(&Array1<f64>) -> f64 + Send + Sync>;
/// Analytic gradient of a scalar constraint function.
pub type ConstraintGradFn = Arc<dyn Fn(&Array1<f64>) -> Array1<f64> + Send + Sync>;

/// Nonlinear constraint `lb <= fun(x) <= ub`.
#[derive(Clone)]
pub struct NonlinearConstraint {
    pub fun: ConstraintFn,
    /// Analytic gradient for the gradient-based branch; numeric differences
    /// are substituted when absent.
    pub grad: Option<ConstraintGradFn>,
    pub lb: f64,
    pub ub: f64,
}

/// Linear constraints `lb <= A x <= ub`, component-wise per row.
#[derive(Clone)]
pub struct LinearConstraint {
    pub a: Array2<f64>,
    pub lb: Array1<f64>,
    pub ub: Array1<f64>,
}

/// General bound-style constraint, the canonical encoding.
#[derive(Clone)]
pub enum Constraint {
    Nonlinear(NonlinearConstraint),
    Linear(LinearConstraint),
}

/// Legacy inequality constraint `fun(x) >= 0`.
#[derive(Clone)]
pub struct IneqConstraint {
    pub fun: ConstraintFn,
    pub grad: Option<ConstraintGradFn>,
}

/// Transform the general encoding into the legacy `g(x) >= 0` list.
///
/// Each finite side of every constraint becomes one inequality:
/// `g(x) <= ub` turns into `ub - g(x) >= 0` and `g(x) >= lb` into
/// `g(x) - lb >= 0`; linear rows are expanded the same way. The feasible
/// regions of input and output coincide.
pub fn to_ineq_form(constraints: &[Constraint]) -> Vec<IneqConstraint> {
    let mut out = Vec::new();
    for c in constraints {
        match c {
            Constraint::Nonlinear(nc) => {
                if nc.ub.is_finite() {
                    let fun = nc.fun.clone();
                    let ub = nc.ub;
                    out.push(IneqConstraint {
                        fun: Arc::new(move |x| ub - fun(x)),
                        grad: nc.grad.clone().map(|g| -> ConstraintGradFn {
                            Arc::new(move |x| g(x).mapv(|v| -v))
                        }),
                    });
                }
                if nc.lb.is_finite() {
                    let fun = nc.fun.clone();
                    let lb = nc.lb;
                    out.push(IneqConstraint {
                        fun: Arc::new(move |x| fun(x) - lb),
                        grad: nc.grad.clone(),
                    });
                }
            }
            Constraint::Linear(lc) => {
                for (i, row) in lc.a.rows().into_iter().enumerate() {
                    let row = row.to_owned();
                    if lc.ub[i].is_finite() {
                        let ub = lc.ub[i];
                        let r = row.clone();
                        let rg = row.clone();
                        out.push(IneqConstraint {
                            fun: Arc::new(move |x| ub - r.dot(x)),
                            grad: Some(Arc::new(move |_| rg.mapv(|v| -v))),
                        });
                    }
                    if lc.lb[i].is_finite() {
                        let lb = lc.lb[i];
                        let r = row.clone();
                        let rg = row.clone();
                        out.push(IneqConstraint {
                            fun: Arc::new(move |x| r.dot(x) - lb),
                            grad: Some(Arc::new(move |_| rg.clone())),
                        });
                    }
                }
            }
        }
    }
    out
}

/// Total violation magnitude of one constraint at `x`; zero when satisfied.
///
/// Used by the penalty fold of the global stage, never inside the local
/// solvers.
pub fn constraint_violation(c: &Constraint, x: &Array1<f64>) -> f64 {
    match c {
        Constraint::Nonlinear(nc) => {
            let v = (nc.fun)(x);
            (v - nc.ub).max(0.0) + (nc.lb - v).max(0.0)
        }
        Constraint::Linear(lc) => {
            let vals = lc.a.dot(x);
            vals.iter()
                .enumerate()
                .map(|(i, v)| (v - lc.ub[i]).max(0.0) + (lc.lb[i] - v).max(0.0))
                .sum()
        }
    }
}

/// General encoding of the prototype constraints: the ball
/// `x1^2 + x2^2 <= 5` and the half-plane `x1 + x2 >= 1`.
pub fn prototype_constraints() -> Vec<Constraint> {
    let ball = NonlinearConstraint {
        fun: Arc::new(prototype_ball),
        grad: Some(Arc::new(|x| array![2.0 * x[0], 2.0 * x[1]])),
        lb: f64::NEG_INFINITY,
        ub: BALL_MAX,
    };
    let halfplane = LinearConstraint {
        a: array![[1.0, 1.0]],
        lb: array![SUM_MIN],
        ub: array![f64::INFINITY],
    };
    vec![Constraint::Nonlinear(ball), Constraint::Linear(halfplane)]
}

/// Legacy `g(x) >= 0` encoding of the prototype constraints, derived
/// algebraically from [`prototype_constraints`]:
/// `5 - (x1^2 + x2^2) >= 0` and `x1 + x2 - 1 >= 0`.
pub fn prototype_constraints_ineq() -> Vec<IneqConstraint> {
    to_ineq_form(&prototype_constraints())
}
