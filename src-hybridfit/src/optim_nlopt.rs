// NLOPT-specific local refinement code

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ndarray::Array1;
use nlopt::{Algorithm, Nlopt, ObjFn, Target};

use super::constraints::{Constraint, ConstraintFn, ConstraintGradFn, to_ineq_form};
use super::optim::{Bounds, FitError, LocalMethod, SolveResult};

/// Tolerance passed to NLopt for each registered inequality constraint.
const CONSTRAINT_TOL: f64 = 1e-6;

/// Central differences, used when a gradient-based method is selected but no
/// analytic gradient is available for the function at hand.
fn numeric_gradient(f: &dyn Fn(&Array1<f64>) -> f64, x: &Array1<f64>, out: &mut [f64]) {
    let mut probe = x.clone();
    for i in 0..x.len() {
        let h = 1e-6 * (1.0 + x[i].abs());
        probe[i] = x[i] + h;
        let fp = f(&probe);
        probe[i] = x[i] - h;
        let fm = f(&probe);
        probe[i] = x[i];
        out[i] = (fp - fm) / (2.0 * h);
    }
}

fn register_ineq<F: ObjFn<()>>(
    opt: &mut Nlopt<F, ()>,
    fun: ConstraintFn,
    grad: Option<ConstraintGradFn>,
) -> Result<(), FitError> {
    let cons_fn = move |xs: &[f64], grad_out: Option<&mut [f64]>, _: &mut ()| -> f64 {
        let xv = Array1::from_vec(xs.to_vec());
        if let Some(slot) = grad_out {
            match &grad {
                Some(g) => slot.copy_from_slice(
                    g(&xv)
                        .as_slice()
                        .expect("constraint gradient must be contiguous"),
                ),
                None => numeric_gradient(&*fun, &xv, slot),
            }
        }
        fun(&xv)
    };
    opt.add_inequality_constraint(cons_fn, (), CONSTRAINT_TOL)
        .map_err(|e| FitError::Solver(format!("{:?}", e)))?;
    Ok(())
}

/// Run one local refinement from `x0`.
///
/// The chosen `method` decides, through its capability descriptor, whether
/// the analytic `gradient` is consumed, which constraint encoding is fed to
/// the solver, and whether objective evaluations are traced into the result
/// path. A solver that stops without converging still produces a result,
/// with `success = false` and the NLopt status in `message`; only
/// misconfigured problems return an error.
///
/// # Arguments
/// * `objective` - Function to minimize
/// * `gradient` - Optional analytic gradient; central differences otherwise
/// * `x0` - Starting point (must match the bounds dimension)
/// * `bounds` - Box constraining the search
/// * `constraints` - General-encoding constraint set (may be empty)
/// * `method` - Local method selector
/// * `maxeval` - Hard cap on objective evaluations
pub fn solve_local(
    objective: &dyn Fn(&Array1<f64>) -> f64,
    gradient: Option<&dyn Fn(&Array1<f64>) -> Array1<f64>>,
    x0: &Array1<f64>,
    bounds: &Bounds,
    constraints: &[Constraint],
    method: LocalMethod,
    maxeval: usize,
) -> Result<SolveResult, FitError> {
    let n = bounds.len();
    if x0.len() != n {
        return Err(FitError::DimensionMismatch {
            expected: n,
            got: x0.len(),
        });
    }
    if !objective(x0).is_finite() {
        return Err(FitError::NonFiniteStart);
    }

    let caps = method.caps();
    // Derivative-free methods never consume the analytic gradient.
    let gradient = if caps.accepts_gradient { gradient } else { None };

    // Resolve the constraint encoding for this method. Methods with general
    // constraint support consume the bound-style set directly, side by side;
    // SLSQP requires the legacy g(x) >= 0 list, derived algebraically from
    // the same set; the quasi-Newton branch takes no constraint set at all.
    // NLopt registers every inequality as fc(x) <= 0.
    let mut fcs: Vec<(ConstraintFn, Option<ConstraintGradFn>)> = Vec::new();
    if caps.accepts_general_constraints {
        for c in constraints {
            match c {
                Constraint::Nonlinear(nc) => {
                    if nc.ub.is_finite() {
                        let f = nc.fun.clone();
                        let ub = nc.ub;
                        let fc: ConstraintFn = Arc::new(move |x| f(x) - ub);
                        fcs.push((fc, nc.grad.clone()));
                    }
                    if nc.lb.is_finite() {
                        let f = nc.fun.clone();
                        let lb = nc.lb;
                        let fc: ConstraintFn = Arc::new(move |x| lb - f(x));
                        let gc = nc.grad.clone().map(|g| -> ConstraintGradFn {
                            Arc::new(move |x| g(x).mapv(|v| -v))
                        });
                        fcs.push((fc, gc));
                    }
                }
                Constraint::Linear(lc) => {
                    for (i, row) in lc.a.rows().into_iter().enumerate() {
                        let row = row.to_owned();
                        if lc.ub[i].is_finite() {
                            let ub = lc.ub[i];
                            let r = row.clone();
                            let rg = row.clone();
                            let fc: ConstraintFn = Arc::new(move |x| r.dot(x) - ub);
                            fcs.push((fc, Some(Arc::new(move |_| rg.clone()))));
                        }
                        if lc.lb[i].is_finite() {
                            let lb = lc.lb[i];
                            let r = row.clone();
                            let rg = row.clone();
                            let fc: ConstraintFn = Arc::new(move |x| lb - r.dot(x));
                            fcs.push((fc, Some(Arc::new(move |_| rg.mapv(|v| -v)))));
                        }
                    }
                }
            }
        }
    } else if method == LocalMethod::Slsqp {
        for c in to_ineq_form(constraints) {
            let f = c.fun.clone();
            let fc: ConstraintFn = Arc::new(move |x| -f(x));
            let gc = c
                .grad
                .clone()
                .map(|g| -> ConstraintGradFn { Arc::new(move |x| g(x).mapv(|v| -v)) });
            fcs.push((fc, gc));
        }
    } else if !constraints.is_empty() {
        return Err(FitError::UnsupportedConstraints(method));
    }

    // Evaluation trace, injected into the objective closure for methods that
    // expose their evaluations; absent (not empty) otherwise.
    let trace: Option<Rc<RefCell<Vec<Array1<f64>>>>> = if caps.supports_callback {
        Some(Rc::new(RefCell::new(Vec::new())))
    } else {
        None
    };

    let trace_in = trace.clone();
    let obj_fn = move |xs: &[f64], grad_out: Option<&mut [f64]>, _: &mut ()| -> f64 {
        let xv = Array1::from_vec(xs.to_vec());
        if let Some(slot) = grad_out {
            match gradient {
                Some(g) => slot.copy_from_slice(
                    g(&xv).as_slice().expect("gradient must be contiguous"),
                ),
                None => numeric_gradient(objective, &xv, slot),
            }
        }
        if let Some(tr) = &trace_in {
            tr.borrow_mut().push(xv.clone());
        }
        objective(&xv)
    };

    let algo = match method {
        LocalMethod::Lbfgs => Algorithm::Lbfgs,
        LocalMethod::Slsqp => Algorithm::Slsqp,
        LocalMethod::Cobyla => Algorithm::Cobyla,
    };

    let mut opt = Nlopt::new(algo, n, obj_fn, Target::Minimize, ());
    opt.set_lower_bounds(bounds.lower().as_slice().expect("bounds must be contiguous"))
        .map_err(|e| FitError::Solver(format!("{:?}", e)))?;
    opt.set_upper_bounds(bounds.upper().as_slice().expect("bounds must be contiguous"))
        .map_err(|e| FitError::Solver(format!("{:?}", e)))?;

    for (fc, gc) in fcs {
        register_ineq(&mut opt, fc, gc)?;
    }

    let _ = opt.set_maxeval(maxeval as u32);
    let _ = opt.set_ftol_rel(1e-10);
    let _ = opt.set_xtol_rel(1e-9);

    let mut x = x0.to_vec();
    let outcome = opt.optimize(&mut x);

    let (success, fun, message) = match outcome {
        Ok((status, val)) => (true, val, format!("{:?}", status)),
        Err((err, val)) => (false, val, format!("{:?}", err)),
    };

    let path = trace.map(|tr| tr.borrow().clone());

    Ok(SolveResult {
        method: method.name().to_string(),
        x: Array1::from_vec(x),
        fun,
        success,
        message,
        path,
    })
}
