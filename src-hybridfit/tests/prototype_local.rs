use ndarray::Array1;

use hybridfit::workflow::{PROTOTYPE_LOCAL_MAXEVAL, solve_prototype_local};
use hybridfit::{Bounds, FitError, LocalMethod, solve_local};
use hybridfit_problems::prototype::{prototype_bounds, prototype_gradient, prototype_objective};

mod common;
use common::assert_in_bounds;

#[test]
fn test_each_method_stays_within_bounds() {
    // Start well outside the feasible region; whatever the feasibility
    // outcome, the returned point must respect the box.
    let x0 = Array1::from_vec(vec![-2.5, 2.5]);
    for method in [LocalMethod::Slsqp, LocalMethod::Cobyla] {
        let r = solve_prototype_local(&x0, method, PROTOTYPE_LOCAL_MAXEVAL).unwrap();
        assert!(r.fun.is_finite(), "{method}: non-finite objective");
        assert!(!r.message.is_empty());
        assert_in_bounds(&r.x, &prototype_bounds(), 1e-8);
    }
}

#[test]
fn test_tracing_methods_record_a_path() {
    let x0 = Array1::from_vec(vec![0.2, 0.9]);
    for method in [LocalMethod::Slsqp, LocalMethod::Cobyla] {
        let r = solve_prototype_local(&x0, method, PROTOTYPE_LOCAL_MAXEVAL).unwrap();
        let path = r.path.expect("tracing method must record a path");
        assert!(!path.is_empty());
        assert!(path.iter().all(|p| p.len() == 2));
    }
}

#[test]
fn test_quasi_newton_rejects_constraint_sets() {
    let x0 = Array1::from_vec(vec![0.2, 0.9]);
    let err = solve_prototype_local(&x0, LocalMethod::Lbfgs, 100).unwrap_err();
    assert!(matches!(
        err,
        FitError::UnsupportedConstraints(LocalMethod::Lbfgs)
    ));
}

#[test]
fn test_bounded_quasi_newton_without_constraints() {
    let bounds = Bounds::from_pairs(&prototype_bounds()).unwrap();
    let grad = |x: &Array1<f64>| prototype_gradient(x);
    let x0 = Array1::from_vec(vec![-2.5, 2.5]);
    let r = solve_local(
        &prototype_objective,
        Some(&grad),
        &x0,
        &bounds,
        &[],
        LocalMethod::Lbfgs,
        200,
    )
    .unwrap();
    assert!(r.path.is_none());
    assert_in_bounds(&r.x, &prototype_bounds(), 1e-8);
}
