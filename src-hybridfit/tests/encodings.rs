//! The general bound-style encoding and the derived legacy inequality
//! encoding must admit exactly the same feasible region.

use ndarray::Array1;

use hybridfit::{constraint_violation, prototype_constraints, prototype_constraints_ineq};
use hybridfit_problems::prototype::prototype_is_feasible;

#[test]
fn test_encodings_agree_on_a_grid() {
    let general = prototype_constraints();
    let ineq = prototype_constraints_ineq();

    let (lo, hi) = (-3.0, 3.0);
    let steps = 61;
    for i in 0..steps {
        for j in 0..steps {
            let x1 = lo + (hi - lo) * i as f64 / (steps - 1) as f64;
            let x2 = lo + (hi - lo) * j as f64 / (steps - 1) as f64;
            let x = Array1::from_vec(vec![x1, x2]);

            let general_ok = general.iter().all(|c| constraint_violation(c, &x) == 0.0);
            let ineq_ok = ineq.iter().all(|c| (c.fun)(&x) >= 0.0);

            assert_eq!(
                general_ok, ineq_ok,
                "encodings disagree at ({x1}, {x2})"
            );
            assert_eq!(
                general_ok,
                prototype_is_feasible(&x, 0.0),
                "feasibility predicate disagrees at ({x1}, {x2})"
            );
        }
    }
}

#[test]
fn test_derived_inequalities_match_hand_algebra() {
    // 5 - (x1^2 + x2^2) >= 0 and x1 + x2 - 1 >= 0, in that order.
    let ineq = prototype_constraints_ineq();
    assert_eq!(ineq.len(), 2);

    let x = Array1::from_vec(vec![1.5, -0.5]);
    let ball = 5.0 - (1.5f64 * 1.5 + 0.5 * 0.5);
    let sum = 1.5 - 0.5 - 1.0;
    assert!(((ineq[0].fun)(&x) - ball).abs() < 1e-15);
    assert!(((ineq[1].fun)(&x) - sum).abs() < 1e-15);
}
