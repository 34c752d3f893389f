//! Non-convex constrained 2-D benchmark problem
//!
//! A quadratic bowl centred on (1, 2) with a sinusoidal ripple that creates
//! several local minima, subject to a nonlinear ball constraint and a linear
//! half-plane constraint:
//!
//! - `x1^2 + x2^2 <= 5`
//! - `x1 + x2 >= 1`

use ndarray::Array1;

/// Upper bound of the ball constraint `x1^2 + x2^2 <= BALL_MAX`.
pub const BALL_MAX: f64 = 5.0;

/// Lower bound of the linear constraint `x1 + x2 >= SUM_MIN`.
pub const SUM_MIN: f64 = 1.0;

/// `(x1-1)^2 + (x2-2)^2 + 0.5 sin(3 x1) sin(3 x2)`
///
/// The sinusoidal ripple creates several local minima inside the box.
/// Deterministic for identical inputs.
pub fn prototype_objective(x: &Array1<f64>) -> f64 {
    let (x1, x2) = (x[0], x[1]);
    (x1 - 1.0).powi(2) + (x2 - 2.0).powi(2) + 0.5 * (3.0 * x1).sin() * (3.0 * x2).sin()
}

/// Analytic gradient of [`prototype_objective`].
///
/// Must match the exact partial derivatives of the objective; a mismatch
/// quietly degrades the gradient-based local solvers.
pub fn prototype_gradient(x: &Array1<f64>) -> Array1<f64> {
    let (x1, x2) = (x[0], x[1]);
    let d1 = 2.0 * (x1 - 1.0) + 1.5 * (3.0 * x1).cos() * (3.0 * x2).sin();
    let d2 = 2.0 * (x2 - 2.0) + 1.5 * (3.0 * x1).sin() * (3.0 * x2).cos();
    Array1::from_vec(vec![d1, d2])
}

/// Ball constraint value `x1^2 + x2^2`; feasible while `<= BALL_MAX`.
pub fn prototype_ball(x: &Array1<f64>) -> f64 {
    x[0] * x[0] + x[1] * x[1]
}

/// Search box for the prototype problem: `[-3, 3]` in both coordinates.
pub fn prototype_bounds() -> Vec<(f64, f64)> {
    vec![(-3.0, 3.0), (-3.0, 3.0)]
}

/// Both constraints satisfied within `tol`. Reporting and test helper only;
/// the solvers see the constraints through their own encodings.
pub fn prototype_is_feasible(x: &Array1<f64>, tol: f64) -> bool {
    prototype_ball(x) <= BALL_MAX + tol && x[0] + x[1] >= SUM_MIN - tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_is_bit_identical_across_calls() {
        let x = Array1::from_vec(vec![0.1, 0.2]);
        let a = prototype_objective(&x);
        let b = prototype_objective(&x);
        assert_eq!(a, b);
    }

    #[test]
    fn gradient_matches_central_differences() {
        let h = 1e-6;
        for point in [[0.1, 0.2], [-2.5, 2.5], [1.0, 2.0], [0.7, -1.3]] {
            let x = Array1::from_vec(point.to_vec());
            let g = prototype_gradient(&x);
            for i in 0..2 {
                let mut xp = x.clone();
                let mut xm = x.clone();
                xp[i] += h;
                xm[i] -= h;
                let fd = (prototype_objective(&xp) - prototype_objective(&xm)) / (2.0 * h);
                assert!(
                    (g[i] - fd).abs() < 1e-6,
                    "gradient component {} at {:?}: analytic {} vs numeric {}",
                    i,
                    point,
                    g[i],
                    fd
                );
            }
        }
    }

    #[test]
    fn feasibility_edges() {
        // (1, 2) sits exactly on the ball boundary.
        let boundary = Array1::from_vec(vec![1.0, 2.0]);
        assert!(prototype_is_feasible(&boundary, 1e-12));

        // Ball violated.
        let outside = Array1::from_vec(vec![2.0, 2.0]);
        assert!(!prototype_is_feasible(&outside, 1e-6));

        // Half-plane violated.
        let below = Array1::from_vec(vec![0.0, 0.0]);
        assert!(!prototype_is_feasible(&below, 1e-6));

        // Tolerance admits slight violations.
        let slight = Array1::from_vec(vec![0.5, 0.5 - 1e-7]);
        assert!(prototype_is_feasible(&slight, 1e-5));
    }

    #[test]
    fn bounds_cover_the_feasible_region() {
        let b = prototype_bounds();
        assert_eq!(b.len(), 2);
        for (lo, hi) in b {
            assert!(lo < hi);
            assert!(hi * hi * 2.0 > BALL_MAX);
        }
    }
}
