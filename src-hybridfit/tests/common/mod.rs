//! Shared helpers for the HybridFit integration tests.

use ndarray::Array1;

/// Assert that every component of `x` lies within the `(lo, hi)` pairs.
pub fn assert_in_bounds(x: &Array1<f64>, pairs: &[(f64, f64)], tol: f64) {
    assert_eq!(x.len(), pairs.len());
    for (i, (xi, (lo, hi))) in x.iter().zip(pairs.iter()).enumerate() {
        assert!(
            *xi >= lo - tol && *xi <= hi + tol,
            "component {i} = {xi} outside [{lo}, {hi}]"
        );
    }
}
