//! Logistic growth model and synthetic observation generator
//!
//! The fit pipeline estimates the three parameters of a logistic curve
//! (amplitude `l`, growth rate `k`, midpoint `t0`) from noisy observations by
//! minimizing the sum of squared residuals.

use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

/// Time span covered by the synthetic observation grid.
pub const T_SPAN: (f64, f64) = (0.0, 25.0);

/// Logistic growth curve evaluated over a grid of time points:
/// `l / (1 + exp(-k * (t - t0)))`.
///
/// Total for finite inputs; extreme `k`/`t0` combinations saturate through
/// the exponential rather than erroring, and callers are expected to tolerate
/// the resulting values.
pub fn logistic(t: &Array1<f64>, l: f64, k: f64, t0: f64) -> Array1<f64> {
    t.mapv(|ti| l / (1.0 + (-k * (ti - t0)).exp()))
}

/// Sum of squared residuals between observations `y` and the logistic model
/// with parameters `theta = [l, k, t0]` on the grid `t`.
///
/// This is the objective for both stages of the fit pipeline.
pub fn logistic_sse(theta: &Array1<f64>, t: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let yhat = logistic(t, theta[0], theta[1], theta[2]);
    y.iter()
        .zip(yhat.iter())
        .map(|(yi, yh)| (yi - yh) * (yi - yh))
        .sum()
}

/// Search box for the fit: `l` in [0, 200], `k` in [0, 2], `t0` in [-5, 40].
pub fn logistic_bounds() -> Vec<(f64, f64)> {
    vec![(0.0, 200.0), (0.0, 2.0), (-5.0, 40.0)]
}

/// Noisy observations of a known logistic curve, plus the generating
/// parameters kept for later accuracy comparison.
#[derive(Debug, Clone, Serialize)]
pub struct SyntheticDataset {
    /// Evenly spaced time points over [`T_SPAN`].
    pub t: Array1<f64>,
    /// Clean logistic values with additive Gaussian noise.
    pub y: Array1<f64>,
    /// Parameters `(l, k, t0)` the data was generated from.
    pub true_params: (f64, f64, f64),
}

/// Generate a synthetic dataset of `n` observations.
///
/// Deterministic per `(n, seed, true_params, noise_std)`: the noise comes
/// from a `StdRng` seeded with `seed`, so identical arguments always yield
/// the identical dataset.
pub fn make_synthetic_data(
    n: usize,
    seed: u64,
    true_params: (f64, f64, f64),
    noise_std: f64,
) -> SyntheticDataset {
    let (l, k, t0) = true_params;
    let t = Array1::linspace(T_SPAN.0, T_SPAN.1, n);
    let clean = logistic(&t, l, k, t0);

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_std).expect("noise_std must be finite and non-negative");
    let y = clean.mapv(|v| v + noise.sample(&mut rng));

    SyntheticDataset { t, y, true_params }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_is_half_amplitude_at_midpoint() {
        let t = Array1::from_vec(vec![12.0]);
        let v = logistic(&t, 100.0, 0.35, 12.0);
        assert!((v[0] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn logistic_saturates_at_amplitude() {
        let t = Array1::from_vec(vec![1e3]);
        let v = logistic(&t, 100.0, 0.35, 12.0);
        assert!((v[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sse_is_zero_on_clean_data() {
        let t = Array1::linspace(0.0, 25.0, 40);
        let y = logistic(&t, 100.0, 0.35, 12.0);
        let theta = Array1::from_vec(vec![100.0, 0.35, 12.0]);
        assert!(logistic_sse(&theta, &t, &y) < 1e-18);
    }

    #[test]
    fn sse_is_nonnegative_and_deterministic() {
        let data = make_synthetic_data(30, 7, (100.0, 0.35, 12.0), 2.0);
        let theta = Array1::from_vec(vec![80.0, 0.2, 10.0]);
        let a = logistic_sse(&theta, &data.t, &data.y);
        let b = logistic_sse(&theta, &data.t, &data.y);
        assert!(a >= 0.0);
        assert_eq!(a, b);
    }

    #[test]
    fn synthetic_data_is_reproducible_per_seed() {
        let a = make_synthetic_data(60, 123, (100.0, 0.35, 12.0), 1.0);
        let b = make_synthetic_data(60, 123, (100.0, 0.35, 12.0), 1.0);
        assert_eq!(a.t, b.t);
        assert_eq!(a.y, b.y);

        let c = make_synthetic_data(60, 124, (100.0, 0.35, 12.0), 1.0);
        assert_ne!(a.y, c.y);
    }

    #[test]
    fn synthetic_data_has_expected_shape() {
        let data = make_synthetic_data(60, 0, (100.0, 0.35, 12.0), 2.0);
        assert_eq!(data.t.len(), 60);
        assert_eq!(data.y.len(), 60);
        assert_eq!(data.t[0], 0.0);
        assert!((data.t[59] - 25.0).abs() < 1e-9);
        assert_eq!(data.true_params, (100.0, 0.35, 12.0));
    }

    #[test]
    fn zero_noise_reproduces_the_clean_curve() {
        let data = make_synthetic_data(25, 5, (100.0, 0.35, 12.0), 0.0);
        let clean = logistic(&data.t, 100.0, 0.35, 12.0);
        assert_eq!(data.y, clean);
    }
}
