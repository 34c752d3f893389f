//! Shared pipeline steps used by the HybridFit binaries
//!
//! This module wires the two stages together: a seeded global search over
//! the box, then local refinement from the global candidate with the true
//! objective, gradient and constraints. Both stage results are returned so a
//! caller can inspect the improvement delta; nothing is merged.

use std::sync::Arc;

use ndarray::Array1;

use hybridfit_problems::logistic::{logistic_bounds, logistic_sse};
use hybridfit_problems::prototype::{prototype_bounds, prototype_gradient, prototype_objective};

use super::constraints::{Constraint, prototype_constraints};
use super::optim::{Bounds, FitError, LocalMethod, SolveResult};
use super::optim_mh::{GlobalConfig, GlobalObjective, solve_global};
use super::optim_nlopt::solve_local;

/// Evaluation cap for the local stage of the logistic fit.
pub const LOGISTIC_LOCAL_MAXEVAL: usize = 2000;
/// Generation cap for the global stage of the logistic fit.
pub const LOGISTIC_GLOBAL_GENERATIONS: usize = 600;
/// Evaluation cap for the local stage of the prototype problem.
pub const PROTOTYPE_LOCAL_MAXEVAL: usize = 500;
/// Generation cap for the global stage of the prototype problem.
pub const PROTOTYPE_GLOBAL_GENERATIONS: usize = 400;

/// Run the fixed two-stage pipeline: global search, then local refinement
/// seeded at the global candidate.
///
/// The refinement runs on the true (unpenalized) objective with the real
/// constraint set, and its method tag gets a `" (refine)"` suffix so reports
/// can tell it apart from a cold-start local run.
pub fn global_then_local(
    objective: GlobalObjective,
    gradient: Option<&dyn Fn(&Array1<f64>) -> Array1<f64>>,
    bounds: &Bounds,
    constraints: &[Constraint],
    global_cfg: &GlobalConfig,
    refine_method: LocalMethod,
    refine_maxeval: usize,
) -> Result<(SolveResult, SolveResult), FitError> {
    let global = solve_global(objective.clone(), bounds, constraints, global_cfg);
    let mut refined = solve_local(
        &*objective,
        gradient,
        &global.x,
        bounds,
        constraints,
        refine_method,
        refine_maxeval,
    )?;
    refined.method.push_str(" (refine)");
    Ok((global, refined))
}

/// Cold-start bounded quasi-Newton fit of the logistic model.
pub fn fit_logistic_local(
    t: &Array1<f64>,
    y: &Array1<f64>,
    x0: &Array1<f64>,
    maxeval: usize,
) -> Result<SolveResult, FitError> {
    let bounds = Bounds::from_pairs(&logistic_bounds())?;
    let (tc, yc) = (t.clone(), y.clone());
    let obj = move |theta: &Array1<f64>| logistic_sse(theta, &tc, &yc);
    solve_local(&obj, None, x0, &bounds, &[], LocalMethod::Lbfgs, maxeval)
}

/// Logistic fit, global stage then quasi-Newton refinement, with an explicit
/// global configuration.
pub fn fit_logistic_hybrid_with(
    t: &Array1<f64>,
    y: &Array1<f64>,
    cfg: &GlobalConfig,
) -> Result<(SolveResult, SolveResult), FitError> {
    let bounds = Bounds::from_pairs(&logistic_bounds())?;
    let (tc, yc) = (t.clone(), y.clone());
    let obj: GlobalObjective = Arc::new(move |theta: &Array1<f64>| logistic_sse(theta, &tc, &yc));
    global_then_local(
        obj,
        None,
        &bounds,
        &[],
        cfg,
        LocalMethod::Lbfgs,
        LOGISTIC_LOCAL_MAXEVAL,
    )
}

/// Logistic fit with the pipeline defaults and the given seed.
pub fn fit_logistic_hybrid(
    t: &Array1<f64>,
    y: &Array1<f64>,
    seed: u64,
) -> Result<(SolveResult, SolveResult), FitError> {
    let cfg = GlobalConfig {
        seed,
        max_generations: LOGISTIC_GLOBAL_GENERATIONS,
        ..GlobalConfig::default()
    };
    fit_logistic_hybrid_with(t, y, &cfg)
}

/// Cold-start constrained local solve of the prototype problem under the
/// given method; the constraint encoding follows the method's capabilities.
pub fn solve_prototype_local(
    x0: &Array1<f64>,
    method: LocalMethod,
    maxeval: usize,
) -> Result<SolveResult, FitError> {
    let bounds = Bounds::from_pairs(&prototype_bounds())?;
    let cons = prototype_constraints();
    let grad = |x: &Array1<f64>| prototype_gradient(x);
    solve_local(
        &prototype_objective,
        Some(&grad),
        x0,
        &bounds,
        &cons,
        method,
        maxeval,
    )
}

/// Prototype problem, penalized global stage then constrained trust-region
/// refinement, with an explicit global configuration.
pub fn solve_prototype_hybrid_with(
    cfg: &GlobalConfig,
) -> Result<(SolveResult, SolveResult), FitError> {
    let bounds = Bounds::from_pairs(&prototype_bounds())?;
    let cons = prototype_constraints();
    let obj: GlobalObjective = Arc::new(|x: &Array1<f64>| prototype_objective(x));
    global_then_local(
        obj,
        None,
        &bounds,
        &cons,
        cfg,
        LocalMethod::Cobyla,
        PROTOTYPE_LOCAL_MAXEVAL,
    )
}

/// Prototype problem with the pipeline defaults and the given seed.
pub fn solve_prototype_hybrid(seed: u64) -> Result<(SolveResult, SolveResult), FitError> {
    let cfg = GlobalConfig {
        seed,
        max_generations: PROTOTYPE_GLOBAL_GENERATIONS,
        ..GlobalConfig::default()
    };
    solve_prototype_hybrid_with(&cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refined_method_is_tagged() {
        let (_global, refined) = solve_prototype_hybrid(0).unwrap();
        assert!(refined.method.ends_with(" (refine)"));
    }

    #[test]
    fn logistic_helpers_share_the_documented_bounds() {
        let b = Bounds::from_pairs(&logistic_bounds()).unwrap();
        assert_eq!(b.len(), 3);
        assert_eq!(b.lower()[2], -5.0);
        assert_eq!(b.upper()[0], 200.0);
    }
}
