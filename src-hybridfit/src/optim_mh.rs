// Metaheuristics-specific global search code

use std::sync::Arc;

use ndarray::Array1;

use metaheuristics_nature as mh;
use mh::methods::De as MhDe;
use mh::{Bounded as MhBounded, ObjFunc as MhObjFunc, Solver as MhSolver};

use super::constraints::{Constraint, constraint_violation};
use super::optim::{Bounds, SolveResult};

/// Shared objective type for the global stage.
pub type GlobalObjective = Arc<dyn Fn(&Array1<f64>) -> f64 + Send + Sync>;

/// Configuration of the differential-evolution stage.
///
/// All randomness flows from `seed`; there is no ambient RNG anywhere in the
/// pipeline. The backend terminates on the generation budget.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    /// Seed for the population sampler.
    pub seed: u64,
    /// Generation cap; the search always terminates.
    pub max_generations: usize,
    /// Population size (a handful of members minimum for DE mutation).
    pub population_size: usize,
    /// Weight of the quadratic constraint penalty.
    pub penalty_weight: f64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_generations: 400,
            population_size: 20,
            penalty_weight: 1e4,
        }
    }
}

/// Objective seen by the DE population: the true objective plus a quadratic
/// penalty per violated constraint. Infeasible members stay in the
/// population with an inflated fitness instead of being rejected.
struct PenalizedObjective {
    fun: GlobalObjective,
    constraints: Vec<Constraint>,
    weight: f64,
    bounds: Vec<[f64; 2]>,
}

impl MhBounded for PenalizedObjective {
    fn bound(&self) -> &[[f64; 2]] {
        self.bounds.as_slice()
    }
}

impl MhObjFunc for PenalizedObjective {
    type Ys = f64;
    fn fitness(&self, xs: &[f64]) -> Self::Ys {
        let x = Array1::from_vec(xs.to_vec());
        let mut f = (self.fun)(&x);
        for c in &self.constraints {
            let viol = constraint_violation(c, &x);
            if viol > 0.0 {
                f += self.weight * viol * viol;
            }
        }
        f
    }
}

/// Run the global differential-evolution stage over the box.
///
/// Constraints, when present, are folded into the population fitness as
/// penalties; the reported `fun` is always the unpenalized true objective at
/// the returned point. No gradient, no trajectory, and no built-in polishing:
/// refinement belongs exclusively to the orchestrator's local stage.
pub fn solve_global(
    objective: GlobalObjective,
    bounds: &Bounds,
    constraints: &[Constraint],
    cfg: &GlobalConfig,
) -> SolveResult {
    let penalized = !constraints.is_empty();
    let obj = PenalizedObjective {
        fun: objective.clone(),
        constraints: constraints.to_vec(),
        weight: cfg.penalty_weight,
        bounds: bounds.to_pairs(),
    };

    // DE mutation draws several distinct members per candidate.
    let pop = cfg.population_size.max(5);
    let gens = cfg.max_generations.max(1);

    // Count down generations in the task closure; the context's generation
    // field is a reserved identifier in edition 2024.
    let mut left = gens as i64;
    let solver = MhSolver::build_boxed(MhDe::default(), obj)
        .seed(cfg.seed)
        .pop_num(pop)
        .task(move |_| {
            left -= 1;
            left <= 0
        })
        .solve();

    let best_x = Array1::from_vec(solver.as_best_xs().to_vec());
    // Report the true objective, never the penalized fitness.
    let fun = objective(&best_x);

    SolveResult {
        method: if penalized {
            "mh:de(penalized)".to_string()
        } else {
            "mh:de".to_string()
        },
        x: best_x,
        fun,
        success: true,
        message: format!("completed {} generations with population {}", gens, pop),
        path: None,
    }
}
