// Constrained non-convex 2D minimization: per-method cold starts, then
// penalized global search -> constrained local refinement.

use std::error::Error;

use clap::Parser;
use ndarray::Array1;
use serde::Serialize;

use hybridfit::cli::SearchArgs;
use hybridfit::workflow::{
    PROTOTYPE_GLOBAL_GENERATIONS, PROTOTYPE_LOCAL_MAXEVAL, solve_prototype_hybrid_with,
    solve_prototype_local,
};
use hybridfit::{LocalMethod, SolveResult};
use hybridfit_problems::prototype::prototype_is_feasible;

#[derive(Parser, Debug)]
#[command(author, about = "Minimize a non-convex 2D objective under nonlinear and linear constraints", long_about = None)]
struct Args {
    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Serialize)]
struct Report {
    cold_starts: Vec<SolveResult>,
    global: SolveResult,
    refined: SolveResult,
}

fn format_x(x: &Array1<f64>) -> String {
    format!("[{:8.4}, {:8.4}]", x[0], x[1])
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let starts = [
        Array1::from_vec(vec![-2.5, 2.5]),
        Array1::from_vec(vec![2.5, -1.0]),
        Array1::from_vec(vec![0.2, 0.9]),
    ];
    let methods = [LocalMethod::Slsqp, LocalMethod::Cobyla];

    let mut locals = Vec::new();
    println!("=== Constrained 2D prototype (non-convex) ===");
    for x0 in &starts {
        for method in methods {
            let r = solve_prototype_local(x0, method, PROTOTYPE_LOCAL_MAXEVAL)?;
            if !args.search.json {
                println!(
                    "{:12} x0={} -> x={}, f={:9.6}, feas={}, ok={}",
                    r.method,
                    format_x(x0),
                    format_x(&r.x),
                    r.fun,
                    prototype_is_feasible(&r.x, 1e-6),
                    r.success
                );
            }
            locals.push(r);
        }
    }

    let cfg = args.search.to_global_config(PROTOTYPE_GLOBAL_GENERATIONS);
    let (global, refined) = solve_prototype_hybrid_with(&cfg)?;

    if args.search.json {
        let report = Report {
            cold_starts: locals,
            global,
            refined,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== Global -> Local ===");
    println!(
        "{:24} x={}, f={:9.6}, feas={}, ok={}",
        global.method,
        format_x(&global.x),
        global.fun,
        prototype_is_feasible(&global.x, 1e-6),
        global.success
    );
    println!(
        "{:24} x={}, f={:9.6}, feas={}, ok={}",
        refined.method,
        format_x(&refined.x),
        refined.fun,
        prototype_is_feasible(&refined.x, 1e-6),
        refined.success
    );

    Ok(())
}
