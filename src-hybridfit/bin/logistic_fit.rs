// Logistic growth fitting: cold-start local fits, then global -> local.

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use ndarray::Array1;
use serde::Serialize;

use hybridfit::cli::{SearchArgs, parse_nonnegative_f64};
use hybridfit::workflow::{
    LOGISTIC_GLOBAL_GENERATIONS, LOGISTIC_LOCAL_MAXEVAL, fit_logistic_hybrid_with,
    fit_logistic_local,
};
use hybridfit::SolveResult;
use hybridfit_problems::logistic::make_synthetic_data;

#[derive(Parser, Debug)]
#[command(author, about = "Fit a logistic growth curve by nonlinear least squares", long_about = None)]
struct Args {
    /// Number of synthetic observations.
    #[arg(short = 'n', long, default_value_t = 60)]
    n: usize,

    /// Standard deviation of the synthetic Gaussian noise.
    #[arg(long, default_value_t = 2.0, value_parser = parse_nonnegative_f64)]
    noise_std: f64,

    /// Optional observed-data file (rows `t,y`); replaces the synthetic data.
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Serialize)]
struct Report {
    true_params: Option<(f64, f64, f64)>,
    cold_starts: Vec<SolveResult>,
    global: SolveResult,
    refined: SolveResult,
}

/// Load observed (t, y) rows from a CSV or text file.
fn read_observations(path: &PathBuf) -> Result<(Array1<f64>, Array1<f64>), Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut t = Vec::new();
    let mut y = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        // Skip header if it contains text
        if line_num == 0 && line.chars().any(|c| c.is_alphabetic()) {
            continue;
        }

        // Parse line (handle both comma and whitespace separation)
        let parts: Vec<&str> = if line.contains(',') {
            line.split(',').map(|s| s.trim()).collect()
        } else {
            line.split_whitespace().collect()
        };

        if parts.len() >= 2 {
            if let (Ok(ti), Ok(yi)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) {
                t.push(ti);
                y.push(yi);
            }
        }
    }

    if t.is_empty() {
        return Err("No valid observations found in file".into());
    }

    Ok((Array1::from_vec(t), Array1::from_vec(y)))
}

fn format_theta(x: &Array1<f64>) -> String {
    format!("[{:8.3}, {:7.4}, {:7.3}]", x[0], x[1], x[2])
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let (t, y, true_params) = if let Some(ref path) = args.data {
        let (t, y) = read_observations(path)?;
        (t, y, None)
    } else {
        let data = make_synthetic_data(args.n, args.search.seed, (100.0, 0.35, 12.0), args.noise_std);
        (data.t, data.y, Some(data.true_params))
    };

    let cold_starts = [
        Array1::from_vec(vec![60.0, 0.05, 5.0]),
        Array1::from_vec(vec![150.0, 1.2, 18.0]),
        Array1::from_vec(vec![90.0, 0.3, 10.0]),
    ];

    let mut locals = Vec::new();
    for x0 in &cold_starts {
        locals.push(fit_logistic_local(&t, &y, x0, LOGISTIC_LOCAL_MAXEVAL)?);
    }

    let cfg = args.search.to_global_config(LOGISTIC_GLOBAL_GENERATIONS);
    let (global, refined) = fit_logistic_hybrid_with(&t, &y, &cfg)?;

    if args.search.json {
        let report = Report {
            true_params,
            cold_starts: locals,
            global,
            refined,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=== Logistic fit (nonlinear least squares) ===");
    if let Some((l, k, t0)) = true_params {
        println!("True parameters: L={l}, k={k}, t0={t0}");
    }
    for (x0, r) in cold_starts.iter().zip(locals.iter()) {
        println!(
            "{:12} x0={} -> theta={}, SSE={:10.3}, ok={}",
            r.method,
            format_theta(x0),
            format_theta(&r.x),
            r.fun,
            r.success
        );
    }

    println!("\n=== Global -> Local ===");
    println!(
        "{:24} theta={}, SSE={:10.3}, ok={}",
        global.method,
        format_theta(&global.x),
        global.fun,
        global.success
    );
    println!(
        "{:24} theta={}, SSE={:10.3}, ok={}",
        refined.method,
        format_theta(&refined.x),
        refined.fun,
        refined.success
    );

    Ok(())
}
