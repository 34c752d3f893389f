//! HybridFit - Two-stage global/local nonlinear optimization
//! Common command-line interface definitions shared across binaries
//!
//! Copyright (C) 2025 Pierre Aubert pierre(at)spinorama(dot)org
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::optim_mh::GlobalConfig;

/// Shared search options for the HybridFit binaries.
#[derive(clap::Args, Debug, Clone)]
pub struct SearchArgs {
    /// Random seed for the global search stage.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Population size for the differential evolution stage.
    #[arg(long, default_value_t = 20)]
    pub population: usize,

    /// Maximum number of generations for the differential evolution stage.
    /// Defaults to the per-pipeline cap when omitted.
    #[arg(long)]
    pub max_generations: Option<usize>,

    /// Emit the report as JSON instead of the text table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl SearchArgs {
    /// Resolve into a global-stage configuration, with `default_generations`
    /// as the pipeline cap when none was given on the command line.
    pub fn to_global_config(&self, default_generations: usize) -> GlobalConfig {
        GlobalConfig {
            seed: self.seed,
            max_generations: self.max_generations.unwrap_or(default_generations),
            population_size: self.population,
            ..GlobalConfig::default()
        }
    }
}

// Custom value parser to enforce non-negative f64 (>= 0)
pub fn parse_nonnegative_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("invalid float: {s}"))?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err("value must be non-negative (>= 0)".to_string())
    }
}
