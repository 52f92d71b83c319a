// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Command line driver: loads an instance file, solves it with the parallel
//! branch-and-bound solver and prints the best cost.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use srflp_bnb::{eval::ordinal::OrdinalDistanceEvaluator, parallel::SolverBuilder};
use srflp_model::loading::ProblemLoader;
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Exact solver for the Single Row Facility Layout Problem",
    long_about = None
)]
struct Cli {
    /// Instance file: facility count, widths, then the weight matrix
    #[arg(value_name = "INSTANCE")]
    instance: PathBuf,

    /// Stop after this many seconds and report the best layout so far
    #[arg(long, value_name = "SECS")]
    time_limit: Option<f64>,

    /// Stop after this many improving solutions
    #[arg(long, value_name = "N")]
    solution_limit: Option<u64>,

    /// Mirror the upper triangle of the matrix into the lower one
    #[arg(long)]
    symmetrize: bool,

    /// Print the best layout
    #[arg(long)]
    show_layout: bool,

    /// Print search statistics
    #[arg(long)]
    stats: bool,

    /// Log progress of every branch at this interval in seconds
    #[arg(long, value_name = "SECS")]
    log_interval: Option<f64>,
}

fn seconds(flag: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("--{} must be a non-negative number of seconds, got {}", flag, value))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let model = ProblemLoader::<i64>::new()
        .symmetrize(cli.symmetrize)
        .from_path(&cli.instance)
        .with_context(|| format!("failed to load instance {}", cli.instance.display()))?;
    info!("loaded {}", cli.instance.display());

    if !model.is_symmetric() {
        warn!("weight matrix is not symmetric; costs use w[left][right] only (see --symmetrize)");
    }

    let mut builder = SolverBuilder::<i64>::new();
    if let Some(secs) = cli.time_limit {
        builder = builder.with_time_limit(seconds("time-limit", secs)?);
    }
    if let Some(limit) = cli.solution_limit {
        builder = builder.with_solution_limit(limit);
    }
    if let Some(secs) = cli.log_interval {
        builder = builder.with_log_interval(seconds("log-interval", secs)?);
    }
    let solver = builder.build();

    let outcome = solver.solve(&model, &OrdinalDistanceEvaluator);
    let solution = outcome
        .solution()
        .context("the search stopped before any complete layout was found")?;

    if !outcome.is_optimal() {
        warn!("search stopped early ({}); the cost below is not proven optimal", outcome.reason);
    }

    println!("Best cost: {}", solution.objective_value());
    if cli.show_layout {
        println!();
        println!("{}", solution);
    }
    if cli.stats {
        println!();
        println!("{}", outcome.statistics);
    }

    Ok(())
}
