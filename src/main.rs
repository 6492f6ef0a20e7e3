mod cli;
mod logging;

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tsp_anneal::{AnnealResult, Solver, StopCondition};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.log_level.to_filter(), cli.log_timestamp)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    let config = cli.validated_config(seed).unwrap_or_else(|e| e.exit());
    let points = cli
        .point_source()
        .load(&mut StdRng::seed_from_u64(seed))
        .context("failed to load points")?;
    info!("loaded {} points", points.len());

    let solver = Solver::new(points, config)?;

    let result = if cli.animate {
        animate(&solver)?
    } else {
        solver.run()?
    };

    if let Some(path) = &cli.output {
        tsp_anneal::points::write_tour(path, solver.points(), &result.best_tour)
            .with_context(|| format!("failed to write tour to {}", path.display()))?;
        info!("wrote best tour to {}", path.display());
    }

    println!("final distance: {}", result.best_length);
    Ok(())
}

/// Streams a frame line for every improvement of the best tour.
///
/// Without an iteration budget the run lasts until a line is entered on
/// stdin or stdin is closed.
fn animate(solver: &Solver) -> Result<AnnealResult> {
    let frames = solver.snapshots();
    let mut frames = if solver.config().stop == StopCondition::External {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            let mut line = String::new();
            let _ = io::stdin().lock().read_line(&mut line);
            flag.store(true, Ordering::Relaxed);
        });
        info!("running until stdin is closed or a line is entered");
        frames.with_cancel(cancel)
    } else {
        frames
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut shown = f64::INFINITY;
    for frame in frames.by_ref() {
        if frame.best_length < shown {
            shown = frame.best_length;
            let order: Vec<String> = frame.best_tour.iter().map(usize::to_string).collect();
            writeln!(
                out,
                "frame {} temperature={:.4} best={:.4} tour={}",
                frame.iteration,
                frame.temperature,
                frame.best_length,
                order.join("-")
            )?;
        }
    }
    out.flush()?;

    let result = frames.into_result();
    info!(
        "best length {:.6} after {} iterations ({} reheats)",
        result.best_length, result.iterations, result.reheats
    );
    Ok(result)
}
