//! Soak command implementation.

use super::output::{format_soak_csv, format_soak_text, JsonSoakResult, SoakStats};
use super::{CliError, SessionArgs, SoakFormat};
use handswarm::input::SweepSource;
use handswarm::{run_headless, GameConfig, Simulation};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the soak command.
///
/// Session `i` runs with seed `base + i`.
///
/// # Errors
///
/// Returns an error if the config is invalid or any session broke an invariant.
pub(crate) fn execute(
    session: &SessionArgs,
    sessions: u64,
    frames: u64,
    threads: Option<usize>,
    format: SoakFormat,
    progress: bool,
) -> Result<(), CliError> {
    let base = session.resolve()?;

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(sessions);
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions ({per_sec})",
            )
            .map_err(|e| CliError::new(e.to_string()))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats, merged at the end
    let mut stats = (0..sessions)
        .into_par_iter()
        .fold(SoakStats::default, |mut local, i| {
            let config = GameConfig {
                seed: base.seed.wrapping_add(i),
                ..base
            };
            let mut sim = Simulation::new(&config);
            let mut source = SweepSource::new(config.bounds());
            local.add_summary(&run_headless(&mut sim, &mut source, frames));
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SoakStats::default, |mut a, b| {
            a.merge(b);
            a
        });
    stats.finish();

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    #[allow(clippy::cast_precision_loss)]
    let frames_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.total_frames as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SoakFormat::Text => {
            println!();
            print!("{}", format_soak_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({:.0} frames/sec)",
                duration.as_secs_f64(),
                frames_per_sec
            );
        }
        SoakFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSoakResult::from_stats(&stats))?;
            println!("{json}");
        }
        SoakFormat::Csv => {
            print!("{}", format_soak_csv(&stats));
        }
    }

    if stats.invariant_violations > 0 {
        return Err(CliError::new(format!(
            "{} invariant violations across {} sessions",
            stats.invariant_violations, stats.sessions
        )));
    }
    Ok(())
}
