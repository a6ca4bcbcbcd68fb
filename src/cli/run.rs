//! Run command implementation.

use super::output::format_summary_text;
use super::{CliError, OutputFormat, SessionArgs};
use handswarm::input::{read_landmark_file, RecordingSource, ScriptedSource, SweepSource};
use handswarm::render::render_ascii;
use handswarm::{run_headless, LandmarkSource, Recording, Simulation};
use std::path::PathBuf;

/// Character grid size for `--ascii`.
pub(super) const ASCII_COLS: usize = 80;
pub(super) const ASCII_ROWS: usize = 24;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config, landmark file or recording cannot be used.
pub(crate) fn execute(
    session: &SessionArgs,
    frames: u64,
    landmarks: Option<PathBuf>,
    format: OutputFormat,
    ascii: bool,
    save: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = session.resolve()?;

    let input: Box<dyn LandmarkSource> = match landmarks {
        Some(path) => Box::new(ScriptedSource::new(read_landmark_file(&path)?)),
        None => Box::new(SweepSource::new(config.bounds())),
    };
    let mut source = RecordingSource::new(input);

    let mut sim = Simulation::new(&config);
    let summary = run_headless(&mut sim, &mut source, frames);

    if let Some(save_path) = save {
        let recording = Recording::new(config, source.into_frames());
        recording.save(&save_path)?;
        log::info!("recording saved to {}", save_path.display());
    }

    match format {
        OutputFormat::Text => {
            print!("{}", format_summary_text(&summary));
            if ascii {
                println!();
                print!("{}", render_ascii(&sim.snapshot(), ASCII_COLS, ASCII_ROWS));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    if summary.invariant_violations > 0 {
        return Err(CliError::new(format!(
            "{} invariant violations detected",
            summary.invariant_violations
        )));
    }
    Ok(())
}
