//! Replay command implementation.

use super::output::format_summary_text;
use super::run::{ASCII_COLS, ASCII_ROWS};
use super::{CliError, OutputFormat};
use handswarm::render::render_ascii;
use handswarm::{Recording, ReplayEngine, SessionSummary};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded.
pub(crate) fn execute(
    recording: &Path,
    format: OutputFormat,
    frame: Option<u64>,
    ascii: bool,
) -> Result<(), CliError> {
    let recording = Recording::load(recording)?;
    let mut engine = ReplayEngine::new(recording);
    let stop = frame.map_or(engine.total_frames(), |f| f.min(engine.total_frames()));

    let mut summary = SessionSummary::default();
    while engine.current_frame() < stop {
        let Some(outcome) = engine.step_forward() else {
            break;
        };
        summary.record(engine.simulation(), &outcome);
    }
    let summary = summary.finish(engine.simulation());

    match format {
        OutputFormat::Text => {
            print!("{}", format_summary_text(&summary));
            if ascii {
                println!();
                print!(
                    "{}",
                    render_ascii(&engine.simulation().snapshot(), ASCII_COLS, ASCII_ROWS)
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
