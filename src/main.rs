//! handswarm CLI - play, run, replay and soak-test swarm sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// handswarm - steer a particle swarm with hand gestures
#[derive(Parser, Debug)]
#[command(name = "handswarm")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal
    Play {
        #[command(flatten)]
        session: cli::SessionArgs,

        /// JSON-lines landmark stream ("-" for stdin; default: mouse hand)
        #[arg(short, long)]
        landmarks: Option<std::path::PathBuf>,

        /// Save a recording of the session to file
        #[arg(long)]
        record: Option<std::path::PathBuf>,
    },

    /// Run a headless session and print a summary
    Run {
        #[command(flatten)]
        session: cli::SessionArgs,

        /// Frames to simulate (default: 3600)
        #[arg(short = 'n', long, default_value = "3600")]
        frames: u64,

        /// JSON-lines landmark file (default: synthetic sweep)
        #[arg(short, long)]
        landmarks: Option<std::path::PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print the final frame as ASCII art
        #[arg(long)]
        ascii: bool,

        /// Save recording to file
        #[arg(long)]
        save: Option<std::path::PathBuf>,
    },

    /// Replay a recorded session
    Replay {
        /// Recording file
        #[arg(required = true)]
        recording: std::path::PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Stop at a specific frame
        #[arg(long)]
        frame: Option<u64>,

        /// Print the last replayed frame as ASCII art
        #[arg(long)]
        ascii: bool,
    },

    /// Run many seeded sessions in parallel and check invariants
    Soak {
        #[command(flatten)]
        session: cli::SessionArgs,

        /// Number of sessions (default: 100)
        #[arg(long, default_value = "100")]
        sessions: u64,

        /// Frames per session (default: 3600)
        #[arg(short = 'n', long, default_value = "3600")]
        frames: u64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SoakFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_default_env().try_init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Play {
            session,
            landmarks,
            record,
        } => cli::play::execute(&session, landmarks, record),

        Commands::Run {
            session,
            frames,
            landmarks,
            format,
            ascii,
            save,
        } => cli::run::execute(&session, frames, landmarks, format, ascii, save),

        Commands::Replay {
            recording,
            format,
            frame,
            ascii,
        } => cli::replay::execute(&recording, format, frame, ascii),

        Commands::Soak {
            session,
            sessions,
            frames,
            threads,
            format,
            progress,
        } => cli::soak::execute(&session, sessions, frames, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
