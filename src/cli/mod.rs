//! CLI command implementations for handswarm.

pub(crate) mod play;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod soak;

mod output;

use clap::{Args, ValueEnum};
use handswarm::{ConfigError, GameConfig, LandmarkError, RecordingError};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `soak` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SoakFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Session settings shared by every command that starts a session.
#[derive(Debug, Clone, Args)]
pub(crate) struct SessionArgs {
    /// JSON config file (fields not given fall back to defaults)
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Random seed (default: from config, or random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Swarm size, leader included
    #[arg(short, long)]
    pub(crate) particles: Option<usize>,

    /// Canvas width in pixels
    #[arg(long)]
    pub(crate) width: Option<f64>,

    /// Canvas height in pixels
    #[arg(long)]
    pub(crate) height: Option<f64>,

    /// Target frames per second
    #[arg(long)]
    pub(crate) fps: Option<u32>,
}

impl SessionArgs {
    /// Build the session config: file (or defaults), then flag overrides.
    ///
    /// Without a config file or `--seed`, the seed is taken from the clock.
    pub(crate) fn resolve(&self) -> Result<GameConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig {
                seed: clock_seed(),
                ..GameConfig::default()
            },
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(particles) = self.particles {
            config.particles = particles;
        }
        if let Some(width) = self.width {
            config.canvas_width = width;
        }
        if let Some(height) = self.height {
            config.canvas_height = height;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Seed derived from the system clock.
pub(crate) fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(42)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<LandmarkError> for CliError {
    fn from(e: LandmarkError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<RecordingError> for CliError {
    fn from(e: RecordingError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
