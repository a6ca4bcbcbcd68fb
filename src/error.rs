//! Error types for configuration and landmark input.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to load or validate a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The config file is not valid JSON for a config.
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Canvas width or height is not a positive finite number.
    InvalidCanvas {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The swarm must have at least one particle.
    NoParticles,
    /// Target frame rate must be positive.
    ZeroFps,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            Self::InvalidCanvas { width, height } => {
                write!(f, "canvas must be positive, got {width}x{height}")
            }
            Self::NoParticles => write!(f, "swarm needs at least one particle"),
            Self::ZeroFps => write!(f, "target fps must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure to decode one landmark record or open a landmark stream.
#[derive(Debug)]
pub enum LandmarkError {
    /// The stream could not be opened or read.
    Io(io::Error),
    /// A line was not a valid landmark record.
    Malformed(serde_json::Error),
    /// A detection carried the wrong number of keypoints.
    WrongCount(usize),
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "landmark stream error: {e}"),
            Self::Malformed(e) => write!(f, "malformed landmark record: {e}"),
            Self::WrongCount(n) => write!(
                f,
                "expected {} landmarks, got {n}",
                crate::game::LANDMARK_COUNT
            ),
        }
    }
}

impl std::error::Error for LandmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Malformed(e) => Some(e),
            Self::WrongCount(_) => None,
        }
    }
}

impl From<io::Error> for LandmarkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LandmarkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let e = ConfigError::InvalidCanvas {
            width: 0.0,
            height: 720.0,
        };
        assert!(e.to_string().contains("0x720"));
        assert!(ConfigError::NoParticles.to_string().contains("particle"));
    }

    #[test]
    fn test_wrong_count_display() {
        let e = LandmarkError::WrongCount(20);
        assert_eq!(e.to_string(), "expected 21 landmarks, got 20");
    }
}
