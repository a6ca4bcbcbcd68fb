//! Session configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Bounds;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1280.0;

/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 720.0;

/// Default swarm size.
pub const DEFAULT_PARTICLES: usize = 300;

/// Default frame rate for the real-time loop.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Everything needed to start a reproducible session.
///
/// Missing fields in a config file fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial canvas width in pixels.
    pub canvas_width: f64,
    /// Initial canvas height in pixels.
    pub canvas_height: f64,
    /// Swarm size, leader included.
    pub particles: usize,
    /// Seed for every random draw in the session.
    pub seed: u64,
    /// Frame rate the real-time scheduler aims for.
    pub target_fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            particles: DEFAULT_PARTICLES,
            seed: 0,
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails [`GameConfig::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config describes a playable session.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.canvas_width) || !positive(self.canvas_height) {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if self.particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        Ok(())
    }

    /// Initial canvas bounds.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.canvas_width, self.canvas_height)
    }
}
