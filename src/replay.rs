//! Input recordings and deterministic replay.
//!
//! A session is fully determined by its config (which carries the seed),
//! the landmark sample taken each frame and any canvas resizes, so that is
//! all a recording stores. Replaying re-simulates from frame 0.
//!
//! # Time Travel
//!
//! - **Forward**: step the simulation with the next recorded sample
//! - **Jump to frame N**: re-run from frame 0 to N

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::{Bounds, LandmarkFrame};
use crate::input::{LandmarkSource, ScriptedSource};
use crate::session::{FrameOutcome, Simulation};

/// Current recording format version.
///
/// Version 1 recordings carry no resize events and still load.
pub const RECORDING_VERSION: u32 = 2;

/// A canvas resize, applied once `frame` ticks have run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// Frames completed before the resize.
    pub frame: u64,
    /// New canvas width.
    pub width: f64,
    /// New canvas height.
    pub height: f64,
}

impl ResizeEvent {
    /// Resize to `bounds` after `frame` ticks.
    #[must_use]
    pub const fn new(frame: u64, bounds: Bounds) -> Self {
        Self {
            frame,
            width: bounds.width,
            height: bounds.height,
        }
    }

    /// The new canvas size.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

/// Config plus per-frame input samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Format version.
    pub version: u32,
    /// Config the session started from.
    pub config: GameConfig,
    /// Landmark sample for each frame, `None` when no hand was seen.
    pub frames: Vec<Option<LandmarkFrame>>,
    /// Canvas resizes in frame order.
    #[serde(default)]
    pub resizes: Vec<ResizeEvent>,
}

/// Failure to save or load a recording.
#[derive(Debug)]
pub enum RecordingError {
    /// File could not be opened, read or written.
    Io(io::Error),
    /// File is not a valid recording.
    Format(serde_json::Error),
    /// Recording was written by an incompatible version.
    UnsupportedVersion(u32),
    /// Recorded config cannot start a session.
    InvalidConfig(ConfigError),
}

impl std::fmt::Display for RecordingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "recording I/O failed: {e}"),
            Self::Format(e) => write!(f, "invalid recording: {e}"),
            Self::UnsupportedVersion(v) => write!(
                f,
                "recording version {v} is not supported (expected {RECORDING_VERSION})"
            ),
            Self::InvalidConfig(e) => write!(f, "recording has an invalid config: {e}"),
        }
    }
}

impl std::error::Error for RecordingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::InvalidConfig(e) => Some(e),
            Self::UnsupportedVersion(_) => None,
        }
    }
}

impl From<io::Error> for RecordingError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for RecordingError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

impl Recording {
    /// Wrap captured samples.
    #[must_use]
    pub const fn new(config: GameConfig, frames: Vec<Option<LandmarkFrame>>) -> Self {
        Self {
            version: RECORDING_VERSION,
            config,
            frames,
            resizes: Vec::new(),
        }
    }

    /// Attach the canvas resizes that happened while recording.
    #[must_use]
    pub fn with_resizes(mut self, mut resizes: Vec<ResizeEvent>) -> Self {
        resizes.sort_by_key(|r| r.frame);
        self.resizes = resizes;
        self
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Save as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RecordingError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Load from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a recording,
    /// has an unsupported version, or carries an invalid config.
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let reader = BufReader::new(File::open(path)?);
        let mut recording: Self = serde_json::from_reader(reader)?;
        if !(1..=RECORDING_VERSION).contains(&recording.version) {
            return Err(RecordingError::UnsupportedVersion(recording.version));
        }
        recording
            .config
            .validate()
            .map_err(RecordingError::InvalidConfig)?;
        recording.resizes.sort_by_key(|r| r.frame);
        Ok(recording)
    }
}

/// Steps through a recording deterministically.
#[derive(Debug)]
pub struct ReplayEngine {
    recording: Recording,
    sim: Simulation,
    source: ScriptedSource,
    next_resize: usize,
}

impl ReplayEngine {
    /// Start at frame 0.
    #[must_use]
    pub fn new(recording: Recording) -> Self {
        let sim = Simulation::new(&recording.config);
        let source = ScriptedSource::new(recording.frames.clone());
        let mut engine = Self {
            recording,
            sim,
            source,
            next_resize: 0,
        };
        engine.apply_resizes();
        engine
    }

    /// Simulation at the current frame.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Frames replayed so far.
    #[must_use]
    pub const fn current_frame(&self) -> u64 {
        self.sim.frame()
    }

    /// Total frames in the recording.
    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.recording.len() as u64
    }

    /// Whether the whole recording has been replayed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current_frame() >= self.total_frames()
    }

    /// Replay the next recorded frame. Returns `None` at the end.
    pub fn step_forward(&mut self) -> Option<FrameOutcome> {
        if self.is_finished() {
            return None;
        }
        let landmarks = self.source.latest();
        let outcome = self.sim.tick(landmarks.as_ref());
        self.apply_resizes();
        Some(outcome)
    }

    /// Apply every resize recorded at or before the current frame.
    fn apply_resizes(&mut self) {
        let frame = self.current_frame();
        while let Some(resize) = self.recording.resizes.get(self.next_resize) {
            if resize.frame > frame {
                break;
            }
            self.sim.resize(resize.bounds());
            self.next_resize += 1;
        }
    }

    /// Re-run from the start up to `frame` (clamped to the recording length).
    pub fn seek(&mut self, frame: u64) {
        let target = frame.min(self.total_frames());
        if target < self.current_frame() {
            self.sim = Simulation::new(&self.recording.config);
            self.source = ScriptedSource::new(self.recording.frames.clone());
            self.next_resize = 0;
            self.apply_resizes();
        }
        while self.current_frame() < target {
            if self.step_forward().is_none() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{RecordingSource, SweepSource};

    fn record(frames: usize) -> (Recording, Simulation) {
        let config = GameConfig {
            canvas_width: 640.0,
            canvas_height: 480.0,
            particles: 60,
            seed: 21,
            ..GameConfig::default()
        };
        let mut sim = Simulation::new(&config);
        let mut source = RecordingSource::new(SweepSource::new(config.bounds()));
        for _ in 0..frames {
            let landmarks = source.latest();
            sim.tick(landmarks.as_ref());
        }
        (Recording::new(config, source.into_frames()), sim)
    }

    #[test]
    fn test_replay_matches_live_session() {
        let (recording, live) = record(200);
        let mut engine = ReplayEngine::new(recording);
        while engine.step_forward().is_some() {}

        let replayed = engine.simulation();
        assert_eq!(replayed.frame(), 200);
        assert_eq!(replayed.particles(), live.particles());
        assert_eq!(replayed.monsters(), live.monsters());
        assert_eq!(replayed.state(), live.state());
    }

    #[test]
    fn test_save_load() {
        let (recording, _) = record(20);
        let file = tempfile::NamedTempFile::new().unwrap();
        recording.save(file.path()).unwrap();

        let loaded = Recording::load(file.path()).unwrap();
        assert_eq!(loaded, recording);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let (mut recording, _) = record(1);
        recording.version = 99;
        let file = tempfile::NamedTempFile::new().unwrap();
        recording.save(file.path()).unwrap();

        assert!(matches!(
            Recording::load(file.path()),
            Err(RecordingError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_replay_applies_recorded_resizes() {
        let config = GameConfig {
            canvas_width: 800.0,
            canvas_height: 600.0,
            particles: 60,
            seed: 5,
            ..GameConfig::default()
        };
        let small = Bounds::new(400.0, 300.0);
        let mut live = Simulation::new(&config);
        let mut source = RecordingSource::new(SweepSource::new(config.bounds()));
        let mut resizes = Vec::new();
        for _ in 0..200 {
            let landmarks = source.latest();
            live.tick(landmarks.as_ref());
            if live.frame() == 50 {
                live.resize(small);
                resizes.push(ResizeEvent::new(live.frame(), small));
            }
        }
        let recording = Recording::new(config, source.into_frames()).with_resizes(resizes);

        let file = tempfile::NamedTempFile::new().unwrap();
        recording.save(file.path()).unwrap();
        let mut engine = ReplayEngine::new(Recording::load(file.path()).unwrap());
        while engine.step_forward().is_some() {}

        let replayed = engine.simulation();
        assert_eq!(replayed.bounds(), small);
        assert_eq!(replayed.particles(), live.particles());
        assert_eq!(replayed.monsters(), live.monsters());
        assert_eq!(replayed.state(), live.state());

        // Seeking back across the resize restores the original canvas.
        engine.seek(10);
        assert_eq!(engine.simulation().bounds(), config.bounds());
        engine.seek(200);
        assert_eq!(engine.simulation().particles(), live.particles());
    }

    #[test]
    fn test_version_one_recording_loads() {
        let (mut recording, _) = record(5);
        recording.version = 1;
        let file = tempfile::NamedTempFile::new().unwrap();
        recording.save(file.path()).unwrap();

        let loaded = Recording::load(file.path()).unwrap();
        assert!(loaded.resizes.is_empty());
        assert_eq!(loaded.len(), 5);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{"version":2,"config":{"canvas_width":-5.0,"particles":0},"frames":[null]}"#,
        )
        .unwrap();

        let err = Recording::load(file.path()).unwrap_err();
        assert!(matches!(err, RecordingError::InvalidConfig(_)), "{err}");
    }

    #[test]
    fn test_seek_backward_and_forward() {
        let (recording, _) = record(50);
        let mut engine = ReplayEngine::new(recording);
        engine.seek(40);
        let at_40 = engine.simulation().particles().to_vec();

        engine.seek(10);
        assert_eq!(engine.current_frame(), 10);
        engine.seek(40);
        assert_eq!(engine.simulation().particles(), at_40.as_slice());

        engine.seek(1000);
        assert!(engine.is_finished());
    }
}
