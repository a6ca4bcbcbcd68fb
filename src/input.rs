//! Landmark input sources.
//!
//! The frame loop never waits on a detector. Each tick it asks its
//! [`LandmarkSource`] for the most recent hand detection; whatever arrived
//! in between is collapsed to the newest value.
//!
//! Sources:
//! - [`ChannelSource`]: fed by another thread, e.g. [`spawn_json_lines`]
//! - [`SweepSource`]: deterministic autopilot built from synthetic hands
//! - [`ScriptedSource`]: one pre-recorded frame per tick
//! - [`RecordingSource`]: wraps another source and keeps what it sampled

mod channel;
mod scripted;
mod synthetic;

pub use channel::{parse_line, spawn_json_lines, ChannelSource, LandmarkSender};
pub use scripted::{read_landmark_file, RecordingSource, ScriptedSource};
pub use synthetic::{synthesize, HandPose, SweepSource};

use crate::game::LandmarkFrame;

/// Something the frame loop can sample for the latest hand detection.
pub trait LandmarkSource {
    /// Latest detection, or `None` when no hand is visible.
    fn latest(&mut self) -> Option<LandmarkFrame>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn latest(&mut self) -> Option<LandmarkFrame> {
        (**self).latest()
    }
}

/// A source that never sees a hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHand;

impl LandmarkSource for NoHand {
    fn latest(&mut self) -> Option<LandmarkFrame> {
        None
    }
}
