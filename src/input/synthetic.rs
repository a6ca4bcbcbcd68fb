//! Synthetic hands for keyboard/mouse play and the headless autopilot.

use std::f64::consts::TAU;

use crate::game::{Bounds, Landmark, LandmarkFrame, Vec2, LANDMARK_COUNT};
use crate::input::LandmarkSource;

/// A hand shape the synthesizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandPose {
    /// Index and middle fingertips touching. Classifies as gather.
    Pinch,
    /// All four fingers extended. Classifies as scatter.
    Open,
    /// Fingers curled and apart. Classifies as free.
    Relaxed,
}

impl HandPose {
    /// Keypoint offsets in pixels, y up the screen is negative.
    const fn offsets(self) -> [(f64, f64); LANDMARK_COUNT] {
        match self {
            Self::Pinch => [
                (0.0, 70.0),
                (-25.0, 55.0),
                (-45.0, 40.0),
                (-60.0, 25.0),
                (-72.0, 12.0),
                (-22.0, 0.0),
                (-20.0, -30.0),
                (-14.0, -40.0),
                (-10.0, -45.0),
                (0.0, 0.0),
                (4.0, -30.0),
                (8.0, -40.0),
                (10.0, -45.0),
                (20.0, 2.0),
                (28.0, -20.0),
                (26.0, -5.0),
                (22.0, 5.0),
                (38.0, 8.0),
                (44.0, -12.0),
                (42.0, 2.0),
                (38.0, 10.0),
            ],
            Self::Open => [
                (0.0, 70.0),
                (-25.0, 55.0),
                (-45.0, 40.0),
                (-60.0, 25.0),
                (-72.0, 12.0),
                (-22.0, 0.0),
                (-28.0, -35.0),
                (-40.0, -60.0),
                (-60.0, -80.0),
                (0.0, 0.0),
                (0.0, -35.0),
                (0.0, -60.0),
                (0.0, -80.0),
                (20.0, 2.0),
                (28.0, -35.0),
                (34.0, -58.0),
                (40.0, -80.0),
                (38.0, 8.0),
                (52.0, -35.0),
                (62.0, -55.0),
                (72.0, -80.0),
            ],
            Self::Relaxed => [
                (0.0, 70.0),
                (-25.0, 55.0),
                (-45.0, 40.0),
                (-60.0, 25.0),
                (-72.0, 12.0),
                (-22.0, 0.0),
                (-26.0, -30.0),
                (-30.0, -15.0),
                (-36.0, -5.0),
                (0.0, 0.0),
                (2.0, -32.0),
                (6.0, -15.0),
                (20.0, -5.0),
                (20.0, 2.0),
                (26.0, -28.0),
                (28.0, -12.0),
                (28.0, 0.0),
                (38.0, 8.0),
                (46.0, -20.0),
                (46.0, -6.0),
                (44.0, 4.0),
            ],
        }
    }

    /// The offset that lands on the anchor: the classifier's target for this pose.
    const fn control_point(self) -> (f64, f64) {
        match self {
            Self::Pinch => (0.0, -45.0),
            Self::Open => (0.0, 0.0),
            Self::Relaxed => (-8.0, -5.0),
        }
    }
}

/// Build a hand in `pose` whose classified target sits at `anchor` (canvas pixels).
#[must_use]
pub fn synthesize(pose: HandPose, anchor: Vec2, bounds: Bounds) -> LandmarkFrame {
    let (cx, cy) = pose.control_point();
    let points = pose.offsets().map(|(dx, dy)| {
        Landmark::new(
            (anchor.x + dx - cx) / bounds.width,
            (anchor.y + dy - cy) / bounds.height,
        )
    });
    LandmarkFrame::new(points)
}

/// Frames per autopilot cycle.
const SWEEP_CYCLE: u64 = 360;
/// Cycle frame where the pinch ends and the open palm begins.
const SWEEP_OPEN_AT: u64 = 240;
/// Cycle frame where the open palm ends and the relaxed hand begins.
const SWEEP_RELAX_AT: u64 = 300;

/// Deterministic autopilot: drags a pinch along a Lissajous path,
/// then opens the palm, then relaxes, and repeats.
#[derive(Debug, Clone, Copy)]
pub struct SweepSource {
    bounds: Bounds,
    frame: u64,
}

impl SweepSource {
    /// Start an autopilot over `bounds`.
    #[must_use]
    pub const fn new(bounds: Bounds) -> Self {
        Self { bounds, frame: 0 }
    }

    /// Pose and anchor for autopilot frame `frame`.
    #[must_use]
    pub fn pose_at(&self, frame: u64) -> (HandPose, Vec2) {
        let phase = frame % SWEEP_CYCLE;
        let pose = if phase < SWEEP_OPEN_AT {
            HandPose::Pinch
        } else if phase < SWEEP_RELAX_AT {
            HandPose::Open
        } else {
            HandPose::Relaxed
        };

        #[allow(clippy::cast_precision_loss)]
        let t = frame as f64 / SWEEP_CYCLE as f64 * TAU;
        let center = self.bounds.center();
        let anchor = Vec2::new(
            center.x + 0.35 * self.bounds.width * (t * 2.0).sin(),
            center.y + 0.35 * self.bounds.height * (t * 3.0).sin(),
        );
        (pose, anchor)
    }
}

impl LandmarkSource for SweepSource {
    fn latest(&mut self) -> Option<LandmarkFrame> {
        let (pose, anchor) = self.pose_at(self.frame);
        self.frame += 1;
        Some(synthesize(pose, anchor, self.bounds))
    }
}
