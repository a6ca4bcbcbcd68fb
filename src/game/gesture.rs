//! Gesture classification.
//!
//! Maps one frame of hand landmarks to a [`GestureIntent`]. The classifier
//! keeps no state between frames: the same frame and canvas size always
//! produce the same intent.

use serde::{Deserialize, Serialize};

use crate::game::{Bounds, Vec2};

/// Number of keypoints in one hand detection.
pub const LANDMARK_COUNT: usize = 21;

/// Wrist keypoint.
pub const WRIST: usize = 0;
/// Index fingertip.
pub const INDEX_TIP: usize = 8;
/// Middle finger knuckle, used as the palm reference point.
pub const PALM_REFERENCE: usize = 9;
/// Middle fingertip.
pub const MIDDLE_TIP: usize = 12;
/// Ring fingertip.
pub const RING_TIP: usize = 16;
/// Pinky fingertip.
pub const PINKY_TIP: usize = 20;

/// Fingertips inspected by the extension heuristic.
pub const EXTENSION_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Fingertip distance (canvas pixels) below which the hand is pinching.
pub const PINCH_DISTANCE: f64 = 50.0;

/// Extended fingers needed for an open palm.
pub const MIN_EXTENDED_FINGERS: usize = 3;

/// Hand skeleton connections, for drawing the landmark overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 23] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (0, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (0, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (5, 9),
    (9, 13),
    (13, 17),
];

/// One normalized keypoint, each axis in `[0, 1]` of the input image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge.
    pub x: f64,
    /// Vertical position, 0 = top edge.
    pub y: f64,
}

impl Landmark {
    /// Create a landmark.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale into canvas space.
    #[must_use]
    pub fn to_canvas(self, bounds: Bounds) -> Vec2 {
        Vec2::new(self.x * bounds.width, self.y * bounds.height)
    }
}

/// One hand detection: 21 ordered keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Wrap a full set of keypoints.
    #[must_use]
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build a frame from a slice, which must hold exactly 21 points.
    #[must_use]
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    /// All keypoints in detector order.
    #[must_use]
    pub const fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Keypoint `index` (0..21).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    /// Whether every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

/// Control intent derived from one landmark frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GestureIntent {
    /// No directed force. Carries the fingertip midpoint when a hand is visible.
    Free {
        /// Fingertip midpoint, if a hand was detected.
        target: Option<Vec2>,
    },
    /// Pinch: the leader is pulled toward `target`, followers toward the leader.
    Gather {
        /// Midpoint of the pinching fingertips.
        target: Vec2,
    },
    /// Open palm: followers orbit `target`.
    Scatter {
        /// Palm reference point.
        target: Vec2,
    },
}

impl GestureIntent {
    /// Intent when no hand is visible.
    pub const IDLE: Self = Self::Free { target: None };

    /// The target point carried by this intent, if any.
    #[must_use]
    pub const fn target(&self) -> Option<Vec2> {
        match *self {
            Self::Free { target } => target,
            Self::Gather { target } | Self::Scatter { target } => Some(target),
        }
    }

    /// Short mode label for display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Free { .. } => "free",
            Self::Gather { .. } => "gather",
            Self::Scatter { .. } => "scatter",
        }
    }
}

impl Default for GestureIntent {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Classify a landmark frame into a gesture intent.
///
/// Absent or non-finite input degrades to [`GestureIntent::IDLE`].
#[must_use]
pub fn classify(landmarks: Option<&LandmarkFrame>, bounds: Bounds) -> GestureIntent {
    let Some(frame) = landmarks.filter(|f| f.is_finite()) else {
        return GestureIntent::IDLE;
    };

    let canvas = |i: usize| frame.points[i].to_canvas(bounds);
    let index_tip = canvas(INDEX_TIP);
    let middle_tip = canvas(MIDDLE_TIP);
    let fingertips = index_tip.midpoint(middle_tip);

    if index_tip.distance(middle_tip) < PINCH_DISTANCE {
        return GestureIntent::Gather { target: fingertips };
    }

    if extended_fingers(frame, bounds) >= MIN_EXTENDED_FINGERS {
        GestureIntent::Scatter {
            target: canvas(PALM_REFERENCE),
        }
    } else {
        GestureIntent::Free {
            target: Some(fingertips),
        }
    }
}

/// Count fingertips that sit above the keypoint two places earlier.
///
/// For the four fingers this compares the tip to its PIP joint.
#[must_use]
pub fn extended_fingers(frame: &LandmarkFrame, bounds: Bounds) -> usize {
    EXTENSION_TIPS
        .iter()
        .filter(|&&tip| {
            frame.points[tip].to_canvas(bounds).y < frame.points[tip - 2].to_canvas(bounds).y
        })
        .count()
}
