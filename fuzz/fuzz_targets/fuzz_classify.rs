#![no_main]

use arbitrary::Arbitrary;
use handswarm::game::{classify, Bounds, GestureIntent, Landmark, LandmarkFrame, LANDMARK_COUNT};
use libfuzzer_sys::fuzz_target;

/// Structured input for gesture classification.
#[derive(Arbitrary, Debug)]
struct ClassifyInput {
    /// Raw keypoint coordinates, any f64 including NaN and infinities.
    points: [(f64, f64); LANDMARK_COUNT],
    /// Canvas width.
    width: u16,
    /// Canvas height.
    height: u16,
}

fuzz_target!(|input: ClassifyInput| {
    let bounds = Bounds::new(f64::from(input.width.max(1)), f64::from(input.height.max(1)));
    let frame = LandmarkFrame::new(input.points.map(|(x, y)| Landmark::new(x, y)));

    // Must not panic
    let intent = classify(Some(&frame), bounds);

    let sane = input
        .points
        .iter()
        .all(|&(x, y)| x.abs() <= 1e6 && y.abs() <= 1e6);
    if sane {
        // Pure function of its inputs
        assert_eq!(intent, classify(Some(&frame), bounds));
        if let Some(target) = intent.target() {
            assert!(target.is_finite(), "non-finite target {target:?}");
        }
    } else if !frame.is_finite() {
        assert_eq!(intent, GestureIntent::IDLE, "non-finite hand must be idle");
    }
});
