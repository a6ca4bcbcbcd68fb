#![no_main]

use arbitrary::Arbitrary;
use handswarm::game::{check_invariants, Vec2};
use handswarm::input::{synthesize, HandPose};
use handswarm::{GameConfig, Simulation};
use libfuzzer_sys::fuzz_target;

/// One frame of fuzzed hand input.
#[derive(Arbitrary, Debug)]
enum Hand {
    /// No hand visible.
    Hidden,
    /// A synthetic pose at a fractional canvas position.
    Pose { pose: u8, x: u16, y: u16 },
    /// Resize the canvas before the frame.
    Resize { width: u16, height: u16 },
}

/// Structured input for whole-session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    seed: u64,
    /// Swarm size (capped).
    particles: u8,
    width: u16,
    height: u16,
    frames: Vec<Hand>,
}

fuzz_target!(|input: SessionInput| {
    let config = GameConfig {
        canvas_width: f64::from(input.width.clamp(16, 4096)),
        canvas_height: f64::from(input.height.clamp(16, 4096)),
        particles: usize::from(input.particles).max(1),
        seed: input.seed,
        ..GameConfig::default()
    };
    if config.validate().is_err() {
        return;
    }
    let mut sim = Simulation::new(&config);

    // Cap frames to keep iterations fast
    for hand in input.frames.iter().take(512) {
        let bounds = sim.bounds();
        let landmarks = match *hand {
            Hand::Hidden => None,
            Hand::Pose { pose, x, y } => {
                let pose = match pose % 3 {
                    0 => HandPose::Pinch,
                    1 => HandPose::Open,
                    _ => HandPose::Relaxed,
                };
                let anchor = Vec2::new(
                    f64::from(x) / f64::from(u16::MAX) * bounds.width,
                    f64::from(y) / f64::from(u16::MAX) * bounds.height,
                );
                Some(synthesize(pose, anchor, bounds))
            }
            Hand::Resize { width, height } => {
                sim.resize(handswarm::Bounds::new(f64::from(width), f64::from(height)));
                None
            }
        };
        sim.tick(landmarks.as_ref());

        let violations = check_invariants(&sim);
        assert!(
            violations.is_empty(),
            "Invariants violated at frame {}: {:?}",
            sim.frame(),
            violations
        );
    }
});
