//! Multi-frame integration tests for whole sessions.
//!
//! These tests verify that sessions run for many frames without breaking
//! invariants, that waves progress, and that recordings replay exactly.
//!
//! Run with: cargo test --release session_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use handswarm::game::{check_invariants, Vec2, POINTS_PER_DEFEAT};
use handswarm::input::{
    synthesize, ChannelSource, HandPose, LandmarkSender, NoHand, RecordingSource, ScriptedSource,
    SweepSource,
};
use handswarm::{
    run_headless, GameConfig, LandmarkSource, Recording, ReplayEngine, SessionSummary, Simulation,
};

fn config(seed: u64) -> GameConfig {
    GameConfig {
        canvas_width: 960.0,
        canvas_height: 540.0,
        particles: 200,
        seed,
        ..GameConfig::default()
    }
}

#[test]
fn test_long_sweep_session_keeps_invariants() {
    for seed in [1, 7, 42, 1234] {
        let config = config(seed);
        let mut sim = Simulation::new(&config);
        let mut source = SweepSource::new(config.bounds());
        let summary = run_headless(&mut sim, &mut source, 3600);

        assert_eq!(summary.frames, 3600);
        assert_eq!(summary.invariant_violations, 0, "seed {seed}");
        assert_eq!(summary.score, summary.defeated * POINTS_PER_DEFEAT);
        assert_eq!(
            summary.gather_frames + summary.scatter_frames + summary.free_frames,
            3600
        );
        assert!(summary.gather_frames > 0);
        assert!(summary.scatter_frames > 0);
    }
}

/// Pinch on the first monster every frame.
fn hunt(sim: &mut Simulation) -> handswarm::FrameOutcome {
    let bounds = sim.bounds();
    let hand = sim
        .monsters()
        .first()
        .map(|m| synthesize(HandPose::Pinch, m.position, bounds));
    sim.tick(hand.as_ref())
}

#[test]
fn test_hunting_defeats_monsters() {
    let mut sim = Simulation::new(&config(99));
    let mut summary = SessionSummary::default();
    for _ in 0..3000 {
        let outcome = hunt(&mut sim);
        summary.record(&sim, &outcome);
    }
    let summary = summary.finish(&sim);

    assert!(summary.defeated > 0, "{summary:?}");
    assert_eq!(summary.invariant_violations, 0);
    assert_eq!(u64::from(summary.combo), summary.defeated);
    assert_eq!(summary.score, summary.defeated * POINTS_PER_DEFEAT);
}

#[test]
fn test_no_hand_session_is_idle() {
    let mut sim = Simulation::new(&config(5));
    let summary = run_headless(&mut sim, &mut NoHand, 600);

    assert_eq!(summary.free_frames, 600);
    assert_eq!(summary.gather_frames, 0);
    assert!(summary.monsters_left > 0);
    assert!(check_invariants(&sim).is_empty());
}

#[test]
fn test_wave_progression_until_cleared() {
    let mut sim = Simulation::new(&config(3));

    let mut waves = Vec::new();
    for _ in 0..20_000 {
        let outcome = hunt(&mut sim);
        if let Some(wave) = outcome.new_wave {
            waves.push((wave, sim.monsters().len()));
        }
        if waves.len() >= 2 {
            break;
        }
    }

    // Wave w opens with 3 + w monsters.
    assert_eq!(waves, vec![(2, 5), (3, 6)]);
    assert_eq!(sim.state().defeated(), 3 + 5);
}

#[test]
fn test_same_seed_same_session() {
    let run = |seed| {
        let config = config(seed);
        let mut sim = Simulation::new(&config);
        let mut source = SweepSource::new(config.bounds());
        let summary = run_headless(&mut sim, &mut source, 1200);
        (summary, sim.particles().to_vec(), sim.monsters().to_vec())
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn test_record_and_replay_via_file() {
    let config = config(21);
    let mut sim = Simulation::new(&config);
    let mut source = RecordingSource::new(SweepSource::new(config.bounds()));
    let live = run_headless(&mut sim, &mut source, 900);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    Recording::new(config, source.into_frames())
        .save(&path)
        .unwrap();

    let recording = Recording::load(&path).unwrap();
    assert_eq!(recording.len(), 900);

    let mut engine = ReplayEngine::new(recording);
    let mut replayed = SessionSummary::default();
    while let Some(outcome) = engine.step_forward() {
        replayed.record(engine.simulation(), &outcome);
    }
    let replayed = replayed.finish(engine.simulation());

    assert!(engine.is_finished());
    assert_eq!(replayed, live);
    assert_eq!(engine.simulation().particles(), sim.particles());
    assert_eq!(engine.simulation().monsters(), sim.monsters());
}

#[test]
fn test_scripted_hand_follows_pinch() {
    let config = config(8);
    let bounds = config.bounds();
    let target = Vec2::new(200.0, 150.0);
    let frames = vec![Some(synthesize(HandPose::Pinch, target, bounds)); 240];

    let mut sim = Simulation::new(&config);
    let mut source = ScriptedSource::new(frames);
    let summary = run_headless(&mut sim, &mut source, 240);

    assert_eq!(summary.gather_frames, 240);
    let leader = sim.particles().iter().find(|p| p.is_leader()).unwrap();
    assert!(leader.position.distance(target) < 40.0, "{:?}", leader.position);
}

#[test]
fn test_channel_source_from_thread() {
    let config = config(13);
    let bounds = config.bounds();
    let (tx, mut source): (LandmarkSender, ChannelSource) = ChannelSource::new();

    let producer = std::thread::spawn(move || {
        let hand = synthesize(HandPose::Open, bounds.center(), bounds);
        tx.send(Some(hand)).unwrap();
    });
    producer.join().unwrap();

    let mut sim = Simulation::new(&config);
    let outcome = sim.tick(source.latest().as_ref());
    assert_eq!(outcome.intent.label(), "scatter");

    // Sender gone: the source reports no hand from here on.
    assert!(source.latest().is_none());
}
