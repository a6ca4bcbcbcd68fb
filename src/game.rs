//! Simulation core for handswarm.
//!
//! Implements the per-frame rules with no I/O:
//! - Gesture classification from hand landmarks
//! - Leader-follower swarm physics on a toroidal canvas
//! - Monster motion, collision and damage
//! - Score, wave and combo bookkeeping

mod geometry;
mod gesture;
mod invariants;
mod monster;
mod state;
mod swarm;

pub use geometry::{Bounds, Vec2};
pub use gesture::{
    classify, extended_fingers, GestureIntent, Landmark, LandmarkFrame, EXTENSION_TIPS,
    HAND_CONNECTIONS, INDEX_TIP, LANDMARK_COUNT, MIDDLE_TIP, MIN_EXTENDED_FINGERS,
    PALM_REFERENCE, PINCH_DISTANCE, PINKY_TIP, RING_TIP, WRIST,
};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use monster::{
    step_monsters, DefeatEvent, Monster, MonsterId, MonsterSpawner, MonsterStep, MONSTER_HEALTH,
    MONSTER_RADIUS, MONSTER_VELOCITY_SPREAD, SPAWN_MARGIN,
};
pub use state::{
    spawn_count, GameState, BASE_SPAWN_COUNT, INITIAL_MONSTERS, INITIAL_WAVE, POINTS_PER_DEFEAT,
};
pub use swarm::{
    follower_force, leader_force, spawn_swarm, step_swarm, Particle, DAMPING, FOLLOW_DISTANCE,
    FOLLOW_FORCE, INITIAL_VELOCITY_SPREAD, JITTER, LEADER_ARRIVE_DISTANCE, LEADER_PULL,
    LEADER_RADIUS, MAX_FORCE, MAX_SPEED, ORBIT_FORCE, PARTICLE_RADIUS, SPAWN_RING_RADIUS,
};
