//! Simulation invariants - sanity checks that detect bugs.
//!
//! These hold after every completed tick of a correctly implemented
//! simulation. A violation always indicates a bug, never a gameplay state.

use crate::game::{MAX_SPEED, POINTS_PER_DEFEAT};
use crate::session::Simulation;

/// Slack for floating-point comparisons against exact caps.
const EPSILON: f64 = 1e-9;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all simulation invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(sim: &Simulation) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let bounds = sim.bounds();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    let particles = sim.particles();
    for (i, p) in particles.iter().enumerate() {
        if !p.position.is_finite() || !p.velocity.is_finite() {
            push(format!("Particle {i} has non-finite state {p:?}"));
            continue;
        }
        let speed = p.velocity.length();
        if speed > MAX_SPEED + EPSILON {
            push(format!("Particle {i} speed {speed} exceeds {MAX_SPEED}"));
        }
        if !bounds.contains(p.position) {
            push(format!(
                "Particle {i} at ({}, {}) is outside the canvas",
                p.position.x, p.position.y
            ));
        }
    }

    let leaders = particles.iter().filter(|p| p.is_leader()).count();
    if leaders != 1 {
        push(format!("Swarm has {leaders} leaders, expected 1"));
    }

    let monsters = sim.monsters();
    if monsters.is_empty() {
        push("Monster set is empty between ticks".to_string());
    }
    for m in monsters {
        if m.health <= 0 {
            push(format!("Monster {} still present with health {}", m.id, m.health));
        }
        if m.health > m.max_health {
            push(format!(
                "Monster {} health {} exceeds max {}",
                m.id, m.health, m.max_health
            ));
        }
        let inside = m.position.x >= 0.0
            && m.position.x <= bounds.width
            && m.position.y >= 0.0
            && m.position.y <= bounds.height;
        if !inside {
            push(format!(
                "Monster {} at ({}, {}) is outside the canvas",
                m.id, m.position.x, m.position.y
            ));
        }
    }

    let state = sim.state();
    let expected = state.defeated().saturating_mul(POINTS_PER_DEFEAT);
    if state.score() != expected {
        push(format!(
            "Score {} does not match {} defeats",
            state.score(),
            state.defeated()
        ));
    }

    violations
}

/// Assert all simulation invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(sim: &Simulation) {
    let violations = check_invariants(sim);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Simulation invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_sim: &Simulation) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::Vec2;

    fn small_sim() -> Simulation {
        let config = GameConfig {
            canvas_width: 640.0,
            canvas_height: 480.0,
            particles: 32,
            seed: 5,
            ..GameConfig::default()
        };
        Simulation::new(&config)
    }

    #[test]
    fn test_fresh_simulation_passes() {
        let sim = small_sim();
        let violations = check_invariants(&sim);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_holds_after_ticks() {
        let mut sim = small_sim();
        for _ in 0..120 {
            sim.tick(None);
        }
        assert!(check_invariants(&sim).is_empty());
        assert_invariants(&sim);
    }

    #[test]
    fn test_escaped_particle_detected() {
        let mut sim = small_sim();
        sim.particles_mut()[3].position = Vec2::new(-1.0, 10.0);

        let violations = check_invariants(&sim);
        assert_eq!(violations.len(), 1, "{violations:?}");
        assert!(violations[0].message.contains("outside"));
    }

    #[test]
    fn test_speeding_particle_detected() {
        let mut sim = small_sim();
        sim.particles_mut()[1].velocity = Vec2::new(MAX_SPEED + 1.0, 0.0);

        let violations = check_invariants(&sim);
        assert!(violations.iter().any(|v| v.message.contains("speed")));
    }

    #[test]
    fn test_speed_exactly_at_max_passes() {
        let mut sim = small_sim();
        sim.particles_mut()[1].velocity = Vec2::new(0.0, MAX_SPEED);
        assert!(check_invariants(&sim).is_empty());
    }

    #[test]
    fn test_dead_monster_detected() {
        let mut sim = small_sim();
        sim.monsters_mut()[0].health = 0;

        let violations = check_invariants(&sim);
        assert!(violations.iter().any(|v| v.message.contains("health 0")));
    }

    #[test]
    fn test_empty_monster_set_detected() {
        let mut sim = small_sim();
        sim.monsters_mut().clear();

        let violations = check_invariants(&sim);
        assert!(violations.iter().any(|v| v.message.contains("empty")));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut sim = small_sim();
        sim.particles_mut()[2].position = Vec2::new(1e6, 1e6);
        sim.monsters_mut()[0].health = 99;

        let violations = check_invariants(&sim);
        assert!(violations.len() >= 2, "{violations:?}");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invariant violations")]
    fn test_assert_invariants_panics_in_debug() {
        let mut sim = small_sim();
        sim.monsters_mut().clear();
        assert_invariants(&sim);
    }

    #[test]
    fn test_empty_swarm_has_no_leader() {
        let mut sim = small_sim();
        sim.particles_mut().clear();

        let violations = check_invariants(&sim);
        assert!(
            violations.iter().any(|v| v.message.contains("0 leaders")),
            "{violations:?}"
        );
    }
}
