//! Leader-follower swarm physics.
//!
//! Every particle accumulates capped forces during a tick and integrates
//! once at the end of it. The leader is steered directly by a gather
//! target; followers react to the leader or to the scatter center and
//! always receive a small random jitter that keeps them from stacking.

use std::f64::consts::TAU;

use rand::Rng;

use crate::game::{Bounds, GestureIntent, Vec2};

/// Speed cap applied at integration time.
pub const MAX_SPEED: f64 = 15.0;

/// Largest force a single application may contribute.
pub const MAX_FORCE: f64 = 3.5;

/// Per-tick velocity damping factor.
pub const DAMPING: f64 = 0.97;

/// The leader stops pulling when this close to its target.
pub const LEADER_ARRIVE_DISTANCE: f64 = 5.0;

/// Leader pull magnitude before capping.
pub const LEADER_PULL: f64 = 2.0 * MAX_SPEED;

/// Followers stop closing in when this close to the leader.
pub const FOLLOW_DISTANCE: f64 = 25.0;

/// Follower pull toward the leader while gathering.
pub const FOLLOW_FORCE: f64 = 0.5;

/// Tangential force around the scatter center.
pub const ORBIT_FORCE: f64 = 2.0;

/// Jitter range per axis, `[-JITTER, JITTER]`.
pub const JITTER: f64 = 0.25;

/// Collision radius shared by every particle.
pub const PARTICLE_RADIUS: f64 = 2.0;

/// Drawn radius of the leader.
pub const LEADER_RADIUS: f64 = 6.0;

/// Particles start within this distance of the canvas center.
pub const SPAWN_RING_RADIUS: f64 = 100.0;

/// Initial velocity components are uniform in `[-SPREAD, SPREAD]`.
pub const INITIAL_VELOCITY_SPREAD: f64 = 3.0;

/// One swarm member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Canvas position.
    pub position: Vec2,
    /// Velocity in pixels per tick.
    pub velocity: Vec2,
    force: Vec2,
    max_speed: f64,
    is_leader: bool,
}

impl Particle {
    /// Create a follower.
    #[must_use]
    pub const fn follower(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            force: Vec2::ZERO,
            max_speed: MAX_SPEED,
            is_leader: false,
        }
    }

    /// Create the leader.
    #[must_use]
    pub const fn leader(position: Vec2, velocity: Vec2) -> Self {
        Self {
            is_leader: true,
            ..Self::follower(position, velocity)
        }
    }

    /// Whether this particle is the swarm leader.
    #[must_use]
    pub const fn is_leader(&self) -> bool {
        self.is_leader
    }

    /// Speed cap for this particle.
    #[must_use]
    pub const fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Force accumulated since the last integration.
    #[must_use]
    pub const fn accumulated_force(&self) -> Vec2 {
        self.force
    }

    /// Collision radius. The leader collides at follower size.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn radius(&self) -> f64 {
        PARTICLE_RADIUS
    }

    /// Radius used when drawing.
    #[must_use]
    pub const fn draw_radius(&self) -> f64 {
        if self.is_leader {
            LEADER_RADIUS
        } else {
            PARTICLE_RADIUS
        }
    }

    /// Accumulate a force, capped at [`MAX_FORCE`].
    ///
    /// Non-finite forces are dropped. Returns the force actually added.
    pub fn apply_force(&mut self, force: Vec2) -> Vec2 {
        if !force.is_finite() {
            return Vec2::ZERO;
        }
        let applied = force.limit(MAX_FORCE);
        self.force += applied;
        applied
    }

    /// Integrate accumulated force, clamp speed, damp, move and wrap.
    pub fn integrate(&mut self, bounds: Bounds) {
        self.velocity += self.force;
        self.velocity = self.velocity.limit(self.max_speed);
        self.velocity = self.velocity * DAMPING;
        self.position = bounds.wrap(self.position + self.velocity);
        self.force = Vec2::ZERO;
    }
}

/// Seed a swarm on a ring around the canvas center.
///
/// Particle 0 is the leader. Returns an empty swarm when `count` is zero.
pub fn spawn_swarm<R: Rng + ?Sized>(count: usize, bounds: Bounds, rng: &mut R) -> Vec<Particle> {
    let center = bounds.center();
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = i as f64 / count as f64 * TAU;
            let radius = rng.gen_range(0.0..SPAWN_RING_RADIUS);
            let position = bounds.wrap(Vec2::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
            ));
            let velocity = Vec2::new(
                rng.gen_range(-INITIAL_VELOCITY_SPREAD..=INITIAL_VELOCITY_SPREAD),
                rng.gen_range(-INITIAL_VELOCITY_SPREAD..=INITIAL_VELOCITY_SPREAD),
            );
            if i == 0 {
                Particle::leader(position, velocity)
            } else {
                Particle::follower(position, velocity)
            }
        })
        .collect()
}

/// Directed force on the leader for this intent, before capping.
#[must_use]
pub fn leader_force(leader: &Particle, intent: &GestureIntent) -> Option<Vec2> {
    let GestureIntent::Gather { target } = *intent else {
        return None;
    };
    let offset = target - leader.position;
    if offset.length() > LEADER_ARRIVE_DISTANCE {
        offset.normalized().map(|dir| dir * LEADER_PULL)
    } else {
        None
    }
}

/// Directed force on a follower for this intent, before capping.
///
/// `leader` is the leader's position after its own integration this tick.
#[must_use]
pub fn follower_force(
    particle: &Particle,
    leader: Option<Vec2>,
    intent: &GestureIntent,
) -> Option<Vec2> {
    match *intent {
        GestureIntent::Gather { .. } => {
            let offset = leader? - particle.position;
            if offset.length() > FOLLOW_DISTANCE {
                offset.normalized().map(|dir| dir * FOLLOW_FORCE)
            } else {
                None
            }
        }
        GestureIntent::Scatter { target } => (particle.position - target)
            .normalized()
            .map(|radial| radial.perp() * ORBIT_FORCE),
        GestureIntent::Free { .. } => None,
    }
}

/// Advance the swarm by one tick.
pub fn step_swarm<R: Rng + ?Sized>(
    particles: &mut [Particle],
    intent: &GestureIntent,
    bounds: Bounds,
    rng: &mut R,
) {
    let leader_idx = particles.iter().position(Particle::is_leader);

    let leader_pos = leader_idx.map(|idx| {
        let leader = &mut particles[idx];
        if let Some(force) = leader_force(leader, intent) {
            leader.apply_force(force);
        }
        leader.integrate(bounds);
        leader.position
    });

    for particle in particles.iter_mut().filter(|p| !p.is_leader()) {
        if let Some(force) = follower_force(particle, leader_pos, intent) {
            particle.apply_force(force);
        }
        particle.apply_force(Vec2::new(
            rng.gen_range(-JITTER..=JITTER),
            rng.gen_range(-JITTER..=JITTER),
        ));
        particle.integrate(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const CANVAS: Bounds = Bounds::new(800.0, 600.0);

    #[test]
    fn test_apply_force_caps_magnitude() {
        let mut p = Particle::follower(Vec2::ZERO, Vec2::ZERO);
        let applied = p.apply_force(Vec2::new(30.0, 0.0));
        assert!((applied.x - MAX_FORCE).abs() < 1e-12);
        assert!(applied.y.abs() < 1e-12);
        assert_eq!(p.accumulated_force(), applied);
    }

    #[test]
    fn test_apply_force_drops_non_finite() {
        let mut p = Particle::follower(Vec2::ZERO, Vec2::ZERO);
        let applied = p.apply_force(Vec2::new(f64::INFINITY, 1.0));
        assert_eq!(applied, Vec2::ZERO);
        assert_eq!(p.accumulated_force(), Vec2::ZERO);
    }

    #[test]
    fn test_leader_pull_toward_gather_target() {
        let leader = Particle::leader(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let intent = GestureIntent::Gather {
            target: Vec2::new(200.0, 100.0),
        };
        let force = leader_force(&leader, &intent).unwrap();
        assert!((force.x - 30.0).abs() < 1e-12);

        let mut leader = leader;
        let applied = leader.apply_force(force);
        assert!((applied.x - 3.5).abs() < 1e-12);
        assert!(applied.y.abs() < 1e-12);
    }

    #[test]
    fn test_leader_step_moves_toward_target() {
        let mut particles = vec![Particle::leader(Vec2::new(100.0, 100.0), Vec2::ZERO)];
        let intent = GestureIntent::Gather {
            target: Vec2::new(200.0, 100.0),
        };
        let mut rng = SmallRng::seed_from_u64(1);
        step_swarm(&mut particles, &intent, CANVAS, &mut rng);

        let leader = particles[0];
        assert!((leader.velocity.x - 3.5 * DAMPING).abs() < 1e-12);
        assert!((leader.position.x - (100.0 + 3.5 * DAMPING)).abs() < 1e-12);
        assert_eq!(leader.accumulated_force(), Vec2::ZERO);
    }

    #[test]
    fn test_leader_arrived_gets_no_force() {
        let leader = Particle::leader(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let intent = GestureIntent::Gather {
            target: Vec2::new(103.0, 104.0),
        };
        assert!(leader_force(&leader, &intent).is_none());
    }

    #[test]
    fn test_leader_ignores_scatter_and_free() {
        let leader = Particle::leader(Vec2::new(100.0, 100.0), Vec2::ZERO);
        let scatter = GestureIntent::Scatter {
            target: Vec2::new(400.0, 100.0),
        };
        assert!(leader_force(&leader, &scatter).is_none());
        assert!(leader_force(&leader, &GestureIntent::IDLE).is_none());
    }

    #[test]
    fn test_follower_gathers_only_when_far() {
        let intent = GestureIntent::Gather {
            target: Vec2::ZERO,
        };
        let far = Particle::follower(Vec2::new(100.0, 0.0), Vec2::ZERO);
        let force = follower_force(&far, Some(Vec2::ZERO), &intent).unwrap();
        assert!((force.x + FOLLOW_FORCE).abs() < 1e-12);

        let near = Particle::follower(Vec2::new(20.0, 0.0), Vec2::ZERO);
        assert!(follower_force(&near, Some(Vec2::ZERO), &intent).is_none());
    }

    #[test]
    fn test_follower_orbits_scatter_center() {
        let intent = GestureIntent::Scatter {
            target: Vec2::new(100.0, 100.0),
        };
        let p = Particle::follower(Vec2::new(110.0, 100.0), Vec2::ZERO);
        let force = follower_force(&p, None, &intent).unwrap();
        assert!(force.x.abs() < 1e-12);
        assert!((force.y - ORBIT_FORCE).abs() < 1e-12);
    }

    #[test]
    fn test_follower_on_scatter_center_is_skipped() {
        let intent = GestureIntent::Scatter {
            target: Vec2::new(100.0, 100.0),
        };
        let p = Particle::follower(Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(follower_force(&p, None, &intent).is_none());
    }

    #[test]
    fn test_speed_clamped_and_damped() {
        let mut p = Particle::follower(Vec2::new(10.0, 10.0), Vec2::new(100.0, 0.0));
        p.integrate(CANVAS);
        assert!((p.velocity.length() - MAX_SPEED * DAMPING).abs() < 1e-9);
    }

    #[test]
    fn test_integrate_wraps_position() {
        let mut p = Particle::follower(Vec2::new(799.0, 1.0), Vec2::new(5.0, -5.0));
        p.integrate(CANVAS);
        assert!(CANVAS.contains(p.position));
        assert!(p.position.x < 10.0);
        assert!(p.position.y > 590.0);
    }

    #[test]
    fn test_spawn_swarm_single_leader() {
        let mut rng = SmallRng::seed_from_u64(7);
        let swarm = spawn_swarm(300, CANVAS, &mut rng);
        assert_eq!(swarm.len(), 300);
        assert_eq!(swarm.iter().filter(|p| p.is_leader()).count(), 1);
        assert!(swarm[0].is_leader());
        for p in &swarm {
            assert!(p.position.distance(CANVAS.center()) <= SPAWN_RING_RADIUS + 1e-9);
        }
    }

    #[test]
    fn test_step_keeps_invariants_over_many_ticks() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut swarm = spawn_swarm(64, CANVAS, &mut rng);
        let intents = [
            GestureIntent::Gather {
                target: Vec2::new(10.0, 10.0),
            },
            GestureIntent::Scatter {
                target: Vec2::new(400.0, 300.0),
            },
            GestureIntent::IDLE,
        ];
        for tick in 0..600 {
            step_swarm(&mut swarm, &intents[tick / 200], CANVAS, &mut rng);
            for p in &swarm {
                assert!(p.velocity.length() <= MAX_SPEED);
                assert!(CANVAS.contains(p.position), "{p:?}");
            }
        }
        assert_eq!(swarm.iter().filter(|p| p.is_leader()).count(), 1);
    }
}
