//! Monster motion, collision and damage resolution.
//!
//! Damage is not a fixed amount per hit: each frame a monster loses one
//! health point for every particle overlapping it that frame. Monsters are
//! resolved independently of each other, so the order in which they are
//! processed never changes the outcome.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{Bounds, Particle, Vec2};

/// Radius of every monster.
pub const MONSTER_RADIUS: f64 = 40.0;

/// Starting (and maximum) health of every monster.
pub const MONSTER_HEALTH: i32 = 10;

/// Monsters spawn at least this far from every canvas edge.
pub const SPAWN_MARGIN: f64 = 100.0;

/// Spawn velocity components are uniform in `[-SPREAD, SPREAD]`.
pub const MONSTER_VELOCITY_SPREAD: f64 = 2.0;

/// Identifier unique within one session.
pub type MonsterId = u32;

/// A roaming target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monster {
    /// Session-unique identifier.
    pub id: MonsterId,
    /// Canvas position of the center.
    pub position: Vec2,
    /// Velocity in pixels per tick.
    pub velocity: Vec2,
    /// Collision and draw radius.
    pub radius: f64,
    /// Remaining health. The monster is removed once this drops to zero or below.
    pub health: i32,
    /// Health at spawn.
    pub max_health: i32,
    /// Display hue in degrees.
    pub hue: f64,
}

impl Monster {
    /// Create a full-health monster.
    #[must_use]
    pub const fn new(id: MonsterId, position: Vec2, velocity: Vec2, hue: f64) -> Self {
        Self {
            id,
            position,
            velocity,
            radius: MONSTER_RADIUS,
            health: MONSTER_HEALTH,
            max_health: MONSTER_HEALTH,
            hue,
        }
    }

    /// Whether the monster is still in play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Remaining health as a fraction of max health, clamped to `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (f64::from(self.health) / f64::from(self.max_health)).clamp(0.0, 1.0)
    }

    /// Circle-overlap test against one particle.
    #[must_use]
    pub fn overlaps(&self, particle: &Particle) -> bool {
        self.position.distance(particle.position) < self.radius + particle.radius()
    }

    /// Count particles overlapping this monster.
    #[must_use]
    pub fn count_hits(&self, particles: &[Particle]) -> u32 {
        let hits = particles.iter().filter(|p| self.overlaps(p)).count();
        u32::try_from(hits).unwrap_or(u32::MAX)
    }

    /// Subtract `amount` health. Returns `true` if this defeated the monster.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount);
        !self.is_alive()
    }

    /// Move one tick and bounce off the canvas edges.
    pub fn advance(&mut self, bounds: Bounds) {
        self.position += self.velocity;
        self.confine(bounds);
    }

    /// Keep the whole disc on the canvas, turning velocity away from any edge it touches.
    pub fn confine(&mut self, bounds: Bounds) {
        (self.position.x, self.velocity.x) =
            bounce_axis(self.position.x, self.velocity.x, self.radius, bounds.width);
        (self.position.y, self.velocity.y) =
            bounce_axis(self.position.y, self.velocity.y, self.radius, bounds.height);
    }
}

/// Reflect velocity off `[radius, extent - radius]` and keep the position inside it.
fn bounce_axis(position: f64, velocity: f64, radius: f64, extent: f64) -> (f64, f64) {
    let (low, high) = (radius, extent - radius);
    if high < low {
        return (extent / 2.0, velocity);
    }
    if position < low {
        (low, velocity.abs())
    } else if position > high {
        (high, -velocity.abs())
    } else {
        (position, velocity)
    }
}

/// Emitted the frame a monster's health reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefeatEvent {
    /// The defeated monster.
    pub monster_id: MonsterId,
    /// Where it was defeated.
    pub position: Vec2,
    /// Its display hue.
    pub hue: f64,
    /// Overlapping particles on the final frame.
    pub hits: u32,
}

/// Result of one monster-engine tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonsterStep {
    /// Total damage dealt across all monsters.
    pub damage: u32,
    /// Monsters removed this tick.
    pub defeats: Vec<DefeatEvent>,
}

/// Move every monster, apply overlap damage and remove the defeated.
pub fn step_monsters(
    monsters: &mut Vec<Monster>,
    particles: &[Particle],
    bounds: Bounds,
) -> MonsterStep {
    let mut step = MonsterStep::default();

    for monster in monsters.iter_mut() {
        monster.advance(bounds);
        let hits = monster.count_hits(particles);
        if hits == 0 {
            continue;
        }
        step.damage = step.damage.saturating_add(hits);
        if monster.take_damage(hits) {
            step.defeats.push(DefeatEvent {
                monster_id: monster.id,
                position: monster.position,
                hue: monster.hue,
                hits,
            });
        }
    }

    monsters.retain(Monster::is_alive);
    step
}

/// Hands out monster ids and spawns waves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonsterSpawner {
    next_id: MonsterId,
}

impl MonsterSpawner {
    /// Create a spawner whose first id is 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.next_id
    }

    /// Spawn one monster at a random position away from the edges.
    pub fn spawn<R: Rng + ?Sized>(&mut self, bounds: Bounds, rng: &mut R) -> Monster {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let position = Vec2::new(
            spawn_coordinate(bounds.width, rng),
            spawn_coordinate(bounds.height, rng),
        );
        let velocity = Vec2::new(
            rng.gen_range(-MONSTER_VELOCITY_SPREAD..=MONSTER_VELOCITY_SPREAD),
            rng.gen_range(-MONSTER_VELOCITY_SPREAD..=MONSTER_VELOCITY_SPREAD),
        );
        let hue = rng.gen_range(0.0..360.0);
        Monster::new(id, position, velocity, hue)
    }

    /// Append `count` freshly spawned monsters.
    pub fn spawn_wave<R: Rng + ?Sized>(
        &mut self,
        monsters: &mut Vec<Monster>,
        count: usize,
        bounds: Bounds,
        rng: &mut R,
    ) {
        monsters.reserve(count);
        for _ in 0..count {
            let monster = self.spawn(bounds, rng);
            monsters.push(monster);
        }
    }
}

/// Uniform in `[SPAWN_MARGIN, extent - SPAWN_MARGIN)`, or the midpoint on a small canvas.
fn spawn_coordinate<R: Rng + ?Sized>(extent: f64, rng: &mut R) -> f64 {
    let high = extent - SPAWN_MARGIN;
    if high > SPAWN_MARGIN {
        rng.gen_range(SPAWN_MARGIN..high)
    } else {
        extent / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const CANVAS: Bounds = Bounds::new(800.0, 600.0);

    fn still_monster(x: f64, y: f64) -> Monster {
        Monster::new(0, Vec2::new(x, y), Vec2::ZERO, 120.0)
    }

    fn particles_at(center: Vec2, n: usize) -> Vec<Particle> {
        (0..n).map(|_| Particle::follower(center, Vec2::ZERO)).collect()
    }

    #[test]
    fn test_overlap_is_strict() {
        let m = still_monster(100.0, 100.0);
        let touching = Particle::follower(Vec2::new(142.0, 100.0), Vec2::ZERO);
        let inside = Particle::follower(Vec2::new(141.9, 100.0), Vec2::ZERO);
        assert!(!m.overlaps(&touching));
        assert!(m.overlaps(&inside));
    }

    #[test]
    fn test_damage_equals_overlap_count() {
        let mut monsters = vec![still_monster(200.0, 200.0)];

        let step = step_monsters(&mut monsters, &particles_at(Vec2::new(200.0, 200.0), 4), CANVAS);
        assert_eq!(step.damage, 4);
        assert!(step.defeats.is_empty());
        assert_eq!(monsters[0].health, 6);

        let step = step_monsters(&mut monsters, &particles_at(Vec2::new(210.0, 200.0), 7), CANVAS);
        assert_eq!(step.defeats.len(), 1);
        assert_eq!(step.defeats[0].hits, 7);
        assert!(monsters.is_empty());
    }

    #[test]
    fn test_untouched_monster_keeps_health() {
        let mut monsters = vec![still_monster(200.0, 200.0)];
        let step = step_monsters(&mut monsters, &particles_at(Vec2::new(600.0, 400.0), 50), CANVAS);
        assert_eq!(step.damage, 0);
        assert_eq!(monsters[0].health, MONSTER_HEALTH);
    }

    #[test]
    fn test_independent_monsters_same_frame() {
        let mut monsters = vec![
            Monster::new(1, Vec2::new(200.0, 200.0), Vec2::ZERO, 0.0),
            Monster::new(2, Vec2::new(500.0, 300.0), Vec2::ZERO, 0.0),
        ];
        let mut particles = particles_at(Vec2::new(200.0, 200.0), 10);
        particles.extend(particles_at(Vec2::new(500.0, 300.0), 12));

        let mut reversed = monsters.clone();
        reversed.reverse();

        let a = step_monsters(&mut monsters, &particles, CANVAS);
        let b = step_monsters(&mut reversed, &particles, CANVAS);
        assert_eq!(a.defeats.len(), 2);
        assert_eq!(b.defeats.len(), 2);
        assert_eq!(a.damage, b.damage);
    }

    #[test]
    fn test_bounce_reverses_velocity() {
        let mut m = Monster::new(0, Vec2::new(41.0, 300.0), Vec2::new(-2.0, 0.0), 0.0);
        m.advance(CANVAS);
        assert!((m.velocity.x - 2.0).abs() < 1e-12);
        assert!(m.position.x >= m.radius);

        let mut m = Monster::new(0, Vec2::new(400.0, 559.0), Vec2::new(0.0, 2.0), 0.0);
        m.advance(CANVAS);
        assert!((m.velocity.y + 2.0).abs() < 1e-12);
        assert!(m.position.y <= CANVAS.height - m.radius);
    }

    #[test]
    fn test_bounce_on_tiny_canvas_centers() {
        let mut m = Monster::new(0, Vec2::new(10.0, 10.0), Vec2::new(1.0, 1.0), 0.0);
        m.advance(Bounds::new(50.0, 50.0));
        assert_eq!(m.position, Vec2::new(25.0, 25.0));
    }

    #[test]
    fn test_spawn_respects_margin() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut spawner = MonsterSpawner::new();
        let mut monsters = Vec::new();
        spawner.spawn_wave(&mut monsters, 200, CANVAS, &mut rng);

        assert_eq!(monsters.len(), 200);
        assert_eq!(spawner.spawned(), 200);
        for m in &monsters {
            assert!(m.position.x >= SPAWN_MARGIN && m.position.x < CANVAS.width - SPAWN_MARGIN);
            assert!(m.position.y >= SPAWN_MARGIN && m.position.y < CANVAS.height - SPAWN_MARGIN);
            assert!(m.velocity.x.abs() <= MONSTER_VELOCITY_SPREAD);
            assert!(m.velocity.y.abs() <= MONSTER_VELOCITY_SPREAD);
            assert_eq!(m.health, m.max_health);
        }
    }

    #[test]
    fn test_spawn_ids_are_unique() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut spawner = MonsterSpawner::new();
        let a = spawner.spawn(CANVAS, &mut rng);
        let b = spawner.spawn(CANVAS, &mut rng);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_health_ratio_clamped() {
        let mut m = still_monster(100.0, 100.0);
        m.take_damage(13);
        assert!(m.health_ratio().abs() < 1e-12);
        assert_eq!(m.health, -3);
    }
}
