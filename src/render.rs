//! Render snapshots and a plain-text renderer.
//!
//! A [`RenderSnapshot`] is a copy of everything needed to draw one frame,
//! so a renderer never holds on to the simulation. Draw order is swarm,
//! then monsters, then the hand overlay.

use std::fmt::Write as _;

use crate::game::{Bounds, Vec2, HAND_CONNECTIONS, LANDMARK_COUNT};
use crate::session::Simulation;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Create a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Follower color.
pub const PARTICLE_COLOR: Rgb = Rgb::new(100, 200, 255);
/// Leader color.
pub const LEADER_COLOR: Rgb = Rgb::new(255, 255, 255);
/// Hand overlay color.
pub const HAND_COLOR: Rgb = Rgb::new(0, 255, 0);
/// Health bar background.
pub const HEALTH_BAR_BACKGROUND: Rgb = Rgb::new(50, 50, 50);
/// Monster saturation, as a fraction.
pub const MONSTER_SATURATION: f64 = 0.7;
/// Monster lightness, as a fraction.
pub const MONSTER_LIGHTNESS: f64 = 0.5;
/// Health bar height in pixels.
pub const HEALTH_BAR_HEIGHT: f64 = 6.0;
/// Gap between the top of a monster and its health bar, in pixels.
pub const HEALTH_BAR_OFFSET: f64 = 15.0;
/// Hand keypoint dot radius in pixels.
pub const HAND_POINT_RADIUS: f64 = 3.0;

/// Convert HSL (hue in degrees, saturation and lightness in `[0, 1]`) to RGB.
#[must_use]
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h {
        h if h < 1.0 => (chroma, x, 0.0),
        h if h < 2.0 => (x, chroma, 0.0),
        h if h < 3.0 => (0.0, chroma, x),
        h if h < 4.0 => (0.0, x, chroma),
        h if h < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Health bar color band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTier {
    /// Above half health.
    Healthy,
    /// Above a quarter.
    Wounded,
    /// A quarter or less.
    Critical,
}

impl HealthTier {
    /// Tier for a health ratio in `[0, 1]`.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.5 {
            Self::Healthy
        } else if ratio > 0.25 {
            Self::Wounded
        } else {
            Self::Critical
        }
    }

    /// Bar fill color.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Healthy => Rgb::new(0, 255, 0),
            Self::Wounded => Rgb::new(255, 255, 0),
            Self::Critical => Rgb::new(255, 0, 0),
        }
    }
}

/// One swarm member, ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    /// Center.
    pub position: Vec2,
    /// Draw radius.
    pub radius: f64,
    /// Fill color.
    pub color: Rgb,
    /// Whether this is the leader.
    pub leader: bool,
}

/// One monster, ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterSprite {
    /// Monster id.
    pub id: u32,
    /// Center.
    pub position: Vec2,
    /// Draw radius.
    pub radius: f64,
    /// Fill color.
    pub color: Rgb,
    /// Remaining health fraction.
    pub health_ratio: f64,
    /// Health bar color band.
    pub tier: HealthTier,
}

impl MonsterSprite {
    /// Top-left corner of the health bar, which spans the monster's diameter.
    #[must_use]
    pub fn health_bar_origin(&self) -> Vec2 {
        Vec2::new(
            self.position.x - self.radius,
            self.position.y - self.radius - HEALTH_BAR_OFFSET,
        )
    }

    /// Width of the filled part of the health bar.
    #[must_use]
    pub fn health_bar_fill(&self) -> f64 {
        self.radius * 2.0 * self.health_ratio
    }
}

/// Detected hand keypoints in canvas space, plus the skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandOverlay {
    /// Keypoints in detector order.
    pub points: [Vec2; LANDMARK_COUNT],
}

impl HandOverlay {
    /// Line segments of the hand skeleton.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        HAND_CONNECTIONS
            .iter()
            .map(|&(a, b)| (self.points[a], self.points[b]))
    }
}

/// Heads-up display values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    /// Score.
    pub score: u64,
    /// Wave.
    pub wave: u32,
    /// Combo.
    pub combo: u32,
    /// Measured frames per second.
    pub fps: u32,
    /// Current gesture label.
    pub mode: &'static str,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    /// Canvas size.
    pub bounds: Bounds,
    /// Swarm, leader included.
    pub particles: Vec<ParticleSprite>,
    /// Monsters in play.
    pub monsters: Vec<MonsterSprite>,
    /// Hand overlay, when a hand was sampled this frame.
    pub hand: Option<HandOverlay>,
    /// Gesture target, if any.
    pub target: Option<Vec2>,
    /// HUD readout.
    pub hud: Hud,
}

impl RenderSnapshot {
    /// Copy the drawable state out of a simulation.
    #[must_use]
    pub fn capture(sim: &Simulation) -> Self {
        let bounds = sim.bounds();

        let particles = sim
            .particles()
            .iter()
            .map(|p| ParticleSprite {
                position: p.position,
                radius: p.draw_radius(),
                color: if p.is_leader() {
                    LEADER_COLOR
                } else {
                    PARTICLE_COLOR
                },
                leader: p.is_leader(),
            })
            .collect();

        let monsters = sim
            .monsters()
            .iter()
            .map(|m| {
                let health_ratio = m.health_ratio();
                MonsterSprite {
                    id: m.id,
                    position: m.position,
                    radius: m.radius,
                    color: hsl_to_rgb(m.hue, MONSTER_SATURATION, MONSTER_LIGHTNESS),
                    health_ratio,
                    tier: HealthTier::from_ratio(health_ratio),
                }
            })
            .collect();

        let hand = sim.landmarks().map(|frame| HandOverlay {
            points: frame.points().map(|p| p.to_canvas(bounds)),
        });

        let state = sim.state();
        let intent = sim.intent();
        Self {
            bounds,
            particles,
            monsters,
            hand,
            target: intent.target(),
            hud: Hud {
                score: state.score(),
                wave: state.wave(),
                combo: state.combo(),
                fps: state.fps(),
                mode: intent.label(),
            },
        }
    }
}

/// Render a snapshot as a `cols` x `rows` character grid under a HUD line.
///
/// Legend: `@` leader, `.` follower, `#` monster body, digits 0-9 monster
/// health in tenths at the monster center, `+` hand keypoint.
#[must_use]
pub fn render_ascii(snapshot: &RenderSnapshot, cols: usize, rows: usize) -> String {
    let mut grid = vec![vec![' '; cols]; rows];
    let bounds = snapshot.bounds;

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let cell = |p: Vec2| -> Option<(usize, usize)> {
        if !bounds.contains(p) {
            return None;
        }
        let col = (p.x / bounds.width * cols as f64) as usize;
        let row = (p.y / bounds.height * rows as f64) as usize;
        (col < cols && row < rows).then_some((col, row))
    };

    for p in &snapshot.particles {
        if let Some((c, r)) = cell(p.position) {
            if p.leader || grid[r][c] != '@' {
                grid[r][c] = if p.leader { '@' } else { '.' };
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let cell_size = Vec2::new(bounds.width / cols as f64, bounds.height / rows as f64);
    for m in &snapshot.monsters {
        for (r, line) in grid.iter_mut().enumerate() {
            for (c, ch) in line.iter_mut().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let center = Vec2::new(
                    (c as f64 + 0.5) * cell_size.x,
                    (r as f64 + 0.5) * cell_size.y,
                );
                if center.distance(m.position) < m.radius {
                    *ch = '#';
                }
            }
        }
        if let Some((c, r)) = cell(m.position) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let tenths = (m.health_ratio * 10.0).ceil().clamp(0.0, 9.0) as u32;
            grid[r][c] = char::from_digit(tenths, 10).unwrap_or('#');
        }
    }

    if let Some(hand) = &snapshot.hand {
        for p in hand.points {
            if let Some((c, r)) = cell(p) {
                grid[r][c] = '+';
            }
        }
    }

    let hud = &snapshot.hud;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "score {}  wave {}  combo {}  fps {}  mode {}",
        hud.score, hud.wave, hud.combo, hud.fps, hud.mode
    );
    for line in grid {
        out.extend(line);
        out.push('\n');
    }
    out
}
