//! Score, wave and combo bookkeeping.

use serde::Serialize;

use crate::game::DefeatEvent;

/// Points awarded per defeated monster.
pub const POINTS_PER_DEFEAT: u64 = 100;

/// Wave `w` spawns `BASE_SPAWN_COUNT + w` monsters.
pub const BASE_SPAWN_COUNT: usize = 3;

/// Wave number at session start.
pub const INITIAL_WAVE: u32 = 1;

/// Monsters present at session start.
pub const INITIAL_MONSTERS: usize = 3;

/// Number of monsters spawned when `wave` begins.
#[must_use]
pub fn spawn_count(wave: u32) -> usize {
    BASE_SPAWN_COUNT.saturating_add(usize::try_from(wave).unwrap_or(usize::MAX))
}

/// Read-only game progress counters.
///
/// Mutation goes through [`GameState::record_defeats`] and
/// [`GameState::advance_wave`] only, so `score` always equals
/// `POINTS_PER_DEFEAT * defeated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameState {
    score: u64,
    wave: u32,
    combo: u32,
    fps: u32,
    defeated: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh session: wave 1, nothing scored.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            wave: INITIAL_WAVE,
            combo: 0,
            fps: 0,
            defeated: 0,
        }
    }

    /// Total points.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Current wave number.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Defeats so far. Never resets.
    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    /// Frames completed in the last full one-second window.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Total monsters defeated this session.
    #[must_use]
    pub const fn defeated(&self) -> u64 {
        self.defeated
    }

    /// Credit each defeat with points and combo.
    pub fn record_defeats(&mut self, defeats: &[DefeatEvent]) {
        for _ in defeats {
            self.score = self.score.saturating_add(POINTS_PER_DEFEAT);
            self.combo = self.combo.saturating_add(1);
            self.defeated = self.defeated.saturating_add(1);
        }
    }

    /// Start the next wave. Returns how many monsters to spawn for it.
    pub fn advance_wave(&mut self) -> usize {
        self.wave = self.wave.saturating_add(1);
        spawn_count(self.wave)
    }

    pub(crate) fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }
}
