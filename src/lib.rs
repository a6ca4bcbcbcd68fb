// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Handswarm: a hand-gesture driven particle swarm game.
//!
//! A pinch drags the swarm leader and its followers across the canvas, an
//! open palm sends the swarm orbiting the hand, and every particle touching
//! a monster chips away one health point per frame.
//!
//! The simulation core is deterministic: a config (with its seed) plus the
//! landmark sample of every frame reproduces a session exactly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Frame loop (session, scheduler)   │
//! ├──────────────────┬──────────────────┤
//! │  Landmark input  │   Render surface │
//! ├──────────────────┴──────────────────┤
//! │  Gesture │ Swarm │ Monsters │ State │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod render;
pub mod replay;
pub mod session;

pub use config::GameConfig;
pub use error::{ConfigError, LandmarkError};

// Re-export key game types at crate root for convenience
pub use game::{
    classify, Bounds, GameState, GestureIntent, Landmark, LandmarkFrame, Monster, Particle, Vec2,
};
pub use input::LandmarkSource;
pub use render::RenderSnapshot;
pub use replay::{Recording, RecordingError, ReplayEngine, ResizeEvent};
pub use session::{run, run_headless, FrameOutcome, Scheduler, SessionSummary, Simulation};
