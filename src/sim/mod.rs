//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed or caller-supplied timesteps only
//! - Seeded RNG only (layout generation)
//! - Every mutation flows through `tick::step`
//! - No rendering, audio, or platform dependencies

pub mod geometry;
pub mod hazard;
pub mod layout;
pub mod movement;
pub mod state;
pub mod tick;

pub use geometry::Rect;
pub use layout::{Layout, LayoutError, generate_layout};
pub use state::{
    ClutterItem, ClutterState, GameEvent, GamePhase, GameState, HazardState, Obstacle, Outcome,
    PlayerState, SweepDirection,
};
pub use tick::{Step, step};
