//! Tidy Rush - a top-down room-cleanup arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout generation, movement, hazard, rules)
//! - `session`: Cooperative scheduler driving the simulation's periodic activities
//! - `input`: Allow-listed key state with focus-loss recovery
//! - `audio`: Fire-and-forget sound cue dispatch
//! - `profiles`: Player profile store (best/last run times)

pub mod audio;
pub mod input;
pub mod profiles;
pub mod session;
pub mod sim;

pub use audio::{AudioManager, Cue};
pub use input::InputState;
pub use profiles::{PlayerProfile, ProfileStore};
pub use session::Session;

use glam::Vec2;

use crate::sim::geometry::Rect;

/// Game configuration constants
pub mod consts {
    /// Room width in logical units
    pub const ROOM_WIDTH: f32 = 800.0;
    /// Room height in logical units
    pub const ROOM_HEIGHT: f32 = 600.0;

    /// Layout grid cell size; all placement is snapped to this
    pub const GRID_SIZE: f32 = 32.0;
    /// Non-placeable band around the room edges, in cells
    pub const MARGIN_CELLS: usize = 2;

    /// Player bounding box (square)
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Clutter item bounding box (square)
    pub const CLUTTER_SIZE: f32 = 24.0;
    /// Hazard bounding box (square)
    pub const HAZARD_SIZE: f32 = 60.0;

    /// Player speed in units per second
    pub const PLAYER_SPEED: f32 = 240.0;
    /// Applied per axis on diagonal movement so diagonal speed equals axial speed
    pub const DIAGONAL_FACTOR: f32 = 0.707;

    /// Hazard sweep: horizontal advance per hazard tick
    pub const HAZARD_STEP: f32 = 4.0;
    /// Vertical advance when the sweep reaches a room edge
    pub const HAZARD_ROW_STEP: f32 = HAZARD_SIZE;

    /// Fixed hazard tick interval (20 Hz)
    pub const HAZARD_DT: f32 = 0.05;
    /// Fixed timer tick interval (10 Hz): elapsed time and cooldown resolution
    pub const TIMER_DT: f32 = 0.1;
    /// Timer ticks per second (kept integral for countdown bookkeeping)
    pub const TIMER_TICKS_PER_SECOND: u32 = 10;

    /// Seconds a dropped item stays pickup-ineligible
    pub const DROP_COOLDOWN: f32 = 3.0;
    /// Seconds the player cannot be re-hit by the hazard
    pub const HIT_STUN: f32 = 3.0;

    /// Pre-round countdown steps, one second each
    pub const COUNTDOWN_STEPS: u32 = 3;
    /// Delay between round end and the session-end report
    pub const END_DISPLAY_DELAY: f32 = 1.0;

    /// Number of clutter items scattered per round (capped by free cells)
    pub const CLUTTER_COUNT: usize = 5;
}

/// Goal zone where carried items are deposited (centered on the bottom wall)
pub fn goal_zone() -> Rect {
    Rect::new(
        Vec2::new(consts::ROOM_WIDTH / 2.0 - 50.0, consts::ROOM_HEIGHT - 60.0),
        Vec2::new(100.0, 40.0),
    )
}

/// Exclusion rectangle around the goal zone; the player never spawns inside it
pub fn goal_exclusion_zone() -> Rect {
    Rect::new(
        Vec2::new(consts::ROOM_WIDTH / 2.0 - 75.0, consts::ROOM_HEIGHT - 100.0),
        Vec2::new(150.0, 80.0),
    )
}
