//! Game state and core simulation types
//!
//! The `GameState` aggregate is owned by the session and only ever mutated
//! through `tick::step`; everything else gets read snapshots.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::layout::{self, LayoutError};
use crate::consts::*;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-round countdown, input ignored
    CountingDown,
    /// Active gameplay
    Active,
    /// Round finished; no further simulation work
    Ended(Outcome),
}

/// How a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every clutter item left the room (deposited or vacuumed, last one deposited)
    Success,
    /// The hazard finished its sweep of the room
    Caught,
}

/// Clutter lifecycle: free on the floor, carried by the player, or dropped
/// and cooling down before it can be picked up again
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClutterState {
    Free,
    Carried,
    Dropped { cooldown: f32 },
}

/// A collectible item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClutterItem {
    pub id: u32,
    pub pos: Vec2,
    pub glyph: String,
    pub state: ClutterState,
}

impl ClutterItem {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, CLUTTER_SIZE)
    }

    /// Eligible for pickup: free, or dropped with an expired cooldown
    pub fn pickup_eligible(&self) -> bool {
        match self.state {
            ClutterState::Free => true,
            ClutterState::Carried => false,
            ClutterState::Dropped { cooldown } => cooldown <= 0.0,
        }
    }

    /// On the floor (not attached to the player)
    pub fn on_floor(&self) -> bool {
        !matches!(self.state, ClutterState::Carried)
    }
}

/// A static furniture obstacle. Immutable once placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: String,
    pub rect: Rect,
    pub glyph: String,
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    /// Item currently carried (at most one)
    pub carrying: Option<u32>,
    /// Seconds until the hazard can hit the player again
    pub hit_cooldown: f32,
}

impl PlayerState {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            carrying: None,
            hit_cooldown: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, PLAYER_SIZE)
    }
}

/// Horizontal sweep direction; vertical variants reserved for future patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SweepDirection {
    /// Horizontal unit component of this direction
    pub fn dx(self) -> f32 {
        match self {
            SweepDirection::Left => -1.0,
            SweepDirection::Right => 1.0,
            SweepDirection::Up | SweepDirection::Down => 0.0,
        }
    }

    /// Reverse a horizontal direction
    pub fn reversed(self) -> Self {
        match self {
            SweepDirection::Left => SweepDirection::Right,
            SweepDirection::Right => SweepDirection::Left,
            SweepDirection::Up => SweepDirection::Down,
            SweepDirection::Down => SweepDirection::Up,
        }
    }
}

/// The autonomous sweeping hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardState {
    pub pos: Vec2,
    pub direction: SweepDirection,
}

impl HazardState {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            direction: SweepDirection::Right,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, HAZARD_SIZE)
    }
}

impl Default for HazardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events produced by the reducer, consumed by the session for cue playback
/// and score reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A whole second of the countdown elapsed; `remaining` seconds left
    CountdownTick { remaining: u32 },
    /// Countdown finished, round is live
    RoundStarted,
    /// Constrained movement blocked at least one axis this tick
    Bump,
    PickedUp { item: u32 },
    Dropped { item: u32 },
    Deposited { item: u32, remaining: usize },
    /// The hazard removed a floor item
    Vacuumed { item: u32, remaining: usize },
    /// The hazard touched the player (starts the stun cooldown)
    PlayerHit,
    RoundEnded { outcome: Outcome },
}

/// Complete game state (deterministic given the seed, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Accumulated play time in seconds (0.1 s resolution)
    pub elapsed: f32,
    /// Remaining 0.1 s timer ticks of the pre-round countdown
    pub countdown_ticks: u32,
    /// Furniture obstacles, immutable for the round
    pub obstacles: Vec<Obstacle>,
    /// Active clutter items; emptied as items are deposited or vacuumed
    pub clutter: Vec<ClutterItem>,
    pub player: PlayerState,
    pub hazard: HazardState,
}

impl GameState {
    /// Generate a fresh round from a seed.
    ///
    /// Fails with `LayoutError` if no valid room arrangement exists after
    /// bounded retries; an invalid layout is never returned.
    pub fn new(seed: u64) -> Result<Self, LayoutError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = layout::generate_layout(&mut rng)?;

        Ok(Self {
            seed,
            phase: GamePhase::CountingDown,
            elapsed: 0.0,
            countdown_ticks: COUNTDOWN_STEPS * TIMER_TICKS_PER_SECOND,
            obstacles: layout.obstacles,
            clutter: layout.clutter,
            player: PlayerState::new(layout.spawn),
            hazard: HazardState::new(),
        })
    }

    /// Obstacle rects for collision queries
    pub fn obstacle_rects(&self) -> impl Iterator<Item = &Rect> {
        self.obstacles.iter().map(|o| &o.rect)
    }

    pub fn clutter_by_id(&mut self, id: u32) -> Option<&mut ClutterItem> {
        self.clutter.iter_mut().find(|c| c.id == id)
    }

    /// Remove an item from the active set. Returns how many remain.
    pub fn remove_clutter(&mut self, id: u32) -> usize {
        self.clutter.retain(|c| c.id != id);
        self.clutter.len()
    }
}
