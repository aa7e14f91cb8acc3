//! Sound cue dispatch
//!
//! Playback itself is an external collaborator behind `CueBackend`; this
//! module owns the closed cue set, the event-to-cue lookup, and the
//! fire-and-forget policy: playback failures are logged and swallowed,
//! never propagated into gameplay.

use thiserror::Error;

use crate::sim::state::{GameEvent, Outcome};

/// The fixed cue set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player bumped furniture (or got clipped by the hazard)
    Bump,
    /// Item deposited, more remain
    Deposit,
    /// Round cleared
    Complete,
    /// Carried item dropped
    Drop,
    /// Countdown finished, round is live
    Start,
    /// Player left the game
    Exit,
}

impl Cue {
    pub const ALL: [Cue; 6] = [
        Cue::Bump,
        Cue::Deposit,
        Cue::Complete,
        Cue::Drop,
        Cue::Start,
        Cue::Exit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Cue::Bump => "bump",
            Cue::Deposit => "deposit",
            Cue::Complete => "complete",
            Cue::Drop => "drop",
            Cue::Start => "start",
            Cue::Exit => "exit",
        }
    }

    /// Lookup table from simulation events to cues. Events without a sound
    /// return None.
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Bump | GameEvent::PlayerHit => Some(Cue::Bump),
            GameEvent::Dropped { .. } => Some(Cue::Drop),
            GameEvent::Deposited { remaining, .. } if *remaining > 0 => Some(Cue::Deposit),
            GameEvent::Deposited { .. } => None, // the Complete cue covers the last one
            GameEvent::RoundStarted => Some(Cue::Start),
            GameEvent::RoundEnded {
                outcome: Outcome::Success,
            } => Some(Cue::Complete),
            GameEvent::RoundEnded { .. } => None,
            GameEvent::CountdownTick { .. }
            | GameEvent::PickedUp { .. }
            | GameEvent::Vacuumed { .. } => None,
        }
    }
}

/// A cue playback attempt failed (missing device, decode error, ...)
#[derive(Debug, Error)]
#[error("cue playback failed: {0}")]
pub struct PlaybackError(pub String);

/// Playback collaborator. Implementations live outside the game core.
pub trait CueBackend {
    fn play(&mut self, cue: Cue) -> Result<(), PlaybackError>;
    fn stop(&mut self, cue: Cue) -> Result<(), PlaybackError>;
}

/// Backend for headless runs: every cue is a no-op
#[derive(Debug, Default)]
pub struct NullBackend;

impl CueBackend for NullBackend {
    fn play(&mut self, _cue: Cue) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn stop(&mut self, _cue: Cue) -> Result<(), PlaybackError> {
        Ok(())
    }
}

/// Fire-and-forget cue dispatcher
pub struct AudioManager {
    backend: Box<dyn CueBackend>,
    muted: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn CueBackend>) -> Self {
        Self {
            backend,
            muted: false,
        }
    }

    /// Headless manager with no audible output
    pub fn disabled() -> Self {
        Self::new(Box::new(NullBackend))
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Play a cue. Failures are logged, gameplay continues unaffected.
    pub fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        if let Err(err) = self.backend.play(cue) {
            log::warn!("failed to play '{}': {}", cue.name(), err);
        }
    }

    /// Play whatever cue an event maps to, if any
    pub fn play_event(&mut self, event: &GameEvent) {
        if let Some(cue) = Cue::for_event(event) {
            self.play(cue);
        }
    }

    /// Stop a looping or in-flight cue
    pub fn stop(&mut self, cue: Cue) {
        if let Err(err) = self.backend.stop(cue) {
            log::warn!("failed to stop '{}': {}", cue.name(), err);
        }
    }

    /// Stop everything (round end, exit)
    pub fn stop_all(&mut self) {
        for cue in Cue::ALL {
            self.stop(cue);
        }
    }
}
