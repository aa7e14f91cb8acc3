//! Round session scheduler
//!
//! One logical thread, three periodic activities sharing one game state:
//! display-rate movement integration, a 20 Hz hazard tick, and a 10 Hz
//! timer tick. `frame` drains all three in order through the single
//! `sim::tick::step` reducer, so no two activities can interleave a
//! read-modify-write. Movement (and with it the deposit rule) runs before
//! the hazard, which makes Success win a same-frame tie against Caught.
//!
//! Entering a non-Active phase cancels the periodic activities and clears
//! input; the round summary is delivered exactly once, after a short display
//! delay.

use crate::consts::*;
use crate::input::InputState;
use crate::sim::layout::LayoutError;
use crate::sim::state::{GameEvent, GamePhase, GameState, Outcome};
use crate::sim::tick::{Step, step};

/// Cap on fixed-interval catch-up steps per frame, against spiral-of-death
/// after a long stall
const MAX_SUBSTEPS: u32 = 8;

/// What a finished round reports to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub outcome: Outcome,
    /// Play time accumulated when the round ended (persisted for both
    /// outcomes)
    pub elapsed: f32,
}

/// A single round of play: owns the game state and the scheduling
/// accumulators that drive it
pub struct Session {
    state: GameState,
    input: InputState,
    hazard_acc: f32,
    timer_acc: f32,
    summary: Option<RoundSummary>,
    end_delay: f32,
    report: Option<RoundSummary>,
    reported: bool,
}

impl Session {
    /// Start a round from a seed. A failed layout generation is surfaced and
    /// must prevent entering play.
    pub fn new(seed: u64) -> Result<Self, LayoutError> {
        Ok(Self::from_state(GameState::new(seed)?))
    }

    fn from_state(state: GameState) -> Self {
        Self {
            state,
            input: InputState::default(),
            hazard_acc: 0.0,
            timer_acc: 0.0,
            summary: None,
            end_delay: 0.0,
            report: None,
            reported: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Forward a key press from the platform layer
    pub fn key_down(&mut self, code: &str, modifier_held: bool) {
        self.input.key_down(code, modifier_held);
    }

    /// Forward a key release from the platform layer
    pub fn key_up(&mut self, code: &str) {
        self.input.key_up(code);
    }

    /// Focus loss / visibility change: clear every held key. The host stops
    /// calling `frame` while suspended; on refocus, play resumes from a
    /// clean input state.
    pub fn suspend(&mut self) {
        log::debug!("input suspended, clearing held keys");
        self.input.clear();
    }

    /// Advance one display frame worth of real time and drain the resulting
    /// events
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.min(0.1);
        let mut events = Vec::new();

        if self.summary.is_some() {
            // Round over: periodic activities are cancelled, only the
            // display delay keeps running
            self.run_end_delay(dt);
            return events;
        }

        step(
            &mut self.state,
            Step::Movement {
                input: self.input.move_input(),
                action_held: self.input.action_held(),
                dt,
            },
            &mut events,
        );

        self.hazard_acc += dt;
        let mut substeps = 0;
        while self.hazard_acc >= HAZARD_DT && substeps < MAX_SUBSTEPS {
            step(&mut self.state, Step::Hazard, &mut events);
            self.hazard_acc -= HAZARD_DT;
            substeps += 1;
        }

        self.timer_acc += dt;
        let mut substeps = 0;
        while self.timer_acc >= TIMER_DT && substeps < MAX_SUBSTEPS {
            step(&mut self.state, Step::Timer, &mut events);
            self.timer_acc -= TIMER_DT;
            substeps += 1;
        }

        if let GamePhase::Ended(outcome) = self.state.phase {
            // First observation of the terminal phase: cancel the periodic
            // activities and latch the summary exactly once
            if self.summary.is_none() {
                self.summary = Some(RoundSummary {
                    outcome,
                    elapsed: self.state.elapsed,
                });
                self.end_delay = END_DISPLAY_DELAY;
                self.hazard_acc = 0.0;
                self.timer_acc = 0.0;
                self.input.clear();
            }
        }

        events
    }

    fn run_end_delay(&mut self, dt: f32) {
        if self.reported {
            return;
        }
        self.end_delay -= dt;
        if self.end_delay <= 0.0 {
            self.report = self.summary;
            self.reported = true;
        }
    }

    /// The round summary, available once after the end display delay.
    /// Subsequent calls return None, so the session-end callback and score
    /// submission can never run twice.
    pub fn take_report(&mut self) -> Option<RoundSummary> {
        self.report.take()
    }

    /// True once the round has ended (the report may still be pending its
    /// display delay)
    pub fn finished(&self) -> bool {
        self.summary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal_zone;
    use crate::sim::state::{ClutterItem, ClutterState, HazardState, PlayerState};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn bare_state() -> GameState {
        GameState {
            seed: 0,
            phase: GamePhase::Active,
            elapsed: 0.0,
            countdown_ticks: 0,
            obstacles: Vec::new(),
            clutter: Vec::new(),
            player: PlayerState::new(Vec2::new(400.0, 300.0)),
            hazard: HazardState::new(),
        }
    }

    fn item(id: u32, pos: Vec2) -> ClutterItem {
        ClutterItem {
            id,
            pos,
            glyph: "*".into(),
            state: ClutterState::Free,
        }
    }

    #[test]
    fn test_countdown_then_active() {
        let mut session = Session::new(3).expect("layout");
        assert_eq!(session.state().phase, GamePhase::CountingDown);

        let mut started = false;
        for _ in 0..240 {
            if session.frame(DT).contains(&GameEvent::RoundStarted) {
                started = true;
                break;
            }
        }
        assert!(started);
        assert_eq!(session.state().phase, GamePhase::Active);
    }

    #[test]
    fn test_hazard_and_timer_accumulate_independently() {
        let mut session = Session::from_state(bare_state());
        let start_x = session.state().hazard.pos.x;

        // One 50 ms frame: exactly one hazard step, zero timer... then the
        // next frame crosses the 0.1 s timer boundary
        session.frame(0.05);
        assert_eq!(session.state().hazard.pos.x, start_x + HAZARD_STEP);
        assert_eq!(session.state().elapsed, 0.0);

        session.frame(0.05);
        assert_eq!(session.state().hazard.pos.x, start_x + 2.0 * HAZARD_STEP);
        assert!((session.state().elapsed - TIMER_DT).abs() < 1e-6);
    }

    #[test]
    fn test_report_delivered_once_after_delay() {
        let mut state = bare_state();
        state.player.pos = goal_zone().pos;
        state.elapsed = 12.3;
        state.clutter.push(item(1, goal_zone().pos));
        let mut session = Session::from_state(state);

        session.key_down("Space", false);
        let events = session.frame(DT);
        assert!(events.contains(&GameEvent::RoundEnded {
            outcome: Outcome::Success
        }));
        assert!(session.finished());
        assert!(session.take_report().is_none(), "report before delay");

        // Drive past the end display delay
        let delay_frames = (END_DISPLAY_DELAY / DT) as usize + 2;
        for _ in 0..delay_frames {
            session.frame(DT);
        }

        let report = session.take_report().expect("one report");
        assert_eq!(report.outcome, Outcome::Success);
        assert!((report.elapsed - 12.3).abs() < 1e-3);

        // Never a second report, no matter how long we keep framing
        for _ in 0..delay_frames {
            session.frame(DT);
        }
        assert!(session.take_report().is_none());
    }

    #[test]
    fn test_end_cancels_activities_and_input() {
        let mut state = bare_state();
        state.player.pos = goal_zone().pos;
        state.clutter.push(item(1, goal_zone().pos));
        let mut session = Session::from_state(state);

        session.key_down("Space", false);
        session.key_down("ArrowRight", false);
        session.frame(DT);
        assert!(session.finished());

        let hazard_pos = session.state().hazard.pos;
        let elapsed = session.state().elapsed;
        let player_pos = session.state().player.pos;
        for _ in 0..120 {
            session.frame(DT);
        }
        // Hazard, timer, and movement all stopped dead
        assert_eq!(session.state().hazard.pos, hazard_pos);
        assert_eq!(session.state().elapsed, elapsed);
        assert_eq!(session.state().player.pos, player_pos);
    }

    #[test]
    fn test_suspend_clears_held_keys() {
        let mut session = Session::from_state(bare_state());
        session.key_down("ArrowRight", false);
        let before = session.state().player.pos;
        session.frame(DT);
        assert!(session.state().player.pos.x > before.x);

        session.suspend();
        let held = session.state().player.pos;
        session.frame(DT);
        assert_eq!(session.state().player.pos, held);
    }
}
