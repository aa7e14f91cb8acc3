//! Single state-update entry point
//!
//! Every mutation of `GameState` flows through `step`, which takes the
//! previous state and one scheduled activity and applies the next state in
//! place, pushing any resulting events. The session invokes it serially, so
//! the three periodic activities can never interleave a read-modify-write.

use super::hazard;
use super::movement::{self, MoveInput};
use super::state::{ClutterState, GameEvent, GamePhase, GameState, Outcome};
use crate::consts::*;
use crate::goal_zone;

/// One scheduled activity to apply to the state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Display-rate movement integration with real elapsed time
    Movement {
        input: MoveInput,
        action_held: bool,
        dt: f32,
    },
    /// Fixed-interval hazard advance (20 Hz)
    Hazard,
    /// Fixed-interval time accrual and cooldown decay (10 Hz)
    Timer,
}

/// Advance the game state by one activity
pub fn step(state: &mut GameState, activity: Step, events: &mut Vec<GameEvent>) {
    match activity {
        Step::Movement {
            input,
            action_held,
            dt,
        } => movement_step(state, input, action_held, dt, events),
        Step::Hazard => hazard::step(state, events),
        Step::Timer => timer_step(state, events),
    }
}

fn movement_step(
    state: &mut GameState,
    input: MoveInput,
    action_held: bool,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    if state.phase != GamePhase::Active {
        return;
    }

    let moved = movement::resolve(state.player.pos, input, &state.obstacles, dt);
    state.player.pos = moved.pos;

    if moved.collided {
        events.push(GameEvent::Bump);
        // Bumping furniture knocks the carried item loose
        drop_carried(state, events);
    }

    if !action_held {
        drop_carried(state, events);
    }

    // Carried item rides along with the player
    if let Some(id) = state.player.carrying {
        if let Some(item) = state.clutter_by_id(id) {
            item.pos = moved.pos;
        }
    }

    if action_held && state.player.carrying.is_none() {
        try_pickup(state, events);
    }

    try_deposit(state, events);
}

/// Pickup rule: overlap + hold + empty hands + an eligible item
fn try_pickup(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.rect();
    let found = state
        .clutter
        .iter_mut()
        .find(|c| c.pickup_eligible() && player.overlaps(&c.rect()));

    if let Some(item) = found {
        item.state = ClutterState::Carried;
        item.pos = state.player.pos;
        let id = item.id;
        state.player.carrying = Some(id);
        events.push(GameEvent::PickedUp { item: id });
    }
}

/// Drop rule: the carried item lands at the player's position and starts its
/// pickup cooldown
fn drop_carried(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(id) = state.player.carrying.take() else {
        return;
    };
    let pos = state.player.pos;
    if let Some(item) = state.clutter_by_id(id) {
        item.pos = pos;
        item.state = ClutterState::Dropped {
            cooldown: DROP_COOLDOWN,
        };
    }
    events.push(GameEvent::Dropped { item: id });
}

/// Deposit rule: carrying + goal-zone overlap removes the item permanently;
/// clearing the last item wins the round
fn try_deposit(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(id) = state.player.carrying else {
        return;
    };
    if !state.player.rect().overlaps(&goal_zone()) {
        return;
    }

    state.player.carrying = None;
    let remaining = state.remove_clutter(id);
    events.push(GameEvent::Deposited {
        item: id,
        remaining,
    });

    if remaining == 0 {
        state.phase = GamePhase::Ended(Outcome::Success);
        events.push(GameEvent::RoundEnded {
            outcome: Outcome::Success,
        });
    }
}

fn timer_step(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.phase {
        GamePhase::CountingDown => {
            state.countdown_ticks = state.countdown_ticks.saturating_sub(1);
            if state.countdown_ticks == 0 {
                state.phase = GamePhase::Active;
                events.push(GameEvent::RoundStarted);
            } else if state.countdown_ticks % TIMER_TICKS_PER_SECOND == 0 {
                events.push(GameEvent::CountdownTick {
                    remaining: state.countdown_ticks / TIMER_TICKS_PER_SECOND,
                });
            }
        }
        GamePhase::Active => {
            state.elapsed += TIMER_DT;

            for item in &mut state.clutter {
                if let ClutterState::Dropped { cooldown } = &mut item.state {
                    *cooldown -= TIMER_DT;
                    if *cooldown <= 0.0 {
                        item.state = ClutterState::Free;
                    }
                }
            }

            state.player.hit_cooldown = (state.player.hit_cooldown - TIMER_DT).max(0.0);
        }
        GamePhase::Ended(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ClutterItem, HazardState, PlayerState};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn active_state() -> GameState {
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

    fn movement(input: MoveInput, action_held: bool) -> Step {
        Step::Movement {
            input,
            action_held,
            dt: DT,
        }
    }

    #[test]
    fn test_countdown_runs_then_round_starts() {
        let mut state = active_state();
        state.phase = GamePhase::CountingDown;
        state.countdown_ticks = COUNTDOWN_STEPS * TIMER_TICKS_PER_SECOND;
        let mut events = Vec::new();

        for _ in 0..30 {
            step(&mut state, Step::Timer, &mut events);
        }

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(
            events,
            vec![
                GameEvent::CountdownTick { remaining: 2 },
                GameEvent::CountdownTick { remaining: 1 },
                GameEvent::RoundStarted,
            ]
        );
        // Countdown time never counts toward the run
        assert_eq!(state.elapsed, 0.0);
    }

    #[test]
    fn test_movement_ignored_during_countdown() {
        let mut state = active_state();
        state.phase = GamePhase::CountingDown;
        let start = state.player.pos;
        let mut events = Vec::new();

        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        step(&mut state, movement(input, false), &mut events);
        assert_eq!(state.player.pos, start);
        assert!(events.is_empty());
    }

    #[test]
    fn test_pickup_attaches_item() {
        let mut state = active_state();
        state.clutter.push(item(5, state.player.pos));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);

        assert_eq!(state.player.carrying, Some(5));
        assert_eq!(state.clutter[0].state, ClutterState::Carried);
        assert!(events.contains(&GameEvent::PickedUp { item: 5 }));
    }

    #[test]
    fn test_pickup_requires_empty_hands() {
        let mut state = active_state();
        state.clutter.push(item(1, state.player.pos));
        state.clutter.push(item(2, state.player.pos));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        step(&mut state, movement(MoveInput::default(), true), &mut events);

        assert_eq!(state.player.carrying, Some(1));
        assert_eq!(state.clutter[1].state, ClutterState::Free);
    }

    #[test]
    fn test_release_drops_with_cooldown() {
        let mut state = active_state();
        state.clutter.push(item(5, state.player.pos));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        step(&mut state, movement(MoveInput::default(), false), &mut events);

        assert_eq!(state.player.carrying, None);
        assert_eq!(
            state.clutter[0].state,
            ClutterState::Dropped {
                cooldown: DROP_COOLDOWN
            }
        );
        assert_eq!(state.clutter[0].pos, state.player.pos);
        assert!(events.contains(&GameEvent::Dropped { item: 5 }));
    }

    #[test]
    fn test_dropped_item_ineligible_until_cooldown_expires() {
        let mut state = active_state();
        state.clutter.push(item(5, state.player.pos));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        step(&mut state, movement(MoveInput::default(), false), &mut events);

        // Holding again right away must not re-grab it
        step(&mut state, movement(MoveInput::default(), true), &mut events);
        assert_eq!(state.player.carrying, None);

        // 3 seconds of timer ticks expire the cooldown
        for _ in 0..30 {
            step(&mut state, Step::Timer, &mut events);
        }
        assert_eq!(state.clutter[0].state, ClutterState::Free);

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        assert_eq!(state.player.carrying, Some(5));
    }

    #[test]
    fn test_bump_drops_carried_item() {
        use crate::sim::geometry::Rect;
        use crate::sim::state::Obstacle;

        let mut state = active_state();
        state.player.pos = Vec2::new(128.0, 100.0);
        state.obstacles.push(Obstacle {
            id: 1,
            kind: "desk".into(),
            rect: Rect::new(Vec2::new(162.0, 0.0), Vec2::new(32.0, 600.0)),
            glyph: String::new(),
        });
        state.clutter.push(item(5, state.player.pos));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        assert_eq!(state.player.carrying, Some(5));

        let input = MoveInput {
            right: true,
            ..Default::default()
        };
        // Walk into the wall
        step(&mut state, movement(input, true), &mut events);

        assert!(events.contains(&GameEvent::Bump));
        assert_eq!(state.player.carrying, None);
        assert!(matches!(
            state.clutter[0].state,
            ClutterState::Dropped { .. }
        ));
    }

    #[test]
    fn test_deposit_removes_item() {
        let mut state = active_state();
        let goal = goal_zone();
        state.player.pos = goal.pos;
        state.clutter.push(item(1, goal.pos));
        state.clutter.push(item(2, Vec2::new(100.0, 100.0)));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        assert_eq!(state.player.carrying, None);
        assert_eq!(state.clutter.len(), 1);
        assert!(events.contains(&GameEvent::Deposited {
            item: 1,
            remaining: 1
        }));
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_depositing_last_item_wins() {
        let mut state = active_state();
        let goal = goal_zone();
        state.player.pos = goal.pos;
        state.clutter.push(item(1, goal.pos));
        let mut events = Vec::new();

        step(&mut state, movement(MoveInput::default(), true), &mut events);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Success));
        assert!(events.contains(&GameEvent::RoundEnded {
            outcome: Outcome::Success
        }));

        // Ended state accepts no further work: no re-entry into Active
        step(&mut state, movement(MoveInput::default(), true), &mut events);
        step(&mut state, Step::Hazard, &mut events);
        step(&mut state, Step::Timer, &mut events);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Success));
        let ends = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_timer_accrues_elapsed_at_tenths() {
        let mut state = active_state();
        let mut events = Vec::new();
        for _ in 0..25 {
            step(&mut state, Step::Timer, &mut events);
        }
        assert!((state.elapsed - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_stun_decays_on_timer() {
        let mut state = active_state();
        state.player.hit_cooldown = HIT_STUN;
        let mut events = Vec::new();
        for _ in 0..30 {
            step(&mut state, Step::Timer, &mut events);
        }
        assert_eq!(state.player.hit_cooldown, 0.0);
    }
}
