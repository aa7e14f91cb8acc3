//! The patrolling vacuum hazard
//!
//! Runs on its own fixed-interval clock, sweeping the room boustrophedon
//! style: across the current row, then one row down and back the other way.
//! Obstacles act as walls (the sweep reverses), floor clutter is vacuumed up
//! on contact, and finishing the bottom row catches the player out.

use super::state::{GameEvent, GamePhase, GameState, Outcome};
use crate::consts::*;

/// Advance the hazard by one fixed tick and resolve its collisions.
///
/// May end the round: `Ended(Caught)` when the sweep runs off the bottom
/// edge, `Ended(Success)` when vacuuming clears the last active item.
pub fn step(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Active {
        return;
    }

    let max_x = ROOM_WIDTH - HAZARD_SIZE;
    let max_y = ROOM_HEIGHT - HAZARD_SIZE;

    let candidate_x = state.hazard.pos.x + state.hazard.direction.dx() * HAZARD_STEP;
    let mut candidate = state.hazard.rect();
    candidate.pos.x = candidate_x.clamp(0.0, max_x);

    if candidate.overlaps_any(state.obstacle_rects()) {
        // Obstacle acts as a wall: reverse instead of advancing
        state.hazard.direction = state.hazard.direction.reversed();
    } else if candidate_x < 0.0 || candidate_x > max_x {
        // Reached a room edge: clamp, drop one row, sweep back
        state.hazard.pos.x = candidate_x.clamp(0.0, max_x);
        if state.hazard.pos.y + HAZARD_ROW_STEP > max_y {
            state.phase = GamePhase::Ended(Outcome::Caught);
            events.push(GameEvent::RoundEnded {
                outcome: Outcome::Caught,
            });
            return;
        }
        state.hazard.pos.y += HAZARD_ROW_STEP;
        state.hazard.direction = state.hazard.direction.reversed();
    } else {
        state.hazard.pos.x = candidate_x;
    }

    resolve_contacts(state, events);
}

/// Hazard-vs-player and hazard-vs-clutter collision checks at the current
/// hazard position
fn resolve_contacts(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hazard = state.hazard.rect();

    if state.player.hit_cooldown <= 0.0 && hazard.overlaps(&state.player.rect()) {
        state.player.hit_cooldown = HIT_STUN;
        events.push(GameEvent::PlayerHit);
    }

    // Vacuum every floor item under the hazard; carried items are attached to
    // the player and out of reach
    let swallowed: Vec<u32> = state
        .clutter
        .iter()
        .filter(|c| c.on_floor() && hazard.overlaps(&c.rect()))
        .map(|c| c.id)
        .collect();

    for id in swallowed {
        let remaining = state.remove_clutter(id);
        events.push(GameEvent::Vacuumed { item: id, remaining });

        if remaining == 0 {
            state.phase = GamePhase::Ended(Outcome::Success);
            events.push(GameEvent::RoundEnded {
                outcome: Outcome::Success,
            });
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{
        ClutterItem, ClutterState, HazardState, Obstacle, PlayerState, SweepDirection,
    };
    use crate::sim::geometry::Rect;
    use glam::Vec2;

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

    #[test]
    fn test_sweeps_right_then_drops_a_row() {
        let mut state = active_state();
        let max_x = ROOM_WIDTH - HAZARD_SIZE;
        let mut events = Vec::new();

        // Run until the first row is fully swept
        for _ in 0..10_000 {
            step(&mut state, &mut events);
            if state.hazard.direction == SweepDirection::Left {
                break;
            }
        }

        assert_eq!(state.hazard.direction, SweepDirection::Left);
        assert_eq!(state.hazard.pos.x, max_x);
        assert_eq!(state.hazard.pos.y, HAZARD_ROW_STEP);
    }

    #[test]
    fn test_caught_raised_exactly_once() {
        let mut state = active_state();
        // Park on the bottom row, one step shy of the right edge
        state.hazard.pos = Vec2::new(ROOM_WIDTH - HAZARD_SIZE, ROOM_HEIGHT - HAZARD_SIZE);
        state.hazard.direction = SweepDirection::Right;
        let mut events = Vec::new();

        step(&mut state, &mut events);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Caught));

        step(&mut state, &mut events);
        step(&mut state, &mut events);

        let ends = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_obstacle_reverses_direction() {
        let mut state = active_state();
        state.hazard.pos = Vec2::new(100.0, 120.0);
        state.hazard.direction = SweepDirection::Right;
        state.obstacles.push(Obstacle {
            id: 1,
            kind: "bed".into(),
            rect: Rect::new(Vec2::new(162.0, 100.0), Vec2::new(120.0, 200.0)),
            glyph: String::new(),
        });
        let mut events = Vec::new();

        step(&mut state, &mut events);
        // 100 + 4 = 104; hazard spans to 164 which enters the obstacle
        assert_eq!(state.hazard.pos, Vec2::new(100.0, 120.0));
        assert_eq!(state.hazard.direction, SweepDirection::Left);
    }

    #[test]
    fn test_vacuums_floor_items() {
        let mut state = active_state();
        state.hazard.pos = Vec2::new(100.0, 100.0);
        state.clutter.push(item(1, Vec2::new(120.0, 110.0)));
        state.clutter.push(item(2, Vec2::new(600.0, 400.0)));
        let mut events = Vec::new();

        step(&mut state, &mut events);
        assert_eq!(state.clutter.len(), 1);
        assert_eq!(state.clutter[0].id, 2);
        assert!(events.contains(&GameEvent::Vacuumed { item: 1, remaining: 1 }));
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_vacuuming_last_item_ends_round_in_success() {
        let mut state = active_state();
        state.hazard.pos = Vec2::new(100.0, 100.0);
        state.clutter.push(item(1, Vec2::new(120.0, 110.0)));
        let mut events = Vec::new();

        step(&mut state, &mut events);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Success));
        assert!(events.contains(&GameEvent::RoundEnded {
            outcome: Outcome::Success
        }));
    }

    #[test]
    fn test_carried_item_cannot_be_vacuumed() {
        let mut state = active_state();
        state.hazard.pos = Vec2::new(100.0, 100.0);
        let mut carried = item(1, Vec2::new(120.0, 110.0));
        carried.state = ClutterState::Carried;
        state.clutter.push(carried);
        state.player.carrying = Some(1);
        let mut events = Vec::new();

        step(&mut state, &mut events);
        assert_eq!(state.clutter.len(), 1);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_player_hit_starts_stun_and_gates_retrigger() {
        let mut state = active_state();
        state.hazard.pos = Vec2::new(100.0, 100.0);
        state.player.pos = Vec2::new(130.0, 110.0);
        let mut events = Vec::new();

        step(&mut state, &mut events);
        assert_eq!(state.player.hit_cooldown, HIT_STUN);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::PlayerHit).count(),
            1
        );

        // Still overlapping on the next tick: no second hit while stunned
        step(&mut state, &mut events);
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::PlayerHit).count(),
            1
        );
    }
}
