//! Tidy Rush entry point
//!
//! Headless demo runner: generates a room, pilots the player through a round
//! with a simple chase-the-nearest-item AI, and records the run times to the
//! profile store. Mostly useful for exercising the whole stack end to end
//! without a front-end attached.

use glam::Vec2;

use tidy_rush::consts::*;
use tidy_rush::goal_zone;
use tidy_rush::profiles::{
    JsonFileStore, MemoryStore, PlayerProfile, ProfileStore, ProfileUpdate,
};
use tidy_rush::session::{RoundSummary, Session};
use tidy_rush::sim::state::{GameEvent, Outcome};
use tidy_rush::{AudioManager, Cue};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Bail out of the demo if a round somehow never finishes
const MAX_DEMO_SECONDS: f32 = 300.0;
const DEMO_PLAYER_ID: &str = "demo";

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(seed_from_clock);

    let mut session = match Session::new(seed) {
        Ok(session) => session,
        Err(err) => {
            // The one failure allowed to abort round start
            log::error!("could not start a round: {err}");
            std::process::exit(1);
        }
    };

    let mut store = open_store();
    ensure_profile(store.as_mut(), DEMO_PLAYER_ID);

    let mut audio = AudioManager::disabled();

    log::info!(
        "seed {}: {} obstacles, {} items, spawn {:?}",
        seed,
        session.state().obstacles.len(),
        session.state().clutter.len(),
        session.state().player.pos
    );

    let mut pilot = Pilot::new();
    let mut simulated = 0.0f32;
    let summary = loop {
        pilot.steer(&mut session);
        for event in session.frame(FRAME_DT) {
            audio.play_event(&event);
            log_event(&event);
        }
        if let Some(summary) = session.take_report() {
            break Some(summary);
        }
        simulated += FRAME_DT;
        if simulated > MAX_DEMO_SECONDS {
            log::warn!("demo round did not finish within {MAX_DEMO_SECONDS}s, giving up");
            break None;
        }
    };

    audio.stop_all();
    audio.play(Cue::Exit);

    if let Some(summary) = summary {
        record_run(store.as_mut(), DEMO_PLAYER_ID, &summary);
        match summary.outcome {
            Outcome::Success => log::info!("room cleared in {:.1}s", summary.elapsed),
            Outcome::Caught => log::info!("caught by the vacuum after {:.1}s", summary.elapsed),
        }
    }
}

fn seed_from_clock() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn open_store() -> Box<dyn ProfileStore> {
    match JsonFileStore::open("profiles.json") {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("profile store unavailable ({err}), scores kept in memory");
            Box::new(MemoryStore::new())
        }
    }
}

fn ensure_profile(store: &mut dyn ProfileStore, id: &str) {
    match store.get(id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            if let Err(err) = store.create(PlayerProfile::new(id, "Demo Pilot")) {
                log::warn!("could not create profile: {err}");
            }
        }
        Err(err) => log::warn!("could not read profile: {err}"),
    }
}

/// Best-effort score submission; a store failure never fails the run
fn record_run(store: &mut dyn ProfileStore, id: &str, summary: &RoundSummary) {
    let best_candidate = match summary.outcome {
        Outcome::Success => Some(summary.elapsed),
        Outcome::Caught => None,
    };
    match store.update(id, ProfileUpdate::run_times(summary.elapsed, best_candidate)) {
        Ok(profile) => log::info!(
            "times recorded: last {:?}, best {:?}",
            profile.last_time,
            profile.best_time
        ),
        Err(err) => log::warn!("could not record times: {err}"),
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::CountdownTick { remaining } => log::info!("starting in {remaining}..."),
        GameEvent::RoundStarted => log::info!("go!"),
        GameEvent::PickedUp { item } => log::debug!("picked up item {item}"),
        GameEvent::Dropped { item } => log::debug!("dropped item {item}"),
        GameEvent::Deposited { item, remaining } => {
            log::info!("deposited item {item}, {remaining} to go")
        }
        GameEvent::Vacuumed { item, remaining } => {
            log::info!("vacuum ate item {item}, {remaining} to go")
        }
        GameEvent::PlayerHit => log::debug!("clipped by the vacuum"),
        GameEvent::Bump | GameEvent::RoundEnded { .. } => {}
    }
}

/// Minimal demo AI: hold the action key the whole round, walk toward the
/// nearest eligible item, then toward the goal zone while carrying. A short
/// random-ish sidestep kicks in when wedged against furniture.
struct Pilot {
    last_pos: Vec2,
    stuck_frames: u32,
    sidestep: u32,
    flip: bool,
}

impl Pilot {
    fn new() -> Self {
        Self {
            last_pos: Vec2::ZERO,
            stuck_frames: 0,
            sidestep: 0,
            flip: false,
        }
    }

    fn steer(&mut self, session: &mut Session) {
        session.key_down("Space", false);

        let state = session.state();
        let player = state.player.pos;

        let target = if state.player.carrying.is_some() {
            let goal = goal_zone();
            Some(goal.pos + goal.size / 2.0 - Vec2::splat(PLAYER_SIZE / 2.0))
        } else {
            state
                .clutter
                .iter()
                .filter(|c| c.pickup_eligible())
                .min_by(|a, b| {
                    let da = (a.pos - player).length_squared();
                    let db = (b.pos - player).length_squared();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|c| c.pos)
        };

        // Wedge detection: no progress for half a second triggers a sidestep
        if (player - self.last_pos).length_squared() < 0.01 {
            self.stuck_frames += 1;
        } else {
            self.stuck_frames = 0;
        }
        self.last_pos = player;
        if self.stuck_frames > 30 {
            self.sidestep = 30;
            self.stuck_frames = 0;
            self.flip = !self.flip;
        }

        for code in ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"] {
            session.key_up(code);
        }

        let Some(target) = target else {
            return;
        };

        if self.sidestep > 0 {
            self.sidestep -= 1;
            // Slide perpendicular to the main travel axis
            let delta = target - player;
            if delta.x.abs() >= delta.y.abs() {
                session.key_down(if self.flip { "ArrowUp" } else { "ArrowDown" }, false);
            } else {
                session.key_down(if self.flip { "ArrowLeft" } else { "ArrowRight" }, false);
            }
            return;
        }

        let dead_zone = 2.0;
        if target.x < player.x - dead_zone {
            session.key_down("ArrowLeft", false);
        } else if target.x > player.x + dead_zone {
            session.key_down("ArrowRight", false);
        }
        if target.y < player.y - dead_zone {
            session.key_down("ArrowUp", false);
        } else if target.y > player.y + dead_zone {
            session.key_down("ArrowDown", false);
        }
    }
}
