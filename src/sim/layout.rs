//! Procedural room layout generation
//!
//! Discretizes the room into a grid, places furniture under non-overlap +
//! buffer constraints, finds a player spawn, and scatters clutter into the
//! remaining free cells. Deterministic modulo the caller's RNG. A layout that
//! cannot be completed is retried wholesale; after bounded retries the
//! generator fails with `LayoutError` rather than returning broken geometry.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use thiserror::Error;

use super::geometry::Rect;
use super::state::{ClutterItem, ClutterState, Obstacle};
use crate::consts::*;
use crate::goal_exclusion_zone;

/// Whole-layout retry budget
const MAX_LAYOUT_ATTEMPTS: u32 = 10;
/// Random placement attempts per furniture piece
const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Fixed furniture set placed in every room
struct FurnitureDef {
    kind: &'static str,
    size: Vec2,
    glyph: &'static str,
}

const FURNITURE: [FurnitureDef; 4] = [
    FurnitureDef {
        kind: "bed",
        size: Vec2::new(120.0, 200.0),
        glyph: "\u{1f6cf}\u{fe0f}",
    },
    FurnitureDef {
        kind: "desk",
        size: Vec2::new(100.0, 60.0),
        glyph: "\u{1fa91}",
    },
    FurnitureDef {
        kind: "dresser",
        size: Vec2::new(80.0, 40.0),
        glyph: "\u{1f5c4}\u{fe0f}",
    },
    FurnitureDef {
        kind: "bookshelf",
        size: Vec2::new(80.0, 120.0),
        glyph: "\u{1f4da}",
    },
];

/// Glyph pool for scattered clutter items
const TOY_GLYPHS: [&str; 12] = [
    "\u{1f3ae}",
    "\u{1f9f8}",
    "\u{1f3a8}",
    "\u{1f697}",
    "\u{1f3b2}",
    "\u{1f9e9}",
    "\u{1fa80}",
    "\u{1f3af}",
    "\u{1fa81}",
    "\u{1f4da}",
    "\u{1f3ad}",
    "\u{1f9ba}",
];

/// Result of a successful generation
#[derive(Debug, Clone)]
pub struct Layout {
    pub obstacles: Vec<Obstacle>,
    pub spawn: Vec2,
    pub clutter: Vec<ClutterItem>,
}

/// No valid obstacle/spawn/clutter arrangement was found
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("no valid room layout after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Cell states used only during generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Obstacle,
    Margin,
    Player,
    Clutter,
}

/// The discretized room
struct Grid {
    cells: Vec<Cell>,
    cols: usize,
    rows: usize,
}

impl Grid {
    fn new() -> Self {
        let cols = (ROOM_WIDTH / GRID_SIZE) as usize;
        let rows = (ROOM_HEIGHT / GRID_SIZE) as usize;
        let mut grid = Self {
            cells: vec![Cell::Empty; cols * rows],
            cols,
            rows,
        };
        grid.mark_margins();
        grid
    }

    #[inline]
    fn at(&self, col: usize, row: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    #[inline]
    fn set(&mut self, col: usize, row: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Mark the non-placeable band around all four edges
    fn mark_margins(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if row < MARGIN_CELLS
                    || row >= self.rows - MARGIN_CELLS
                    || col < MARGIN_CELLS
                    || col >= self.cols - MARGIN_CELLS
                {
                    self.set(col, row, Cell::Margin);
                }
            }
        }
    }

    /// Cell span covered by a rect at (x, y) with the given size
    fn footprint(x: f32, y: f32, size: Vec2) -> (usize, usize, usize, usize) {
        let start_col = (x / GRID_SIZE).floor() as usize;
        let start_row = (y / GRID_SIZE).floor() as usize;
        let end_col = ((x + size.x) / GRID_SIZE).ceil() as usize;
        let end_row = ((y + size.y) / GRID_SIZE).ceil() as usize;
        (start_col, start_row, end_col, end_row)
    }

    /// True iff the footprint and its 1-cell buffer ring are entirely empty
    fn can_place(&self, x: f32, y: f32, size: Vec2) -> bool {
        let (start_col, start_row, end_col, end_row) = Self::footprint(x, y, size);
        for row in start_row.saturating_sub(1)..=end_row {
            for col in start_col.saturating_sub(1)..=end_col {
                if row < self.rows && col < self.cols && self.at(col, row) != Cell::Empty {
                    return false;
                }
            }
        }
        true
    }

    /// Mark a placed obstacle's footprint, and its buffer ring where empty
    fn mark_obstacle(&mut self, x: f32, y: f32, size: Vec2) {
        let (start_col, start_row, end_col, end_row) = Self::footprint(x, y, size);
        for row in start_row.saturating_sub(1)..=end_row {
            for col in start_col.saturating_sub(1)..=end_col {
                if row >= self.rows || col >= self.cols {
                    continue;
                }
                let in_footprint =
                    row >= start_row && row < end_row && col >= start_col && col < end_col;
                if in_footprint {
                    self.set(col, row, Cell::Obstacle);
                } else if self.at(col, row) == Cell::Empty {
                    self.set(col, row, Cell::Margin);
                }
            }
        }
    }

    /// Attempt to place every furniture piece. Returns false if any piece
    /// exhausts its attempt budget; already-placed pieces are kept so the
    /// caller can decide to retry the whole layout.
    fn place_obstacles(&mut self, rng: &mut Pcg32, obstacles: &mut Vec<Obstacle>) -> bool {
        let mut all_placed = true;

        for (index, def) in FURNITURE.iter().enumerate() {
            let col_span = (def.size.x / GRID_SIZE).ceil() as usize;
            let row_span = (def.size.y / GRID_SIZE).ceil() as usize;
            let mut placed = false;

            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let x = rng.random_range(0..self.cols - col_span) as f32 * GRID_SIZE;
                let y = rng.random_range(0..self.rows - row_span) as f32 * GRID_SIZE;

                if self.can_place(x, y, def.size) {
                    self.mark_obstacle(x, y, def.size);
                    obstacles.push(Obstacle {
                        id: index as u32 + 1,
                        kind: def.kind.to_string(),
                        rect: Rect::new(Vec2::new(x, y), def.size),
                        glyph: def.glyph.to_string(),
                    });
                    placed = true;
                    break;
                }
            }

            if !placed {
                log::debug!("no room for {} after {} attempts", def.kind, MAX_PLACEMENT_ATTEMPTS);
                all_placed = false;
            }
        }

        all_placed
    }

    /// True iff a player box at (x, y) avoids obstacle and margin cells
    fn spawn_cell_clear(&self, x: f32, y: f32) -> bool {
        let start_row = (y / GRID_SIZE).floor() as usize;
        let end_row = ((y + PLAYER_SIZE) / GRID_SIZE).ceil() as usize;
        let start_col = (x / GRID_SIZE).floor() as usize;
        let end_col = ((x + PLAYER_SIZE) / GRID_SIZE).ceil() as usize;

        for row in start_row..=end_row {
            for col in start_col..=end_col {
                if row < self.rows
                    && col < self.cols
                    && matches!(self.at(col, row), Cell::Obstacle | Cell::Margin)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Enumerate valid spawn positions, shuffle, and take one.
    /// Returns None when no candidate exists.
    fn find_spawn(&mut self, rng: &mut Pcg32) -> Option<Vec2> {
        let margin = MARGIN_CELLS as f32 * GRID_SIZE;
        let exclusion = goal_exclusion_zone();
        let mut candidates = Vec::new();

        let mut x = margin;
        while x < ROOM_WIDTH - margin - PLAYER_SIZE {
            let mut y = margin;
            while y < ROOM_HEIGHT - margin - PLAYER_SIZE {
                let player = Rect::square(Vec2::new(x, y), PLAYER_SIZE);
                if self.spawn_cell_clear(x, y) && !player.overlaps(&exclusion) {
                    candidates.push(Vec2::new(x, y));
                }
                y += GRID_SIZE;
            }
            x += GRID_SIZE;
        }

        candidates.shuffle(rng);
        let spawn = *candidates.first()?;
        self.set(
            (spawn.x / GRID_SIZE) as usize,
            (spawn.y / GRID_SIZE) as usize,
            Cell::Player,
        );
        Some(spawn)
    }

    /// All still-empty cell origins, in row-major order
    fn empty_cells(&self) -> Vec<Vec2> {
        let mut cells = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.at(col, row) == Cell::Empty {
                    cells.push(Vec2::new(col as f32 * GRID_SIZE, row as f32 * GRID_SIZE));
                }
            }
        }
        cells
    }

    /// Scatter clutter over distinct empty cells
    fn place_clutter(&mut self, rng: &mut Pcg32, next_id: u32) -> Vec<ClutterItem> {
        let mut empty = self.empty_cells();
        let count = CLUTTER_COUNT.min(empty.len());
        let mut clutter = Vec::with_capacity(count);

        for offset in 0..count {
            let index = rng.random_range(0..empty.len());
            let pos = empty.swap_remove(index);
            self.set(
                (pos.x / GRID_SIZE) as usize,
                (pos.y / GRID_SIZE) as usize,
                Cell::Clutter,
            );
            let glyph = TOY_GLYPHS[rng.random_range(0..TOY_GLYPHS.len())];
            clutter.push(ClutterItem {
                id: next_id + offset as u32,
                pos,
                glyph: glyph.to_string(),
                state: ClutterState::Free,
            });
        }

        clutter
    }
}

/// Fixed safe spawn used when no candidate position exists
fn fallback_spawn() -> Vec2 {
    let margin = MARGIN_CELLS as f32 * GRID_SIZE;
    Vec2::new(margin + GRID_SIZE, margin + GRID_SIZE)
}

/// One full generation attempt. None when a furniture piece could not be
/// placed; the spawn search degrades to the fixed fallback instead of failing.
fn attempt_layout(rng: &mut Pcg32) -> Option<Layout> {
    let mut grid = Grid::new();
    let mut obstacles = Vec::with_capacity(FURNITURE.len());

    if !grid.place_obstacles(rng, &mut obstacles) {
        return None;
    }

    let spawn = grid.find_spawn(rng).unwrap_or_else(|| {
        log::warn!("no valid spawn candidate, using fallback position");
        fallback_spawn()
    });

    let next_id = obstacles.len() as u32 + 1;
    let clutter = grid.place_clutter(rng, next_id);

    Some(Layout {
        obstacles,
        spawn,
        clutter,
    })
}

/// Generate a room layout, retrying the whole arrangement up to the bounded
/// attempt budget. Deterministic for a given RNG state.
pub fn generate_layout(rng: &mut Pcg32) -> Result<Layout, LayoutError> {
    for attempt in 0..MAX_LAYOUT_ATTEMPTS {
        if let Some(layout) = attempt_layout(rng) {
            return Ok(layout);
        }
        log::debug!("layout attempt {} failed, retrying", attempt + 1);
    }

    Err(LayoutError::Exhausted {
        attempts: MAX_LAYOUT_ATTEMPTS,
    })
}
