//! Player movement integration
//!
//! Delta-time-scaled so speed is frame-rate independent, with the two axes
//! resolved independently: a blocked axis keeps its old coordinate while the
//! other stays free, which lets the player slide along obstacle edges instead
//! of sticking on diagonal contact.

use glam::Vec2;

use super::geometry::Rect;
use super::state::Obstacle;
use crate::consts::*;

/// Directional keys held for one movement step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    /// Direction vector with the diagonal correction applied, so diagonal
    /// speed equals axial speed
    pub fn direction(self) -> Vec2 {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }
        if self.up {
            dy -= 1.0;
        }
        if self.down {
            dy += 1.0;
        }

        if dx != 0.0 && dy != 0.0 {
            dx *= DIAGONAL_FACTOR;
            dy *= DIAGONAL_FACTOR;
        }
        Vec2::new(dx, dy)
    }
}

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moved {
    pub pos: Vec2,
    /// True when either axis was blocked by an obstacle this step
    pub collided: bool,
}

fn hits_obstacle(pos: Vec2, obstacles: &[Obstacle]) -> bool {
    let player = Rect::square(pos, PLAYER_SIZE);
    obstacles.iter().any(|o| player.overlaps(&o.rect))
}

/// Integrate one movement step from `pos`, clamped to room bounds and
/// constrained against `obstacles`, axis by axis (X first, then Y at the
/// resolved X).
pub fn resolve(pos: Vec2, input: MoveInput, obstacles: &[Obstacle], dt: f32) -> Moved {
    let delta = input.direction() * PLAYER_SPEED * dt;

    let new_x = (pos.x + delta.x).clamp(0.0, ROOM_WIDTH - PLAYER_SIZE);
    let x_blocked = hits_obstacle(Vec2::new(new_x, pos.y), obstacles);
    let resolved_x = if x_blocked { pos.x } else { new_x };

    let new_y = (pos.y + delta.y).clamp(0.0, ROOM_HEIGHT - PLAYER_SIZE);
    let y_blocked = hits_obstacle(Vec2::new(resolved_x, new_y), obstacles);
    let resolved_y = if y_blocked { pos.y } else { new_y };

    Moved {
        pos: Vec2::new(resolved_x, resolved_y),
        collided: x_blocked || y_blocked,
    }
}
