//! Input surface for the movement controller
//!
//! A restricted allow-list of directional keys plus one hold key; everything
//! else, and any modifier-held combination, is ignored. Focus loss clears the
//! whole held set so no key can stick across an alt-tab.

use crate::sim::movement::MoveInput;

/// Key codes the game listens to; all others are ignored
pub const ALLOWED_KEYS: [&str; 5] = ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "Space"];

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// The pickup/hold key
    Action,
}

impl Key {
    /// Map a platform key code onto a game key, if allow-listed
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Space" => Some(Key::Action),
            _ => None,
        }
    }
}

/// Live held-key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    action: bool,
}

impl InputState {
    /// Register a key press. Presses with a modifier held are dropped
    /// entirely; unknown codes are ignored.
    pub fn key_down(&mut self, code: &str, modifier_held: bool) {
        if modifier_held {
            return;
        }
        if let Some(key) = Key::from_code(code) {
            self.set(key, true);
        }
    }

    /// Register a key release. Releases are always honored (even if a
    /// modifier got pressed mid-hold) so keys cannot stick.
    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.set(key, false);
        }
    }

    fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Up => self.up = held,
            Key::Down => self.down = held,
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::Action => self.action = held,
        }
    }

    /// Drop all held state (focus loss, visibility change, round end)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn action_held(&self) -> bool {
        self.action
    }

    /// Snapshot of the directional keys for one movement step
    pub fn move_input(&self) -> MoveInput {
        MoveInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_listed_keys_register() {
        let mut input = InputState::default();
        input.key_down("ArrowRight", false);
        input.key_down("Space", false);
        assert!(input.move_input().right);
        assert!(input.action_held());

        input.key_up("ArrowRight");
        assert!(!input.move_input().right);
        assert!(input.action_held());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputState::default();
        input.key_down("KeyW", false);
        input.key_down("Enter", false);
        input.key_down("Shift", false);
        assert_eq!(input, InputState::default());
    }

    #[test]
    fn test_modifier_combinations_ignored() {
        let mut input = InputState::default();
        input.key_down("ArrowLeft", true);
        assert!(!input.move_input().left);
    }

    #[test]
    fn test_release_honored_despite_modifier() {
        let mut input = InputState::default();
        input.key_down("ArrowLeft", false);
        assert!(input.move_input().left);
        // Modifier pressed mid-hold must not leave the key stuck
        input.key_up("ArrowLeft");
        assert!(!input.move_input().left);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut input = InputState::default();
        input.key_down("ArrowUp", false);
        input.key_down("ArrowLeft", false);
        input.key_down("Space", false);
        input.clear();
        assert_eq!(input, InputState::default());
    }
}
