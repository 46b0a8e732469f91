//! Keyboard state
//!
//! Input is level-triggered: the game samples which directions are held at
//! the start of every frame, it does not react to individual presses.

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Exit,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value (WASD or arrows, Escape)
    pub fn from_key(key: &str) -> Option<Self> {
        let action = match key {
            "a" | "A" | "ArrowLeft" => KeyAction::Move(Direction::Left),
            "d" | "D" | "ArrowRight" => KeyAction::Move(Direction::Right),
            "w" | "W" | "ArrowUp" => KeyAction::Move(Direction::Up),
            "s" | "S" | "ArrowDown" => KeyAction::Move(Direction::Down),
            "Escape" => KeyAction::Exit,
            _ => return None,
        };
        Some(action)
    }
}

/// Which directions are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyState {
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Signed direction per axis, y pointing down the page. Opposite keys cancel.
    pub fn axis(&self) -> (f32, f32) {
        let dx = self.right as i8 - self.left as i8;
        let dy = self.down as i8 - self.up as i8;
        (dx as f32, dy as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(KeyAction::from_key("a"), Some(KeyAction::Move(Direction::Left)));
        assert_eq!(KeyAction::from_key("D"), Some(KeyAction::Move(Direction::Right)));
        assert_eq!(KeyAction::from_key("ArrowUp"), Some(KeyAction::Move(Direction::Up)));
        assert_eq!(KeyAction::from_key("s"), Some(KeyAction::Move(Direction::Down)));
        assert_eq!(KeyAction::from_key("Escape"), Some(KeyAction::Exit));
        assert_eq!(KeyAction::from_key(" "), None);
        assert_eq!(KeyAction::from_key("q"), None);
    }

    #[test]
    fn test_axis_no_diagonal_normalization() {
        let mut keys = KeyState::default();
        assert_eq!(keys.axis(), (0.0, 0.0));

        keys.set(Direction::Right, true);
        keys.set(Direction::Up, true);
        assert_eq!(keys.axis(), (1.0, -1.0));

        keys.set(Direction::Left, true);
        assert_eq!(keys.axis(), (0.0, -1.0));

        keys.reset();
        assert_eq!(keys, KeyState::default());
    }
}
