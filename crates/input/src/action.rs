use serde::{Deserialize, Serialize};
use std::fmt;

/// A high-level action a key can be bound to.
///
/// The kernel reads flags, never raw key events. Desktop, CLI scripts and
/// tests all produce the same actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    /// Spin the camera about Y while held.
    AutoRotate,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::AutoRotate,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::MoveForward => "forward",
            Action::MoveBackward => "backward",
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::AutoRotate => "auto_rotate",
        };
        f.write_str(name)
    }
}

/// Which directional keys (and the auto-rotate key) are currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub auto_rotate: bool,
}

impl MovementFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag backing `action`. Setting a flag to its current value is a no-op.
    pub fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::MoveForward => self.forward = held,
            Action::MoveBackward => self.backward = held,
            Action::MoveLeft => self.left = held,
            Action::MoveRight => self.right = held,
            Action::AutoRotate => self.auto_rotate = held,
        }
    }

    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::MoveForward => self.forward,
            Action::MoveBackward => self.backward,
            Action::MoveLeft => self.left,
            Action::MoveRight => self.right,
            Action::AutoRotate => self.auto_rotate,
        }
    }

    /// True if any of the four directional flags is held. Auto-rotate does not count.
    pub fn any_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for MovementFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held: Vec<String> = Action::ALL
            .iter()
            .filter(|a| self.get(**a))
            .map(|a| a.to_string())
            .collect();
        if held.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&held.join("+"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_released() {
        let flags = MovementFlags::new();
        assert!(!flags.any_movement());
        assert!(!flags.auto_rotate);
        assert_eq!(flags.to_string(), "none");
    }

    #[test]
    fn set_and_get_are_independent() {
        let mut flags = MovementFlags::new();
        flags.set(Action::MoveForward, true);
        flags.set(Action::MoveLeft, true);
        assert!(flags.get(Action::MoveForward));
        assert!(flags.get(Action::MoveLeft));
        assert!(!flags.get(Action::MoveBackward));
        assert!(!flags.get(Action::MoveRight));
        assert_eq!(flags.to_string(), "forward+left");
    }

    #[test]
    fn auto_rotate_is_not_movement() {
        let mut flags = MovementFlags::new();
        flags.set(Action::AutoRotate, true);
        assert!(!flags.any_movement());
    }

    #[test]
    fn clear_releases_everything() {
        let mut flags = MovementFlags::new();
        for action in Action::ALL {
            flags.set(action, true);
        }
        flags.clear();
        assert_eq!(flags, MovementFlags::default());
    }
}
