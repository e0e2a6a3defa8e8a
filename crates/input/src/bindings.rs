use crate::action::{Action, MovementFlags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors from editing a binding table.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("key identifier must not be empty")]
    EmptyKey,
}

/// Fixed table from key identifier to action.
///
/// Key identifiers follow the DOM `KeyboardEvent.code` vocabulary
/// (`"KeyW"`, `"ArrowUp"`, `"Space"`), which winit's `KeyCode` names share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    table: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let table = [
            ("KeyW", Action::MoveForward),
            ("KeyS", Action::MoveBackward),
            ("KeyA", Action::MoveLeft),
            ("KeyD", Action::MoveRight),
            ("KeyC", Action::AutoRotate),
        ]
        .into_iter()
        .map(|(key, action)| (key.to_string(), action))
        .collect();
        Self { table }
    }
}

impl KeyBindings {
    /// A table with no bindings.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, action: Action) -> Result<(), BindingError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(BindingError::EmptyKey);
        }
        self.table.insert(key, action);
        Ok(())
    }

    /// Check a table that was deserialized rather than built with [`KeyBindings::bind`].
    pub fn validate(&self) -> Result<(), BindingError> {
        if self.table.keys().any(|k| k.trim().is_empty()) {
            return Err(BindingError::EmptyKey);
        }
        Ok(())
    }

    pub fn unbind(&mut self, key: &str) -> Option<Action> {
        self.table.remove(key)
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.table.get(key).copied()
    }

    /// Keys bound to `action`, in table order.
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = &str> {
        self.table
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Feed one key event into `flags`. Key-down sets the bound flag, key-up clears it.
    ///
    /// Returns the action the key is bound to, or `None` (and leaves `flags`
    /// untouched) for unbound keys.
    pub fn apply(&self, flags: &mut MovementFlags, key: &str, pressed: bool) -> Option<Action> {
        let action = self.action_for(key)?;
        if flags.get(action) != pressed {
            tracing::debug!(key, %action, pressed, "movement flag changed");
        }
        flags.set(action, pressed);
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_wasd_plus_c() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for("KeyW"), Some(Action::MoveForward));
        assert_eq!(b.action_for("KeyS"), Some(Action::MoveBackward));
        assert_eq!(b.action_for("KeyA"), Some(Action::MoveLeft));
        assert_eq!(b.action_for("KeyD"), Some(Action::MoveRight));
        assert_eq!(b.action_for("KeyC"), Some(Action::AutoRotate));
        assert_eq!(b.len(), 5);
    }

    #[test]
    fn key_down_sets_and_key_up_clears() {
        let b = KeyBindings::default();
        let mut flags = MovementFlags::new();
        assert_eq!(b.apply(&mut flags, "KeyW", true), Some(Action::MoveForward));
        assert!(flags.forward);
        b.apply(&mut flags, "KeyW", false);
        assert!(!flags.forward);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let b = KeyBindings::default();
        let mut flags = MovementFlags::new();
        flags.forward = true;
        assert_eq!(b.apply(&mut flags, "KeyQ", true), None);
        assert_eq!(b.apply(&mut flags, "", false), None);
        assert!(flags.forward);
        assert!(!flags.backward && !flags.left && !flags.right && !flags.auto_rotate);
    }

    #[test]
    fn repeated_press_is_idempotent() {
        let b = KeyBindings::default();
        let mut flags = MovementFlags::new();
        b.apply(&mut flags, "KeyA", true);
        let once = flags;
        b.apply(&mut flags, "KeyA", true);
        assert_eq!(flags, once);
    }

    #[test]
    fn auto_rotate_is_held_not_latched() {
        let b = KeyBindings::default();
        let mut flags = MovementFlags::new();
        b.apply(&mut flags, "KeyC", true);
        assert!(flags.auto_rotate);
        b.apply(&mut flags, "KeyC", false);
        assert!(!flags.auto_rotate);
    }

    #[test]
    fn keys_do_not_interact() {
        let b = KeyBindings::default();
        let mut flags = MovementFlags::new();
        b.apply(&mut flags, "KeyW", true);
        b.apply(&mut flags, "KeyS", true);
        b.apply(&mut flags, "KeyW", false);
        assert!(!flags.forward);
        assert!(flags.backward);
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut b = KeyBindings::default();
        b.bind("ArrowUp", Action::MoveForward).unwrap();
        b.bind("KeyW", Action::MoveBackward).unwrap();
        assert_eq!(b.action_for("KeyW"), Some(Action::MoveBackward));
        let forward: Vec<&str> = b.keys_for(Action::MoveForward).collect();
        assert_eq!(forward, vec!["ArrowUp"]);
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut b = KeyBindings::empty();
        assert_eq!(b.bind("  ", Action::MoveLeft), Err(BindingError::EmptyKey));
        assert!(b.is_empty());
    }

    #[test]
    fn deserialized_empty_key_fails_validation() {
        let b: KeyBindings = serde_json::from_str(r#"{"KeyW": "move_forward", "": "move_left"}"#).unwrap();
        assert_eq!(b.validate(), Err(BindingError::EmptyKey));
        assert!(KeyBindings::default().validate().is_ok());
    }

    #[test]
    fn unbind_removes_entry() {
        let mut b = KeyBindings::default();
        assert_eq!(b.unbind("KeyC"), Some(Action::AutoRotate));
        let mut flags = MovementFlags::new();
        assert_eq!(b.apply(&mut flags, "KeyC", true), None);
        assert!(!flags.auto_rotate);
    }
}
