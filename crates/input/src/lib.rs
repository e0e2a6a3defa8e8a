//! Input State Tracker: key events mapped to movement flags.
//!
//! # Invariants
//! - Each flag has exactly one writer: the key-down/key-up path in [`KeyBindings::apply`].
//! - Unrecognized keys are ignored without error.
//! - Auto-rotate is held, not latched.

pub mod action;
pub mod bindings;
pub mod script;

pub use action::{Action, MovementFlags};
pub use bindings::{BindingError, KeyBindings};
pub use script::{InputScript, ScriptError, ScriptPlayer, ScriptSegment};

pub fn crate_info() -> &'static str {
    "roomwalk-input v0.1.0"
}
