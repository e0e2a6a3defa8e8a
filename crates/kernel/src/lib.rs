//! Kinematic Updater: derives a direction from movement flags, integrates
//! velocity with damping and gravity, and commits camera movement only when
//! the camera body is clear of every collider.
//!
//! # Invariants
//! - A frame never fails; the only error path is config validation at startup.
//! - `velocity.y` drops by exactly the gravity constant every frame.
//! - After a commit, `position.y >= eye_height`.
//! - The collision gate is all-or-nothing: a blocked frame moves nothing.

pub mod collision;
pub mod frame_loop;
pub mod motion;
pub mod state;

pub use collision::{BodyVolume, CollisionGate, CollisionSource, Collider};
pub use frame_loop::{FixedClock, FrameClock, FrameLoop, MonotonicClock};
pub use motion::{MotionConfig, movement_direction};
pub use state::{CameraPose, FrameReport, SimulationState, SpawnPoint};

/// Errors raised while validating kernel configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum KernelError {
    #[error("invalid motion config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}
