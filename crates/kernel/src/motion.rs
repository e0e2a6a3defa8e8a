use crate::KernelError;
use crate::collision::{BodyVolume, CollisionGate};
use glam::DVec3;
use roomwalk_input::MovementFlags;
use serde::{Deserialize, Serialize};

/// Per-frame velocity nudge while a movement key is held.
pub const ACCELERATION: f64 = 0.0005;
/// Multiplicative horizontal decay applied on frames with no movement key held.
pub const DAMPING: f64 = 0.9;
/// Subtracted from `velocity.y` every frame.
pub const GRAVITY: f64 = 0.0002;
/// Lowest height the camera may be committed to.
pub const EYE_HEIGHT: f64 = 1.6;
/// Radians of yaw per elapsed second while auto-rotate is held.
pub const AUTO_ROTATE_SPEED: f64 = 0.5;

/// Tunables for the kinematic update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub acceleration: f64,
    pub damping: f64,
    pub gravity: f64,
    pub eye_height: f64,
    pub auto_rotate_speed: f64,
    pub body: BodyVolume,
    pub gate: CollisionGate,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            damping: DAMPING,
            gravity: GRAVITY,
            eye_height: EYE_HEIGHT,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            body: BodyVolume::default(),
            gate: CollisionGate::default(),
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), KernelError> {
        check("acceleration", self.acceleration, |v| v >= 0.0, "must be >= 0")?;
        check("damping", self.damping, |v| (0.0..1.0).contains(&v), "must be in [0, 1)")?;
        check("gravity", self.gravity, |v| v >= 0.0, "must be >= 0")?;
        check("eye_height", self.eye_height, |_| true, "must be finite")?;
        check("auto_rotate_speed", self.auto_rotate_speed, |_| true, "must be finite")?;
        check("body.half_width", self.body.half_width, |v| v > 0.0, "must be > 0")?;
        check("body.foot_clearance", self.body.foot_clearance, |v| v >= 0.0, "must be >= 0")?;
        check("body.head_room", self.body.head_room, |v| v >= 0.0, "must be >= 0")?;
        Ok(())
    }

    /// Apply one frame of velocity integration.
    ///
    /// Held movement keys push velocity by `acceleration` against the
    /// direction (forward is -z). With no key held the horizontal components
    /// decay by `damping` and are never snapped to zero. Gravity always applies.
    pub fn integrate(&self, velocity: &mut DVec3, flags: &MovementFlags) {
        if flags.any_movement() {
            let direction = movement_direction(flags);
            velocity.z -= direction.z * self.acceleration;
            velocity.x -= direction.x * self.acceleration;
        } else {
            velocity.z *= self.damping;
            velocity.x *= self.damping;
        }
        velocity.y -= self.gravity;
    }
}

fn check(
    field: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
    reason: &'static str,
) -> Result<(), KernelError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(KernelError::InvalidConfig {
            field,
            value,
            reason,
        })
    }
}

/// Unit direction requested by the held keys: `(right - left, 0, forward - backward)`.
///
/// Cancelling or absent input yields the zero vector, never NaN.
pub fn movement_direction(flags: &MovementFlags) -> DVec3 {
    let raw = DVec3::new(
        f64::from(u8::from(flags.right)) - f64::from(u8::from(flags.left)),
        0.0,
        f64::from(u8::from(flags.forward)) - f64::from(u8::from(flags.backward)),
    );
    raw.normalize_or_zero()
}
