use crate::collision::{CollisionGate, Collider, first_hit};
use crate::motion::MotionConfig;
use glam::DVec3;
use roomwalk_common::ObjectId;
use roomwalk_input::MovementFlags;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Where the camera starts a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPoint {
    pub position: DVec3,
    /// Radians about +Y. Zero faces -Z.
    pub yaw: f64,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 1.6, 4.0),
            yaw: 0.0,
        }
    }
}

/// Camera position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: DVec3,
    pub yaw: f64,
    pub pitch: f64,
}

impl CameraPose {
    /// Unit view direction. Yaw 0, pitch 0 looks down -Z.
    pub fn forward(&self) -> DVec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        DVec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Apply a mouse-look delta. Pitch is clamped to straight up / straight down.
    pub fn look(&mut self, yaw_delta: f64, pitch_delta: f64) {
        self.yaw += yaw_delta;
        self.pitch = (self.pitch + pitch_delta).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    /// One-based index of the frame just run.
    pub frame: u64,
    /// Yaw added by auto-rotate this frame.
    pub yaw_delta: f64,
    /// Whether the position commit ran.
    pub moved: bool,
    /// First collider hit by the gate, in collider order.
    pub blocked_by: Option<ObjectId>,
}

/// All mutable per-session state: held keys, pose, velocity and the frame counter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    flags: MovementFlags,
    pose: CameraPose,
    velocity: DVec3,
    frame: u64,
}

impl SimulationState {
    pub fn new(spawn: SpawnPoint) -> Self {
        Self {
            flags: MovementFlags::new(),
            pose: CameraPose {
                position: spawn.position,
                yaw: spawn.yaw,
                pitch: 0.0,
            },
            velocity: DVec3::ZERO,
            frame: 0,
        }
    }

    pub fn flags(&self) -> &MovementFlags {
        &self.flags
    }

    /// Input handlers write key state through this.
    pub fn flags_mut(&mut self) -> &mut MovementFlags {
        &mut self.flags
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut CameraPose {
        &mut self.pose
    }

    pub fn velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame of the kinematic update against `colliders`.
    ///
    /// Order: auto-rotate, velocity integration, collision gate, position
    /// commit. A blocked frame keeps its integrated velocity but moves nothing.
    pub fn step(&mut self, colliders: &[Collider], elapsed: f64, config: &MotionConfig) -> FrameReport {
        self.frame += 1;

        let yaw_delta = if self.flags.auto_rotate {
            elapsed * config.auto_rotate_speed
        } else {
            0.0
        };
        self.pose.yaw += yaw_delta;

        config.integrate(&mut self.velocity, &self.flags);

        let candidate = self.candidate_position(config);
        let probe = match config.gate {
            CollisionGate::CurrentPose => self.pose.position,
            CollisionGate::CandidatePose => candidate,
        };
        let volume = config.body.volume_at(probe, config.eye_height);
        let blocked_by = first_hit(&volume, colliders);

        let moved = blocked_by.is_none();
        if moved {
            self.pose.position = candidate;
        }

        FrameReport {
            frame: self.frame,
            yaw_delta,
            moved,
            blocked_by,
        }
    }

    fn candidate_position(&self, config: &MotionConfig) -> DVec3 {
        let p = self.pose.position;
        let v = self.velocity;
        DVec3::new(p.x + v.x, (p.y + v.y).max(config.eye_height), p.z + v.z)
    }

    /// FNV-1a digest of frame counter, pose and velocity bit patterns.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= u64::from(b);
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.frame.to_le_bytes());
        for value in [
            self.pose.position.x,
            self.pose.position.y,
            self.pose.position.z,
            self.pose.yaw,
            self.pose.pitch,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ] {
            mix(&value.to_bits().to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomwalk_common::Aabb;

    fn open_floor() -> Vec<Collider> {
        Vec::new()
    }

    fn wall_at_z(z: f64) -> Collider {
        Collider {
            id: ObjectId(9),
            aabb: Aabb::new(DVec3::new(-5.0, 0.0, z - 0.25), DVec3::new(5.0, 5.0, z + 0.25)),
        }
    }

    #[test]
    fn new_state_starts_at_spawn_at_rest() {
        let s = SimulationState::new(SpawnPoint::default());
        assert_eq!(s.pose().position, DVec3::new(0.0, 1.6, 4.0));
        assert_eq!(s.velocity(), DVec3::ZERO);
        assert_eq!(s.frame(), 0);
        assert!(!s.flags().any_movement());
    }

    #[test]
    fn forward_frame_moves_toward_negative_z() {
        let config = MotionConfig::default();
        let mut s = SimulationState::new(SpawnPoint::default());
        s.flags_mut().forward = true;
        let report = s.step(&open_floor(), 1.0 / 60.0, &config);
        assert!(report.moved);
        assert_eq!(report.frame, 1);
        assert_eq!(s.velocity().z, -0.0005);
        assert_eq!(s.pose().position.z, 4.0 - 0.0005);
    }

    #[test]
    fn height_never_drops_below_eye_height() {
        let config = MotionConfig::default();
        let mut s = SimulationState::new(SpawnPoint::default());
        for _ in 0..500 {
            s.step(&open_floor(), 1.0 / 60.0, &config);
            assert!(s.pose().position.y >= 1.6);
        }
        assert_eq!(s.pose().position.y, 1.6);
    }

    #[test]
    fn gravity_accumulates_without_clamp() {
        let config = MotionConfig::default();
        let mut s = SimulationState::new(SpawnPoint::default());
        let mut expected = 0.0f64;
        for _ in 0..300 {
            s.step(&open_floor(), 1.0 / 60.0, &config);
            expected -= 0.0002;
            assert_eq!(s.velocity().y, expected);
        }
    }

    #[test]
    fn auto_rotate_adds_half_radian_per_second() {
        let config = MotionConfig::default();
        let mut s = SimulationState::new(SpawnPoint::default());
        s.flags_mut().auto_rotate = true;
        let report = s.step(&open_floor(), 0.5, &config);
        assert_eq!(report.yaw_delta, 0.25);
        assert_eq!(s.pose().yaw, 0.25);

        s.flags_mut().auto_rotate = false;
        let report = s.step(&open_floor(), 0.5, &config);
        assert_eq!(report.yaw_delta, 0.0);
        assert_eq!(s.pose().yaw, 0.25);
    }

    #[test]
    fn current_pose_gate_blocks_after_entering_a_box() {
        let config = MotionConfig::default();
        let mut s = SimulationState::new(SpawnPoint {
            position: DVec3::new(0.0, 1.6, 0.0),
            yaw: 0.0,
        });
        let colliders = vec![wall_at_z(0.0)];
        s.flags_mut().forward = true;
        let before = s.pose().position;
        let report = s.step(&colliders, 1.0 / 60.0, &config);
        assert!(!report.moved);
        assert_eq!(report.blocked_by, Some(ObjectId(9)));
        assert_eq!(s.pose().position, before);
        // Velocity is still integrated while blocked.
        assert_eq!(s.velocity().z, -0.0005);
    }

    #[test]
    fn candidate_gate_refuses_the_overlapping_step() {
        let config = MotionConfig {
            gate: CollisionGate::CandidatePose,
            ..MotionConfig::default()
        };
        let mut s = SimulationState::new(SpawnPoint {
            position: DVec3::new(0.0, 1.6, 0.75 + 0.25 + 0.0004),
            yaw: 0.0,
        });
        let colliders = vec![wall_at_z(0.5)];
        s.flags_mut().forward = true;
        let report = s.step(&colliders, 1.0 / 60.0, &config);
        assert!(!report.moved);
        let volume = config.body.volume_at(s.pose().position, config.eye_height);
        assert!(!colliders[0].aabb.intersects(&volume));
    }

    #[test]
    fn look_clamps_pitch() {
        let mut pose = *SimulationState::new(SpawnPoint::default()).pose();
        pose.look(0.1, 10.0);
        assert_eq!(pose.pitch, FRAC_PI_2);
        pose.look(0.0, -20.0);
        assert_eq!(pose.pitch, -FRAC_PI_2);
        assert_eq!(pose.yaw, 0.1);
    }

    #[test]
    fn forward_vector_at_rest_faces_negative_z() {
        let pose = *SimulationState::new(SpawnPoint::default()).pose();
        let f = pose.forward();
        assert!((f - DVec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn state_hash_tracks_changes() {
        let config = MotionConfig::default();
        let mut a = SimulationState::new(SpawnPoint::default());
        let mut b = SimulationState::new(SpawnPoint::default());
        assert_eq!(a.state_hash(), b.state_hash());
        a.step(&open_floor(), 0.0, &config);
        assert_ne!(a.state_hash(), b.state_hash());
        b.step(&open_floor(), 0.0, &config);
        assert_eq!(a.state_hash(), b.state_hash());
    }
}
