use crate::RenderError;
use glam::{EulerRot, Mat4, Quat};
use roomwalk_kernel::CameraPose;
use serde::{Deserialize, Serialize};

/// Perspective projection parameters. Aspect follows the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    pub fov_y_degrees: f32,
    #[serde(skip)]
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(RenderError::InvalidProjection(format!(
                "fov_y_degrees {} outside (0, 180)",
                self.fov_y_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(RenderError::InvalidProjection(format!(
                "clip planes near {} far {}",
                self.near, self.far
            )));
        }
        Ok(())
    }

    /// Track a new viewport size. Zero-sized viewports (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        tracing::debug!(width, height, aspect = self.aspect, "projection resized");
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// World-to-view matrix for `pose`: yaw about Y, then pitch about the local X.
    pub fn view_matrix(pose: &CameraPose) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::YXZ, pose.yaw as f32, pose.pitch as f32, 0.0);
        Mat4::from_rotation_translation(rotation, pose.position.as_vec3()).inverse()
    }

    pub fn view_projection(&self, pose: &CameraPose) -> Mat4 {
        self.projection_matrix() * Self::view_matrix(pose)
    }
}
