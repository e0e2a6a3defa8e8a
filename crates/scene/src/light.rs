use crate::object::Color;
use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    /// Uniform light on every surface.
    Ambient { color: Color, intensity: f64 },
    /// Parallel light shining from `position` toward the origin.
    Directional {
        color: Color,
        intensity: f64,
        position: DVec3,
    },
}

impl Light {
    pub fn intensity(&self) -> f64 {
        match *self {
            Light::Ambient { intensity, .. } | Light::Directional { intensity, .. } => intensity,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Light::Ambient { color, .. } | Light::Directional { color, .. } => color,
        }
    }

    /// Direction the light travels, or `None` for ambient light.
    pub fn direction(&self) -> Option<DVec3> {
        match *self {
            Light::Ambient { .. } => None,
            Light::Directional { position, .. } => Some(-position.normalize_or_zero()),
        }
    }

    /// Color scaled by intensity.
    pub fn radiance(&self) -> [f32; 3] {
        let scale = self.intensity() as f32;
        self.color().rgb().map(|c| c * scale)
    }
}
