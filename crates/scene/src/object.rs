use glam::DVec3;
use roomwalk_common::{Aabb, ObjectId, Transform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color written as hex, e.g. `0x8B4513`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    /// Channels in `[0, 1]`.
    pub fn rgb(self) -> [f32; 3] {
        let channel = |shift: u32| ((self.0 >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Geometry of a scene object in its local frame, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Solid box. Boxes are the only shapes that collide.
    Box { size: DVec3 },
    /// Flat rectangle in local XY, facing +Z.
    Plane { width: f64, height: f64 },
}

impl Shape {
    pub fn is_box(&self) -> bool {
        matches!(self, Shape::Box { .. })
    }

    /// Corners of the local bounding box. Planes give four distinct corners, each twice.
    pub fn local_corners(&self) -> [DVec3; 8] {
        let half = match *self {
            Shape::Box { size } => size * 0.5,
            Shape::Plane { width, height } => DVec3::new(width * 0.5, height * 0.5, 0.0),
        };
        let mut corners = [DVec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = DVec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
        }
        corners
    }

    /// Extents as `[x, y, z]`; planes report zero depth.
    pub fn extents(&self) -> [f64; 3] {
        match *self {
            Shape::Box { size } => size.to_array(),
            Shape::Plane { width, height } => [width, height, 0.0],
        }
    }
}

/// Interactive state carried by a floor switch. Nothing in the room flips it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwitchState {
    pub activated: bool,
}

/// An object as written in a scene description, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    pub shape: Shape,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch: Option<SwitchState>,
}

impl ObjectDescription {
    pub fn new(name: impl Into<String>, shape: Shape, position: DVec3, color: Color) -> Self {
        Self {
            name: name.into(),
            shape,
            transform: Transform::from_position(position),
            color,
            switch: None,
        }
    }

    pub fn rotated(mut self, rotation: DVec3) -> Self {
        self.transform = self.transform.with_rotation(rotation);
        self
    }

    pub fn with_switch(mut self, switch: SwitchState) -> Self {
        self.switch = Some(switch);
        self
    }
}

/// A placed object with its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub color: Color,
    pub switch: Option<SwitchState>,
}

impl SceneObject {
    pub(crate) fn from_description(id: ObjectId, desc: ObjectDescription) -> Self {
        Self {
            id,
            name: desc.name,
            shape: desc.shape,
            transform: desc.transform,
            color: desc.color,
            switch: desc.switch,
        }
    }

    /// World-space bounding box: the local corners pushed through the world
    /// matrix, then min/max per axis.
    pub fn world_aabb(&self) -> Aabb {
        let matrix = self.transform.matrix();
        Aabb::from_points(
            self.shape
                .local_corners()
                .into_iter()
                .map(|c| matrix.transform_point3(c)),
        )
    }
}
