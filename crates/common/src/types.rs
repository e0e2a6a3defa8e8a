use glam::{DMat4, DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an object in the scene. Assigned sequentially in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position plus Euler rotation (radians, XYZ order).
///
/// Scale is not part of the transform; shapes carry their own dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    #[serde(default)]
    pub rotation: DVec3,
}

impl Transform {
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            rotation: DVec3::ZERO,
        }
    }

    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn rotation_quat(&self) -> DQuat {
        DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Local-to-world matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation_quat(), self.position)
    }
}

/// Axis-aligned bounding box.
///
/// Intersection is inclusive: boxes that merely touch on a face intersect.
/// The empty box (`min = +inf`, `max = -inf`) intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box enclosing every point. Returns [`Aabb::EMPTY`] for no points.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[empty]");
        }
        write!(
            f,
            "[({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: DVec3) -> Aabb {
        Aabb::from_center_half_extents(center, DVec3::splat(0.5))
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = unit_box_at(DVec3::ZERO);
        let b = unit_box_at(DVec3::new(0.75, 0.0, 0.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_faces_count_as_intersection() {
        let a = unit_box_at(DVec3::ZERO);
        let b = unit_box_at(DVec3::new(1.0, 0.0, 0.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn separated_on_one_axis_does_not_intersect() {
        let a = unit_box_at(DVec3::ZERO);
        let b = unit_box_at(DVec3::new(0.0, 0.0, 1.5));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn empty_box_never_intersects() {
        let a = unit_box_at(DVec3::ZERO);
        assert!(Aabb::EMPTY.is_empty());
        assert!(!a.intersects(&Aabb::EMPTY));
        assert!(!Aabb::EMPTY.intersects(&a));
        assert_eq!(Aabb::EMPTY.size(), DVec3::ZERO);
    }

    #[test]
    fn from_points_encloses_all() {
        let aabb = Aabb::from_points([
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(-1.0, 4.0, 0.0),
            DVec3::new(0.5, 0.0, -3.0),
        ]);
        assert_eq!(aabb.min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, DVec3::new(1.0, 4.0, 3.0));
        assert_eq!(aabb.center(), DVec3::new(0.0, 1.0, 0.0));
        assert!(Aabb::from_points(std::iter::empty()).is_empty());
    }

    #[test]
    fn transform_matrix_translates_and_rotates() {
        let t = Transform::from_position(DVec3::new(1.0, 2.0, 3.0))
            .with_rotation(DVec3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));
        let p = t.matrix().transform_point3(DVec3::X);
        // +X rotated a quarter turn about Y lands on -Z.
        assert!((p - DVec3::new(1.0, 2.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), DMat4::IDENTITY);
    }

    #[test]
    fn object_id_display() {
        assert_eq!(ObjectId(7).to_string(), "#7");
    }
}
