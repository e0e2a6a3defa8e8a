use glam::DVec3;
use roomwalk_common::{Aabb, ObjectId};
use serde::{Deserialize, Serialize};

/// The box the camera occupies for collision purposes.
///
/// Horizontally it spans `half_width` around the camera on X and Z. Vertically
/// it runs from `foot_clearance` above the floor the eye stands on up to
/// `head_room` above the eye, so standing on the floor never counts as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyVolume {
    pub half_width: f64,
    pub foot_clearance: f64,
    pub head_room: f64,
}

impl Default for BodyVolume {
    fn default() -> Self {
        Self {
            half_width: 0.25,
            foot_clearance: 0.2,
            head_room: 0.1,
        }
    }
}

impl BodyVolume {
    pub fn volume_at(&self, position: DVec3, eye_height: f64) -> Aabb {
        Aabb::new(
            DVec3::new(
                position.x - self.half_width,
                position.y - eye_height + self.foot_clearance,
                position.z - self.half_width,
            ),
            DVec3::new(
                position.x + self.half_width,
                position.y + self.head_room,
                position.z + self.half_width,
            ),
        )
    }
}

/// Which pose the overlap test is run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionGate {
    /// Test the pose before this frame's displacement. A step that carries the
    /// body into an obstacle is committed; every step after it is refused.
    #[default]
    CurrentPose,
    /// Test the pose after this frame's displacement. Overlapping positions are
    /// never committed.
    CandidatePose,
}

/// A solid box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub id: ObjectId,
    pub aabb: Aabb,
}

/// Anything that can list the solid boxes of a world.
///
/// Order matters: the first collider hit is the one reported.
pub trait CollisionSource {
    fn collision_volumes(&self) -> Vec<Collider>;
}

impl CollisionSource for [Collider] {
    fn collision_volumes(&self) -> Vec<Collider> {
        self.to_vec()
    }
}

impl CollisionSource for Vec<Collider> {
    fn collision_volumes(&self) -> Vec<Collider> {
        self.clone()
    }
}

/// First collider (in list order) whose box intersects `volume`.
pub fn first_hit(volume: &Aabb, colliders: &[Collider]) -> Option<ObjectId> {
    colliders
        .iter()
        .find(|c| c.aabb.intersects(volume))
        .map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collider(id: u32, center: DVec3, half: DVec3) -> Collider {
        Collider {
            id: ObjectId(id),
            aabb: Aabb::from_center_half_extents(center, half),
        }
    }

    #[test]
    fn volume_sits_between_floor_clearance_and_head() {
        let body = BodyVolume::default();
        let v = body.volume_at(DVec3::new(1.0, 1.6, -2.0), 1.6);
        assert_eq!(v.min, DVec3::new(0.75, 0.2, -2.25));
        assert!((v.max.y - 1.7).abs() < 1e-12);
        assert_eq!(v.max.x, 1.25);
        assert_eq!(v.max.z, -1.75);
    }

    #[test]
    fn standing_on_floor_does_not_hit_floor_plane() {
        let body = BodyVolume::default();
        let floor = Collider {
            id: ObjectId(0),
            aabb: Aabb::new(DVec3::new(-5.0, 0.0, -5.0), DVec3::new(5.0, 0.0, 5.0)),
        };
        let v = body.volume_at(DVec3::new(0.0, 1.6, 0.0), 1.6);
        assert_eq!(first_hit(&v, &[floor]), None);
    }

    #[test]
    fn first_hit_respects_list_order() {
        let colliders = vec![
            collider(3, DVec3::ZERO, DVec3::ONE),
            collider(1, DVec3::ZERO, DVec3::splat(2.0)),
        ];
        let probe = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::splat(0.1));
        assert_eq!(first_hit(&probe, &colliders), Some(ObjectId(3)));
        assert_eq!(colliders.collision_volumes().len(), 2);
    }

    #[test]
    fn empty_collider_list_never_hits() {
        let probe = Aabb::from_center_half_extents(DVec3::ZERO, DVec3::ONE);
        assert_eq!(first_hit(&probe, &[]), None);
    }

    #[test]
    fn gate_serializes_snake_case() {
        assert_eq!(CollisionGate::default(), CollisionGate::CurrentPose);
        let json = serde_json::to_string(&CollisionGate::CandidatePose).unwrap();
        assert_eq!(json, "\"candidate_pose\"");
    }
}
