//! Static room scene: objects with shapes and transforms, lights, and the
//! collider set the kinematic updater walks against.
//!
//! # Invariants
//! - Object ids are assigned sequentially in description order.
//! - Only `Shape::Box` objects collide; planes are visual only.
//! - Colliders are derived from object transforms on every request, never cached.

pub mod description;
pub mod light;
pub mod object;

pub use description::SceneDescription;
pub use light::Light;
pub use object::{Color, ObjectDescription, SceneObject, Shape, SwitchState};

use roomwalk_common::ObjectId;
use roomwalk_kernel::{Collider, CollisionSource};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("object `{name}` has invalid size {size:?}")]
    InvalidSize { name: String, size: [f64; 3] },
    #[error("object `{name}` has a non-finite transform")]
    NonFiniteTransform { name: String },
    #[error("light {index} has invalid intensity {intensity}")]
    InvalidLight { index: usize, intensity: f64 },
}

/// A validated, immutable scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
}

impl Scene {
    /// Validate a description and assign object ids.
    pub fn from_description(desc: SceneDescription) -> Result<Self, SceneError> {
        validate(&desc)?;
        let scene = Self::build(desc);
        tracing::info!(
            objects = scene.objects.len(),
            lights = scene.lights.len(),
            "scene built"
        );
        Ok(scene)
    }

    /// The furnished room from [`SceneDescription::default_room`].
    pub fn default_room() -> Self {
        Self::build(SceneDescription::default_room())
    }

    fn build(desc: SceneDescription) -> Self {
        let objects = desc
            .objects
            .into_iter()
            .enumerate()
            .map(|(i, o)| SceneObject::from_description(ObjectId(i as u32), o))
            .collect();
        Self {
            objects,
            lights: desc.lights,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn boxes(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.shape.is_box())
    }
}

impl CollisionSource for Scene {
    fn collision_volumes(&self) -> Vec<Collider> {
        self.boxes()
            .map(|o| Collider {
                id: o.id,
                aabb: o.world_aabb(),
            })
            .collect()
    }
}

fn validate(desc: &SceneDescription) -> Result<(), SceneError> {
    for object in &desc.objects {
        let size = object.shape.extents();
        let ok = match object.shape {
            Shape::Box { .. } => size.iter().all(|v| v.is_finite() && *v > 0.0),
            Shape::Plane { .. } => size[..2].iter().all(|v| v.is_finite() && *v > 0.0),
        };
        if !ok {
            return Err(SceneError::InvalidSize {
                name: object.name.clone(),
                size,
            });
        }
        if !(object.transform.position.is_finite() && object.transform.rotation.is_finite()) {
            return Err(SceneError::NonFiniteTransform {
                name: object.name.clone(),
            });
        }
    }
    for (index, light) in desc.lights.iter().enumerate() {
        let intensity = light.intensity();
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(SceneError::InvalidLight { index, intensity });
        }
    }
    Ok(())
}
