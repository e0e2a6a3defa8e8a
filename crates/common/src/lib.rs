//! Shared types: object identifiers, transforms and axis-aligned bounding boxes.
//!
//! Everything spatial is stored in `f64`; renderers convert to `f32` at the
//! GPU boundary.

mod types;

pub use types::{Aabb, ObjectId, Transform};
