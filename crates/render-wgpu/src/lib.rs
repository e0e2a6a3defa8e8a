//! wgpu render backend for the room.
//!
//! Boxes are drawn as an instanced unit cube and planes as an instanced unit
//! quad, shaded with the scene's ambient light plus up to four directional
//! lights. No shadows.
//!
//! # Invariants
//! - The renderer never mutates the scene or the simulation state.
//! - Instance data is rebuilt from the scene every frame.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::WgpuRenderer;
