//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene and simulation state; they never mutate either.
//! - Viewport resize touches only the [`Projection`], never the kinematic state.

mod projection;
mod renderer;

pub use projection::Projection;
pub use renderer::{DebugTextRenderer, Renderer};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    #[error("invalid projection: {0}")]
    InvalidProjection(String),
}

pub fn crate_info() -> &'static str {
    "roomwalk-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
