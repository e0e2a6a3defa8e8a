//! Developer Tooling: read-only inspection of the simulation and scene.
//!
//! # Invariants
//! - Inspectors never mutate what they inspect.

mod inspector;

pub use inspector::{FrameInspector, FrameSummary, ObjectInfo};

pub fn crate_info() -> &'static str {
    "roomwalk-tools v0.1.0"
}
