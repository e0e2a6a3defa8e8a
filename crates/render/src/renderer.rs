use crate::Projection;
use roomwalk_kernel::{CollisionSource, SimulationState};
use roomwalk_scene::{Scene, Shape};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene, the simulation state and the projection, then
/// produces output. It never mutates any of them.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene, state: &SimulationState, projection: &Projection)
    -> Self::Output;
}

/// Human-readable dump of one frame, for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include per-object bounds.
    pub list_objects: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects() -> Self {
        Self { list_objects: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, state: &SimulationState, projection: &Projection) -> String {
        let pose = state.pose();
        let v = state.velocity();
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame {} ===", state.frame());
        let _ = writeln!(
            out,
            "Camera: pos=({:.3}, {:.3}, {:.3}) yaw={:.3} pitch={:.3} fov={:.0} aspect={:.2}",
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.yaw,
            pose.pitch,
            projection.fov_y_degrees,
            projection.aspect
        );
        let _ = writeln!(out, "Velocity: ({:.6}, {:.6}, {:.6})", v.x, v.y, v.z);
        let _ = writeln!(out, "Keys: {}", state.flags());
        let _ = writeln!(
            out,
            "Objects: {} ({} colliders), lights: {}",
            scene.objects().len(),
            scene.collision_volumes().len(),
            scene.lights().len()
        );

        if self.list_objects {
            for object in scene.objects() {
                let kind = match object.shape {
                    Shape::Box { .. } => "box",
                    Shape::Plane { .. } => "plane",
                };
                let _ = writeln!(
                    out,
                    "  {} {:<15} {:<5} {} {}",
                    object.id,
                    object.name,
                    kind,
                    object.color,
                    object.world_aabb()
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomwalk_kernel::SpawnPoint;

    #[test]
    fn debug_renderer_reports_frame_and_camera() {
        let scene = Scene::default_room();
        let state = SimulationState::new(SpawnPoint::default());
        let output = DebugTextRenderer::new().render(&scene, &state, &Projection::default());

        assert!(output.contains("=== Frame 0 ==="));
        assert!(output.contains("pos=(0.000, 1.600, 4.000)"));
        assert!(output.contains("Objects: 16 (15 colliders), lights: 2"));
        assert!(output.contains("Keys: none"));
        assert!(!output.contains("desk"));
    }

    #[test]
    fn debug_renderer_lists_objects_on_request() {
        let scene = Scene::default_room();
        let state = SimulationState::new(SpawnPoint::default());
        let output = DebugTextRenderer::with_objects().render(&scene, &state, &Projection::default());

        assert!(output.contains("desk"));
        assert!(output.contains("floor_switch"));
        assert!(output.contains("plane"));
        assert!(output.contains("#8b4513"));
    }
}
