use roomwalk_common::{Aabb, ObjectId};
use roomwalk_kernel::{FrameReport, SimulationState};
use roomwalk_scene::Scene;
use serde::Serialize;

/// Frame inspector for the HUD and the CLI.
///
/// Read-only queries against the simulation state and scene.
pub struct FrameInspector;

impl FrameInspector {
    /// Summarize the state after `report`'s frame. The blocking collider, if
    /// any, is resolved to its scene name.
    pub fn summary(scene: &Scene, state: &SimulationState, report: &FrameReport) -> FrameSummary {
        let pose = state.pose();
        let v = state.velocity();
        FrameSummary {
            frame: state.frame(),
            position: pose.position.to_array(),
            yaw: pose.yaw,
            pitch: pose.pitch,
            velocity: v.to_array(),
            horizontal_speed: v.x.hypot(v.z),
            keys: state.flags().to_string(),
            moved: report.moved,
            blocked_by: report
                .blocked_by
                .map(|id| Self::name_of(scene, id)),
            state_hash: state.state_hash(),
        }
    }

    /// Every object with its world bounds, in id order.
    pub fn objects(scene: &Scene) -> Vec<ObjectInfo> {
        scene
            .objects()
            .iter()
            .map(|o| ObjectInfo {
                id: o.id,
                name: o.name.clone(),
                collides: o.shape.is_box(),
                color: o.color.to_string(),
                bounds: o.world_aabb(),
            })
            .collect()
    }

    fn name_of(scene: &Scene, id: ObjectId) -> String {
        scene
            .object(id)
            .map(|o| o.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Snapshot of one frame for display.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSummary {
    pub frame: u64,
    pub position: [f64; 3],
    pub yaw: f64,
    pub pitch: f64,
    pub velocity: [f64; 3],
    pub horizontal_speed: f64,
    pub keys: String,
    pub moved: bool,
    pub blocked_by: Option<String>,
    pub state_hash: u64,
}

impl std::fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frame={} pos=({:.3}, {:.3}, {:.3}) yaw={:.3} speed={:.5} keys={}",
            self.frame,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            self.horizontal_speed,
            self.keys
        )?;
        if let Some(name) = &self.blocked_by {
            write!(f, " blocked_by={name}")?;
        }
        Ok(())
    }
}

/// One scene object as listed by the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub name: String,
    pub collides: bool,
    pub color: String,
    pub bounds: Aabb,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>4} {:<15} {:<8} {} {}",
            self.id.to_string(),
            self.name,
            if self.collides { "collider" } else { "visual" },
            self.color,
            self.bounds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomwalk_kernel::{FixedClock, FrameLoop, MotionConfig, SpawnPoint};

    fn walk_into_desk() -> (Scene, SimulationState, FrameReport) {
        let scene = Scene::default_room();
        let mut fl = FrameLoop::new(
            SimulationState::new(SpawnPoint::default()),
            MotionConfig::default(),
            FixedClock::sixty_hz(),
        );
        fl.state_mut().flags_mut().forward = true;
        let report = fl.run_frames(400, &scene, |_, _| {}).unwrap();
        (scene, fl.state().clone(), report)
    }

    #[test]
    fn summary_at_spawn() {
        let scene = Scene::default_room();
        let state = SimulationState::new(SpawnPoint::default());
        let report = FrameReport {
            frame: 0,
            yaw_delta: 0.0,
            moved: false,
            blocked_by: None,
        };
        let summary = FrameInspector::summary(&scene, &state, &report);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.position, [0.0, 1.6, 4.0]);
        assert_eq!(summary.keys, "none");
        assert_eq!(summary.horizontal_speed, 0.0);
        assert!(summary.blocked_by.is_none());
        assert_eq!(summary.state_hash, state.state_hash());
    }

    #[test]
    fn summary_names_the_blocking_object() {
        let (scene, state, report) = walk_into_desk();
        let summary = FrameInspector::summary(&scene, &state, &report);
        assert_eq!(summary.blocked_by.as_deref(), Some("desk"));
        assert!(summary.to_string().contains("blocked_by=desk"));
        assert_eq!(summary.keys, "forward");
    }

    #[test]
    fn summary_serializes() {
        let (scene, state, report) = walk_into_desk();
        let json = serde_json::to_value(FrameInspector::summary(&scene, &state, &report)).unwrap();
        assert_eq!(json["blocked_by"], "desk");
        assert_eq!(json["moved"], false);
    }

    #[test]
    fn objects_list_every_object_once() {
        let scene = Scene::default_room();
        let objects = FrameInspector::objects(&scene);
        assert_eq!(objects.len(), scene.objects().len());
        let floor = objects.iter().find(|o| o.name == "floor").unwrap();
        assert!(!floor.collides);
        assert!(floor.to_string().contains("visual"));
    }
}
