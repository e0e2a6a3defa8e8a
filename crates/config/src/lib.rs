//! YAML configuration for roomwalk apps.
//!
//! Every section is optional; a missing section takes its default. A config
//! with no `scene` section walks the built-in furnished room.
//!
//! # Invariants
//! - A config returned by [`RoomwalkConfig::load`] or
//!   [`RoomwalkConfig::from_yaml_str`] has passed [`RoomwalkConfig::validate`].
//! - Validation happens once at startup; nothing here is consulted per frame.

use roomwalk_input::{BindingError, KeyBindings};
use roomwalk_kernel::{KernelError, MotionConfig, SpawnPoint};
use roomwalk_render::{Projection, RenderError};
use roomwalk_scene::{Scene, SceneDescription, SceneError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("key bindings: {0}")]
    Bindings(#[from] BindingError),
    #[error("window size {width}x{height} must be non-zero")]
    InvalidWindow { width: u32, height: u32 },
}

/// Desktop window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "roomwalk".into(),
            width: 1280,
            height: 720,
        }
    }
}

/// Top-level config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomwalkConfig {
    pub motion: MotionConfig,
    pub spawn: SpawnPoint,
    pub bindings: KeyBindings,
    pub projection: Projection,
    pub window: WindowConfig,
    /// Replaces the built-in room when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneDescription>,
}

impl RoomwalkConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate a YAML document. A document with no content
    /// (blank, or comments only) yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if is_blank_document(text) {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        self.projection.validate()?;
        self.bindings.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        if let Some(desc) = &self.scene {
            Scene::from_description(desc.clone())?;
        }
        Ok(())
    }

    /// The scene to walk: the configured one, or the default room.
    pub fn build_scene(&self) -> Result<Scene, ConfigError> {
        match &self.scene {
            Some(desc) => Ok(Scene::from_description(desc.clone())?),
            None => Ok(Scene::default_room()),
        }
    }
}

fn is_blank_document(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

pub fn crate_info() -> &'static str {
    "roomwalk-config v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomwalk_input::Action;
    use roomwalk_kernel::CollisionGate;
    use std::io::Write;

    #[test]
    fn crate_loads() {
        assert_eq!(crate_info(), "roomwalk-config v0.1.0");
    }

    #[test]
    fn blank_document_is_default() {
        let config = RoomwalkConfig::from_yaml_str("").unwrap();
        assert_eq!(config, RoomwalkConfig::default());
        let config = RoomwalkConfig::from_yaml_str("# nothing here\n---\n").unwrap();
        assert_eq!(config, RoomwalkConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "motion:\n  acceleration: 0.001\n  gate: candidate_pose\nwindow:\n  title: test\n";
        let config = RoomwalkConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.motion.acceleration, 0.001);
        assert_eq!(config.motion.damping, MotionConfig::default().damping);
        assert_eq!(config.motion.gate, CollisionGate::CandidatePose);
        assert_eq!(config.window.title, "test");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.spawn, SpawnPoint::default());
    }

    #[test]
    fn damping_of_one_is_rejected() {
        let err = RoomwalkConfig::from_yaml_str("motion:\n  damping: 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Kernel(_)));
    }

    #[test]
    fn bad_projection_is_rejected() {
        let err = RoomwalkConfig::from_yaml_str("projection:\n  near: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Render(_)));
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = RoomwalkConfig::from_yaml_str("window:\n  width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindow { width: 0, .. }));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = RoomwalkConfig::from_yaml_str("motion: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn bindings_replace_the_default_table() {
        let yaml = "bindings:\n  ArrowUp: move_forward\n";
        let config = RoomwalkConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.bindings.action_for("ArrowUp"), Some(Action::MoveForward));
        assert_eq!(config.bindings.action_for("KeyW"), None);
    }

    #[test]
    fn scene_override_is_validated() {
        let yaml = "scene:\n  objects:\n    - name: crate\n      shape: { kind: box, size: [1.0, -1.0, 1.0] }\n";
        let err = RoomwalkConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Scene(_)));
    }

    #[test]
    fn build_scene_uses_override_or_default_room() {
        assert_eq!(
            RoomwalkConfig::default().build_scene().unwrap().objects().len(),
            16
        );
        let yaml = "scene:\n  objects:\n    - name: crate\n      shape: { kind: box, size: [1.0, 1.0, 1.0] }\n";
        let config = RoomwalkConfig::from_yaml_str(yaml).unwrap();
        let scene = config.build_scene().unwrap();
        assert_eq!(scene.objects().len(), 1);
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spawn:\n  position: [1.0, 1.6, 2.0]\n  yaw: 0.5").unwrap();
        let config = RoomwalkConfig::load(file.path()).unwrap();
        assert_eq!(config.spawn.position.x, 1.0);
        assert_eq!(config.spawn.position.z, 2.0);
        assert_eq!(config.spawn.yaw, 0.5);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RoomwalkConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn defaults_survive_a_yaml_round_trip() {
        let config = RoomwalkConfig::default();
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(RoomwalkConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
