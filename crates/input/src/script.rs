//! Scripted key input for headless runs and tests.
//!
//! A script is a comma-separated list of `keys:frames` segments. Keys are
//! joined with `+`; `-` means nothing is held. `KeyW:60,KeyW+KeyA:30,-:20`
//! holds W for 60 frames, W and A for 30, then releases for 20.

use crate::action::MovementFlags;
use crate::bindings::KeyBindings;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("input script is empty")]
    Empty,
    #[error("segment `{0}` is missing a `:frames` suffix")]
    MissingFrameCount(String),
    #[error("segment `{segment}` has an invalid frame count: {source}")]
    InvalidFrameCount {
        segment: String,
        source: ParseIntError,
    },
}

/// Keys held for a run of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSegment {
    pub keys: Vec<String>,
    pub frames: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputScript {
    segments: Vec<ScriptSegment>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut segments = Vec::new();
        for raw in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (keys, frames) = raw
                .rsplit_once(':')
                .ok_or_else(|| ScriptError::MissingFrameCount(raw.to_string()))?;
            let frames = frames
                .trim()
                .parse::<u32>()
                .map_err(|source| ScriptError::InvalidFrameCount {
                    segment: raw.to_string(),
                    source,
                })?;
            let keys = keys
                .split('+')
                .map(str::trim)
                .filter(|k| !k.is_empty() && *k != "-")
                .map(str::to_string)
                .collect();
            segments.push(ScriptSegment { keys, frames });
        }
        if segments.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[ScriptSegment] {
        &self.segments
    }

    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Keys held on frame `frame` (zero-based), or `None` past the end.
    pub fn held_at(&self, frame: u64) -> Option<&[String]> {
        let mut start = 0u64;
        for segment in &self.segments {
            let end = start + u64::from(segment.frames);
            if frame < end {
                return Some(&segment.keys);
            }
            start = end;
        }
        None
    }
}

impl FromStr for InputScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Replays an [`InputScript`] through a binding table, one frame at a time.
///
/// Emits key-up for keys that stop being held and key-down for held keys,
/// exactly as a keyboard would.
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    script: InputScript,
    frame: u64,
    held: Vec<String>,
}

impl ScriptPlayer {
    pub fn new(script: InputScript) -> Self {
        Self {
            script,
            frame: 0,
            held: Vec::new(),
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.script.total_frames()
    }

    /// Apply the key state for the next frame. Returns `false` once the script is exhausted.
    pub fn advance(&mut self, bindings: &KeyBindings, flags: &mut MovementFlags) -> bool {
        let Some(now) = self.script.held_at(self.frame) else {
            return false;
        };
        for key in self.held.iter().filter(|k| !now.contains(k)) {
            bindings.apply(flags, key, false);
        }
        for key in now {
            bindings.apply(flags, key, true);
        }
        self.held = now.to_vec();
        self.frame += 1;
        true
    }
}
