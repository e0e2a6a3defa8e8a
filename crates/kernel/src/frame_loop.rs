use crate::collision::CollisionSource;
use crate::motion::MotionConfig;
use crate::state::{FrameReport, SimulationState};
use std::time::Instant;

/// Source of elapsed time between frames.
pub trait FrameClock {
    /// Seconds since the previous call (or since the clock was created).
    fn delta_seconds(&mut self) -> f64;
}

/// Wall-clock time, seeded when the loop starts.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    last: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn delta_seconds(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        delta
    }
}

/// A clock that advances by a constant step. Used for headless runs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f64,
}

impl FixedClock {
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    pub fn sixty_hz() -> Self {
        Self::new(1.0 / 60.0)
    }
}

impl FrameClock for FixedClock {
    fn delta_seconds(&mut self) -> f64 {
        self.step
    }
}

/// Owns the simulation state and drives it one frame at a time.
///
/// The host (a redraw handler or a CLI loop) decides when frames happen;
/// the loop never schedules itself.
#[derive(Debug)]
pub struct FrameLoop<C> {
    state: SimulationState,
    config: MotionConfig,
    clock: C,
}

impl<C: FrameClock> FrameLoop<C> {
    pub fn new(state: SimulationState, config: MotionConfig, clock: C) -> Self {
        Self {
            state,
            config,
            clock,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Run the kinematic update for one frame. Colliders are re-read from
    /// `world` every frame.
    pub fn advance<W: CollisionSource + ?Sized>(&mut self, world: &W) -> FrameReport {
        let _span = tracing::trace_span!("frame", n = self.state.frame() + 1).entered();
        let colliders = world.collision_volumes();
        let elapsed = self.clock.delta_seconds();
        let report = self.state.step(&colliders, elapsed, &self.config);
        if let Some(id) = report.blocked_by {
            tracing::debug!(frame = report.frame, collider = %id, "movement blocked");
        }
        report
    }

    /// Advance one frame and hand the result to `present`.
    pub fn run_frame<W, F>(&mut self, world: &W, mut present: F) -> FrameReport
    where
        W: CollisionSource + ?Sized,
        F: FnMut(&SimulationState, &FrameReport),
    {
        let report = self.advance(world);
        present(&self.state, &report);
        report
    }

    /// Run `count` frames, presenting each. Returns the last report, if any.
    pub fn run_frames<W, F>(&mut self, count: u64, world: &W, mut present: F) -> Option<FrameReport>
    where
        W: CollisionSource + ?Sized,
        F: FnMut(&SimulationState, &FrameReport),
    {
        let mut last = None;
        for _ in 0..count {
            last = Some(self.run_frame(world, &mut present));
        }
        last
    }
}
