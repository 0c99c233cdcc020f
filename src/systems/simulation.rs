//! Simulation system
//!
//! Measures the frame delta and drives the scene manager with it. The
//! wheel scene steps its world at a fixed rate per frame, so the delta
//! here only paces transitions and layer effects.

use std::time::Instant;

use wheel_core::SceneManager;

/// Largest frame delta passed on, in seconds
const MAX_FRAME_DELTA: f32 = 0.25;

/// Manages the frame clock
pub struct SimulationSystem {
    last_frame: Instant,
    frames: u64,
}

impl SimulationSystem {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frames: 0,
        }
    }

    /// Run one frame; returns the delta that was used
    pub fn update(&mut self, scene_manager: &mut SceneManager) -> f32 {
        let now = Instant::now();
        let dt = clamp_frame_delta((now - self.last_frame).as_secs_f32());
        self.last_frame = now;
        self.frames += 1;

        scene_manager.update(dt);
        dt
    }

    /// Frames simulated so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Cap long frames (first frame, window drags) so transitions don't jump
fn clamp_frame_delta(raw: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    }
}
