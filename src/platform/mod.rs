//! Platform layer
//!
//! Frame-rate independent tick driver shared by every front end, plus the
//! browser facade on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta fed into the accumulator, in seconds
const MAX_FRAME_DT: f32 = 0.1;

/// Converts variable frame deltas into whole simulation ticks
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Add a frame's elapsed seconds and return how many ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_nan() || frame_dt <= 0.0 || self.step <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Drop any partial tick (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}
