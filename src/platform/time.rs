//! Fixed-timestep frame clock

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Splits variable frame times into whole `SIM_DT` steps
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed milliseconds; returns how many sim steps to run
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let dt = ((elapsed_ms / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop time we could not catch up on (spiral of death guard)
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(5.0), 0);
        assert_eq!(clock.advance(5.0), 1);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(10_000.0), MAX_SUBSTEPS);
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn negative_time_is_ignored() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(-50.0), 0);
    }
}
