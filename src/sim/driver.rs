//! Fixed-rate driver
//!
//! Feeds wall-clock time in and runs one step per elapsed interval, so the
//! step rate does not depend on how often the caller's frame loop runs. A
//! long stall runs at most `MAX_SUBSTEPS` steps and drops the rest instead
//! of bursting through the backlog.

use super::state::SimState;
use super::tick::{StepReport, step};

/// Longest frame delta accepted (seconds); longer gaps are treated as this
const MAX_FRAME_DELTA: f32 = 0.25;

/// Most steps a single `advance` call may run
pub const MAX_SUBSTEPS: u32 = 8;

/// Accumulator-based tick scheduler
#[derive(Debug, Clone, Default)]
pub struct Driver {
    accumulator: f32,
    /// Ticks fired, running or not
    pub ticks: u64,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time banked towards the next tick (seconds)
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed `elapsed` seconds. Returns the reports of the steps that ran;
    /// empty when no interval elapsed or the simulation is stopped.
    pub fn advance(&mut self, state: &mut SimState, elapsed: f32) -> Vec<StepReport> {
        let mut reports = Vec::new();
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return reports;
        }
        self.accumulator += elapsed.min(MAX_FRAME_DELTA);

        // Re-read every frame so the tick rate can change while running
        let interval = state.settings().step_interval();
        let mut substeps = 0;
        while self.accumulator >= interval && substeps < MAX_SUBSTEPS {
            self.accumulator -= interval;
            substeps += 1;
            self.ticks += 1;
            reports.extend(step(state));
        }

        if self.accumulator >= interval {
            // Step cap hit: drop the backlog, no catch-up
            self.accumulator = 0.0;
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PlayerKind;

    fn running_state(steps_per_second: f32) -> SimState {
        let mut state = SimState::new(1);
        state.set_steps_per_second(steps_per_second).unwrap();
        state.add_player(PlayerKind::Random);
        state.start();
        state
    }

    #[test]
    fn test_fires_once_interval_elapsed() {
        let mut state = running_state(10.0);
        let mut driver = Driver::new();

        assert!(driver.advance(&mut state, 0.05).is_empty());
        assert_eq!(driver.ticks, 0);
        assert_eq!(driver.advance(&mut state, 0.06).len(), 1);
        assert_eq!(driver.ticks, 1);
        assert_eq!(state.step_count, 1);
    }

    #[test]
    fn test_rate_above_frame_rate() {
        // 120 steps/s fed by 60 fps frames
        let mut state = running_state(120.0);
        let mut driver = Driver::new();

        let mut ran = 0;
        for _ in 0..60 {
            let reports = driver.advance(&mut state, 1.0 / 60.0);
            assert_eq!(reports.len(), 2);
            ran += reports.len();
        }
        assert_eq!(ran, 120);
        assert_eq!(state.step_count, 120);
    }

    #[test]
    fn test_slow_frame_keeps_remainder() {
        let mut state = running_state(10.0);
        let mut driver = Driver::new();

        // 2.5 intervals: two steps, half an interval stays banked
        assert_eq!(driver.advance(&mut state, 0.25).len(), 2);
        assert_eq!(state.step_count, 2);
        assert!((driver.pending() - 0.05).abs() < 1e-6);
        assert_eq!(driver.advance(&mut state, 0.06).len(), 1);
    }

    #[test]
    fn test_no_catch_up_past_step_cap() {
        let mut state = running_state(120.0);
        let mut driver = Driver::new();

        // A quarter-second stall is 30 intervals at 120 steps/s
        assert_eq!(driver.advance(&mut state, 0.25).len(), MAX_SUBSTEPS as usize);
        assert_eq!(state.step_count, u64::from(MAX_SUBSTEPS));
        assert_eq!(driver.pending(), 0.0);
        assert!(driver.advance(&mut state, 0.001).is_empty());
    }

    #[test]
    fn test_ticks_while_stopped_are_noops() {
        let mut state = running_state(10.0);
        state.stop();
        let mut driver = Driver::new();

        assert!(driver.advance(&mut state, 0.15).is_empty());
        assert_eq!(driver.ticks, 1);
        assert_eq!(state.step_count, 0);

        state.start();
        assert_eq!(driver.advance(&mut state, 0.06).len(), 1);
        assert_eq!(state.step_count, 1);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut state = running_state(10.0);
        let mut driver = Driver::new();
        assert!(driver.advance(&mut state, -1.0).is_empty());
        assert!(driver.advance(&mut state, f32::NAN).is_empty());
        assert_eq!(driver.pending(), 0.0);
    }
}
