//! Platform abstraction layer
//!
//! Handles the parts of the outside world the game loop consumes:
//! - Time (monotonic milliseconds)
//! - Fixed-step scheduling
//! - Input actions

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::MAX_SUBSTEPS;

/// Logical input, already decoupled from physical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    /// Fire the temporary-ball volley
    Launch,
    Pause,
    Confirm,
    Quit,
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Hand-driven clock for headless runs and tests. Clones share one time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: Rc::new(Cell::new(start_ms)) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Fixed-step accumulator. Stopping discards pending time, so a restart never
/// catches up on the interval it was stopped for.
#[derive(Debug, Clone)]
pub struct FixedTicker {
    step_ms: u64,
    accumulator_ms: u64,
    last_ms: Option<u64>,
}

impl FixedTicker {
    /// A stopped ticker with the given step
    pub fn new(step_ms: u32) -> Self {
        Self {
            step_ms: u64::from(step_ms.max(1)),
            accumulator_ms: 0,
            last_ms: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.last_ms.is_some()
    }

    /// Start counting from `now_ms`. No-op if already running.
    pub fn start(&mut self, now_ms: u64) {
        if self.last_ms.is_none() {
            self.last_ms = Some(now_ms);
            self.accumulator_ms = 0;
        }
    }

    pub fn stop(&mut self) {
        self.last_ms = None;
        self.accumulator_ms = 0;
    }

    /// Number of steps due at `now_ms`, capped at `MAX_SUBSTEPS`
    pub fn due_steps(&mut self, now_ms: u64) -> u32 {
        let Some(last) = self.last_ms else {
            return 0;
        };
        self.accumulator_ms += now_ms.saturating_sub(last);
        self.last_ms = Some(now_ms);

        let due = self.accumulator_ms / self.step_ms;
        let steps = due.min(u64::from(MAX_SUBSTEPS));
        self.accumulator_ms -= steps * self.step_ms;
        if due > steps {
            // Too far behind: drop the backlog instead of spiralling
            log::debug!("Ticker dropped {} steps", due - steps);
            self.accumulator_ms %= self.step_ms;
        }
        steps as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now_ms(), 150);
        other.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_ticker_accumulates() {
        let mut ticker = FixedTicker::new(25);
        assert_eq!(ticker.due_steps(1_000), 0);

        ticker.start(1_000);
        assert_eq!(ticker.due_steps(1_010), 0);
        assert_eq!(ticker.due_steps(1_030), 1);
        assert_eq!(ticker.due_steps(1_080), 2);
        assert_eq!(ticker.due_steps(1_080), 0);
    }

    #[test]
    fn test_ticker_caps_substeps() {
        let mut ticker = FixedTicker::new(25);
        ticker.start(0);
        assert_eq!(ticker.due_steps(10_000), MAX_SUBSTEPS);
        // Backlog was dropped
        assert_eq!(ticker.due_steps(10_010), 0);
    }

    #[test]
    fn test_restart_does_not_catch_up() {
        let mut ticker = FixedTicker::new(25);
        ticker.start(0);
        assert_eq!(ticker.due_steps(40), 1);
        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.due_steps(5_000), 0);

        ticker.start(5_000);
        assert_eq!(ticker.due_steps(5_020), 0);
        assert_eq!(ticker.due_steps(5_025), 1);
    }
}
