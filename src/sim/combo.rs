//! Combo streak tracking
//!
//! Consecutive destroys inside the decay window build a streak that adds bonus
//! points. A long enough streak also drives a rainbow color cycle.

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_RAINBOW_STREAK, COMBO_RESET_MS, COMBO_STEP_BONUS};

/// Number of colors in the rainbow cycle
pub const RAINBOW_PHASES: i32 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    /// Blocks destroyed in the current streak
    pub streak: u32,
    /// Time left before the streak lapses (ms)
    pub decay_remaining_ms: i32,
}

impl Combo {
    /// Register a destroyed block and return its bonus points
    pub fn on_destroy(&mut self) -> u64 {
        self.streak += 1;
        self.decay_remaining_ms = COMBO_RESET_MS;
        self.bonus()
    }

    /// Bonus for the most recent destroy in the streak
    pub fn bonus(&self) -> u64 {
        if self.streak > 1 {
            u64::from(self.streak - 1) * COMBO_STEP_BONUS
        } else {
            0
        }
    }

    pub fn tick(&mut self, dt_ms: i32) {
        if self.decay_remaining_ms > 0 {
            self.decay_remaining_ms = (self.decay_remaining_ms - dt_ms).max(0);
        } else {
            self.streak = 0;
            self.decay_remaining_ms = 0;
        }
    }

    /// Rainbow phase in `0..7`, or `None` while the streak is too short
    pub fn color_phase(&self, period_ms: i32) -> Option<usize> {
        if self.streak <= COMBO_RAINBOW_STREAK || period_ms <= 0 {
            return None;
        }
        Some(((self.decay_remaining_ms / period_ms) % RAINBOW_PHASES) as usize)
    }
}
