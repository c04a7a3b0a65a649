//! Upgrade offers
//!
//! Every time the score wraps past an escalating window the game pauses and
//! offers two distinct upgrades. The player toggles between them and confirms.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{UPGRADE_BASE_WINDOW, UPGRADE_PRESS_INTERVAL_MS};

/// Upgrade types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    WidenPaddle,
    EnlargeBall,
    QuickerPaddle,
    /// Grants one more temporary ball for the volley
    ExplosiveBall,
    MoreDamage,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        Self::WidenPaddle,
        Self::EnlargeBall,
        Self::QuickerPaddle,
        Self::ExplosiveBall,
        Self::MoreDamage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WidenPaddle => "Wider paddle",
            Self::EnlargeBall => "Bigger ball",
            Self::QuickerPaddle => "Quicker paddle",
            Self::ExplosiveBall => "Explosive ball",
            Self::MoreDamage => "More damage",
        }
    }
}

/// Input the selector understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeInput {
    /// Move the highlight (either direction toggles between two slots)
    Toggle,
    Confirm,
    /// Any other key; still counts toward the press interval
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeSelector {
    pub choices: [UpgradeKind; 2],
    /// Index of the highlighted slot
    pub highlighted: usize,
    pub applied_count: u32,
    last_press_ms: Option<u64>,
}

impl UpgradeSelector {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            choices: Self::roll(rng),
            highlighted: 0,
            applied_count: 0,
            last_press_ms: None,
        }
    }

    /// Two different kinds drawn uniformly
    fn roll(rng: &mut impl Rng) -> [UpgradeKind; 2] {
        let first = rng.random_range(0..UpgradeKind::ALL.len());
        let mut second = rng.random_range(0..UpgradeKind::ALL.len());
        while second == first {
            second = rng.random_range(0..UpgradeKind::ALL.len());
        }
        [UpgradeKind::ALL[first], UpgradeKind::ALL[second]]
    }

    /// Score window for the next offer; grows with every applied upgrade
    pub fn window(&self) -> u64 {
        UPGRADE_BASE_WINDOW * (2 * u64::from(self.applied_count) + 1)
    }

    /// Whether a score change from `old` to `new` crossed a window boundary
    pub fn crossed(&self, old: u64, new: u64) -> bool {
        let window = self.window();
        old != new && old % window > new % window
    }

    pub fn highlighted_kind(&self) -> UpgradeKind {
        self.choices[self.highlighted]
    }

    /// Handle a key press while the offer is open.
    ///
    /// Presses closer than the minimum interval to the previous one are
    /// dropped. Returns the chosen upgrade on confirmation.
    pub fn press(&mut self, input: UpgradeInput, now_ms: u64, rng: &mut impl Rng) -> Option<UpgradeKind> {
        let too_soon = self
            .last_press_ms
            .is_some_and(|last| now_ms.saturating_sub(last) <= UPGRADE_PRESS_INTERVAL_MS);
        if too_soon {
            return None;
        }
        self.last_press_ms = Some(now_ms);

        match input {
            UpgradeInput::Toggle => {
                self.highlighted = 1 - self.highlighted;
                None
            }
            UpgradeInput::Confirm => {
                let chosen = self.highlighted_kind();
                self.highlighted = 0;
                self.applied_count += 1;
                self.choices = Self::roll(rng);
                Some(chosen)
            }
            UpgradeInput::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_choices_always_distinct() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut selector = UpgradeSelector::new(&mut rng);
        let mut now = 1_000;
        for _ in 0..200 {
            assert_ne!(selector.choices[0], selector.choices[1]);
            now += 500;
            selector.press(UpgradeInput::Confirm, now, &mut rng);
        }
        assert_eq!(selector.applied_count, 200);
    }

    #[test]
    fn test_confirm_applies_highlighted_once() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut selector = UpgradeSelector::new(&mut rng);
        let second = selector.choices[1];

        assert_eq!(selector.press(UpgradeInput::Toggle, 1_000, &mut rng), None);
        assert_eq!(selector.highlighted, 1);
        assert_eq!(selector.press(UpgradeInput::Confirm, 1_300, &mut rng), Some(second));
        assert_eq!(selector.applied_count, 1);
        assert_eq!(selector.highlighted, 0);
    }

    #[test]
    fn test_presses_are_rate_limited() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut selector = UpgradeSelector::new(&mut rng);

        selector.press(UpgradeInput::Toggle, 1_000, &mut rng);
        // Too soon: swallowed
        assert_eq!(selector.press(UpgradeInput::Confirm, 1_200, &mut rng), None);
        assert_eq!(selector.applied_count, 0);
        assert_eq!(selector.highlighted, 1);
        // Swallowed presses do not refresh the interval
        assert!(selector.press(UpgradeInput::Confirm, 1_201, &mut rng).is_some());
    }

    #[test]
    fn test_other_keys_refresh_interval() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut selector = UpgradeSelector::new(&mut rng);
        selector.press(UpgradeInput::Other, 1_000, &mut rng);
        assert_eq!(selector.press(UpgradeInput::Confirm, 1_150, &mut rng), None);
    }

    #[test]
    fn test_window_escalates() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut selector = UpgradeSelector::new(&mut rng);
        assert_eq!(selector.window(), 1000);
        assert!(selector.crossed(990, 1020));
        assert!(!selector.crossed(900, 990));
        assert!(!selector.crossed(1020, 1020));

        selector.press(UpgradeInput::Confirm, 1_000, &mut rng);
        assert_eq!(selector.window(), 3000);
        assert!(!selector.crossed(990, 1020));
        assert!(selector.crossed(2990, 3010));
    }
}
