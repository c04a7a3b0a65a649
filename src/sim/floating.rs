//! Floating score text shown where a block broke

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FLOATING_TEXT_MS, FLOATING_TEXT_RISE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub points: u64,
    pub remaining_ms: i32,
}

impl FloatingText {
    pub fn new(pos: Vec2, points: u64) -> Self {
        Self {
            pos,
            points,
            remaining_ms: FLOATING_TEXT_MS,
        }
    }

    /// Age and drift upward. Returns true once expired.
    pub fn tick(&mut self, dt_ms: i32) -> bool {
        self.remaining_ms -= dt_ms;
        self.pos.y -= FLOATING_TEXT_RISE;
        self.remaining_ms <= 0
    }
}

/// Advance every text and drop the expired ones
pub fn tick_all(texts: &mut Vec<FloatingText>, dt_ms: i32) {
    texts.retain_mut(|t| !t.tick(dt_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rises_and_expires() {
        let mut texts = vec![FloatingText::new(Vec2::new(10.0, 100.0), 30)];
        for _ in 0..39 {
            tick_all(&mut texts, 25);
        }
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].pos.y, 61.0);
        assert_eq!(texts[0].remaining_ms, 25);
        tick_all(&mut texts, 25);
        assert!(texts.is_empty());
    }

    #[test]
    fn test_empty_list_is_noop() {
        let mut texts = Vec::new();
        tick_all(&mut texts, 25);
        assert!(texts.is_empty());
    }
}
