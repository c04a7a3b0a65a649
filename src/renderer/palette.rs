//! Colors
//!
//! RGBA in 0..1, like the vertex colors the renderer has always used.

use crate::sim::{BlockCategory, Combo, PowerupKind};

pub type Color = [f32; 4];

/// Build an opaque color from 8-bit channels
pub const fn rgb8(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const DARK_GRAY: Color = rgb8(64, 64, 64);
pub const LIGHT_GRAY: Color = rgb8(192, 192, 192);
pub const PADDLE: Color = rgb8(255, 0, 0);
pub const TEMPORARY_BALL: Color = rgb8(150, 20, 20);
/// Dimmed backdrop behind menus
pub const OVERLAY: Color = [25.0 / 255.0, 25.0 / 255.0, 25.0 / 255.0, 200.0 / 255.0];

const RAINBOW: [Color; 7] = [
    rgb8(255, 0, 0),
    rgb8(255, 174, 66),
    rgb8(255, 240, 0),
    rgb8(204, 255, 0),
    rgb8(125, 249, 255),
    rgb8(42, 82, 190),
    rgb8(150, 0, 130),
];

/// Streak-driven rainbow; white until the combo is long enough
pub fn rainbow(combo: &Combo, period_ms: i32) -> Color {
    combo.color_phase(period_ms).map_or(WHITE, |phase| RAINBOW[phase])
}

pub fn block_base(category: BlockCategory) -> Color {
    match category {
        BlockCategory::Common => rgb8(50, 205, 50),
        BlockCategory::Sticky => rgb8(255, 223, 0),
        BlockCategory::Resistant => rgb8(200, 42, 42),
    }
}

/// Block color after `hits` brightening steps
pub fn block_color(category: BlockCategory, hits: u32) -> Color {
    (0..hits).fold(block_base(category), |c, _| brighter(c))
}

pub fn powerup(kind: PowerupKind) -> Color {
    match kind {
        PowerupKind::Chomp => rgb8(250, 200, 0),
        PowerupKind::Invaders => rgb8(200, 200, 200),
    }
}

/// Scale every channel up by 1/0.7, lifting near-black channels first so
/// repeated calls always converge on white
pub fn brighter(color: Color) -> Color {
    const FACTOR: f32 = 0.7;
    let floor = (1.0 / (1.0 - FACTOR)).floor() / 255.0;
    let [r, g, b, a] = color;
    if r == 0.0 && g == 0.0 && b == 0.0 {
        return [floor, floor, floor, a];
    }
    let lift = |v: f32| {
        let v = if v > 0.0 && v < floor { floor } else { v };
        (v / FACTOR).min(1.0)
    };
    [lift(r), lift(g), lift(b), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brighter_saturates() {
        let mut c = block_base(BlockCategory::Resistant);
        for _ in 0..20 {
            let next = brighter(c);
            assert!(next[0] >= c[0] && next[1] >= c[1] && next[2] >= c[2]);
            c = next;
        }
        assert_eq!(c, WHITE);
    }

    #[test]
    fn test_brighter_lifts_black() {
        let c = brighter(BLACK);
        assert!(c[0] > 0.0 && c[0] == c[1] && c[1] == c[2]);
    }

    #[test]
    fn test_rainbow_white_for_short_streak() {
        let combo = Combo::default();
        assert_eq!(rainbow(&combo, 100), WHITE);
    }
}
