//! The player's paddle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;
use crate::consts::*;

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Center of the paddle; y never changes
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Distance moved per tick while a direction is held
    pub speed: f32,
    /// Signed horizontal velocity derived from the held keys
    pub velocity: f32,
    pub lives: u8,
    left_held: bool,
    right_held: bool,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(config.screen_width() / 2.0, config.paddle_row()),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            velocity: 0.0,
            lives: START_LIVES,
            left_held: false,
            right_held: false,
        }
    }

    /// Recenter horizontally (held keys are kept)
    pub fn reset_position(&mut self, config: &GameConfig) {
        self.pos.x = config.screen_width() / 2.0;
    }

    pub fn set_direction(&mut self, left: bool, right: bool) {
        self.left_held = left;
        self.right_held = right;
        self.refresh_velocity();
    }

    pub fn press_left(&mut self, held: bool) {
        self.set_direction(held, self.right_held);
    }

    pub fn press_right(&mut self, held: bool) {
        self.set_direction(self.left_held, held);
    }

    fn refresh_velocity(&mut self) {
        self.velocity = match (self.left_held, self.right_held) {
            (true, false) => -self.speed,
            (false, true) => self.speed,
            _ => 0.0,
        };
    }

    /// Move one tick. Clamps against the pre-move position first, so a paddle
    /// left outside tightened bounds snaps back before it moves, and again
    /// after the move so it never ends a tick past a bound.
    pub fn advance(&mut self, left_bound: f32, right_bound: f32) {
        self.pos.x = self.pos.x.clamp(left_bound, right_bound);
        self.pos.x = (self.pos.x + self.velocity).clamp(left_bound, right_bound);
    }

    pub fn widen(&mut self) {
        self.width += PADDLE_WIDEN_STEP;
    }

    pub fn quicken(&mut self) {
        self.speed += PADDLE_QUICKEN_STEP;
        self.refresh_velocity();
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.width, self.height)
    }

    /// Whether a square of side `size` centered on `center` touches the paddle
    pub fn touches(&self, center: Vec2, size: f32) -> bool {
        Rect::centered(center, size, size).touches(&self.rect())
    }
}
