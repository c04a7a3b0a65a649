//! Brickfall - a brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: Draw-surface abstraction and frame composition
//! - `platform`: Clock, ticker and input abstraction
//! - `config`: Data-driven playfield layout

pub mod config;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use game::Game;

/// Game tuning constants
pub mod consts {
    /// Lives the paddle starts with
    pub const START_LIVES: u8 = 3;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 70.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 15.0;
    /// Permanent upgrade increments
    pub const PADDLE_WIDEN_STEP: f32 = 10.0;
    pub const PADDLE_QUICKEN_STEP: f32 = 5.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    pub const BALL_BASE_SPEED: f32 = 15.0;
    /// Upper speed bound, applied after every collision pass
    pub const BALL_SPEED_CAP: f32 = 30.0;
    /// Speed added on every paddle bounce
    pub const PADDLE_BOOST: f32 = 3.0;
    /// Gap between the resting ball and the paddle
    pub const BALL_REST_GAP: f32 = 10.0;
    pub const BALL_ENLARGE_STEP: f32 = 5.0;
    /// Launch angles (degrees) for the two direction keys
    pub const LAUNCH_ANGLE_LEFT: f32 = 135.0;
    pub const LAUNCH_ANGLE_RIGHT: f32 = 45.0;

    /// Temporary ball volley
    pub const VOLLEY_SPEED: f32 = BALL_BASE_SPEED - 5.0;
    pub const VOLLEY_ACTIVE_MS: i32 = 3000;
    pub const VOLLEY_COOLDOWN_MS: i32 = 5000;

    /// Combo decay window
    pub const COMBO_RESET_MS: i32 = 1000;
    /// Bonus per extra block in a streak
    pub const COMBO_STEP_BONUS: u64 = 5;
    /// Streak length at which the rainbow cycle kicks in
    pub const COMBO_RAINBOW_STREAK: u32 = 5;

    /// Base points per category rank
    pub const POINTS_PER_RANK: u64 = 30;
    /// One in N destroyed blocks drops a power-up
    pub const POWERUP_DROP_ODDS: u32 = 9;
    /// One in N cells ignore their row band
    pub const BLOCK_REROLL_ODDS: u32 = 4;

    /// Power-up lifecycle
    pub const POWERUP_SIZE: f32 = 10.0;
    pub const POWERUP_FALL_STEP: f32 = 10.0;
    pub const POWERUP_FALL_MS: i32 = 3000;
    pub const POWERUP_DOCKED_MS: i32 = 5000;
    pub const POWERUP_BLINK_MS: i32 = 500;

    /// Floating score text
    pub const FLOATING_TEXT_MS: i32 = 1000;
    pub const FLOATING_TEXT_RISE: f32 = 1.0;

    /// Upgrade offers
    pub const UPGRADE_BASE_WINDOW: u64 = 1000;
    pub const UPGRADE_PRESS_INTERVAL_MS: u64 = 200;

    /// Delay between game over and the exit request
    pub const GAME_OVER_EXIT_MS: u64 = 2000;
    /// Maximum substeps per pump to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
