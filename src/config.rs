//! Playfield configuration
//!
//! Immutable once a game starts. Loaded from JSON with per-field defaults,
//! so a file only needs to list what it overrides.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::Rect;

/// Why a configuration could not be used
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Playfield layout and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Block cell width (pixels)
    pub tile_width: f32,
    /// Block cell height (pixels)
    pub tile_height: f32,
    pub rows: usize,
    pub columns: usize,
    /// Margin around the block field; the area below it is four margins tall
    pub side: f32,
    /// Fixed simulation step (milliseconds)
    pub tick_ms: u32,
    /// Primary ball touching the bottom edge also costs a life
    pub lethal_floor: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_width: 60.0,
            tile_height: 30.0,
            rows: 15,
            columns: 20,
            side: 130.0,
            tick_ms: 25,
            lethal_floor: false,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it is unusable
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err}; using default config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tile_width > 0.0) {
            return Err(ConfigError::Invalid { field: "tile_width", reason: "must be positive" });
        }
        if !(self.tile_height > 0.0) {
            return Err(ConfigError::Invalid { field: "tile_height", reason: "must be positive" });
        }
        if self.rows == 0 {
            return Err(ConfigError::Invalid { field: "rows", reason: "must be non-zero" });
        }
        if self.columns == 0 {
            return Err(ConfigError::Invalid { field: "columns", reason: "must be non-zero" });
        }
        if !(self.side >= 0.0) {
            return Err(ConfigError::Invalid { field: "side", reason: "must not be negative" });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid { field: "tick_ms", reason: "must be non-zero" });
        }
        Ok(())
    }

    #[inline]
    pub fn screen_width(&self) -> f32 {
        self.tile_width * self.columns as f32 + 2.0 * self.side
    }

    #[inline]
    pub fn screen_height(&self) -> f32 {
        self.tile_height * self.rows as f32 + 4.0 * self.side
    }

    /// Rectangle covered by the block grid
    pub fn block_field(&self) -> Rect {
        Rect::new(
            self.side,
            self.side,
            self.tile_width * self.columns as f32,
            self.tile_height * self.rows as f32,
        )
    }

    /// Below this y the ball checks the paddle instead of the grid
    #[inline]
    pub fn block_region_bottom(&self) -> f32 {
        self.screen_height() - 3.0 * self.side
    }

    /// Rectangle the balls bounce inside
    pub fn ball_bounds(&self) -> Rect {
        Rect::from_edges(self.side, self.side, self.screen_width() - self.side, self.screen_height())
    }

    /// Fixed y of the paddle center
    #[inline]
    pub fn paddle_row(&self) -> f32 {
        self.screen_height() - self.side / 2.0
    }

    /// Tick interval as a signed millisecond delta for timers
    #[inline]
    pub fn tick_delta(&self) -> i32 {
        i32::try_from(self.tick_ms).unwrap_or(i32::MAX)
    }
}
