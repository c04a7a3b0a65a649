//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (column-major cells, spawn-ordered entities)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod combo;
pub mod floating;
pub mod grid;
pub mod paddle;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use ball::{Ball, BallRole, BallSet, StepContext, StepOutcome, Volley};
pub use collision::{BorderContact, HitSides, Rect};
pub use combo::Combo;
pub use floating::FloatingText;
pub use grid::{Block, BlockCategory, Grid};
pub use paddle::Paddle;
pub use powerup::{Powerup, PowerupEvent, PowerupKind, PowerupManager};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::tick;
pub use upgrade::{UpgradeInput, UpgradeKind, UpgradeSelector};
