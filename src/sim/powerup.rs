//! Power-up lifecycle
//!
//! A power-up falls from the block that dropped it, docks on the paddle row and
//! blinks until it runs out or the paddle catches it. Catching one throws away
//! every other power-up in flight, so at most one is ever active.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::paddle::Paddle;
use crate::config::GameConfig;
use crate::consts::*;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Chomp,
    Invaders,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 2] = [Self::Chomp, Self::Invaders];

    pub fn label(self) -> &'static str {
        match self {
            Self::Chomp => "Chomp",
            Self::Invaders => "Invaders",
        }
    }
}

/// A pickup entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    /// Row where it stops falling
    pub dock_y: f32,
    /// Remaining wait on the paddle row before it is missed
    pub fall_remaining_ms: i32,
    /// Remaining effect time once caught
    pub docked_remaining_ms: i32,
    pub caught: bool,
}

impl Powerup {
    #[inline]
    pub fn is_docked(&self) -> bool {
        self.pos.y >= self.dock_y
    }

    /// Docked power-ups alternate brightness every blink period
    pub fn is_bright(&self) -> bool {
        self.is_docked() && (self.fall_remaining_ms / POWERUP_BLINK_MS) % 2 == 0
    }
}

/// Something that happened to a power-up during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupEvent {
    /// Paddle caught it; it is now the only power-up left
    Caught { id: u32, kind: PowerupKind },
    /// A caught power-up ran its course
    Expired { id: u32, kind: PowerupKind },
    /// Sat on the paddle row too long
    Missed { id: u32, kind: PowerupKind },
}

enum Step {
    Keep,
    Remove,
    Caught,
}

/// Owns every power-up on screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerupManager {
    powerups: Vec<Powerup>,
    next_id: u32,
}

impl PowerupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Powerup> {
        self.powerups.iter()
    }

    /// Drop a power-up of random kind at `pos`
    pub fn try_spawn(&mut self, config: &GameConfig, pos: Vec2, rng: &mut impl Rng) -> u32 {
        let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
        self.spawn(config, pos, kind)
    }

    pub fn spawn(&mut self, config: &GameConfig, pos: Vec2, kind: PowerupKind) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.powerups.push(Powerup {
            id,
            kind,
            pos,
            dock_y: config.paddle_row() - POWERUP_SIZE / 2.0,
            fall_remaining_ms: POWERUP_FALL_MS,
            docked_remaining_ms: POWERUP_DOCKED_MS,
            caught: false,
        });
        id
    }

    /// Advance every power-up once, in spawn order
    pub fn tick(&mut self, dt_ms: i32, paddle: &Paddle) -> Vec<PowerupEvent> {
        let mut events = Vec::new();
        let mut i = 0;
        while i < self.powerups.len() {
            let pw = &mut self.powerups[i];
            match Self::step(pw, dt_ms, paddle) {
                Step::Keep => i += 1,
                Step::Remove => {
                    let pw = self.powerups.remove(i);
                    events.push(if pw.caught {
                        PowerupEvent::Expired { id: pw.id, kind: pw.kind }
                    } else {
                        PowerupEvent::Missed { id: pw.id, kind: pw.kind }
                    });
                }
                Step::Caught => {
                    let caught = self.powerups.swap_remove(i);
                    log::info!("Caught {} power-up, clearing {} others", caught.kind.label(), self.powerups.len());
                    self.powerups.clear();
                    events.push(PowerupEvent::Caught { id: caught.id, kind: caught.kind });
                    self.powerups.push(caught);
                    break;
                }
            }
        }
        events
    }

    fn step(pw: &mut Powerup, dt_ms: i32, paddle: &Paddle) -> Step {
        if pw.caught {
            pw.docked_remaining_ms -= dt_ms;
            return if pw.docked_remaining_ms <= 0 { Step::Remove } else { Step::Keep };
        }

        if paddle.touches(pw.pos, POWERUP_SIZE) {
            pw.caught = true;
            return Step::Caught;
        }

        if pw.fall_remaining_ms <= 0 {
            return Step::Remove;
        }

        if pw.is_docked() {
            pw.fall_remaining_ms -= dt_ms;
        } else {
            pw.pos.y += POWERUP_FALL_STEP;
        }
        Step::Keep
    }
}
