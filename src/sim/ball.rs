//! Balls: the primary ball and the temporary volley balls
//!
//! Both kinds share one record and one physics step. The role tag decides the
//! rest: temporary balls only move while their volley is active, and hand any
//! score they earn to the primary ball every tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{self, BorderContact, HitSides, Rect};
use super::combo::Combo;
use super::floating::FloatingText;
use super::grid::Grid;
use super::paddle::Paddle;
use super::powerup::PowerupManager;
use super::state::GameEvent;
use crate::config::GameConfig;
use crate::consts::*;
use crate::normalize_degrees;

/// What a ball is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallRole {
    /// The player's persistent ball
    Primary,
    /// Volley ball; simulated only while `active`
    Temporary { active: bool },
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Direction of travel in degrees, [0, 360), counter-clockwise on screen
    pub angle: f32,
    /// Distance per tick along `angle`; may go negative through drag
    pub speed: f32,
    /// Diameter
    pub size: f32,
    pub damage: i32,
    pub score: u64,
    /// Primary ball only; a temporary ball's flight lives in its role
    pub launched: bool,
    pub role: BallRole,
}

/// Everything a ball touches while it moves
pub struct StepContext<'a, R: Rng> {
    pub config: &'a GameConfig,
    pub grid: &'a mut Grid,
    pub paddle: &'a Paddle,
    pub combo: &'a mut Combo,
    pub floating: &'a mut Vec<FloatingText>,
    pub powerups: &'a mut PowerupManager,
    pub rng: &'a mut R,
    pub events: &'a mut Vec<GameEvent>,
}

/// Per-step result the loop cares about
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    pub border: BorderContact,
}

impl Ball {
    fn with_role(config: &GameConfig, role: BallRole) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            angle: 0.0,
            speed: 0.0,
            size: BALL_SIZE,
            damage: 1,
            score: 0,
            launched: false,
            role,
        };
        ball.pos = ball.rest_position(config);
        ball
    }

    pub fn primary(config: &GameConfig) -> Self {
        Self::with_role(config, BallRole::Primary)
    }

    pub fn temporary(config: &GameConfig) -> Self {
        Self::with_role(config, BallRole::Temporary { active: false })
    }

    pub fn is_primary(&self) -> bool {
        self.role == BallRole::Primary
    }

    /// Whether the ball takes part in the simulation right now
    pub fn is_live(&self) -> bool {
        match self.role {
            BallRole::Primary => self.launched,
            BallRole::Temporary { active } => active,
        }
    }

    /// Where the ball waits above the paddle before launch
    pub fn rest_position(&self, config: &GameConfig) -> Vec2 {
        Vec2::new(
            config.screen_width() / 2.0,
            config.paddle_row() - self.size - BALL_REST_GAP,
        )
    }

    /// Back to the resting spot, stopped and unlaunched
    pub fn reset(&mut self, config: &GameConfig) {
        self.pos = self.rest_position(config);
        self.speed = 0.0;
        self.launched = false;
    }

    /// Launch from rest at `angle`. Returns false if already in flight.
    pub fn launch(&mut self, angle: f32) -> bool {
        if self.launched {
            return false;
        }
        self.angle = normalize_degrees(angle);
        self.speed = BALL_BASE_SPEED;
        self.launched = true;
        self.advance();
        true
    }

    /// Move one step along the current heading
    #[inline]
    pub fn advance(&mut self) {
        self.pos += collision::step_vector(self.angle, self.speed);
    }

    /// Bounding square
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size, self.size)
    }

    pub fn enlarge(&mut self) {
        self.size += BALL_ENLARGE_STEP;
    }

    pub fn add_damage(&mut self) {
        self.damage += 1;
    }

    /// Move and resolve collisions for one tick
    pub fn step<R: Rng>(&mut self, ctx: &mut StepContext<'_, R>) -> StepOutcome {
        if !self.is_live() {
            return StepOutcome::default();
        }

        self.advance();
        if self.pos.y < ctx.config.block_region_bottom() {
            self.resolve_block(ctx);
        } else {
            self.resolve_paddle(ctx.paddle);
        }
        let border = self.resolve_border(ctx.config);
        self.speed = self.speed.min(BALL_SPEED_CAP);

        StepOutcome { border }
    }

    fn resolve_block<R: Rng>(&mut self, ctx: &mut StepContext<'_, R>) {
        let Some(block) = ctx.grid.cell_at(ctx.config, self.pos.x, self.pos.y) else {
            return;
        };
        let (col, row, drag, category) = (block.col, block.row, block.drag, block.category);
        let sides = HitSides::between(&self.rect(), &block.rect(ctx.config));

        self.angle = sides.reflect(self.angle);
        self.speed += drag as f32;

        let reward = ctx.grid.apply_damage(col, row, self.damage);
        if reward == 0 {
            return;
        }

        let points = reward + ctx.combo.on_destroy();
        self.score += points;
        ctx.floating.push(FloatingText::new(self.pos, points));
        ctx.events.push(GameEvent::BlockDestroyed { col, row, category, points });
        log::debug!("Destroyed {category:?} block at ({col}, {row}) for {points} (streak {})", ctx.combo.streak);

        if ctx.rng.random_ratio(1, POWERUP_DROP_ODDS) {
            let id = ctx.powerups.try_spawn(ctx.config, self.pos, ctx.rng);
            ctx.events.push(GameEvent::PowerupSpawned { id });
        }
    }

    fn resolve_paddle(&mut self, paddle: &Paddle) {
        if paddle.touches(self.pos, self.size) {
            self.angle = collision::reflect_vertical(self.angle);
            self.speed += PADDLE_BOOST;
            // Step clear so the next tick does not bounce again
            self.advance();
        }
    }

    /// Bounce off the screen edges and keep the ball inside them
    pub fn resolve_border(&mut self, config: &GameConfig) -> BorderContact {
        let bounds = config.ball_bounds();
        let contact = collision::border_contact(self.pos, &bounds);

        if contact.horizontal {
            self.pos.x = self.pos.x.clamp(bounds.left(), bounds.right());
            self.angle = collision::reflect_horizontal(self.angle);
        }
        if contact.vertical {
            self.pos.y = self.pos.y.clamp(bounds.top(), bounds.bottom());
            self.angle = collision::reflect_vertical(self.angle);
        }
        if contact.any() {
            self.advance();
            self.pos = bounds.clamp(self.pos);
        }
        contact
    }
}

/// Temporary ball volley timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Volley {
    /// Can be launched
    #[default]
    Ready,
    /// Balls in flight; budget left (ms)
    Active { remaining_ms: i32 },
    /// Waiting before the next launch (ms)
    Cooldown { remaining_ms: i32 },
}

/// The primary ball plus the temporary balls granted by upgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSet {
    pub primary: Ball,
    pub temporaries: Vec<Ball>,
    pub volley: Volley,
}

impl BallSet {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            primary: Ball::primary(config),
            temporaries: Vec::new(),
            volley: Volley::Ready,
        }
    }

    /// Add one more (inactive) temporary ball
    pub fn grant_temporary(&mut self, config: &GameConfig) {
        self.temporaries.push(Ball::temporary(config));
    }

    /// Temporary balls currently in flight
    pub fn active_temporaries(&self) -> impl Iterator<Item = &Ball> {
        self.temporaries.iter().filter(|b| b.is_live())
    }

    /// Fire every temporary ball from the primary ball, fanned evenly around
    /// its heading. Only possible when the volley is ready.
    pub fn launch_volley(&mut self) -> bool {
        if self.temporaries.is_empty() || self.volley != Volley::Ready {
            return false;
        }

        let spacing = 360.0 / self.temporaries.len() as f32;
        let origin = self.primary.pos;
        let heading = self.primary.angle;
        for (i, ball) in self.temporaries.iter_mut().enumerate() {
            ball.pos = origin;
            ball.angle = normalize_degrees(heading + spacing * i as f32);
            ball.speed = VOLLEY_SPEED;
            ball.role = BallRole::Temporary { active: true };
        }
        self.volley = Volley::Active { remaining_ms: VOLLEY_ACTIVE_MS };
        log::info!("Volley launched with {} balls", self.temporaries.len());
        true
    }

    fn end_volley(&mut self) {
        for ball in &mut self.temporaries {
            ball.role = BallRole::Temporary { active: false };
            ball.speed = 0.0;
        }
        self.volley = Volley::Cooldown { remaining_ms: VOLLEY_COOLDOWN_MS };
    }

    /// Step the primary ball, then every active temporary ball, funnelling
    /// their score into the primary. Returns the primary ball's outcome.
    pub fn step_all<R: Rng>(&mut self, ctx: &mut StepContext<'_, R>) -> StepOutcome {
        let outcome = self.primary.step(ctx);
        for ball in &mut self.temporaries {
            if !ball.is_live() {
                continue;
            }
            ball.step(ctx);
            self.primary.score += ball.score;
            ball.score = 0;
        }
        outcome
    }

    /// Advance the volley budget or cooldown. Returns true when a volley ended.
    pub fn tick_volley(&mut self, dt_ms: i32) -> bool {
        match self.volley {
            Volley::Ready => false,
            Volley::Active { remaining_ms } => {
                let remaining_ms = remaining_ms - dt_ms;
                if remaining_ms <= 0 {
                    self.end_volley();
                    true
                } else {
                    self.volley = Volley::Active { remaining_ms };
                    false
                }
            }
            Volley::Cooldown { remaining_ms } => {
                let remaining_ms = remaining_ms - dt_ms;
                self.volley = if remaining_ms <= 0 {
                    Volley::Ready
                } else {
                    Volley::Cooldown { remaining_ms }
                };
                false
            }
        }
    }

    /// Whole seconds until the volley can fire again; `None` without
    /// temporary balls. While a volley is in flight this counts the rest of
    /// its budget plus the full cooldown, so the figure never jumps up.
    pub fn cooldown_secs(&self) -> Option<i32> {
        if self.temporaries.is_empty() {
            return None;
        }
        Some(match self.volley {
            Volley::Ready => 0,
            Volley::Active { remaining_ms } => (remaining_ms + VOLLEY_COOLDOWN_MS) / 1000 + 1,
            Volley::Cooldown { remaining_ms } => remaining_ms / 1000 + 1,
        })
    }

    /// All balls that should be drawn
    pub fn visible(&self) -> impl Iterator<Item = &Ball> {
        std::iter::once(&self.primary).chain(self.active_temporaries())
    }
}
