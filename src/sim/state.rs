//! Game state and phase transitions
//!
//! Everything the simulation mutates lives in `GameState`. A run is fully
//! reproducible from its config and seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::BallSet;
use super::combo::Combo;
use super::floating::FloatingText;
use super::grid::{BlockCategory, Grid};
use super::paddle::Paddle;
use super::powerup::{PowerupKind, PowerupManager};
use super::upgrade::{UpgradeInput, UpgradeKind, UpgradeSelector};
use crate::config::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (the ball may still be waiting for launch)
    Playing,
    /// Frozen until resumed or quit
    Paused,
    /// Frozen while the player picks an upgrade
    UpgradeOffer,
    /// Run ended
    GameOver,
}

/// Notable things that happened, drained by the caller after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BlockDestroyed { col: usize, row: usize, category: BlockCategory, points: u64 },
    PowerupSpawned { id: u32 },
    PowerupCaught { kind: PowerupKind },
    PowerupExpired { kind: PowerupKind },
    PowerupMissed { kind: PowerupKind },
    BallLaunched,
    VolleyLaunched { balls: usize },
    VolleyEnded,
    LifeLost { lives_left: u8 },
    UpgradeOffered { choices: [UpgradeKind; 2] },
    UpgradeApplied { kind: UpgradeKind },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub grid: Grid,
    pub balls: BallSet,
    pub combo: Combo,
    pub powerups: PowerupManager,
    pub floating: Vec<FloatingText>,
    pub upgrades: UpgradeSelector,
    /// Effect of the currently caught power-up, if any
    pub active_powerup: Option<PowerupKind>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with a freshly generated block field
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::generate(&config, &mut rng);
        let upgrades = UpgradeSelector::new(&mut rng);
        log::info!("New game (seed {seed}, {} blocks)", grid.remaining());

        Self {
            seed,
            phase: GamePhase::Playing,
            paddle: Paddle::new(&config),
            grid,
            balls: BallSet::new(&config),
            combo: Combo::default(),
            powerups: PowerupManager::new(),
            floating: Vec::new(),
            upgrades,
            active_powerup: None,
            time_ticks: 0,
            rng,
            events: Vec::new(),
            config,
        }
    }

    /// Score of the run (held by the primary ball)
    #[inline]
    pub fn score(&self) -> u64 {
        self.balls.primary.score
    }

    #[inline]
    pub fn lives(&self) -> u8 {
        self.paddle.lives
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {from:?} -> {to:?}");
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Playing <-> Paused. Returns false in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.set_phase(GamePhase::Paused),
            GamePhase::Paused => self.set_phase(GamePhase::Playing),
            _ => return false,
        }
        true
    }

    /// Quit from the pause screen
    pub fn quit(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::GameOver);
        true
    }

    /// Launch the resting primary ball at `angle`
    pub fn launch_primary(&mut self, angle: f32) -> bool {
        let launched = self.balls.primary.launch(angle);
        if launched {
            self.events.push(GameEvent::BallLaunched);
        }
        launched
    }

    /// Fire the temporary balls, if any are ready
    pub fn fire_volley(&mut self) -> bool {
        let fired = self.balls.launch_volley();
        if fired {
            self.events.push(GameEvent::VolleyLaunched { balls: self.balls.temporaries.len() });
        }
        fired
    }

    /// Lose a life and put the primary ball and paddle back at the start
    pub fn lose_life(&mut self) {
        self.paddle.lose_life();
        self.balls.primary.reset(&self.config);
        self.paddle.reset_position(&self.config);
        let lives_left = self.paddle.lives;
        log::info!("Life lost, {lives_left} left");
        self.events.push(GameEvent::LifeLost { lives_left });
        if lives_left == 0 {
            self.set_phase(GamePhase::GameOver);
        }
    }

    /// Open the upgrade offer
    pub fn offer_upgrade(&mut self) {
        log::info!(
            "Upgrade offered: {} or {}",
            self.upgrades.choices[0].label(),
            self.upgrades.choices[1].label()
        );
        self.events.push(GameEvent::UpgradeOffered { choices: self.upgrades.choices });
        self.set_phase(GamePhase::UpgradeOffer);
    }

    /// Forward a key press to the open offer. Returns the applied upgrade.
    pub fn press_upgrade(&mut self, input: UpgradeInput, now_ms: u64) -> Option<UpgradeKind> {
        if self.phase != GamePhase::UpgradeOffer {
            return None;
        }
        let kind = self.upgrades.press(input, now_ms, &mut self.rng)?;
        self.apply_upgrade(kind);
        self.set_phase(GamePhase::Playing);
        Some(kind)
    }

    /// Apply an upgrade's permanent modifier
    pub fn apply_upgrade(&mut self, kind: UpgradeKind) {
        match kind {
            UpgradeKind::WidenPaddle => self.paddle.widen(),
            UpgradeKind::QuickerPaddle => self.paddle.quicken(),
            UpgradeKind::EnlargeBall => self.balls.primary.enlarge(),
            UpgradeKind::MoreDamage => self.balls.primary.add_damage(),
            UpgradeKind::ExplosiveBall => self.balls.grant_temporary(&self.config),
        }
        log::info!("Applied upgrade: {}", kind.label());
        self.events.push(GameEvent::UpgradeApplied { kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn new_state() -> GameState {
        GameState::new(GameConfig::default(), 12345)
    }

    #[test]
    fn test_new_state() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives(), START_LIVES);
        assert_eq!(state.score(), 0);
        assert!(!state.balls.primary.launched);
        assert!(state.balls.temporaries.is_empty());
        assert_eq!(state.grid.remaining(), 300);
        assert_eq!(state.active_powerup, None);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = new_state();
        let b = new_state();
        let cats = |s: &GameState| s.grid.blocks().map(|b| b.category).collect::<Vec<_>>();
        assert_eq!(cats(&a), cats(&b));
        assert_eq!(a.upgrades.choices, b.upgrades.choices);
    }

    #[test]
    fn test_pause_and_quit() {
        let mut state = new_state();
        assert!(!state.quit());
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Playing);

        state.toggle_pause();
        assert!(state.quit());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.toggle_pause());
        assert!(state.drain_events().contains(&GameEvent::PhaseChanged {
            from: GamePhase::Paused,
            to: GamePhase::GameOver,
        }));
    }

    #[test]
    fn test_lose_life_resets_primary() {
        let mut state = new_state();
        state.launch_primary(LAUNCH_ANGLE_RIGHT);
        state.paddle.pos.x = 300.0;
        state.lose_life();

        assert_eq!(state.lives(), START_LIVES - 1);
        assert!(!state.balls.primary.launched);
        assert_eq!(state.balls.primary.speed, 0.0);
        assert_eq!(state.balls.primary.pos, state.balls.primary.rest_position(&state.config));
        assert_eq!(state.paddle.pos.x, state.config.screen_width() / 2.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = new_state();
        for _ in 0..START_LIVES {
            state.lose_life();
        }
        assert_eq!(state.lives(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_upgrades_apply() {
        let mut state = new_state();
        state.apply_upgrade(UpgradeKind::WidenPaddle);
        state.apply_upgrade(UpgradeKind::QuickerPaddle);
        state.apply_upgrade(UpgradeKind::EnlargeBall);
        state.apply_upgrade(UpgradeKind::MoreDamage);
        state.apply_upgrade(UpgradeKind::ExplosiveBall);
        state.apply_upgrade(UpgradeKind::ExplosiveBall);

        assert_eq!(state.paddle.width, PADDLE_WIDTH + PADDLE_WIDEN_STEP);
        assert_eq!(state.paddle.speed, PADDLE_SPEED + PADDLE_QUICKEN_STEP);
        assert_eq!(state.balls.primary.size, BALL_SIZE + BALL_ENLARGE_STEP);
        assert_eq!(state.balls.primary.damage, 2);
        assert_eq!(state.balls.temporaries.len(), 2);
        assert_eq!(state.balls.active_temporaries().count(), 0);
    }

    #[test]
    fn test_upgrade_offer_round_trip() {
        let mut state = new_state();
        let offered = state.upgrades.choices;
        assert_eq!(state.press_upgrade(UpgradeInput::Confirm, 1_000), None);

        state.offer_upgrade();
        assert_eq!(state.phase, GamePhase::UpgradeOffer);
        assert_eq!(state.press_upgrade(UpgradeInput::Confirm, 1_000), Some(offered[0]));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.upgrades.applied_count, 1);
    }

    #[test]
    fn test_volley_needs_temporary_balls() {
        let mut state = new_state();
        assert!(!state.fire_volley());
        state.apply_upgrade(UpgradeKind::ExplosiveBall);
        state.drain_events();
        assert!(state.fire_volley());
        assert_eq!(state.drain_events(), vec![GameEvent::VolleyLaunched { balls: 1 }]);
    }
}
