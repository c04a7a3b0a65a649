//! Game facade: ties the simulation to a clock, a ticker and input actions
//!
//! A host (window backend or the headless runner) calls `pump` regularly,
//! forwards key presses, draws with `render` and exits once `should_exit`
//! turns true.

use crate::config::GameConfig;
use crate::consts::*;
use crate::platform::{Action, Clock, FixedTicker};
use crate::renderer::{self, Surface};
use crate::sim::{GameEvent, GamePhase, GameState, UpgradeInput, tick};

pub struct Game<C: Clock> {
    state: GameState,
    clock: C,
    ticker: FixedTicker,
    /// When the host should exit, once the game is over
    exit_at_ms: Option<u64>,
}

impl<C: Clock> Game<C> {
    pub fn new(config: GameConfig, seed: u64, clock: C) -> Self {
        let mut ticker = FixedTicker::new(config.tick_ms);
        ticker.start(clock.now_ms());
        Self {
            state: GameState::new(config, seed),
            clock,
            ticker,
            exit_at_ms: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// Events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Run exactly one simulation step
    pub fn on_tick(&mut self) {
        let dt_ms = self.state.config.tick_delta();
        tick(&mut self.state, dt_ms);
        self.sync_phase();
    }

    /// Run every step that is due. Returns how many ran.
    pub fn pump(&mut self) -> u32 {
        let due = self.ticker.due_steps(self.clock.now_ms());
        let mut ran = 0;
        for _ in 0..due {
            if !self.ticker.is_running() {
                break;
            }
            self.on_tick();
            ran += 1;
        }
        ran
    }

    pub fn on_key_down(&mut self, action: Action) {
        match self.state.phase {
            GamePhase::Playing => self.playing_key(action),
            GamePhase::Paused => match action {
                Action::Pause => {
                    self.state.toggle_pause();
                }
                Action::Quit => {
                    self.state.quit();
                }
                _ => {}
            },
            GamePhase::UpgradeOffer => {
                let input = match action {
                    Action::MoveLeft | Action::MoveRight => UpgradeInput::Toggle,
                    Action::Confirm => UpgradeInput::Confirm,
                    _ => UpgradeInput::Other,
                };
                self.state.press_upgrade(input, self.clock.now_ms());
            }
            GamePhase::GameOver => {}
        }
        self.sync_phase();
    }

    fn playing_key(&mut self, action: Action) {
        let state = &mut self.state;
        match action {
            Action::Pause => {
                state.toggle_pause();
            }
            Action::MoveLeft => {
                state.paddle.press_left(true);
                state.launch_primary(LAUNCH_ANGLE_LEFT);
            }
            Action::MoveRight => {
                state.paddle.press_right(true);
                state.launch_primary(LAUNCH_ANGLE_RIGHT);
            }
            Action::Launch => {
                if state.balls.primary.launched {
                    state.fire_volley();
                }
            }
            Action::Confirm | Action::Quit => {}
        }
    }

    /// Releases always update the held directions, whatever the phase
    pub fn on_key_up(&mut self, action: Action) {
        if self.state.phase == GamePhase::GameOver {
            return;
        }
        match action {
            Action::MoveLeft => self.state.paddle.press_left(false),
            Action::MoveRight => self.state.paddle.press_right(false),
            _ => {}
        }
    }

    pub fn render(&self, surface: &mut impl Surface) {
        renderer::draw_frame(&self.state, surface);
    }

    pub fn should_exit(&self) -> bool {
        self.exit_at_ms.is_some_and(|at| self.clock.now_ms() >= at)
    }

    /// Keep the ticker in step with the phase
    fn sync_phase(&mut self) {
        let now = self.clock.now_ms();
        match self.state.phase {
            GamePhase::Playing => self.ticker.start(now),
            GamePhase::Paused | GamePhase::UpgradeOffer => self.ticker.stop(),
            GamePhase::GameOver => {
                self.ticker.stop();
                if self.exit_at_ms.is_none() {
                    log::info!("Game over with score {}", self.state.score());
                    self.exit_at_ms = Some(now + GAME_OVER_EXIT_MS);
                }
            }
        }
    }
}
