//! Brickfall entry point
//!
//! Without a window backend the native binary runs a headless autopilot
//! session: the paddle chases the ball, launches it, fires volleys and takes
//! upgrades, all through the same `Game` API a window host would use.
//!
//! Usage: `brickfall [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use brickfall::Game;
    use brickfall::platform::{Action, Clock};
    use brickfall::sim::{GamePhase, Volley};

    /// Slack before the paddle bothers to move (pixels)
    const DEAD_ZONE: f32 = 10.0;

    /// Idle-mode player
    #[derive(Debug, Default)]
    pub struct Autopilot {
        held: Option<Action>,
        serves: u64,
    }

    impl Autopilot {
        fn hold<C: Clock>(&mut self, game: &mut Game<C>, action: Option<Action>) {
            if self.held == action {
                return;
            }
            if let Some(prev) = self.held.take() {
                game.on_key_up(prev);
            }
            if let Some(next) = action {
                game.on_key_down(next);
            }
            self.held = action;
        }

        /// Feed this step's input
        pub fn drive<C: Clock>(&mut self, game: &mut Game<C>) {
            match game.phase() {
                GamePhase::Playing => {}
                GamePhase::UpgradeOffer => {
                    game.on_key_down(Action::Confirm);
                    return;
                }
                GamePhase::Paused | GamePhase::GameOver => return,
            }

            let state = game.state();
            if !state.balls.primary.launched {
                // A fresh press launches; alternate sides between serves
                self.serves += 1;
                let side = if self.serves % 2 == 0 { Action::MoveLeft } else { Action::MoveRight };
                self.hold(game, None);
                self.hold(game, Some(side));
                return;
            }

            let target = state.balls.primary.pos.x;
            let paddle = state.paddle.pos.x;
            let want = if target < paddle - DEAD_ZONE {
                Some(Action::MoveLeft)
            } else if target > paddle + DEAD_ZONE {
                Some(Action::MoveRight)
            } else {
                None
            };
            let fire = !state.balls.temporaries.is_empty() && state.balls.volley == Volley::Ready;

            self.hold(game, want);
            if fire {
                game.on_key_down(Action::Launch);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use brickfall::platform::ManualClock;
    use brickfall::renderer::RecordingSurface;
    use brickfall::sim::GameEvent;
    use brickfall::{Game, GameConfig};

    /// Upper bound on simulated ticks (an hour of play at 25 ms)
    const MAX_TICKS: u64 = 144_000;
    /// Render one frame per simulated second
    const FRAME_EVERY: u64 = 40;
    const DEFAULT_SEED: u64 = 12345;

    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map(|path| GameConfig::load(Path::new(&path)))
        .unwrap_or_default();
    let seed = match args.next() {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Invalid seed {raw:?}, using {DEFAULT_SEED}");
            DEFAULT_SEED
        }),
        None => DEFAULT_SEED,
    };

    let clock = ManualClock::new(0);
    let step_ms = u64::from(config.tick_ms);
    let mut game = Game::new(config, seed, clock.clone());
    let mut pilot = autopilot::Autopilot::default();
    let mut surface = RecordingSurface::new();
    let (mut destroyed, mut caught, mut upgrades) = (0u32, 0u32, 0u32);

    while !game.should_exit() && game.state().time_ticks < MAX_TICKS {
        pilot.drive(&mut game);
        clock.advance(step_ms);
        game.pump();

        for event in game.drain_events() {
            log::trace!("{event:?}");
            match event {
                GameEvent::BlockDestroyed { .. } => destroyed += 1,
                GameEvent::PowerupCaught { .. } => caught += 1,
                GameEvent::UpgradeApplied { .. } => upgrades += 1,
                _ => {}
            }
        }

        let ticks = game.state().time_ticks;
        if ticks % FRAME_EVERY == 0 {
            surface.clear();
            game.render(&mut surface);
            log::debug!("Frame at tick {ticks}: {} draw calls", surface.commands.len());
        }
    }

    let state = game.state();
    log::info!("Session ended in phase {:?}", state.phase);
    println!(
        "seed {seed}: score {} after {} ticks, {} lives left, {destroyed} blocks destroyed, \
         {caught} power-ups caught, {upgrades} upgrades, {} blocks remaining",
        state.score(),
        state.time_ticks,
        state.lives(),
        state.grid.remaining(),
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // A browser host drives `brickfall::Game` directly
}
