//! Fixed timestep simulation tick
//!
//! Advances the game by one step. Input is applied to `GameState` between
//! ticks; a tick only reads the held-direction flags already on the paddle.

use super::ball::StepContext;
use super::floating;
use super::powerup::PowerupEvent;
use super::state::{GameEvent, GamePhase, GameState};

/// Advance the game state by one fixed step of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, dt_ms: i32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    // Paddle is bounded by the block field
    let field = state.config.block_field();
    state.paddle.advance(field.left(), field.right());

    update_powerups(state, dt_ms);

    // Cells destroyed last tick disappear before anything moves
    let swept = state.grid.sweep();
    if swept > 0 {
        log::debug!("Swept {swept} blocks, {} remaining", state.grid.remaining());
    }

    let old_score = state.score();
    let outcome = {
        let GameState {
            config,
            paddle,
            grid,
            balls,
            combo,
            powerups,
            floating,
            rng,
            events,
            ..
        } = state;
        let mut ctx = StepContext {
            config,
            grid,
            paddle,
            combo,
            floating,
            powerups,
            rng,
            events,
        };
        balls.step_all(&mut ctx)
    };

    if state.balls.tick_volley(dt_ms) {
        log::debug!("Volley ended, cooling down");
        state.push_event(GameEvent::VolleyEnded);
    }

    state.combo.tick(dt_ms);
    floating::tick_all(&mut state.floating, dt_ms);

    let new_score = state.score();
    if state.upgrades.crossed(old_score, new_score) {
        state.offer_upgrade();
    }

    let primary = &state.balls.primary;
    let stalled = primary.launched && primary.speed <= 0.0;
    let floored = state.config.lethal_floor && primary.launched && outcome.border.floor;
    if stalled || floored {
        state.lose_life();
    }
}

/// Advance power-ups and mirror their events onto the game state
fn update_powerups(state: &mut GameState, dt_ms: i32) {
    if state.powerups.is_empty() {
        return;
    }
    for event in state.powerups.tick(dt_ms, &state.paddle) {
        match event {
            PowerupEvent::Caught { kind, .. } => {
                state.active_powerup = Some(kind);
                state.push_event(GameEvent::PowerupCaught { kind });
            }
            PowerupEvent::Expired { kind, .. } => {
                state.active_powerup = None;
                log::info!("{} power-up expired", kind.label());
                state.push_event(GameEvent::PowerupExpired { kind });
            }
            PowerupEvent::Missed { kind, .. } => {
                log::debug!("{} power-up missed", kind.label());
                state.push_event(GameEvent::PowerupMissed { kind });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::*;
    use crate::sim::collision::step_vector;
    use crate::sim::grid::{Block, BlockCategory, Grid};
    use crate::sim::powerup::PowerupKind;
    use crate::sim::upgrade::UpgradeKind;

    const DT: i32 = 25;

    /// A game with an empty block field
    fn bare_state(config: GameConfig) -> GameState {
        let mut state = GameState::new(config, 12345);
        state.grid = Grid::empty(state.config.columns, state.config.rows);
        state
    }

    /// Place a block and aim the launched primary ball to land in its center
    fn aim_at(state: &mut GameState, category: BlockCategory, col: usize, row: usize) {
        let block = Block::new(category, col, row);
        let target = block.rect(&state.config).center();
        state.grid.place(block);
        let ball = &mut state.balls.primary;
        ball.launched = true;
        ball.angle = 90.0;
        ball.pos = target - step_vector(90.0, ball.speed);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = bare_state(GameConfig::default());
        state.launch_primary(LAUNCH_ANGLE_RIGHT);
        state.toggle_pause();

        let pos = state.balls.primary.pos;
        for _ in 0..10 {
            tick(&mut state, DT);
        }
        assert_eq!(state.balls.primary.pos, pos);
        assert_eq!(state.time_ticks, 0);

        state.toggle_pause();
        tick(&mut state, DT);
        assert_ne!(state.balls.primary.pos, pos);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_common_block_cleared_on_next_sweep() {
        let mut state = bare_state(GameConfig::default());
        state.balls.primary.speed = 10.0;
        aim_at(&mut state, BlockCategory::Common, 5, 10);

        tick(&mut state, DT);
        assert_eq!(state.score(), 30);
        assert_eq!(state.floating.len(), 1);
        assert!(state.grid.get(5, 10).is_some_and(Block::is_destroyed));
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::BlockDestroyed { col: 5, row: 10, category: BlockCategory::Common, points: 30 }
        )));

        tick(&mut state, DT);
        assert!(state.grid.get(5, 10).is_none());
        // The ball passes back through the emptied cell untouched
        assert_eq!(state.score(), 30);
    }

    #[test]
    fn test_sticky_hits_cost_one_life() {
        let mut state = bare_state(GameConfig::default());
        state.launch_primary(LAUNCH_ANGLE_RIGHT);

        for col in 0..8 {
            assert_eq!(state.lives(), START_LIVES);
            aim_at(&mut state, BlockCategory::Sticky, col, 6);
            tick(&mut state, DT);
        }

        assert_eq!(state.lives(), START_LIVES - 1);
        assert!(!state.balls.primary.launched);
        assert_eq!(state.balls.primary.speed, 0.0);

        // A resting ball does not keep draining lives
        for _ in 0..10 {
            tick(&mut state, DT);
        }
        assert_eq!(state.lives(), START_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_stalled_ball_on_last_life_ends_game() {
        let mut state = bare_state(GameConfig::default());
        state.paddle.lives = 1;
        state.balls.primary.speed = 1.0;
        aim_at(&mut state, BlockCategory::Sticky, 3, 3);

        tick(&mut state, DT);
        assert_eq!(state.lives(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_floor_is_safe_by_default() {
        let mut state = bare_state(GameConfig::default());
        let ball = &mut state.balls.primary;
        ball.launched = true;
        ball.speed = 10.0;
        ball.angle = 270.0;
        ball.pos.x = 300.0;
        ball.pos.y = state.config.screen_height() - 5.0;
        state.paddle.pos.x = 1200.0;

        tick(&mut state, DT);
        assert_eq!(state.lives(), START_LIVES);
        assert_eq!(state.balls.primary.angle, 90.0);
    }

    #[test]
    fn test_lethal_floor_costs_a_life() {
        let config = GameConfig {
            lethal_floor: true,
            ..GameConfig::default()
        };
        let mut state = bare_state(config);
        let ball = &mut state.balls.primary;
        ball.launched = true;
        ball.speed = 10.0;
        ball.angle = 270.0;
        ball.pos.x = 300.0;
        ball.pos.y = state.config.screen_height() - 5.0;
        state.paddle.pos.x = 1200.0;

        tick(&mut state, DT);
        assert_eq!(state.lives(), START_LIVES - 1);
        assert!(!state.balls.primary.launched);
    }

    #[test]
    fn test_powerup_catch_sets_active_effect() {
        let mut state = bare_state(GameConfig::default());
        let config = state.config.clone();
        state.powerups.spawn(&config, glam::Vec2::new(200.0, 300.0), PowerupKind::Chomp);
        state.powerups.spawn(&config, state.paddle.pos, PowerupKind::Invaders);

        tick(&mut state, DT);
        assert_eq!(state.active_powerup, Some(PowerupKind::Invaders));
        assert_eq!(state.powerups.len(), 1);

        // Effect runs out after its docked time
        for _ in 0..(POWERUP_DOCKED_MS / DT) {
            tick(&mut state, DT);
        }
        assert_eq!(state.active_powerup, None);
        assert!(state.powerups.is_empty());
        assert!(state
            .drain_events()
            .contains(&GameEvent::PowerupExpired { kind: PowerupKind::Invaders }));
    }

    #[test]
    fn test_score_window_opens_upgrade_offer() {
        let mut state = bare_state(GameConfig::default());
        state.balls.primary.score = 990;
        state.balls.primary.speed = 10.0;
        aim_at(&mut state, BlockCategory::Common, 2, 12);

        tick(&mut state, DT);
        assert_eq!(state.score(), 1020);
        assert_eq!(state.phase, GamePhase::UpgradeOffer);

        // Frozen until a choice is made
        let pos = state.balls.primary.pos;
        tick(&mut state, DT);
        assert_eq!(state.balls.primary.pos, pos);
    }

    #[test]
    fn test_volley_runs_its_budget() {
        let mut state = bare_state(GameConfig::default());
        state.apply_upgrade(UpgradeKind::ExplosiveBall);
        state.apply_upgrade(UpgradeKind::ExplosiveBall);
        state.launch_primary(LAUNCH_ANGLE_LEFT);
        assert!(state.fire_volley());
        state.drain_events();

        for _ in 0..(VOLLEY_ACTIVE_MS / DT) {
            tick(&mut state, DT);
        }
        assert_eq!(state.balls.active_temporaries().count(), 0);
        assert!(state.drain_events().contains(&GameEvent::VolleyEnded));
        assert!(!state.fire_volley());
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed should produce identical results
        let mut state1 = GameState::new(GameConfig::default(), 99999);
        let mut state2 = GameState::new(GameConfig::default(), 99999);

        for state in [&mut state1, &mut state2] {
            state.launch_primary(LAUNCH_ANGLE_LEFT);
            for _ in 0..2_000 {
                // Simple autopilot: sit under the ball
                state.paddle.pos.x = state.balls.primary.pos.x;
                if state.phase == GamePhase::UpgradeOffer {
                    let kind = state.upgrades.highlighted_kind();
                    state.apply_upgrade(kind);
                    state.set_phase(GamePhase::Playing);
                }
                if !state.balls.primary.launched {
                    state.launch_primary(LAUNCH_ANGLE_RIGHT);
                }
                tick(state, DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score(), state2.score());
        assert_eq!(state1.lives(), state2.lives());
        assert_eq!(state1.grid.remaining(), state2.grid.remaining());
        assert_eq!(state1.balls.primary.pos, state2.balls.primary.pos);
        assert_eq!(state1.powerups.len(), state2.powerups.len());
    }
}
