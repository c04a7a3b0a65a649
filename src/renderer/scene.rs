//! Frame composition
//!
//! Draw order follows the layering of the playfield: grid backdrop, HUD,
//! paddle, blocks, balls with their score text, power-ups, then any menu
//! overlay for the current phase.

use glam::Vec2;

use super::palette;
use super::{Surface, TextAlign};
use crate::consts::*;
use crate::sim::combo::RAINBOW_PHASES;
use crate::sim::{GamePhase, GameState, Rect};

/// Rainbow period for balls (ms per color)
const BALL_RAINBOW_MS: i32 = 100;
/// Grid intersection tick half-length
const TICK_MARK: f32 = 4.0;

/// Draw a full frame for the current phase
pub fn draw_frame(state: &GameState, surface: &mut impl Surface) {
    match state.phase {
        GamePhase::Playing => draw_playing(state, surface),
        GamePhase::Paused => {
            draw_playing(state, surface);
            draw_pause(state, surface);
        }
        GamePhase::UpgradeOffer => {
            draw_playing(state, surface);
            draw_upgrade_menu(state, surface);
        }
        GamePhase::GameOver => draw_game_over(state, surface),
    }
}

fn screen(state: &GameState) -> Rect {
    Rect::new(0.0, 0.0, state.config.screen_width(), state.config.screen_height())
}

fn draw_playing(state: &GameState, surface: &mut impl Surface) {
    surface.fill_rect(screen(state), palette::BLACK);
    draw_background(state, surface);
    draw_hud(state, surface);

    let paddle = state.paddle.rect();
    surface.fill_rect(paddle, palette::PADDLE);
    surface.stroke_rect(paddle, palette::WHITE);

    for block in state.grid.blocks() {
        let rect = block.rect(&state.config);
        surface.fill_rect(rect, palette::block_color(block.category, block.hits_taken));
        surface.stroke_rect(rect, palette::WHITE);
    }

    for ball in state.balls.visible() {
        let color = if ball.is_primary() {
            palette::rainbow(&state.combo, BALL_RAINBOW_MS)
        } else {
            palette::TEMPORARY_BALL
        };
        surface.fill_circle(ball.pos, ball.size, color);
    }

    let text_color = palette::rainbow(&state.combo, FLOATING_TEXT_MS / RAINBOW_PHASES);
    for text in &state.floating {
        surface.text(text.pos, &text.points.to_string(), TextAlign::Left, text_color);
    }

    for pw in state.powerups.iter().filter(|p| !p.caught) {
        let base = palette::powerup(pw.kind);
        let color = if pw.is_bright() { palette::brighter(base) } else { base };
        surface.fill_circle(pw.pos, POWERUP_SIZE, color);
    }
}

/// Grid lines with short tick marks at every cell corner
fn draw_background(state: &GameState, surface: &mut impl Surface) {
    let config = &state.config;
    for row in 0..=config.rows {
        for col in 0..=config.columns {
            let x = config.side + col as f32 * config.tile_width;
            let y = config.side + row as f32 * config.tile_height;
            let left = if col == 0 { x } else { x - TICK_MARK };
            let right = if col == config.columns { x } else { x + TICK_MARK };
            let top = if row == 0 { y } else { y - TICK_MARK };
            let bottom = if row == config.rows { y } else { y + TICK_MARK };

            surface.line(Vec2::new(left, y), Vec2::new(right, y), palette::DARK_GRAY);
            surface.line(Vec2::new(x, top), Vec2::new(x, bottom), palette::DARK_GRAY);
        }
    }
    surface.stroke_rect(config.block_field(), palette::DARK_GRAY);
}

fn draw_hud(state: &GameState, surface: &mut impl Surface) {
    let width = state.config.screen_width();
    let y = state.config.side / 2.0;

    let cooldown = match state.balls.cooldown_secs() {
        Some(secs) => format!("Cooldown: {}", secs.max(0)),
        None => "Cooldown: --".to_string(),
    };
    let items = [
        (width / 4.0, format!("Lives: {}", state.lives())),
        (width / 2.0, format!("Score: {}", state.score())),
        (width * 3.0 / 4.0, cooldown),
    ];
    for (x, label) in &items {
        surface.text(Vec2::new(*x, y), label, TextAlign::Center, palette::WHITE);
    }

    if let Some(kind) = state.active_powerup {
        surface.text(
            Vec2::new(width / 2.0, y + state.config.side / 4.0),
            &format!("Power-up: {}", kind.label()),
            TextAlign::Center,
            palette::powerup(kind),
        );
    }
}

/// Centered box covering half the screen in each direction
fn menu_box(state: &GameState) -> Rect {
    let (w, h) = (state.config.screen_width(), state.config.screen_height());
    Rect::new(w / 4.0, h / 4.0, w / 2.0, h / 2.0)
}

fn draw_pause(state: &GameState, surface: &mut impl Surface) {
    let panel = menu_box(state);
    surface.fill_rect(panel, palette::OVERLAY);

    let x = panel.center().x;
    let lines: [(f32, &str); 3] = [
        (0.25, "Paused"),
        (0.6, "Pause again to continue playing"),
        (0.8, "Quit to leave the game"),
    ];
    for (at, line) in lines {
        surface.text(Vec2::new(x, panel.top() + panel.height * at), line, TextAlign::Center, palette::WHITE);
    }
}

fn draw_upgrade_menu(state: &GameState, surface: &mut impl Surface) {
    let panel = menu_box(state);
    surface.fill_rect(panel, palette::OVERLAY);
    surface.text(
        Vec2::new(panel.center().x, panel.top() + panel.height / 5.0),
        "Choose one upgrade",
        TextAlign::Center,
        palette::WHITE,
    );

    let (w, h) = (panel.width / 3.0, panel.height / 5.0);
    let y = panel.top() + panel.height / 2.0;
    let slots = [
        Rect::new(panel.left() + 10.0, y, w, h),
        Rect::new(panel.right() - w - 10.0, y, w, h),
    ];
    let selector = &state.upgrades;
    for (i, (slot, kind)) in slots.iter().zip(selector.choices).enumerate() {
        surface.fill_rect(*slot, palette::BLACK);
        if i == selector.highlighted {
            surface.stroke_rect(*slot, palette::WHITE);
        }
        surface.text(slot.center(), kind.label(), TextAlign::Center, palette::WHITE);
    }
}

fn draw_game_over(state: &GameState, surface: &mut impl Surface) {
    let area = screen(state);
    surface.fill_rect(area, palette::BLACK);
    let center = area.center();
    surface.text(center, "Game over!", TextAlign::Center, palette::WHITE);
    surface.text(
        center + Vec2::new(0.0, 30.0),
        &format!("Final score: {}", state.score()),
        TextAlign::Center,
        palette::LIGHT_GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::sim::PowerupKind;

    fn frame(state: &GameState) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        draw_frame(state, &mut surface);
        surface
    }

    #[test]
    fn test_playing_frame_has_hud_and_blocks() {
        let state = GameState::new(GameConfig::default(), 1);
        let surface = frame(&state);
        assert!(surface.has_text("Lives: 3"));
        assert!(surface.has_text("Score: 0"));
        assert!(surface.has_text("Cooldown: --"));

        let block_fills = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { rect, .. } if rect.width == 60.0 && rect.height == 30.0))
            .count();
        assert_eq!(block_fills, 300);
    }

    #[test]
    fn test_idle_temporary_balls_are_hidden() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let config = state.config.clone();
        state.balls.grant_temporary(&config);
        state.balls.grant_temporary(&config);

        let ball_fills = |surface: &RecordingSurface| {
            surface
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::FillCircle { diameter, .. } if *diameter == BALL_SIZE))
                .count()
        };
        assert_eq!(ball_fills(&frame(&state)), 1);

        state.balls.launch_volley();
        assert_eq!(ball_fills(&frame(&state)), 3);
    }

    #[test]
    fn test_overlays_follow_phase() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.toggle_pause();
        assert!(frame(&state).has_text("Paused"));

        state.toggle_pause();
        state.offer_upgrade();
        let surface = frame(&state);
        assert!(surface.has_text("Choose one upgrade"));
        assert!(surface.has_text(state.upgrades.choices[0].label()));
        assert!(surface.has_text(state.upgrades.choices[1].label()));

        state.set_phase(GamePhase::GameOver);
        let surface = frame(&state);
        assert!(surface.has_text("Game over!"));
        assert!(!surface.has_text("Lives"));
    }

    #[test]
    fn test_caught_powerup_only_in_hud() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let config = state.config.clone();
        let pos = state.paddle.pos;
        state.powerups.spawn(&config, pos, PowerupKind::Chomp);
        crate::sim::tick(&mut state, 25);

        let surface = frame(&state);
        assert!(surface.has_text("Power-up: Chomp"));
        let powerup_circles = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { diameter, .. } if *diameter == POWERUP_SIZE))
            .count();
        assert_eq!(powerup_circles, 0);
    }
}
