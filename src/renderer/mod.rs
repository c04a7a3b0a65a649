//! Rendering module
//!
//! The game draws through the `Surface` trait; a window backend implements it
//! with real pixel calls. `scene` composes a full frame from the game state.

pub mod palette;
pub mod scene;

use glam::Vec2;

use crate::sim::Rect;

pub use palette::Color;
pub use scene::draw_frame;

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Immediate-mode 2D drawing target
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, diameter: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, align: TextAlign, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color },
    FillCircle { center: Vec2, diameter: f32, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
    Text { pos: Vec2, text: String, align: TextAlign, color: Color },
}

/// Surface that keeps every call, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn this frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, diameter: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, diameter, color });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn text(&mut self, pos: Vec2, text: &str, align: TextAlign, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_owned(),
            align,
            color,
        });
    }
}
