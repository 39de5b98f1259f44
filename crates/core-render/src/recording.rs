//! A surface that remembers what was drawn.
//!
//! Commands preserve call order. Text is recorded once per `draw_text_layout`
//! call together with the layout's line count so tests can check what would
//! have been painted without a real backend.

use crate::{Color, Point, Rect, Surface};
use core_layout::TextLayout;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill(Rect, Color),
    Stroke(Rect, Color),
    Text {
        origin: Point,
        text: String,
        lines: usize,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn fills_with(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Fill(r, col) if *col == color => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn strokes_with(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke(r, col) if *col == color => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Stroke(rect, color));
    }

    fn draw_text_layout(&mut self, origin: Point, layout: &dyn TextLayout, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            lines: layout.metrics().line_count,
            color,
        });
    }
}
