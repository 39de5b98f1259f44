//! Colors and caret geometry used by `TextView::draw`.

use crate::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Normal,
    /// Debug rendering: mark every whitespace cluster and newline.
    ShowMarks,
}

impl DrawMode {
    pub fn toggled(self) -> Self {
        match self {
            DrawMode::Normal => DrawMode::ShowMarks,
            DrawMode::ShowMarks => DrawMode::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub text: Color,
    pub caret: Color,
    pub active_line: Color,
    pub selection: Color,
    pub marks: Color,
    /// Caret rectangle width in pixels.
    pub caret_width: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            text: Color::rgb(0xdc, 0xdc, 0xdc),
            caret: Color::rgb(0xff, 0xcc, 0x00),
            active_line: Color::rgb(0x2a, 0x2a, 0x2a),
            selection: Color::rgb(0x26, 0x4f, 0x78),
            marks: Color::rgb(0x60, 0x60, 0x60),
            caret_width: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_mode_toggles() {
        assert_eq!(DrawMode::Normal.toggled(), DrawMode::ShowMarks);
        assert_eq!(DrawMode::ShowMarks.toggled(), DrawMode::Normal);
    }
}
