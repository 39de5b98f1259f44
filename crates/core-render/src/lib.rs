//! Drawing surface seam and the pieces every host shares.
//!
//! The view draws through [`Surface`] in pixel coordinates and never knows
//! whether it is painting a GPU target, a terminal cell grid, or a test
//! recorder. A surface only needs three primitives: filled rectangles, outlined
//! rectangles, and a laid-out block of text placed at an origin.
//!
//! Exposed components:
//! - `Surface`, `Point`, `Color` (plus `Rect` re-exported from the layout seam).
//! - `style`: `DrawStyle` colors and caret width, `DrawMode`.
//! - `recording`: `RecordingSurface` capturing `DrawCommand`s for headless use.
//! - `status`: status line composition.

use core_layout::TextLayout;

pub mod recording;
pub mod status;
pub mod style;

pub use core_layout::Rect;
pub use recording::{DrawCommand, RecordingSurface};
pub use style::{DrawMode, DrawStyle};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Paint `text` as shaped by `layout`, with the layout's origin at `origin`.
    fn draw_text_layout(&mut self, origin: Point, layout: &dyn TextLayout, text: &str, color: Color);
}
