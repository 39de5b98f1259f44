//! Text Layout Engine seam.
//!
//! The view core never measures glyphs itself. It hands a span of text and a
//! box to a [`LayoutEngine`] and asks the resulting [`TextLayout`] geometric
//! questions: where is offset N, which offset is under point (x, y), how long
//! is each visual line. Any shaping backend that answers these consistently
//! can be plugged in; [`MonospaceEngine`] is the one the terminal host uses.
//!
//! All offsets are char offsets relative to the start of the laid-out span.
//! Coordinates are pixels with the origin at the top-left of the box.

use thiserror::Error;

pub mod mono;

pub use mono::{MonoLayout, MonospaceEngine};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("offset {offset} is outside the {len} char layout")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("layout box {width}x{height} has no area")]
    EmptyBox { width: f32, height: f32 },
    #[error("layout backend failure: {0}")]
    Backend(String),
}

/// Pixel dimensions of the layout box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxSize {
    pub width: f32,
    pub height: f32,
}

impl BoxSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub line_count: usize,
    pub width: f32,
    pub height: f32,
}

/// One visual line. `length` includes the trailing newline, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub length: usize,
    pub newline_length: usize,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClusterMetrics {
    pub length: usize,
    pub width: f32,
    pub is_whitespace: bool,
    pub is_newline: bool,
}

/// Caret geometry for a text offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitPosition {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Result of mapping a point to text.
///
/// `offset`/`length` describe the cluster under the point; `is_trailing` is
/// set when the point sits on the cluster's trailing half, meaning the caret
/// belongs after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitPoint {
    pub offset: usize,
    pub length: usize,
    pub is_trailing: bool,
    pub is_inside: bool,
}

impl HitPoint {
    /// Caret offset this hit resolves to.
    pub fn caret_offset(&self) -> usize {
        if self.is_trailing {
            self.offset + self.length
        } else {
            self.offset
        }
    }
}

pub trait TextLayout {
    fn metrics(&self) -> TextMetrics;

    /// Visual lines in document order.
    fn line_metrics(&self) -> &[LineMetrics];

    fn cluster_metrics(&self) -> Vec<ClusterMetrics>;

    fn hit_test_position(&self, offset: usize) -> Result<HitPosition, LayoutError>;

    fn hit_test_point(&self, x: f32, y: f32) -> Result<HitPoint, LayoutError>;

    /// Total chars in the laid-out span.
    fn text_len(&self) -> usize {
        self.line_metrics().iter().map(|l| l.length).sum()
    }

    /// Highlight rectangles for `[start, end)`, one per visual line touched.
    /// Newlines contribute no area.
    fn hit_test_range(&self, start: usize, end: usize) -> Result<Vec<Rect>, LayoutError> {
        let len = self.text_len();
        if start > end || end > len {
            return Err(LayoutError::OffsetOutOfRange {
                offset: end.max(start),
                len,
            });
        }
        let mut rects = Vec::new();
        let mut line_start = 0usize;
        for line in self.line_metrics() {
            let visible_end = line_start + line.length - line.newline_length;
            let lo = start.max(line_start);
            let hi = end.min(visible_end);
            if lo < hi {
                let first = self.hit_test_position(lo)?;
                let last = self.hit_test_position(hi - 1)?;
                rects.push(Rect::new(
                    first.x,
                    first.y,
                    last.x + last.width - first.x,
                    first.height,
                ));
            }
            line_start += line.length;
            if line_start >= end {
                break;
            }
        }
        Ok(rects)
    }
}

/// Produces layouts for a span of text inside a box.
pub trait LayoutEngine {
    type Layout: TextLayout;

    fn layout(&mut self, text: &str, size: BoxSize) -> Result<Self::Layout, LayoutError>;
}
