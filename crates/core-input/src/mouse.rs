//! Terminal mouse reports to pixel-space pointer events.
//!
//! The view hit-tests in pixels; the terminal reports cells. A cell maps to
//! a point a quarter cell in from its left edge and halfway down, so a click
//! on a cell lands on the leading half of the glyph there and the caret goes
//! before it.

use crate::click_tracker::ClickTracker;
use crate::map_mods;
use core_events::{INPUT_STATS, InputStats, MouseButton, MouseEvent, MouseEventKind, WHEEL_DELTA};
use crossterm::event::{MouseButton as CButton, MouseEvent as CMouseEvent, MouseEventKind as CKind};
use std::time::Instant;
use tracing::trace;

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f32,
    pub line_height: f32,
}

impl CellMetrics {
    pub const fn new(cell_width: f32, line_height: f32) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }

    pub fn to_pixels(&self, column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 + 0.25) * self.cell_width,
            (row as f32 + 0.5) * self.line_height,
        )
    }

    /// Pixel box for a `columns x rows` cell area.
    pub fn box_size(&self, columns: u16, rows: u16) -> (f32, f32) {
        (
            columns as f32 * self.cell_width,
            rows as f32 * self.line_height,
        )
    }
}

#[derive(Debug)]
pub struct MouseMapper {
    metrics: CellMetrics,
    clicks: ClickTracker,
}

impl MouseMapper {
    pub fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            clicks: ClickTracker::default(),
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn map(&mut self, event: &CMouseEvent, now: Instant) -> Option<MouseEvent> {
        let (column, row) = (event.column, event.row);
        let kind = match event.kind {
            CKind::Down(CButton::Left) => {
                if self.clicks.is_double_click(now, column, row) {
                    self.clicks.reset();
                    InputStats::bump(&INPUT_STATS.double_clicks, 1);
                    trace!(target: "input.mouse", column, row, "double_click");
                    MouseEventKind::DoubleClick(MouseButton::Left)
                } else {
                    self.clicks.record_click(now, column, row);
                    MouseEventKind::Down(MouseButton::Left)
                }
            }
            CKind::Down(b) => MouseEventKind::Down(map_button(b)),
            CKind::Up(b) => MouseEventKind::Up(map_button(b)),
            CKind::Drag(b) => MouseEventKind::Drag(map_button(b)),
            CKind::ScrollUp => MouseEventKind::Wheel(WHEEL_DELTA),
            CKind::ScrollDown => MouseEventKind::Wheel(-WHEEL_DELTA),
            CKind::Moved => MouseEventKind::Moved,
            CKind::ScrollLeft | CKind::ScrollRight => return None,
        };
        let (x, y) = self.metrics.to_pixels(column, row);
        Some(MouseEvent {
            kind,
            x,
            y,
            mods: map_mods(event.modifiers),
        })
    }
}

fn map_button(b: CButton) -> MouseButton {
    match b {
        CButton::Left => MouseButton::Left,
        CButton::Middle => MouseButton::Middle,
        CButton::Right => MouseButton::Right,
    }
}
