//! Double-click detection from press time and cell position.

use std::time::{Duration, Instant};

/// Two presses on the same cell closer than this form a double click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct ClickTracker {
    /// Last press time.
    time: Option<Instant>,
    /// Last press cell (column, row).
    position: Option<(u16, u16)>,
}

impl ClickTracker {
    /// Whether a press at `(column, row)` at `now` completes a double click.
    pub fn is_double_click(&self, now: Instant, column: u16, row: u16) -> bool {
        match (self.time, self.position) {
            (Some(last), Some(pos)) => {
                now.saturating_duration_since(last) < DOUBLE_CLICK_INTERVAL && pos == (column, row)
            }
            _ => false,
        }
    }

    pub fn record_click(&mut self, now: Instant, column: u16, row: u16) {
        self.time = Some(now);
        self.position = Some((column, row));
    }

    /// Forget the last press so a third click starts a new sequence.
    pub fn reset(&mut self) {
        self.time = None;
        self.position = None;
    }
}
