//! Forward, backward and absolute re-windowing.
//!
//! Lines wrap and advances vary, so line starts can't be computed by
//! arithmetic. Forward scrolling reads line lengths off the current layout.
//! Backward scrolling finds the previous hard line start in the buffer and
//! re-shapes only the span up to the current start to learn where its
//! visual lines begin.

use crate::{TextView, ViewError, ViewResult};
use core_layout::{LayoutEngine, TextLayout};
use tracing::{debug, trace};

impl<E: LayoutEngine> TextView<E> {
    /// Scroll by `lines` visual lines (positive = towards the end). Returns
    /// whether the window moved.
    pub fn v_scroll(&mut self, lines: isize) -> ViewResult<bool> {
        let moved = if lines >= 0 {
            self.scroll_forward(lines.unsigned_abs())?
        } else {
            self.scroll_backward(lines.unsigned_abs())?
        };
        if moved > 0 {
            debug!(target: "view.scroll", requested = lines, moved, start = self.window.start, "v_scroll");
        }
        Ok(moved > 0)
    }

    fn scroll_forward(&mut self, lines: usize) -> ViewResult<usize> {
        let mut moved = 0usize;
        while moved < lines {
            self.ensure_layout()?;
            let layout = self.layout()?;
            let metrics = layout.line_metrics();
            // The last shaped line may be cut by the block boundary; never
            // step into it unless it is all there is.
            let usable = metrics.len().saturating_sub(1);
            let take = (lines - moved).min(usable);
            let mut advance: usize = metrics[..take].iter().map(|l| l.length).sum();
            let mut stepped = take;
            if take == 0 && self.window.end < self.doc.len() {
                advance = metrics.first().map_or(0, |l| l.length);
                stepped = 1;
            }
            if advance == 0 {
                break;
            }
            let new_start = self.window.start + advance;
            self.change_view(new_start)?;
            moved += stepped;
        }
        Ok(moved)
    }

    fn scroll_backward(&mut self, lines: usize) -> ViewResult<usize> {
        let mut moved = 0usize;
        while moved < lines && self.window.start > 0 {
            self.doc.merge_active()?;
            let start = self.window.start;
            let Some(prev) = self.previous_line_start(start)? else {
                break;
            };
            self.change_view(prev)?;
            moved += 1;
        }
        Ok(moved)
    }

    /// Visual line starts of buffer `[from, to)` when shaped in the current box.
    fn visual_line_starts(&mut self, from: usize, to: usize) -> ViewResult<Vec<usize>> {
        let span = self.doc.slice(from..to)?;
        let layout = self.engine.layout(&span, self.window.size)?;
        let mut starts = Vec::with_capacity(layout.line_metrics().len());
        let mut acc = from;
        for line in layout.line_metrics() {
            if line.length == 0 && acc == to && !starts.is_empty() {
                break;
            }
            starts.push(acc);
            acc += line.length;
        }
        trace!(target: "view.scroll", from, to, lines = starts.len(), "reshape_span");
        Ok(starts)
    }

    /// Start of the visual line just above `start`.
    fn previous_line_start(&mut self, start: usize) -> ViewResult<Option<usize>> {
        if start == 0 {
            return Ok(None);
        }
        let p = self.doc.buffer().find_previous_nl_start(start)?;
        let starts = self.visual_line_starts(p, start)?;
        Ok(starts.into_iter().rev().find(|s| *s < start))
    }

    /// Start of the visual line containing `offset`.
    fn visual_line_start_of(&mut self, offset: usize) -> ViewResult<usize> {
        self.doc.merge_active()?;
        let p = self.doc.buffer().line_start_at(offset)?;
        if p == offset {
            return Ok(p);
        }
        let starts = self.visual_line_starts(p, offset)?;
        Ok(starts.last().copied().unwrap_or(p))
    }

    /// Window start that puts `offset` on the top visual line. A hanging
    /// whitespace run can make that line longer than a block; the window then
    /// starts inside the run, half a block before `offset`.
    fn window_start_for(&mut self, offset: usize) -> ViewResult<usize> {
        let line_start = self.visual_line_start_of(offset)?;
        let block = self.window.block_size;
        if offset - line_start < block {
            return Ok(line_start);
        }
        let start = offset - block / 2;
        trace!(target: "view.scroll", offset, line_start, start, "start_inside_line");
        Ok(start)
    }

    /// Jump so that the line at `fraction` of the document is at the top.
    pub fn scrollbox_move(&mut self, fraction: f64) -> ViewResult<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ViewError::InvalidFraction(fraction));
        }
        let len = self.doc.len();
        let target = ((fraction * len as f64).floor() as usize).min(len);
        let new_start = self.window_start_for(target)?;
        debug!(target: "view.scroll", fraction, target, new_start, "scrollbox_move");
        self.change_view(new_start)
    }

    /// Re-window so the visual line holding `offset` is the top line, unless
    /// `offset` is already visible.
    pub fn scroll_to_offset(&mut self, offset: usize) -> ViewResult<bool> {
        let len = self.doc.len();
        if offset > len {
            return Err(ViewError::OffsetOutOfRange { offset, len });
        }
        if self.is_visible(offset)? {
            return Ok(false);
        }
        let new_start = self.window_start_for(offset)?;
        debug!(target: "view.scroll", offset, new_start, "scroll_to_offset");
        self.change_view(new_start)?;
        Ok(true)
    }

    /// Whole visual lines that fit the box (at least one).
    pub(crate) fn visible_lines(&mut self) -> ViewResult<usize> {
        self.ensure_layout()?;
        let height = self.window.size.height;
        let layout = self.layout()?;
        let line_h = layout
            .line_metrics()
            .first()
            .map(|l| l.height)
            .filter(|h| *h > 0.0)
            .unwrap_or(height);
        Ok(((height / line_h).floor() as usize).max(1))
    }

    /// Scroll a page and keep the caret at the same spot in the box.
    pub fn page(&mut self, down: bool) -> ViewResult<bool> {
        self.selection = crate::Selection::new(self.cursor.get(), self.cursor.get());
        self.reveal(self.cursor.get())?;
        self.ensure_layout()?;
        let rel = self.cursor.get() - self.window.start;
        let pos = self.layout()?.hit_test_position(rel)?;
        let n = self.visible_lines()?.saturating_sub(1).max(1) as isize;
        let moved = self.v_scroll(if down { n } else { -n })?;
        if !moved {
            let target = if down { self.doc.len() } else { 0 };
            let changed = self.cursor.get() != target;
            self.put_cursor(target)?;
            self.selection = crate::Selection::new(target, target);
            self.reset_motion_caches();
            self.reveal(target)?;
            return Ok(changed);
        }
        self.ensure_layout()?;
        let hit = self
            .layout()?
            .hit_test_point(pos.x, pos.y + pos.height / 2.0)?;
        self.put_cursor(self.window.start + hit.caret_offset())?;
        self.selection = crate::Selection::new(self.cursor.get(), self.cursor.get());
        self.cursor_line = None;
        self.reveal(self.cursor.get())?;
        Ok(true)
    }
}
