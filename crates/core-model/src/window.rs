//! Viewport window bookkeeping.

use crate::{TextView, ViewResult, invariant};
use core_layout::{BoxSize, LayoutEngine, TextLayout};
use tracing::debug;

/// The char range handed to the layout engine and the box it is shaped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportWindow {
    pub start: usize,
    pub end: usize,
    /// Last caret position that still fits the box vertically.
    pub end_view: usize,
    pub block_size: usize,
    pub size: BoxSize,
}

/// Chars to shape for a box: area / `density_divisor`, floored at `min_block`.
pub fn block_size_for(size: BoxSize, density_divisor: usize, min_block: usize) -> usize {
    let area = size.area().max(0.0) as usize;
    (area / density_divisor.max(1)).max(min_block).max(1)
}

/// Hit-test the bottom-right corner of the box to find where the visible
/// text ends.
pub(crate) fn derive_end_view<L: TextLayout>(
    window: &ViewportWindow,
    layout: &L,
) -> ViewResult<usize> {
    if layout.metrics().height <= window.size.height {
        return Ok(window.end);
    }
    let hit = layout.hit_test_point(f32::MAX, (window.size.height - 1.0).max(0.0))?;
    Ok((window.start + hit.caret_offset()).min(window.end))
}

impl<E: LayoutEngine> TextView<E> {
    /// Re-window at `new_start`. Folds the overlay back first.
    pub fn change_view(&mut self, new_start: usize) -> ViewResult<()> {
        let len = self.doc.len();
        if new_start > len {
            return Err(invariant(
                "change_view",
                format!("start {new_start} past document length {len}"),
            ));
        }
        self.doc.merge_active()?;
        self.window.start = new_start;
        self.window.end = new_start + self.window.block_size.min(len - new_start);
        self.window.end_view = self.window.end;
        self.invalidate();
        debug!(
            target: "view.window",
            start = self.window.start,
            end = self.window.end,
            block_size = self.window.block_size,
            "change_view"
        );
        Ok(())
    }

    /// New box dimensions: recompute the block size and re-window in place.
    pub fn set_size(&mut self, width: f32, height: f32) -> ViewResult<()> {
        let size = BoxSize::new(width, height);
        self.window.size = size;
        self.window.block_size = block_size_for(
            size,
            self.options.density_divisor,
            self.options.min_block_size,
        );
        self.ideal_x = None;
        debug!(target: "view.window", width, height, block_size = self.window.block_size, "set_size");
        self.change_view(self.window.start)
    }

    /// Whether `offset` is inside the visible part of the window.
    pub fn is_visible(&mut self, offset: usize) -> ViewResult<bool> {
        self.ensure_layout()?;
        Ok(offset >= self.window.start && offset <= self.window.end_view)
    }

    /// Re-window just enough that `offset` becomes visible: one line first,
    /// then a jump to the offset's line if that was not enough.
    pub(crate) fn reveal(&mut self, offset: usize) -> ViewResult<bool> {
        if self.is_visible(offset)? {
            return Ok(false);
        }
        if offset < self.window.start {
            self.v_scroll(-1)?;
        } else {
            self.v_scroll(1)?;
        }
        if !self.is_visible(offset)? {
            self.scroll_to_offset(offset)?;
        }
        if !self.is_visible(offset)? {
            let w = self.window;
            return Err(invariant(
                "reveal",
                format!(
                    "offset {offset} still outside window {}..{} (end_view {})",
                    w.start, w.end, w.end_view
                ),
            ));
        }
        Ok(true)
    }
}
