//! Text mutation paths.
//!
//! Edits that fit inside the window go through the overlay; the window end and
//! cursor shift by the edit delta and the buffer is left alone until the next
//! merge. Inserts at or above `overlay_threshold` chars, and erases reaching
//! outside the window, merge first and hit the buffer directly.

use crate::{Selection, TextView, ViewResult};
use core_layout::LayoutEngine;
use tracing::debug;

impl<E: LayoutEngine> TextView<E> {
    pub fn insert_char(&mut self, c: char) -> ViewResult<bool> {
        let mut buf = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut buf))
    }

    /// Insert at the cursor, replacing a non-empty selection. `\r` is dropped.
    pub fn insert_text(&mut self, text: &str) -> ViewResult<bool> {
        let text: String = text.chars().filter(|c| *c != '\r').collect();
        if text.is_empty() {
            return Ok(false);
        }
        if !self.selection.is_empty() {
            self.erase_selection()?;
        }
        self.reveal(self.cursor.get())?;
        let n = text.chars().count();
        let at = self.cursor.get();
        if n < self.options.overlay_threshold {
            self.doc.make_active(self.window.start, self.window.end)?;
            self.doc.overlay_insert(at, &text)?;
            self.window.end += n;
            self.put_cursor(self.cursor.get() + n)?;
            self.invalidate();
        } else {
            self.doc.insert_direct(at, &text)?;
            self.put_cursor(self.cursor.get() + n)?;
            debug!(target: "view.edit", at, inserted = n, "insert_direct");
            self.change_view(self.window.start)?;
        }
        self.selection = Selection::new(self.cursor.get(), self.cursor.get());
        self.reset_motion_caches();
        self.reveal(self.cursor.get())?;
        Ok(true)
    }

    /// Backspace. Erases the selection if there is one.
    pub fn back_erase(&mut self) -> ViewResult<bool> {
        if !self.selection.is_empty() {
            self.erase_selection()?;
            return Ok(true);
        }
        if self.cursor.get() == 0 {
            return Ok(false);
        }
        self.erase_range(self.cursor.get() - 1, self.cursor.get())?;
        Ok(true)
    }

    /// Delete key. Erases the selection if there is one.
    pub fn forward_erase(&mut self) -> ViewResult<bool> {
        if !self.selection.is_empty() {
            self.erase_selection()?;
            return Ok(true);
        }
        if self.cursor.get() >= self.doc.len() {
            return Ok(false);
        }
        self.erase_range(self.cursor.get(), self.cursor.get() + 1)?;
        Ok(true)
    }

    /// Remove exactly `[begin, end)` of the selection; cursor lands on `begin`.
    pub fn erase_selection(&mut self) -> ViewResult<bool> {
        let Selection { begin, end } = self.selection;
        if begin == end {
            return Ok(false);
        }
        self.erase_range(begin, end)?;
        Ok(true)
    }

    fn erase_range(&mut self, begin: usize, end: usize) -> ViewResult<()> {
        self.reveal(begin)?;
        let (start, win_end) = (self.window.start, self.window.end);
        if begin >= start && end <= win_end {
            self.doc.make_active(start, win_end)?;
            self.doc.overlay_remove(begin..end)?;
            self.window.end -= end - begin;
            self.invalidate();
        } else {
            self.doc.remove_direct(begin..end)?;
            debug!(target: "view.edit", begin, end, "erase_direct");
            let new_start = if begin < start {
                self.doc.buffer().line_start_at(begin)?
            } else {
                start
            };
            self.change_view(new_start)?;
        }
        self.put_cursor(begin)?;
        self.selection = Selection::new(begin, begin);
        self.reset_motion_caches();
        self.reveal(begin)?;
        Ok(())
    }
}
