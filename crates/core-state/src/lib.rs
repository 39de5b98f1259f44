//! Document state: the authoritative Text Buffer plus an optional Edit Overlay.
//!
//! The overlay is a private copy of one window of the buffer that absorbs
//! small edits. While it exists, every read inside the window goes through it;
//! [`DocumentState::merge_active`] folds it back. Readers never need to care
//! which of the two currently holds a char: `len`, `char_at` and `slice`
//! answer in logical coordinates either way.

use core_text::{TextBuffer, TextError, TextResult};
use std::ops::Range;
use tracing::{debug, trace};

mod line_ending;

pub use line_ending::{LineEnding, NormalizedText, normalize_line_endings, restore_line_endings};

/// Transient copy of `buffer[source]` being edited in place.
#[derive(Debug, Clone)]
pub struct EditOverlay {
    chars: Vec<char>,
    source: Range<usize>,
    dirty: bool,
}

impl EditOverlay {
    /// Buffer range the overlay was sliced from (pre-edit coordinates).
    pub fn source(&self) -> Range<usize> {
        self.source.clone()
    }

    /// Current overlay length in chars.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Logical end of the overlay (start + current length).
    pub fn logical_end(&self) -> usize {
        self.source.start + self.chars.len()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

#[derive(Debug, Default)]
pub struct DocumentState {
    buffer: TextBuffer,
    overlay: Option<EditOverlay>,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(content: &str) -> Self {
        Self {
            buffer: TextBuffer::from_text(content),
            overlay: None,
        }
    }

    /// Replace the whole document, dropping any in-flight overlay.
    pub fn replace_all(&mut self, content: &str) {
        if self.overlay.take().is_some() {
            debug!(target: "state.overlay", "overlay_dropped_on_replace");
        }
        self.buffer = TextBuffer::from_text(content);
    }

    /// The authoritative buffer. Stale inside the window while an overlay exists.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn overlay(&self) -> Option<&EditOverlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Chars the overlay has added (positive) or removed (negative).
    fn delta(&self) -> isize {
        match &self.overlay {
            Some(o) => o.chars.len() as isize - o.source.len() as isize,
            None => 0,
        }
    }

    /// Logical document length.
    pub fn len(&self) -> usize {
        (self.buffer.len() as isize + self.delta()) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot `buffer[start, end)` into a fresh overlay. Idempotent: an
    /// existing overlay is kept as is.
    pub fn make_active(&mut self, start: usize, end: usize) -> TextResult<()> {
        if self.overlay.is_some() {
            return Ok(());
        }
        let text = self.buffer.slice(start..end)?;
        self.overlay = Some(EditOverlay {
            chars: text.chars().collect(),
            source: start..end,
            dirty: false,
        });
        trace!(target: "state.overlay", start, end, "make_active");
        Ok(())
    }

    /// Fold the overlay back into the buffer.
    ///
    /// A modified overlay replaces its source range, even when edited down to
    /// nothing. An untouched overlay is simply dropped. Returns whether the
    /// buffer changed.
    pub fn merge_active(&mut self) -> TextResult<bool> {
        let Some(overlay) = self.overlay.take() else {
            return Ok(false);
        };
        if !overlay.dirty {
            trace!(target: "state.overlay", "discard_clean_overlay");
            return Ok(false);
        }
        let text = overlay.text();
        if let Err(e) = self.buffer.replace(overlay.source.clone(), &text) {
            // Leave state exactly as it was before the call.
            self.overlay = Some(overlay);
            return Err(e);
        }
        debug!(
            target: "state.overlay",
            start = overlay.source.start,
            replaced = overlay.source.len(),
            written = overlay.chars.len(),
            "merge_active"
        );
        Ok(true)
    }

    /// Char at logical offset `idx`.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        match &self.overlay {
            None => self.buffer.char_at(idx),
            Some(o) => {
                if idx < o.source.start {
                    self.buffer.char_at(idx)
                } else if idx < o.logical_end() {
                    o.chars.get(idx - o.source.start).copied()
                } else {
                    let raw = idx - o.chars.len() + o.source.len();
                    self.buffer.char_at(raw)
                }
            }
        }
    }

    /// Logical `[range.start, range.end)`.
    pub fn slice(&self, range: Range<usize>) -> TextResult<String> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(TextError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        let Some(o) = &self.overlay else {
            return self.buffer.slice(range);
        };
        let mut out = String::new();
        let (s, e) = (o.source.start, o.logical_end());
        // Part before the overlay.
        if range.start < s {
            out.push_str(&self.buffer.slice(range.start..range.end.min(s))?);
        }
        // Part inside the overlay.
        let lo = range.start.max(s);
        let hi = range.end.min(e);
        if lo < hi {
            out.extend(&o.chars[lo - s..hi - s]);
        }
        // Part after, mapped back into buffer coordinates.
        let lo = range.start.max(e);
        if lo < range.end {
            let shift = |l: usize| l - o.chars.len() + o.source.len();
            out.push_str(&self.buffer.slice(shift(lo)..shift(range.end))?);
        }
        Ok(out)
    }

    fn overlay_mut_checked(&mut self, range: Range<usize>) -> TextResult<&mut EditOverlay> {
        let len = self.len();
        let Some(o) = self.overlay.as_mut() else {
            return Err(TextError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        };
        if range.start < o.source.start || range.end > o.logical_end() || range.start > range.end {
            return Err(TextError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(o)
    }

    /// Insert into the overlay at logical offset `at` (must lie inside it).
    pub fn overlay_insert(&mut self, at: usize, text: &str) -> TextResult<()> {
        let o = self.overlay_mut_checked(at..at)?;
        let local = at - o.source.start;
        o.chars.splice(local..local, text.chars());
        o.dirty = true;
        trace!(target: "state.overlay", at, overlay_len = o.chars.len(), "overlay_insert");
        Ok(())
    }

    /// Remove logical `range` from the overlay (must lie inside it).
    pub fn overlay_remove(&mut self, range: Range<usize>) -> TextResult<String> {
        let o = self.overlay_mut_checked(range.clone())?;
        let s = o.source.start;
        let removed: String = o.chars.drain(range.start - s..range.end - s).collect();
        if !removed.is_empty() {
            o.dirty = true;
        }
        trace!(
            target: "state.overlay",
            start = range.start,
            end = range.end,
            overlay_len = o.chars.len(),
            "overlay_remove"
        );
        Ok(removed)
    }

    /// Merge, then insert straight into the buffer.
    pub fn insert_direct(&mut self, at: usize, text: &str) -> TextResult<()> {
        let len = self.len();
        if at > len {
            return Err(TextError::OffsetOutOfRange { offset: at, len });
        }
        self.merge_active()?;
        self.buffer.insert(at, text)
    }

    /// Merge, then remove straight from the buffer.
    pub fn remove_direct(&mut self, range: Range<usize>) -> TextResult<String> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(TextError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        self.merge_active()?;
        self.buffer.remove(range)
    }

    /// Whole document as one string; merges first.
    pub fn full_text(&mut self) -> TextResult<String> {
        self.merge_active()?;
        Ok(self.buffer.to_string())
    }
}
