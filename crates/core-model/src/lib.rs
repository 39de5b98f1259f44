//! The text view: one owner for buffer, overlay, viewport window, layout
//! cache, cursor and selection.
//!
//! Only a bounded window `[start, end)` of the document is ever shaped. Small
//! edits land in an Edit Overlay over exactly that window and are folded back
//! into the buffer whenever the window moves (merge-on-scroll) or the full
//! text is requested. Geometry questions go to the Layout Engine; this crate
//! only does offset bookkeeping and decides when to re-window.
//!
//! Invariants (hold after every public call):
//! * `0 <= cursor <= len` where `len` is the logical document length.
//! * `selection.begin <= selection.end`, both `<= len`.
//! * `start <= end_view <= end <= len` and `end - start` was at most
//!   `block_size` when the window was last set (edits may grow it since).
//! * While an overlay exists it covers exactly `[start, end)`.
//! * The layout cache, when present, was shaped from the current window text
//!   and box.
//!
//! Boundary conditions (left at offset 0, right at the end, erase at 0,
//! scrolling above the top) are not errors: they return `Ok(false)`. Broken
//! invariants are returned as `ViewError::InvariantViolation` and logged at
//! `error` on target `view.invariant`; nothing is silently clamped.
//!
//! The cursor is only drawn and hit-tested precisely while it lies inside
//! `[start, end_view]`. Operations that need it elsewhere re-window first.

use core_layout::{BoxSize, LayoutEngine, LayoutError, TextLayout};
use core_state::DocumentState;
use core_text::word::WordClassifier;
use core_text::{DocOffset, TextError};
use thiserror::Error;
use tracing::{debug, error};

mod draw;
mod edit;
mod navigator;
mod scroll;
mod window;

pub use window::{ViewportWindow, block_size_for};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invariant violated in {context}: {detail}")]
    InvariantViolation {
        context: &'static str,
        detail: String,
    },
    #[error("offset {offset} is outside the {len} char document")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("scroll fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Text(#[from] TextError),
}

pub type ViewResult<T> = Result<T, ViewError>;

pub(crate) fn invariant(context: &'static str, detail: String) -> ViewError {
    error!(target: "view.invariant", context, %detail, "invariant_violation");
    ViewError::InvariantViolation { context, detail }
}

/// Tunables the host reads from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    /// Inserts of at least this many chars skip the overlay.
    pub overlay_threshold: usize,
    /// Chars per window ~= box area / `density_divisor`.
    pub density_divisor: usize,
    pub min_block_size: usize,
    pub word_classifier: WordClassifier,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            overlay_threshold: 512,
            density_divisor: 85,
            min_block_size: 256,
            word_classifier: WordClassifier::Threshold,
        }
    }
}

/// Half-open selected range; empty when `begin == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub begin: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            begin: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn clear(&mut self) {
        self.end = self.begin;
    }
}

/// Layout of the current window plus the text it was shaped from.
struct LayoutCache<L> {
    entry: Option<(String, L)>,
}

impl<L> LayoutCache<L> {
    fn empty() -> Self {
        Self { entry: None }
    }

    fn invalidate(&mut self) {
        self.entry = None;
    }

    fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    fn store(&mut self, text: String, layout: L) {
        self.entry = Some((text, layout));
    }

    fn get(&self) -> Option<(&str, &L)> {
        self.entry.as_ref().map(|(t, l)| (t.as_str(), l))
    }
}

pub struct TextView<E: LayoutEngine> {
    engine: E,
    doc: DocumentState,
    window: ViewportWindow,
    cache: LayoutCache<E::Layout>,
    cursor: DocOffset,
    selection: Selection,
    ideal_x: Option<f32>,
    cursor_line: Option<usize>,
    options: ViewOptions,
}

impl<E: LayoutEngine> TextView<E> {
    pub fn new(engine: E, options: ViewOptions, size: BoxSize) -> Self {
        let block_size = block_size_for(size, options.density_divisor, options.min_block_size);
        Self {
            engine,
            doc: DocumentState::new(),
            window: ViewportWindow {
                start: 0,
                end: 0,
                end_view: 0,
                block_size,
                size,
            },
            cache: LayoutCache::empty(),
            cursor: DocOffset::ZERO,
            selection: Selection::default(),
            ideal_x: None,
            cursor_line: None,
            options,
        }
    }

    /// Replace the document wholesale and reset cursor, selection and window.
    pub fn load_text(&mut self, text: &str) -> ViewResult<()> {
        self.doc.replace_all(text);
        self.put_cursor(0)?;
        self.selection = Selection::default();
        self.reset_motion_caches();
        debug!(target: "view.window", len = self.doc.len(), "load_text");
        self.change_view(0)
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn window(&self) -> &ViewportWindow {
        &self.window
    }

    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Logical document length (includes in-flight overlay edits).
    pub fn len(&self) -> usize {
        self.doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn has_overlay(&self) -> bool {
        self.doc.has_overlay()
    }

    /// The authoritative buffer as it stands (not including overlay edits).
    pub fn buffer_text(&self) -> String {
        self.doc.buffer().to_string()
    }

    /// Whole document; folds any overlay into the buffer first.
    pub fn get_full_text(&mut self) -> ViewResult<String> {
        Ok(self.doc.full_text()?)
    }

    /// Selected text, read through the overlay without merging.
    pub fn get_selection(&self) -> ViewResult<String> {
        Ok(self.doc.slice(self.selection.begin..self.selection.end)?)
    }

    /// Place the cursor at a checked offset, clearing the selection.
    pub fn set_cursor(&mut self, offset: usize) -> ViewResult<()> {
        self.cursor = self.checked_offset(offset)?;
        self.selection = Selection::new(offset, offset);
        self.reset_motion_caches();
        self.reveal(offset)?;
        Ok(())
    }

    /// Select `[a, b)` (either order) and put the cursor at the far end.
    pub fn select_range(&mut self, a: usize, b: usize) -> ViewResult<()> {
        let a = self.checked_offset(a)?;
        let b = self.checked_offset(b)?;
        self.selection = Selection::new(a.get(), b.get());
        self.cursor = b;
        self.reset_motion_caches();
        self.reveal(b.get())?;
        Ok(())
    }

    /// Caller-supplied offsets: out of range is the caller's error.
    fn checked_offset(&self, offset: usize) -> ViewResult<DocOffset> {
        let len = self.doc.len();
        DocOffset::new(offset, len).map_err(|_| ViewError::OffsetOutOfRange { offset, len })
    }

    /// Offsets computed internally: out of range is an invariant violation.
    fn put_cursor(&mut self, offset: usize) -> ViewResult<()> {
        let len = self.doc.len();
        self.cursor = DocOffset::new(offset, len).map_err(|_| {
            invariant("cursor", format!("offset {offset} past document length {len}"))
        })?;
        Ok(())
    }

    fn reset_motion_caches(&mut self) {
        self.ideal_x = None;
        self.cursor_line = None;
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
        self.cursor_line = None;
    }

    /// Shape the window if the cache is cold and derive `end_view`.
    fn ensure_layout(&mut self) -> ViewResult<()> {
        if self.cache.is_valid() {
            return Ok(());
        }
        let text = self.doc.slice(self.window.start..self.window.end)?;
        let layout = self.engine.layout(&text, self.window.size)?;
        self.window.end_view = window::derive_end_view(&self.window, &layout)?;
        self.cache.store(text, layout);
        Ok(())
    }

    fn layout(&self) -> ViewResult<&E::Layout> {
        self.cache
            .get()
            .map(|(_, l)| l)
            .ok_or_else(|| invariant("layout", "layout used before shaping".to_string()))
    }

    /// Absolute start of the visual line holding the cursor.
    pub fn cursor_line(&mut self) -> ViewResult<usize> {
        if let Some(line) = self.cursor_line {
            return Ok(line);
        }
        self.reveal(self.cursor.get())?;
        self.ensure_layout()?;
        let rel = self.cursor.get() - self.window.start;
        let layout = self.layout()?;
        let pos = layout.hit_test_position(rel)?;
        let hit = layout.hit_test_point(0.0, pos.y + pos.height / 2.0)?;
        let line = self.window.start + hit.offset;
        self.cursor_line = Some(line);
        Ok(line)
    }
}
