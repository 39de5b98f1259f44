//! Rope-backed document text addressed by `char` offsets.
//!
//! Every offset handled by the editor core counts Unicode scalar values, not
//! bytes. The rope keeps insert/remove cheap for large documents; the view
//! layer only ever asks for bounded slices of it.

use ropey::Rope;
use std::ops::Range;
use thiserror::Error;
use tracing::trace;

pub mod width;

pub use width::egc_width;

/// Offset and range failures raised by the text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("offset {offset} is past the end of a {len} char document")]
    OffsetOutOfRange { offset: usize, len: usize },
    #[error("range {start}..{end} is not valid for a {len} char document")]
    InvalidRange { start: usize, end: usize, len: usize },
}

pub type TextResult<T> = Result<T, TextError>;

/// A char offset that was checked against a document length when created.
///
/// `DocOffset::new` rejects values past the end instead of clamping them, so
/// a `DocOffset` in hand always addressed a valid caret position at the time
/// it was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocOffset(usize);

impl DocOffset {
    pub const ZERO: DocOffset = DocOffset(0);

    pub fn new(raw: usize, len: usize) -> TextResult<Self> {
        if raw > len {
            return Err(TextError::OffsetOutOfRange { offset: raw, len });
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl From<DocOffset> for usize {
    fn from(value: DocOffset) -> Self {
        value.0
    }
}

fn check_range(range: &Range<usize>, len: usize) -> TextResult<()> {
    if range.start > range.end || range.end > len {
        return Err(TextError::InvalidRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

/// The authoritative document text.
#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl std::fmt::Debug for TextBuffer {
    // Content stays out of debug output; only the shape is useful in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBuffer")
            .field("chars", &self.rope.len_chars())
            .field("lines", &self.rope.len_lines())
            .finish()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of hard lines (a trailing newline opens an empty last line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.rope.get_char(idx)
    }

    /// Copy out `[range.start, range.end)`.
    pub fn slice(&self, range: Range<usize>) -> TextResult<String> {
        check_range(&range, self.len())?;
        Ok(self.rope.slice(range).to_string())
    }

    pub fn insert(&mut self, at: usize, text: &str) -> TextResult<()> {
        let len = self.len();
        if at > len {
            return Err(TextError::OffsetOutOfRange { offset: at, len });
        }
        self.rope.insert(at, text);
        trace!(target: "text.buffer", at, len_after = self.rope.len_chars(), "insert");
        Ok(())
    }

    /// Remove `[range.start, range.end)` returning the removed text.
    pub fn remove(&mut self, range: Range<usize>) -> TextResult<String> {
        check_range(&range, self.len())?;
        if range.is_empty() {
            return Ok(String::new());
        }
        let removed = self.rope.slice(range.clone()).to_string();
        self.rope.remove(range.clone());
        trace!(target: "text.buffer", start = range.start, end = range.end, "remove");
        Ok(removed)
    }

    /// Replace `[range.start, range.end)` with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> TextResult<()> {
        check_range(&range, self.len())?;
        if !range.is_empty() {
            self.rope.remove(range.clone());
        }
        self.rope.insert(range.start, text);
        trace!(
            target: "text.buffer",
            start = range.start,
            end = range.end,
            inserted = text.chars().count(),
            "replace"
        );
        Ok(())
    }

    /// Start of the hard line containing the caret position `offset`: one past
    /// the last `\n` strictly before `offset`, or 0.
    pub fn line_start_at(&self, offset: usize) -> TextResult<usize> {
        let len = self.len();
        if offset > len {
            return Err(TextError::OffsetOutOfRange { offset, len });
        }
        let mut pos = offset;
        let mut chars = self.rope.chars_at(offset);
        while let Some(c) = chars.prev() {
            pos -= 1;
            if c == '\n' {
                return Ok(pos + 1);
            }
        }
        Ok(0)
    }

    /// Start of the hard line holding the char just before `offset`.
    ///
    /// When `offset` is itself a line start this is the start of the previous
    /// hard line, which is what backward scrolling needs.
    pub fn find_previous_nl_start(&self, offset: usize) -> TextResult<usize> {
        let len = self.len();
        if offset > len {
            return Err(TextError::OffsetOutOfRange { offset, len });
        }
        if offset == 0 {
            return Ok(0);
        }
        self.line_start_at(offset - 1)
    }
}

impl std::fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

/// Word classification used by double-click selection.
pub mod word {
    /// Code points below this value count as separators under the legacy rule.
    pub const LEGACY_WORD_THRESHOLD: u32 = 0x30;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum WordClassifier {
        /// Everything at or above `LEGACY_WORD_THRESHOLD` is a word char.
        /// Crude (letters and most punctuation above '0' all qualify) but it is
        /// the behavior existing users expect from double-click.
        #[default]
        Threshold,
        /// Alphanumeric or underscore.
        Unicode,
    }

    impl WordClassifier {
        pub fn is_word(self, c: char) -> bool {
            match self {
                WordClassifier::Threshold => (c as u32) >= LEGACY_WORD_THRESHOLD,
                WordClassifier::Unicode => c == '_' || c.is_alphanumeric(),
            }
        }
    }
}

/// Grapheme cluster walking with char (not byte) bookkeeping.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// A cluster and its position in chars.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharCluster<'a> {
        pub text: &'a str,
        pub start: usize,
        pub len: usize,
    }

    /// Iterate extended grapheme clusters, yielding char offsets.
    ///
    /// `\r\n` is one cluster here; the loader strips `\r` so in practice
    /// newlines arrive alone.
    pub fn clusters(text: &str) -> impl Iterator<Item = CharCluster<'_>> {
        let mut start = 0usize;
        text.graphemes(true).map(move |g| {
            let len = g.chars().count();
            let cluster = CharCluster {
                text: g,
                start,
                len,
            };
            start += len;
            cluster
        })
    }

    pub fn is_newline(g: &str) -> bool {
        g == "\n" || g == "\r\n" || g == "\r"
    }

    pub fn is_whitespace(g: &str) -> bool {
        !g.is_empty() && g.chars().all(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::word::WordClassifier;
    use super::*;

    #[test]
    fn create_buffer_and_read_slices() {
        let b = TextBuffer::from_text("hello\nworld");
        assert_eq!(b.len(), 11);
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.slice(0..5).unwrap(), "hello");
        assert_eq!(b.slice(6..11).unwrap(), "world");
        assert_eq!(b.char_at(5), Some('\n'));
        assert_eq!(b.char_at(11), None);
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let b = TextBuffer::from_text("añb😀c");
        assert_eq!(b.len(), 5);
        assert_eq!(b.slice(1..4).unwrap(), "ñb😀");
    }

    #[test]
    fn insert_remove_replace() {
        let mut b = TextBuffer::from_text("abcd");
        b.insert(2, "XY").unwrap();
        assert_eq!(b.to_string(), "abXYcd");
        assert_eq!(b.remove(1..3).unwrap(), "bX");
        assert_eq!(b.to_string(), "aYcd");
        b.replace(1..2, "123").unwrap();
        assert_eq!(b.to_string(), "a123cd");
        b.replace(0..6, "").unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn out_of_range_is_rejected_not_clamped() {
        let mut b = TextBuffer::from_text("abc");
        assert_eq!(
            b.insert(4, "x"),
            Err(TextError::OffsetOutOfRange { offset: 4, len: 3 })
        );
        assert!(matches!(b.slice(2..5), Err(TextError::InvalidRange { .. })));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = b.remove(2..1);
        assert!(reversed.is_err());
        assert_eq!(b.to_string(), "abc");
    }

    #[test]
    fn doc_offset_checks_length() {
        assert_eq!(DocOffset::new(3, 3).unwrap().get(), 3);
        assert!(DocOffset::new(4, 3).is_err());
        assert_eq!(usize::from(DocOffset::ZERO), 0);
    }

    #[test]
    fn line_start_at_positions() {
        let b = TextBuffer::from_text("ab\ncd\n\nef");
        assert_eq!(b.line_start_at(0).unwrap(), 0);
        assert_eq!(b.line_start_at(2).unwrap(), 0);
        assert_eq!(b.line_start_at(3).unwrap(), 3);
        assert_eq!(b.line_start_at(5).unwrap(), 3);
        assert_eq!(b.line_start_at(6).unwrap(), 6);
        assert_eq!(b.line_start_at(9).unwrap(), 7);
        assert!(b.line_start_at(10).is_err());
    }

    #[test]
    fn previous_nl_start_steps_back_one_line_from_line_start() {
        let b = TextBuffer::from_text("ab\ncd");
        // From the start of "cd" the preceding line is "ab\n".
        assert_eq!(b.find_previous_nl_start(3).unwrap(), 0);
        // From inside "cd" the containing line start is returned.
        assert_eq!(b.find_previous_nl_start(5).unwrap(), 3);
        assert_eq!(b.find_previous_nl_start(0).unwrap(), 0);
        assert_eq!(b.find_previous_nl_start(1).unwrap(), 0);
    }

    #[test]
    fn legacy_word_threshold() {
        let c = WordClassifier::Threshold;
        assert!(c.is_word('h'));
        assert!(c.is_word('0'));
        // Quirk of the threshold rule: ':' and '_' are word chars.
        assert!(c.is_word(':'));
        assert!(c.is_word('_'));
        assert!(!c.is_word(','));
        assert!(!c.is_word(' '));
        assert!(!c.is_word('\n'));
    }

    #[test]
    fn unicode_word_rule() {
        let c = WordClassifier::Unicode;
        assert!(c.is_word('é'));
        assert!(c.is_word('_'));
        assert!(!c.is_word(':'));
        assert!(!c.is_word(','));
    }

    #[test]
    fn clusters_track_char_offsets() {
        let s = "ae\u{0301}😀\n";
        let got: Vec<_> = grapheme::clusters(s).map(|c| (c.start, c.len)).collect();
        assert_eq!(got, vec![(0, 1), (1, 2), (3, 1), (4, 1)]);
        assert!(grapheme::is_newline("\n"));
        assert!(grapheme::is_whitespace("\t"));
        assert!(!grapheme::is_whitespace("a"));
    }
}
