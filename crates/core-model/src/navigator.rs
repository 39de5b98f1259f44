//! Cursor and selection movement.
//!
//! Horizontal moves are offset arithmetic; vertical moves and pointer
//! gestures ask the layout for pixel positions. `ideal_x` keeps the column
//! sticky across vertical moves through shorter lines and is dropped by any
//! horizontal move, click or edit.

use crate::{Selection, TextView, ViewResult};
use core_layout::{LayoutEngine, TextLayout};
use tracing::trace;

impl<E: LayoutEngine> TextView<E> {
    pub fn move_left(&mut self) -> ViewResult<bool> {
        if !self.selection.is_empty() {
            self.put_cursor(self.selection.begin)?;
            self.selection.clear();
            self.reset_motion_caches();
            self.reveal(self.cursor.get())?;
            return Ok(true);
        }
        if self.cursor.get() == 0 {
            return Ok(false);
        }
        let target = self.cursor.get() - 1;
        self.reveal(target)?;
        self.put_cursor(target)?;
        self.selection = Selection::new(target, target);
        self.reset_motion_caches();
        trace!(target: "view.nav", cursor = self.cursor.get(), "move_left");
        Ok(true)
    }

    pub fn move_right(&mut self) -> ViewResult<bool> {
        if !self.selection.is_empty() {
            self.put_cursor(self.selection.end)?;
            self.selection = Selection::new(self.cursor.get(), self.cursor.get());
            self.reset_motion_caches();
            self.reveal(self.cursor.get())?;
            return Ok(true);
        }
        if self.cursor.get() >= self.doc.len() {
            return Ok(false);
        }
        let target = self.cursor.get() + 1;
        self.reveal(target)?;
        self.put_cursor(target)?;
        self.selection = Selection::new(target, target);
        self.reset_motion_caches();
        trace!(target: "view.nav", cursor = self.cursor.get(), "move_right");
        Ok(true)
    }

    pub fn move_up(&mut self) -> ViewResult<bool> {
        self.vertical_move(false)
    }

    pub fn move_down(&mut self) -> ViewResult<bool> {
        self.vertical_move(true)
    }

    fn vertical_move(&mut self, down: bool) -> ViewResult<bool> {
        self.selection = Selection::new(self.cursor.get(), self.cursor.get());
        self.reveal(self.cursor.get())?;
        // One retry after re-windowing when the window has no line to move to.
        for _ in 0..2 {
            self.ensure_layout()?;
            let start = self.window.start;
            let layout = self.layout()?;
            let pos = layout.hit_test_position(self.cursor.get() - start)?;
            let x = self.ideal_x.unwrap_or(pos.x);
            let y = if down {
                pos.y + pos.height * 1.5
            } else {
                pos.y - pos.height * 0.5
            };

            if down && y >= layout.metrics().height {
                if self.window.end >= self.doc.len() {
                    self.ideal_x = Some(x);
                    return Ok(false);
                }
                self.v_scroll(1)?;
                self.reveal(self.cursor.get())?;
                continue;
            }
            if !down && y < 0.0 {
                if start == 0 {
                    let moved = self.cursor.get() != 0;
                    self.put_cursor(0)?;
                    self.selection = Selection::new(0, 0);
                    self.reset_motion_caches();
                    return Ok(moved);
                }
                // The line above becomes the top row; it may not reach the caret.
                self.v_scroll(-1)?;
                self.ensure_layout()?;
                let start = self.window.start;
                let layout = self.layout()?;
                let row = layout.line_metrics().first().map_or(0.0, |l| l.height / 2.0);
                let hit = layout.hit_test_point(x, row)?;
                return self.land_vertical(down, x, start + hit.caret_offset());
            }

            let hit = layout.hit_test_point(x, y)?;
            return self.land_vertical(down, x, start + hit.caret_offset());
        }
        Ok(false)
    }

    fn land_vertical(&mut self, down: bool, x: f32, target: usize) -> ViewResult<bool> {
        let before = self.cursor.get();
        self.ideal_x = Some(x);
        self.cursor_line = None;
        self.put_cursor(target)?;
        self.selection = Selection::new(target, target);
        self.reveal(target)?;
        trace!(target: "view.nav", down, from = before, to = target, "vertical_move");
        Ok(target != before)
    }

    fn offset_at(&mut self, x: f32, y: f32) -> ViewResult<usize> {
        self.ensure_layout()?;
        let hit = self.layout()?.hit_test_point(x, y)?;
        Ok(self.window.start + hit.caret_offset())
    }

    /// Click: place the cursor under the point and drop the selection.
    pub fn move_cursor_to(&mut self, x: f32, y: f32) -> ViewResult<()> {
        let target = self.offset_at(x, y)?;
        self.put_cursor(target)?;
        self.selection = Selection::new(target, target);
        self.reset_motion_caches();
        trace!(target: "view.nav", x, y, cursor = target, "move_cursor_to");
        Ok(())
    }

    /// Drag: extend the selection to the point.
    pub fn change_selection(&mut self, x: f32, y: f32) -> ViewResult<()> {
        let target = self.offset_at(x, y)?;
        self.extend_selection_to(target)
    }

    /// Selection extension shared by drag and Shift+arrows.
    ///
    /// An empty selection anchors at the current cursor. Past either end the
    /// nearer boundary follows the target. Inside the selection the boundary
    /// the cursor was sitting on follows; if the cursor was on neither, a move
    /// to the left pulls `end` in and a move to the right pushes `begin` up.
    pub(crate) fn extend_selection_to(&mut self, target: usize) -> ViewResult<()> {
        let prev = self.cursor.get();
        self.put_cursor(target)?;
        let sel = &mut self.selection;
        if sel.is_empty() {
            *sel = Selection::new(prev, target);
        } else if target < sel.begin {
            sel.begin = target;
        } else if target > sel.end {
            sel.end = target;
        } else if prev == sel.end {
            sel.end = target;
        } else if prev == sel.begin {
            sel.begin = target;
        } else if target < prev {
            sel.end = target;
        } else {
            sel.begin = target;
        }
        self.reset_motion_caches();
        trace!(
            target: "view.nav",
            begin = self.selection.begin,
            end = self.selection.end,
            cursor = target,
            "extend_selection"
        );
        Ok(())
    }

    /// Shift+Left / Shift+Right.
    pub fn extend_left(&mut self) -> ViewResult<bool> {
        if self.cursor.get() == 0 {
            return Ok(false);
        }
        let target = self.cursor.get() - 1;
        self.reveal(target)?;
        self.extend_selection_to(target)?;
        Ok(true)
    }

    pub fn extend_right(&mut self) -> ViewResult<bool> {
        if self.cursor.get() >= self.doc.len() {
            return Ok(false);
        }
        let target = self.cursor.get() + 1;
        self.reveal(target)?;
        self.extend_selection_to(target)?;
        Ok(true)
    }

    /// Double click: select the word under the cursor, or the single
    /// separator char there.
    pub fn select_word(&mut self) -> ViewResult<bool> {
        let len = self.doc.len();
        let Some(c) = self.doc.char_at(self.cursor.get()) else {
            return Ok(false);
        };
        let classifier = self.options.word_classifier;
        let (begin, end) = if !classifier.is_word(c) {
            (self.cursor.get(), self.cursor.get() + 1)
        } else {
            let mut b = self.cursor.get();
            while b > 0 && self.doc.char_at(b - 1).is_some_and(|c| classifier.is_word(c)) {
                b -= 1;
            }
            let mut e = self.cursor.get();
            while e < len && self.doc.char_at(e).is_some_and(|c| classifier.is_word(c)) {
                e += 1;
            }
            (b, e)
        };
        self.selection = Selection { begin, end };
        self.put_cursor(end)?;
        self.reset_motion_caches();
        self.reveal(end)?;
        trace!(target: "view.nav", begin, end, "select_word");
        Ok(true)
    }

    /// Home / End: visual line bounds.
    pub fn move_line_start(&mut self) -> ViewResult<bool> {
        self.move_on_cursor_row(0.0)
    }

    pub fn move_line_end(&mut self) -> ViewResult<bool> {
        self.move_on_cursor_row(f32::MAX)
    }

    fn move_on_cursor_row(&mut self, x: f32) -> ViewResult<bool> {
        self.reveal(self.cursor.get())?;
        self.ensure_layout()?;
        let start = self.window.start;
        let layout = self.layout()?;
        let pos = layout.hit_test_position(self.cursor.get() - start)?;
        let hit = layout.hit_test_point(x, pos.y + pos.height / 2.0)?;
        let target = start + hit.caret_offset();
        let moved = target != self.cursor.get();
        self.put_cursor(target)?;
        self.selection = Selection::new(target, target);
        self.reset_motion_caches();
        Ok(moved)
    }

    /// Ctrl+Home / Ctrl+End.
    pub fn move_doc_start(&mut self) -> ViewResult<bool> {
        self.jump_to(0)
    }

    pub fn move_doc_end(&mut self) -> ViewResult<bool> {
        self.jump_to(self.doc.len())
    }

    fn jump_to(&mut self, target: usize) -> ViewResult<bool> {
        let moved = target != self.cursor.get();
        self.put_cursor(target)?;
        self.selection = Selection::new(target, target);
        self.reset_motion_caches();
        self.scroll_to_offset(target)?;
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::view;
    use crate::{Selection, ViewOptions};
    use core_layout::{BoxSize, MonospaceEngine};
    use core_text::word::WordClassifier;

    #[test]
    fn left_right_respect_document_bounds() {
        let mut v = view("ab", 100.0, 100.0);
        assert!(!v.move_left().unwrap());
        assert_eq!(v.cursor(), 0);
        assert!(v.move_right().unwrap());
        assert!(v.move_right().unwrap());
        assert!(!v.move_right().unwrap());
        assert_eq!(v.cursor(), 2);
    }

    #[test]
    fn horizontal_moves_collapse_selection() {
        let mut v = view("hello world", 200.0, 100.0);
        v.select_range(2, 7).unwrap();
        assert!(v.move_left().unwrap());
        assert_eq!(v.cursor(), 2);
        assert!(v.selection().is_empty());
        v.select_range(2, 7).unwrap();
        assert!(v.move_right().unwrap());
        assert_eq!(v.cursor(), 7);
        assert!(v.selection().is_empty());
    }

    #[test]
    fn sticky_column_survives_short_line() {
        let mut v = view("aaaaaaaaaa\nbbb\ncccccccccc", 200.0, 200.0);
        v.set_cursor(8).unwrap();
        assert!(v.move_down().unwrap());
        assert_eq!(v.cursor(), 14, "clamped to the end of the short line");
        assert!(v.move_down().unwrap());
        assert_eq!(v.cursor(), 15 + 8);
        assert!(v.move_up().unwrap());
        assert!(v.move_up().unwrap());
        assert_eq!(v.cursor(), 8);
    }

    #[test]
    fn up_on_first_line_goes_to_document_start() {
        let mut v = view("abc\ndef", 200.0, 200.0);
        v.set_cursor(2).unwrap();
        assert!(v.move_up().unwrap());
        assert_eq!(v.cursor(), 0);
        assert!(!v.move_up().unwrap());
    }

    #[test]
    fn down_on_last_line_is_a_no_op() {
        let mut v = view("abc\ndef", 200.0, 200.0);
        v.set_cursor(5).unwrap();
        assert!(!v.move_down().unwrap());
        assert_eq!(v.cursor(), 5);
    }

    #[test]
    fn down_past_box_scrolls_forward() {
        let text: String = (0..10).map(|i| format!("{i}\n")).collect();
        let mut v = view(&text, 100.0, 60.0);
        v.set_cursor(4).unwrap(); // third row, last visible
        assert!(v.move_down().unwrap());
        assert_eq!(v.cursor(), 6);
        assert_eq!(v.window().start, 2);
    }

    #[test]
    fn up_above_window_scrolls_back() {
        let text: String = (0..10).map(|i| format!("{i}\n")).collect();
        let mut v = view(&text, 100.0, 60.0);
        v.change_view(6).unwrap();
        v.set_cursor(6).unwrap();
        assert!(v.move_up().unwrap());
        assert_eq!(v.cursor(), 4);
        assert_eq!(v.window().start, 4);
    }

    #[test]
    fn up_into_line_longer_than_block_lands_on_its_top_row() {
        let text = format!("ab{}\ncd", " ".repeat(600));
        let mut v = view(&text, 100.0, 100.0);
        v.set_cursor(604).unwrap();
        assert_eq!(v.window().start, 603);
        assert!(v.move_up().unwrap());
        assert_eq!(v.cursor(), 1);
        assert_eq!(v.window().start, 0);
        assert!(v.is_visible(1).unwrap());
    }

    #[test]
    fn click_and_drag_build_ordered_selection() {
        let mut v = view("hello world", 200.0, 100.0);
        v.move_cursor_to(71.0, 5.0).unwrap(); // before 'o' of world
        assert_eq!(v.cursor(), 7);
        v.change_selection(21.0, 5.0).unwrap();
        assert_eq!(v.selection(), Selection { begin: 2, end: 7 });
        // Drag back right inside the selection: the moving boundary follows.
        v.change_selection(41.0, 5.0).unwrap();
        assert_eq!(v.selection(), Selection { begin: 4, end: 7 });
        // Past the far end.
        v.change_selection(101.0, 5.0).unwrap();
        assert_eq!(v.selection(), Selection { begin: 4, end: 10 });
        assert_eq!(v.cursor(), 10);
    }

    #[test]
    fn shift_arrows_extend_from_anchor() {
        let mut v = view("abcdef", 200.0, 100.0);
        v.set_cursor(3).unwrap();
        v.extend_right().unwrap();
        v.extend_right().unwrap();
        assert_eq!(v.selection(), Selection { begin: 3, end: 5 });
        v.extend_left().unwrap();
        assert_eq!(v.selection(), Selection { begin: 3, end: 4 });
        assert_eq!(v.cursor(), 4);
    }

    #[test]
    fn word_selection_threshold_rule() {
        let mut v = view("hello, world", 200.0, 100.0);
        v.set_cursor(4).unwrap();
        assert!(v.select_word().unwrap());
        assert_eq!(v.selection(), Selection { begin: 0, end: 5 });
        assert_eq!(v.cursor(), 5);
        v.set_cursor(5).unwrap();
        v.select_word().unwrap();
        assert_eq!(v.selection(), Selection { begin: 5, end: 6 });
        v.set_cursor(12).unwrap();
        assert!(!v.select_word().unwrap());
    }

    #[test]
    fn word_selection_unicode_rule() {
        let mut v = crate::TextView::new(
            MonospaceEngine::new(10.0, 20.0, 4),
            ViewOptions {
                word_classifier: WordClassifier::Unicode,
                ..ViewOptions::default()
            },
            BoxSize::new(200.0, 100.0),
        );
        v.load_text("a:b c").unwrap();
        v.set_cursor(0).unwrap();
        v.select_word().unwrap();
        assert_eq!(v.selection(), Selection { begin: 0, end: 1 });
    }

    #[test]
    fn home_end_follow_visual_line() {
        let mut v = view("hello world", 80.0, 100.0);
        v.set_cursor(8).unwrap();
        assert!(v.move_line_start().unwrap());
        assert_eq!(v.cursor(), 6);
        assert!(v.move_line_end().unwrap());
        assert_eq!(v.cursor(), 11);
    }

    #[test]
    fn ctrl_end_reveals_document_end() {
        let text: String = (0..50).map(|i| format!("{i}\n")).collect();
        let mut v = view(&text, 100.0, 60.0);
        assert!(v.move_doc_end().unwrap());
        assert_eq!(v.cursor(), text.chars().count());
        assert!(v.is_visible(v.cursor()).unwrap());
        assert!(v.move_doc_start().unwrap());
        assert_eq!(v.window().start, 0);
    }
}
