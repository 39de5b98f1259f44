use crate::{TextView, ViewResult};
use core_layout::{LayoutEngine, Rect, TextLayout};
use core_render::{DrawMode, DrawStyle, Point, Surface};
use tracing::trace;

impl<E: LayoutEngine> TextView<E> {
    /// Paint the window: active line, selection, text, marks, caret.
    pub fn draw(&mut self, surface: &mut dyn Surface, style: &DrawStyle, mode: DrawMode) -> ViewResult<()> {
        self.ensure_layout()?;
        let start = self.window.start;
        let box_width = self.window.size.width;
        let caret_visible = self.cursor.get() >= start && self.cursor.get() <= self.window.end_view;
        let (text, layout) = self
            .cache
            .get()
            .ok_or_else(|| crate::invariant("draw", "layout missing after shaping".to_string()))?;

        let caret = if caret_visible {
            Some(layout.hit_test_position(self.cursor.get() - start)?)
        } else {
            None
        };
        if let Some(pos) = caret {
            surface.fill_rect(Rect::new(0.0, pos.y, box_width, pos.height), style.active_line);
        }

        let sel = self.selection;
        if !sel.is_empty() {
            let lo = sel.begin.max(start);
            let hi = sel.end.min(self.window.end);
            if lo < hi {
                for r in layout.hit_test_range(lo - start, hi - start)? {
                    surface.fill_rect(r, style.selection);
                }
            }
        }

        surface.draw_text_layout(Point::ORIGIN, layout, text, style.text);

        if mode == DrawMode::ShowMarks {
            let mut offset = 0usize;
            for cluster in layout.cluster_metrics() {
                if cluster.is_newline || cluster.is_whitespace {
                    let p = layout.hit_test_position(offset)?;
                    let mark = if cluster.is_newline {
                        Rect::new(p.x + 1.0, p.y + 2.0, 3.0, (p.height - 4.0).max(1.0))
                    } else {
                        let cx = p.x + cluster.width / 2.0;
                        let cy = p.y + p.height / 2.0;
                        Rect::new(cx - 1.0, cy - 1.0, 2.0, 2.0)
                    };
                    surface.fill_rect(mark, style.marks);
                }
                offset += cluster.length;
            }
        }

        if let Some(pos) = caret {
            surface.stroke_rect(
                Rect::new(pos.x, pos.y, style.caret_width, pos.height),
                style.caret,
            );
        }
        trace!(target: "view.draw", start, caret_visible, mode = ?mode, "draw");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::view;
    use core_render::{DrawCommand, DrawMode, DrawStyle, RecordingSurface};

    #[test]
    fn draws_active_line_text_and_caret() {
        let mut v = view("abc\ndef", 200.0, 100.0);
        v.set_cursor(5).unwrap();
        let style = DrawStyle::default();
        let mut s = RecordingSurface::new();
        v.draw(&mut s, &style, DrawMode::Normal).unwrap();

        let active = s.fills_with(style.active_line);
        assert_eq!(active.len(), 1);
        assert_eq!((active[0].y, active[0].width), (20.0, 200.0));
        let caret = s.strokes_with(style.caret);
        assert_eq!(caret.len(), 1);
        assert_eq!((caret[0].x, caret[0].y, caret[0].width), (10.0, 20.0, 2.0));
        assert!(s.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, lines: 2, .. } if text == "abc\ndef"
        )));
    }

    #[test]
    fn selection_rects_follow_lines() {
        let mut v = view("abc\ndef", 200.0, 100.0);
        v.select_range(1, 6).unwrap();
        let style = DrawStyle::default();
        let mut s = RecordingSurface::new();
        v.draw(&mut s, &style, DrawMode::Normal).unwrap();
        let sel = s.fills_with(style.selection);
        assert_eq!(sel.len(), 2);
        assert_eq!((sel[0].x, sel[0].width), (10.0, 20.0));
        assert_eq!((sel[1].y, sel[1].width), (20.0, 20.0));
    }

    #[test]
    fn show_marks_adds_whitespace_and_newline_markers() {
        let mut v = view("a b\nc", 200.0, 100.0);
        let style = DrawStyle::default();
        let mut s = RecordingSurface::new();
        v.draw(&mut s, &style, DrawMode::ShowMarks).unwrap();
        assert_eq!(s.fills_with(style.marks).len(), 2);
        s.clear();
        v.draw(&mut s, &style, DrawMode::Normal).unwrap();
        assert!(s.fills_with(style.marks).is_empty());
    }

    #[test]
    fn caret_outside_view_is_not_drawn() {
        let text: String = (0..10).map(|i| format!("{i}\n")).collect();
        let mut v = view(&text, 100.0, 60.0);
        v.v_scroll(4).unwrap();
        let style = DrawStyle::default();
        let mut s = RecordingSurface::new();
        v.draw(&mut s, &style, DrawMode::Normal).unwrap();
        assert!(s.strokes_with(style.caret).is_empty());
        assert!(s.fills_with(style.active_line).is_empty());
    }
}
