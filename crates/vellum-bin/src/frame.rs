//! Screen layout for the terminal host.
//!
//! ```text
//! +---------------------------+-+
//! | text box                  |#|  <- scrollbar column
//! |                           | |
//! +---------------------------+-+
//! | status line                 |
//! +-----------------------------+
//! ```

use anyhow::Result;
use core_actions::Scrollbar;
use core_input::CellMetrics;
use core_layout::{LayoutEngine, Rect};
use core_model::TextView;
use core_render::{Color, DrawMode, DrawStyle, Surface};
use core_terminal::TerminalSurface;

const STATUS_ROWS: u16 = 1;
const SCROLLBAR_COLUMNS: u16 = 1;

pub const STATUS_FG: Color = Color::rgb(0x1e, 0x1e, 0x1e);
pub const STATUS_BG: Color = Color::rgb(0xa0, 0xa0, 0xa0);

/// Text box size in cells for a `columns x rows` terminal.
pub fn text_area(columns: u16, rows: u16) -> (u16, u16) {
    (
        columns.saturating_sub(SCROLLBAR_COLUMNS),
        rows.saturating_sub(STATUS_ROWS),
    )
}

/// Scrollbar track in text box pixels; `None` when the grid has no room.
pub fn scrollbar(metrics: CellMetrics, columns: u16, rows: u16) -> Option<Scrollbar> {
    let (text_cols, text_rows) = text_area(columns, rows);
    if text_cols == 0 || text_rows == 0 {
        return None;
    }
    let (x, height) = metrics.box_size(text_cols, text_rows);
    Some(Scrollbar { x, height })
}

/// Thumb rows `[top, bottom)` for a window showing `[start, end)` of `len`
/// chars on a `track` row track. At least one row tall.
pub fn thumb_rows(start: usize, end: usize, len: usize, track: u16) -> (u16, u16) {
    if track == 0 {
        return (0, 0);
    }
    if len == 0 {
        return (0, track);
    }
    let track_len = track as usize;
    let top = (start * track_len / len).min(track_len - 1);
    let bottom = end.min(len).saturating_mul(track_len).div_ceil(len);
    let bottom = bottom.clamp(top + 1, track_len);
    (top as u16, bottom as u16)
}

/// Paint one frame into `surface`: text box, scrollbar, status line.
pub fn compose<E: LayoutEngine>(
    surface: &mut TerminalSurface,
    view: &mut TextView<E>,
    metrics: CellMetrics,
    style: &DrawStyle,
    mode: DrawMode,
    status: &str,
) -> Result<()> {
    let (columns, rows) = surface.size();
    let (text_cols, text_rows) = text_area(columns, rows);
    surface.begin_frame();
    if text_cols > 0 && text_rows > 0 {
        view.draw(surface, style, mode)?;
        let window = *view.window();
        let (top, bottom) = thumb_rows(window.start, window.end_view, view.len(), text_rows);
        let x = text_cols as f32 * metrics.cell_width;
        let lh = metrics.line_height;
        let track = Rect::new(x, 0.0, metrics.cell_width, text_rows as f32 * lh);
        surface.fill_rect(track, style.active_line);
        let thumb = Rect::new(x, top as f32 * lh, metrics.cell_width, (bottom - top) as f32 * lh);
        surface.fill_rect(thumb, style.marks);
        tracing::trace!(target: "view.draw", top, bottom, "frame_composed");
    }
    if rows > 0 {
        surface.print_row(rows - STATUS_ROWS, status, STATUS_FG, STATUS_BG);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_area_leaves_status_and_scrollbar() {
        assert_eq!(text_area(80, 24), (79, 23));
        assert_eq!(text_area(0, 0), (0, 0));
        let bar = scrollbar(CellMetrics::new(8.0, 16.0), 80, 24).unwrap();
        assert_eq!(bar, Scrollbar { x: 632.0, height: 368.0 });
        assert!(scrollbar(CellMetrics::new(8.0, 16.0), 1, 24).is_none());
    }

    #[test]
    fn thumb_tracks_window() {
        assert_eq!(thumb_rows(0, 0, 0, 10), (0, 10));
        assert_eq!(thumb_rows(0, 100, 100, 10), (0, 10));
        assert_eq!(thumb_rows(0, 10, 100, 10), (0, 1));
        assert_eq!(thumb_rows(50, 60, 100, 10), (5, 6));
        // Tiny windows still get one row.
        assert_eq!(thumb_rows(50, 51, 1000, 10), (0, 1));
        assert_eq!(thumb_rows(999, 1000, 1000, 10), (9, 10));
        assert_eq!(thumb_rows(0, 5, 10, 0), (0, 0));
    }
}
