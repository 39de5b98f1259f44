//! Cell-grid `Surface` for terminals.
//!
//! The view paints in pixels; each cell is `cell_width x line_height`
//! pixels. Fills color the background of every cell they overlap. Fills
//! smaller than one cell in both directions cannot be drawn in a terminal, so
//! they become glyph marks in the cell holding their center: a flat dot
//! becomes `·`, a tall bar becomes `↵`. Strokes only place the caret; the
//! terminal cursor is shown there on present.
//!
//! Frames are double buffered. `present` rewrites only rows that differ from
//! the last presented frame.

use crate::TerminalCapabilities;
use anyhow::Result;
use core_layout::{Rect, TextLayout};
use core_render::{Color, Point, Surface};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::Write;
use unicode_width::UnicodeWidthChar;

/// One terminal cell. An empty `symbol` is the right half of a wide glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub symbol: String,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    fn blank(fg: Color, bg: Color) -> Self {
        Self {
            symbol: " ".to_string(),
            fg,
            bg,
        }
    }
}

pub struct TerminalSurface {
    columns: u16,
    rows: u16,
    cell_width: f32,
    line_height: f32,
    foreground: Color,
    background: Color,
    caps: TerminalCapabilities,
    back: Vec<Cell>,
    front: Vec<Cell>,
    caret: Option<(u16, u16)>,
}

impl TerminalSurface {
    pub fn new(
        columns: u16,
        rows: u16,
        cell_width: f32,
        line_height: f32,
        caps: TerminalCapabilities,
    ) -> Self {
        let foreground = Color::rgb(0xdc, 0xdc, 0xdc);
        let background = Color::rgb(0x1e, 0x1e, 0x1e);
        Self {
            columns,
            rows,
            cell_width,
            line_height,
            foreground,
            background,
            caps,
            back: vec![Cell::blank(foreground, background); columns as usize * rows as usize],
            front: Vec::new(),
            caret: None,
        }
    }

    pub fn set_colors(&mut self, foreground: Color, background: Color) {
        self.foreground = foreground;
        self.background = background;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    /// New grid size; the next present redraws everything.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        self.back = vec![
            Cell::blank(self.foreground, self.background);
            columns as usize * rows as usize
        ];
        self.front.clear();
        self.caret = None;
    }

    /// Blank the back buffer and forget the caret.
    pub fn begin_frame(&mut self) {
        let blank = Cell::blank(self.foreground, self.background);
        self.back.iter_mut().for_each(|c| c.clone_from(&blank));
        self.caret = None;
    }

    pub fn cell(&self, column: u16, row: u16) -> Option<&Cell> {
        self.index(column, row).map(|i| &self.back[i])
    }

    pub fn caret(&self) -> Option<(u16, u16)> {
        self.caret
    }

    /// Symbols of one row of the back buffer.
    pub fn row_text(&self, row: u16) -> String {
        if row >= self.rows {
            return String::new();
        }
        let start = row as usize * self.columns as usize;
        self.back[start..start + self.columns as usize]
            .iter()
            .map(|c| c.symbol.as_str())
            .collect()
    }

    /// Write `text` into `row` and pad the rest of the row with `bg`.
    pub fn print_row(&mut self, row: u16, text: &str, fg: Color, bg: Color) {
        let mut col = 0u16;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col + w > self.columns {
                break;
            }
            self.put(col, row, ch.to_string(), Some(fg), Some(bg));
            if w == 2 {
                self.put(col + 1, row, String::new(), Some(fg), Some(bg));
            }
            col += w;
        }
        while col < self.columns {
            self.put(col, row, " ".to_string(), Some(fg), Some(bg));
            col += 1;
        }
    }

    /// Flush changed rows to `out`. Returns how many rows were rewritten.
    pub fn present<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        let full = self.front.len() != self.back.len();
        let width = self.columns as usize;
        let mut redrawn = 0usize;
        queue!(out, Hide)?;
        for row in 0..self.rows {
            let range = row as usize * width..(row as usize + 1) * width;
            if !full && self.front[range.clone()] == self.back[range.clone()] {
                continue;
            }
            queue!(out, MoveTo(0, row))?;
            let mut fg = None;
            let mut bg = None;
            for cell in &self.back[range] {
                if cell.symbol.is_empty() {
                    continue;
                }
                if fg != Some(cell.fg) {
                    queue!(out, SetForegroundColor(self.term_color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    queue!(out, SetBackgroundColor(self.term_color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                queue!(out, Print(&cell.symbol))?;
            }
            redrawn += 1;
        }
        queue!(out, ResetColor)?;
        if let Some((c, r)) = self.caret {
            queue!(out, MoveTo(c, r), Show)?;
        }
        out.flush()?;
        self.front.clone_from(&self.back);
        Ok(redrawn)
    }

    fn term_color(&self, c: Color) -> TermColor {
        if self.caps.truecolor {
            TermColor::Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            }
        } else {
            TermColor::AnsiValue(ansi256(c))
        }
    }

    fn index(&self, column: u16, row: u16) -> Option<usize> {
        (column < self.columns && row < self.rows)
            .then(|| row as usize * self.columns as usize + column as usize)
    }

    fn put(&mut self, column: u16, row: u16, symbol: String, fg: Option<Color>, bg: Option<Color>) {
        let Some(i) = self.index(column, row) else {
            return;
        };
        let cell = &mut self.back[i];
        cell.symbol = symbol;
        if let Some(fg) = fg {
            cell.fg = fg;
        }
        if let Some(bg) = bg {
            cell.bg = bg;
        }
    }

    /// Cells `[a, b)` overlapped by `[lo, hi)` pixels along one axis.
    fn span(lo: f32, hi: f32, unit: f32, limit: u16) -> (u16, u16) {
        let a = (lo / unit).floor().clamp(0.0, limit as f32);
        let b = (hi / unit).ceil().clamp(0.0, limit as f32);
        (a as u16, b as u16)
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.cell_width).floor() as u16;
        let row = (y / self.line_height).floor() as u16;
        self.index(col, row).map(|_| (col, row))
    }
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.width < self.cell_width && rect.height < self.line_height {
            let cx = rect.x + rect.width / 2.0;
            let cy = rect.y + rect.height / 2.0;
            if let Some((col, row)) = self.cell_at(cx, cy) {
                let glyph = if rect.height >= self.line_height / 2.0 { "↵" } else { "·" };
                self.put(col, row, glyph.to_string(), Some(color), None);
            }
            return;
        }
        let (c0, c1) = Self::span(rect.x, rect.right(), self.cell_width, self.columns);
        let (r0, r1) = Self::span(rect.y, rect.bottom(), self.line_height, self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(i) = self.index(col, row) {
                    self.back[i].bg = color;
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color) {
        // A caret at the end of a full row sits on the box edge.
        let x = rect.x.min((self.columns.saturating_sub(1)) as f32 * self.cell_width);
        self.caret = self.cell_at(x + 0.01, rect.y + rect.height / 2.0);
    }

    fn draw_text_layout(&mut self, origin: Point, layout: &dyn TextLayout, text: &str, color: Color) {
        let chars: Vec<char> = text.chars().collect();
        let mut offset = 0usize;
        for cluster in layout.cluster_metrics() {
            let start = offset;
            offset += cluster.length;
            if cluster.is_newline || cluster.is_whitespace {
                continue;
            }
            let Ok(pos) = layout.hit_test_position(start) else {
                continue;
            };
            let x = ((origin.x + pos.x) / self.cell_width).round();
            let y = ((origin.y + pos.y) / self.line_height).round();
            if x < 0.0 || y < 0.0 {
                continue;
            }
            let (col, row) = (x as u16, y as u16);
            let symbol: String = chars
                .get(start..offset)
                .map(|s| s.iter().collect())
                .unwrap_or_default();
            let cells = (cluster.width / self.cell_width).round().max(1.0) as u16;
            self.put(col, row, symbol, Some(color), None);
            for extra in 1..cells {
                self.put(col + extra, row, String::new(), Some(color), None);
            }
        }
    }
}

/// Nearest entry of the xterm 6x6x6 color cube.
pub fn ansi256(c: Color) -> u8 {
    let q = |v: u8| -> u8 {
        if v < 48 {
            0
        } else if v < 115 {
            1
        } else {
            (v - 35) / 40
        }
    };
    16 + 36 * q(c.r) + 6 * q(c.g) + q(c.b)
}
