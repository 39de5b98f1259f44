//! Fixed-advance layout engine.
//!
//! Every grapheme cluster occupies `egc_width` cells of `cell_width` pixels
//! (tabs advance to the next tab stop). Lines wrap greedily at the box width:
//! the break goes after the last whitespace cluster on the line, trailing
//! whitespace is allowed to hang past the edge, and a line without any
//! whitespace is broken between clusters.

use crate::{
    BoxSize, ClusterMetrics, HitPoint, HitPosition, LayoutEngine, LayoutError, LineMetrics,
    TextLayout, TextMetrics,
};
use core_text::{egc_width, grapheme};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceEngine {
    pub cell_width: f32,
    pub line_height: f32,
    pub tab_width: usize,
}

impl Default for MonospaceEngine {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 16.0,
            tab_width: 4,
        }
    }
}

impl MonospaceEngine {
    pub fn new(cell_width: f32, line_height: f32, tab_width: usize) -> Self {
        Self {
            cell_width,
            line_height,
            tab_width: tab_width.max(1),
        }
    }
}

#[derive(Debug, Clone)]
struct Cluster {
    start: usize,
    len: usize,
    col: usize,
    cells: usize,
    line: usize,
    whitespace: bool,
    newline: bool,
    tab: bool,
}

#[derive(Debug, Clone)]
struct Line {
    start: usize,
    /// Cluster index range.
    first: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub struct MonoLayout {
    clusters: Vec<Cluster>,
    lines: Vec<Line>,
    line_metrics: Vec<LineMetrics>,
    text_len: usize,
    cell_width: f32,
    line_height: f32,
}

impl LayoutEngine for MonospaceEngine {
    type Layout = MonoLayout;

    fn layout(&mut self, text: &str, size: BoxSize) -> Result<MonoLayout, LayoutError> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(LayoutError::EmptyBox {
                width: size.width,
                height: size.height,
            });
        }
        if !(self.cell_width > 0.0 && self.line_height > 0.0) {
            return Err(LayoutError::Backend(format!(
                "invalid cell metrics {}x{}",
                self.cell_width, self.line_height
            )));
        }
        let max_cols = ((size.width / self.cell_width).floor() as usize).max(1);
        let layout = self.build(text, max_cols);
        trace!(
            target: "layout.mono",
            chars = layout.text_len,
            lines = layout.lines.len(),
            max_cols,
            "layout"
        );
        Ok(layout)
    }
}

impl MonospaceEngine {
    fn cells_at(&self, g: &str, col: usize) -> usize {
        if g == "\t" {
            self.tab_width - col % self.tab_width
        } else {
            usize::from(egc_width(g)).max(1)
        }
    }

    fn build(&self, text: &str, max_cols: usize) -> MonoLayout {
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut lines: Vec<Line> = Vec::new();
        let mut line_first = 0usize;
        let mut line_start = 0usize;
        let mut col = 0usize;
        // Cluster index a soft break may occur before.
        let mut break_at: Option<usize> = None;
        let mut text_len = 0usize;

        for c in grapheme::clusters(text) {
            text_len = c.start + c.len;
            let line = lines.len();
            if grapheme::is_newline(c.text) {
                clusters.push(Cluster {
                    start: c.start,
                    len: c.len,
                    col,
                    cells: 0,
                    line,
                    whitespace: true,
                    newline: true,
                    tab: false,
                });
                lines.push(Line {
                    start: line_start,
                    first: line_first,
                    end: clusters.len(),
                });
                line_first = clusters.len();
                line_start = c.start + c.len;
                col = 0;
                break_at = None;
                continue;
            }

            let whitespace = grapheme::is_whitespace(c.text);
            let mut cells = self.cells_at(c.text, col);
            if col + cells > max_cols && col > 0 && !whitespace {
                let split = match break_at {
                    Some(b) if b > line_first => b,
                    _ => clusters.len(),
                };
                lines.push(Line {
                    start: line_start,
                    first: line_first,
                    end: split,
                });
                line_first = split;
                line_start = clusters.get(split).map_or(c.start, |k| k.start);
                col = 0;
                break_at = None;
                // Carry the unbroken tail onto the new line.
                let new_line = lines.len();
                for k in &mut clusters[split..] {
                    let w = if k.tab {
                        self.tab_width - col % self.tab_width
                    } else {
                        k.cells
                    };
                    k.col = col;
                    k.cells = w;
                    k.line = new_line;
                    col += w;
                }
                cells = self.cells_at(c.text, col);
            }
            clusters.push(Cluster {
                start: c.start,
                len: c.len,
                col,
                cells,
                line: lines.len(),
                whitespace,
                newline: false,
                tab: c.text == "\t",
            });
            col += cells;
            if whitespace {
                break_at = Some(clusters.len());
            }
        }
        lines.push(Line {
            start: line_start,
            first: line_first,
            end: clusters.len(),
        });

        let line_metrics = lines
            .iter()
            .map(|l| {
                let span = &clusters[l.first..l.end];
                let length = span.iter().map(|k| k.len).sum();
                let newline_length = span
                    .last()
                    .filter(|k| k.newline)
                    .map_or(0, |k| k.len);
                LineMetrics {
                    length,
                    newline_length,
                    height: self.line_height,
                }
            })
            .collect();

        MonoLayout {
            clusters,
            lines,
            line_metrics,
            text_len,
            cell_width: self.cell_width,
            line_height: self.line_height,
        }
    }
}

impl MonoLayout {
    fn line_cols(&self, line: &Line) -> usize {
        self.clusters[line.first..line.end]
            .iter()
            .filter(|k| !k.newline)
            .map(|k| k.cells)
            .sum()
    }

    fn is_soft_wrapped(&self, line_idx: usize) -> bool {
        line_idx + 1 < self.lines.len() && self.line_metrics[line_idx].newline_length == 0
    }
}

impl TextLayout for MonoLayout {
    fn metrics(&self) -> TextMetrics {
        let widest = self
            .lines
            .iter()
            .map(|l| self.line_cols(l))
            .max()
            .unwrap_or(0);
        TextMetrics {
            line_count: self.lines.len(),
            width: widest as f32 * self.cell_width,
            height: self.lines.len() as f32 * self.line_height,
        }
    }

    fn line_metrics(&self) -> &[LineMetrics] {
        &self.line_metrics
    }

    fn cluster_metrics(&self) -> Vec<ClusterMetrics> {
        self.clusters
            .iter()
            .map(|k| ClusterMetrics {
                length: k.len,
                width: k.cells as f32 * self.cell_width,
                is_whitespace: k.whitespace,
                is_newline: k.newline,
            })
            .collect()
    }

    fn text_len(&self) -> usize {
        self.text_len
    }

    fn hit_test_position(&self, offset: usize) -> Result<HitPosition, LayoutError> {
        if offset > self.text_len {
            return Err(LayoutError::OffsetOutOfRange {
                offset,
                len: self.text_len,
            });
        }
        let idx = self.clusters.partition_point(|k| k.start + k.len <= offset);
        if let Some(k) = self.clusters.get(idx) {
            return Ok(HitPosition {
                x: k.col as f32 * self.cell_width,
                y: k.line as f32 * self.line_height,
                width: k.cells as f32 * self.cell_width,
                height: self.line_height,
            });
        }
        // End of text: after the last cluster of the last line.
        let last = self.lines.len() - 1;
        let cols = self.line_cols(&self.lines[last]);
        Ok(HitPosition {
            x: cols as f32 * self.cell_width,
            y: last as f32 * self.line_height,
            width: 0.0,
            height: self.line_height,
        })
    }

    fn hit_test_point(&self, x: f32, y: f32) -> Result<HitPoint, LayoutError> {
        let total_h = self.lines.len() as f32 * self.line_height;
        let inside_y = y >= 0.0 && y < total_h;
        let line_idx = if y <= 0.0 {
            0
        } else {
            ((y / self.line_height).floor() as usize).min(self.lines.len() - 1)
        };
        let line = &self.lines[line_idx];
        let visible: Vec<&Cluster> = self.clusters[line.first..line.end]
            .iter()
            .filter(|k| !k.newline)
            .collect();
        let soft = self.is_soft_wrapped(line_idx);

        let (Some(first), Some(last)) = (visible.first(), visible.last()) else {
            return Ok(HitPoint {
                offset: line.start,
                length: 0,
                is_trailing: false,
                is_inside: false,
            });
        };
        if x < 0.0 {
            return Ok(HitPoint {
                offset: first.start,
                length: first.len,
                is_trailing: false,
                is_inside: false,
            });
        }
        for (i, k) in visible.iter().enumerate() {
            let left = k.col as f32 * self.cell_width;
            let right = left + k.cells as f32 * self.cell_width;
            if x < right {
                let is_last = i + 1 == visible.len();
                return Ok(HitPoint {
                    offset: k.start,
                    length: k.len,
                    is_trailing: x >= (left + right) / 2.0 && !(soft && is_last),
                    is_inside: inside_y,
                });
            }
        }
        // Past the end of the line: caret after the last cluster, except on a
        // soft-wrapped line where "after" would be the next line's start.
        Ok(HitPoint {
            offset: last.start,
            length: last.len,
            is_trailing: !soft,
            is_inside: false,
        })
    }
}
