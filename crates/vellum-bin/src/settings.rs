//! Config file values to the types the view, drawing and input layers take.

use core_config::{Config, WordBoundaries};
use core_input::CellMetrics;
use core_layout::MonospaceEngine;
use core_model::ViewOptions;
use core_render::DrawStyle;
use core_text::word::WordClassifier;

pub fn view_options(cfg: &Config) -> ViewOptions {
    let editor = &cfg.file.editor;
    ViewOptions {
        overlay_threshold: editor.overlay_threshold,
        density_divisor: editor.density_divisor,
        min_block_size: editor.min_block_size,
        word_classifier: match editor.word_boundaries {
            WordBoundaries::Threshold => WordClassifier::Threshold,
            WordBoundaries::Unicode => WordClassifier::Unicode,
        },
    }
}

pub fn layout_engine(cfg: &Config) -> MonospaceEngine {
    let font = &cfg.file.font;
    MonospaceEngine::new(font.cell_width, font.line_height, font.tab_width as usize)
}

pub fn draw_style(cfg: &Config) -> DrawStyle {
    DrawStyle {
        caret_width: cfg.file.editor.caret_width,
        ..DrawStyle::default()
    }
}

pub fn cell_metrics(cfg: &Config) -> CellMetrics {
    CellMetrics::new(cfg.file.font.cell_width, cfg.file.font.line_height)
}

/// Cell grid used when the terminal cannot report its size: the configured
/// window box divided into cells.
pub fn fallback_grid(cfg: &Config) -> (u16, u16) {
    let window = &cfg.file.window;
    let font = &cfg.file.font;
    let cols = (window.width as f32 / font.cell_width).floor() as u16;
    let rows = (window.height as f32 / font.line_height).floor() as u16;
    (cols.max(2), rows.max(2))
}
