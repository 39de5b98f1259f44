#![allow(dead_code)] // Each test binary uses a subset of helpers.

use core_layout::{BoxSize, MonospaceEngine};
use core_model::{TextView, ViewOptions};

/// 10x20 px cells, 4-cell tabs.
pub fn engine() -> MonospaceEngine {
    MonospaceEngine::new(10.0, 20.0, 4)
}

pub fn view(text: &str, width: f32, height: f32) -> TextView<MonospaceEngine> {
    view_with(text, width, height, ViewOptions::default())
}

pub fn view_with(
    text: &str,
    width: f32,
    height: f32,
    options: ViewOptions,
) -> TextView<MonospaceEngine> {
    let mut v = TextView::new(engine(), options, BoxSize::new(width, height));
    v.load_text(text).expect("load_text");
    v
}

/// Small windows and a low overlay threshold so short sequences exercise
/// re-windowing, merging and the direct edit path.
pub fn tight_options() -> ViewOptions {
    ViewOptions {
        overlay_threshold: 8,
        density_divisor: 85,
        min_block_size: 16,
        ..ViewOptions::default()
    }
}

/// Remove chars `[begin, end)` from `s`.
pub fn remove_chars(s: &mut String, begin: usize, end: usize) {
    let kept: String = s
        .chars()
        .enumerate()
        .filter(|(i, _)| *i < begin || *i >= end)
        .map(|(_, c)| c)
        .collect();
    *s = kept;
}

/// Insert `text` before char `at` of `s`.
pub fn insert_chars(s: &mut String, at: usize, text: &str) {
    let byte = s.char_indices().nth(at).map_or(s.len(), |(b, _)| b);
    s.insert_str(byte, text);
}
