//! Configuration loading and parsing.
//!
//! `vellum.toml` is looked up in the working directory first, then under the
//! platform config dir (`dirs::config_dir()/vellum/vellum.toml`); the binary
//! may pass an explicit path instead. Every key is optional and unknown keys
//! are ignored so files written for newer builds still load. A file that
//! fails to parse is logged at `warn` and replaced by defaults; the host never
//! refuses to start over configuration.
//!
//! Values are validated after parsing (`Config::sanitize`): numbers that
//! would make the view unusable (zero divisors, non-positive cell sizes) are
//! reset to their defaults with an `info` on target `config`.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

pub const FILE_NAME: &str = "vellum.toml";

/// Initial host box in pixels.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
        }
    }
}

/// Which chars count as word chars for double-click selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WordBoundaries {
    /// Everything at or above `'0'` is a word char.
    #[default]
    Threshold,
    /// Alphanumerics and underscore.
    Unicode,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub overlay_threshold: usize,
    pub density_divisor: usize,
    pub min_block_size: usize,
    pub word_boundaries: WordBoundaries,
    pub caret_width: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            overlay_threshold: 512,
            density_divisor: 85,
            min_block_size: 256,
            word_boundaries: WordBoundaries::Threshold,
            caret_width: 2.0,
        }
    }
}

/// Metrics for the monospace layout engine.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub cell_width: f32,
    pub line_height: f32,
    pub tab_width: u16,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 16.0,
            tab_width: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    /// Visual lines per wheel notch (120 delta units).
    pub wheel_lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { wheel_lines: 3 }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,   // file contents when one was read
    pub path: Option<PathBuf>, // where it was read from
    pub file: ConfigFile,      // parsed (or default) data
}

/// Best-effort config path: working directory, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vellum").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_file_absent");
        return Ok(Config::default());
    };
    match parse(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                path: Some(path),
                file,
            };
            cfg.sanitize();
            info!(
                target: "config",
                path = ?cfg.path,
                overlay_threshold = cfg.file.editor.overlay_threshold,
                wheel_lines = cfg.file.scroll.wheel_lines,
                "config_loaded"
            );
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

/// Parse a config document without touching the filesystem.
pub fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str::<ConfigFile>(content)?)
}

impl Config {
    /// Reset values the view cannot work with to their defaults. Returns the
    /// number of fields replaced.
    pub fn sanitize(&mut self) -> usize {
        let defaults = ConfigFile::default();
        let mut replaced = 0usize;
        let mut fix = |bad: bool, field: &'static str| {
            if bad {
                info!(target: "config", field, "config_value_reset");
                replaced += 1;
            }
            bad
        };

        let editor = &mut self.file.editor;
        if fix(editor.density_divisor == 0, "editor.density_divisor") {
            editor.density_divisor = defaults.editor.density_divisor;
        }
        if fix(editor.overlay_threshold == 0, "editor.overlay_threshold") {
            editor.overlay_threshold = defaults.editor.overlay_threshold;
        }
        if fix(
            !(editor.caret_width.is_finite() && editor.caret_width > 0.0),
            "editor.caret_width",
        ) {
            editor.caret_width = defaults.editor.caret_width;
        }

        let font = &mut self.file.font;
        if fix(!(font.cell_width.is_finite() && font.cell_width > 0.0), "font.cell_width") {
            font.cell_width = defaults.font.cell_width;
        }
        if fix(
            !(font.line_height.is_finite() && font.line_height > 0.0),
            "font.line_height",
        ) {
            font.line_height = defaults.font.line_height;
        }
        if fix(font.tab_width == 0, "font.tab_width") {
            font.tab_width = defaults.font.tab_width;
        }

        let window = &mut self.file.window;
        if fix(window.width == 0 || window.height == 0, "window") {
            *window = defaults.window;
        }
        replaced
    }

    /// Lines to scroll for a wheel `delta` in 120-unit notches; positive
    /// deltas scroll up (towards the start) and come back negative.
    pub fn wheel_lines_for(&self, delta: i32) -> isize {
        let notches = delta as isize / 120;
        -(notches * self.file.scroll.wheel_lines as isize)
    }
}
