//! Host state driven by the event loop: the view, the file it came from,
//! pointer translation and the terminal frame.
//!
//! Kept free of channels and the real terminal so a test can feed events
//! and inspect the composed frame.

use crate::frame;
use crate::settings;
use anyhow::Result;
use core_actions::io_ops::{self, OpenedFile};
use core_actions::{Action, DispatchResult, EventTranslator, dispatch};
use core_config::Config;
use core_events::{Event, InputEvent};
use core_input::CellMetrics;
use core_layout::{BoxSize, MonospaceEngine};
use core_model::TextView;
use core_render::status::{StatusContext, build_status};
use core_render::{DrawMode, DrawStyle};
use core_state::LineEnding;
use core_terminal::{TerminalCapabilities, TerminalSurface};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break(ShutdownReason),
}

/// The file behind the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: Option<PathBuf>,
    pub line_ending: LineEnding,
    pub modified: bool,
}

impl Document {
    /// Read `path` (if any). Returns the document and its LF-only text.
    pub fn open(path: Option<PathBuf>) -> Result<(Self, String)> {
        let Some(path) = path else {
            return Ok((Self::scratch(), String::new()));
        };
        let OpenedFile {
            text,
            line_ending,
            mixed,
            existed,
        } = io_ops::open_file(&path)?;
        debug!(target: "runtime", existed, mixed, chars = text.chars().count(), "document_opened");
        Ok((
            Self {
                path: Some(path),
                line_ending,
                modified: false,
            },
            text,
        ))
    }

    pub fn scratch() -> Self {
        Self {
            path: None,
            line_ending: LineEnding::default(),
            modified: false,
        }
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "[No Name]".to_string())
    }
}

struct StatusMessage {
    text: String,
    expires: Instant,
}

pub struct Editor {
    view: TextView<MonospaceEngine>,
    document: Document,
    config: Config,
    translator: EventTranslator,
    surface: TerminalSurface,
    metrics: CellMetrics,
    style: DrawStyle,
    mode: DrawMode,
    message: Option<StatusMessage>,
    needs_redraw: bool,
}

impl Editor {
    /// Build the view for a `columns x rows` terminal and load `text`.
    pub fn new(
        config: Config,
        document: Document,
        text: &str,
        grid: (u16, u16),
        caps: TerminalCapabilities,
        mode: DrawMode,
    ) -> Result<Self> {
        let metrics = settings::cell_metrics(&config);
        let (columns, rows) = grid;
        let (text_cols, text_rows) = frame::text_area(columns, rows);
        let (w, h) = metrics.box_size(text_cols.max(1), text_rows.max(1));
        let mut view = TextView::new(
            settings::layout_engine(&config),
            settings::view_options(&config),
            BoxSize::new(w, h),
        );
        view.load_text(text)?;
        let mut translator = EventTranslator::new();
        translator.set_scrollbar(frame::scrollbar(metrics, columns, rows));
        let style = settings::draw_style(&config);
        let surface = TerminalSurface::new(
            columns,
            rows,
            metrics.cell_width,
            metrics.line_height,
            caps,
        );
        Ok(Self {
            view,
            document,
            config,
            translator,
            surface,
            metrics,
            style,
            mode,
            message: None,
            needs_redraw: true,
        })
    }

    pub fn view(&self) -> &TextView<MonospaceEngine> {
        &self.view
    }

    #[cfg(test)]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[cfg(test)]
    pub fn surface(&self) -> &TerminalSurface {
        &self.surface
    }

    #[cfg(test)]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    #[cfg(test)]
    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    #[cfg(test)]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    pub fn handle_event(&mut self, event: &Event) -> LoopControl {
        match event {
            Event::Input(InputEvent::Resize(columns, rows)) => {
                if let Err(e) = self.resize(*columns, *rows) {
                    error!(target: "runtime", error = %e, "resize_failed");
                }
                LoopControl::Continue
            }
            Event::Input(input) => match self.translator.translate(input, &self.config) {
                Some(action) => self.apply(action),
                None => LoopControl::Continue,
            },
            Event::Command(cmd) => self.apply(Action::Command(*cmd)),
            Event::RenderRequested => {
                self.needs_redraw = true;
                LoopControl::Continue
            }
            Event::Tick => {
                self.expire_message(Instant::now());
                LoopControl::Continue
            }
            Event::Shutdown => LoopControl::Break(ShutdownReason::ShutdownEvent),
        }
    }

    fn apply(&mut self, action: Action) -> LoopControl {
        let result = match dispatch(action, &mut self.view) {
            Ok(r) => r,
            Err(e) => {
                error!(target: "runtime", error = %e, "dispatch_failed");
                self.set_message(format!("error: {e}"));
                return LoopControl::Continue;
            }
        };
        self.absorb(result)
    }

    fn absorb(&mut self, result: DispatchResult) -> LoopControl {
        self.needs_redraw |= result.dirty;
        if result.edited {
            self.document.modified = true;
        }
        if result.toggle_marks {
            self.mode = self.mode.toggled();
            debug!(target: "runtime", mode = ?self.mode, "draw_mode_toggled");
        }
        if result.save {
            self.save();
        }
        if result.quit {
            info!(target: "runtime", modified = self.document.modified, "quit_requested");
            return LoopControl::Break(ShutdownReason::Quit);
        }
        LoopControl::Continue
    }

    /// Write the document back with its original line endings.
    pub fn save(&mut self) {
        let Some(path) = self.document.path.clone() else {
            warn!(target: "io", "save_without_path");
            self.set_message("no file name".to_string());
            return;
        };
        let outcome = self
            .view
            .get_full_text()
            .map_err(anyhow::Error::from)
            .and_then(|text| io_ops::write_file(&path, &text, self.document.line_ending));
        match outcome {
            Ok(bytes) => {
                self.document.modified = false;
                self.set_message(format!("wrote {bytes} bytes"));
            }
            Err(e) => {
                error!(target: "io", path = %path.display(), error = %e, "save_failed");
                self.set_message(format!("save failed: {e}"));
            }
        }
    }

    pub fn resize(&mut self, columns: u16, rows: u16) -> Result<()> {
        self.surface.resize(columns, rows);
        self.translator
            .set_scrollbar(frame::scrollbar(self.metrics, columns, rows));
        let (text_cols, text_rows) = frame::text_area(columns, rows);
        if text_cols > 0 && text_rows > 0 {
            let (w, h) = self.metrics.box_size(text_cols, text_rows);
            self.view.set_size(w, h)?;
        }
        debug!(target: "runtime", columns, rows, "resized");
        self.needs_redraw = true;
        Ok(())
    }

    fn set_message(&mut self, text: String) {
        self.message = Some(StatusMessage {
            text,
            expires: Instant::now() + MESSAGE_TTL,
        });
        self.needs_redraw = true;
    }

    /// Drop the status message once it is past its deadline.
    pub fn expire_message(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| now >= m.expires) {
            self.message = None;
            self.needs_redraw = true;
        }
    }

    pub fn status_line(&self) -> String {
        let sel = self.view.selection();
        let ctx = StatusContext {
            file_name: self.document.path.as_deref(),
            dirty: self.document.modified,
            cursor: self.view.cursor(),
            len: self.view.len(),
            selection: Some((sel.begin, sel.end)),
            message: self.message(),
        };
        build_status(&ctx)
    }

    /// Paint the frame into the surface without presenting it.
    pub fn compose(&mut self) -> Result<()> {
        let status = self.status_line();
        frame::compose(
            &mut self.surface,
            &mut self.view,
            self.metrics,
            &self.style,
            self.mode,
            &status,
        )
    }

    /// Compose and flush the frame if anything changed since the last one.
    pub fn render<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if !self.needs_redraw {
            return Ok(());
        }
        self.compose()?;
        let rows = self.surface.present(out)?;
        out.flush()?;
        self.needs_redraw = false;
        tracing::trace!(target: "runtime", rows, "frame_presented");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{CommandEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use pretty_assertions::assert_eq;

    fn editor(text: &str, path: Option<PathBuf>) -> Editor {
        let document = Document {
            path,
            line_ending: LineEnding::Lf,
            modified: false,
        };
        Editor::new(
            Config::default(),
            document,
            text,
            (40, 10),
            TerminalCapabilities::from_colorterm(Some("truecolor")),
            DrawMode::Normal,
        )
        .unwrap()
    }

    fn key(code: KeyCode, mods: KeyModifiers) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::new(code, mods)))
    }

    #[test]
    fn typing_marks_modified_and_shows_in_status() {
        let mut ed = editor("abc", None);
        assert_eq!(ed.status_line(), "[No Name]  0/3");
        ed.handle_event(&key(KeyCode::Char('x'), KeyModifiers::empty()));
        assert!(ed.document().modified);
        assert_eq!(ed.status_line(), "[No Name]*  1/4");
    }

    #[test]
    fn frame_has_text_status_and_scrollbar() {
        let mut ed = editor("hello\nworld", Some(PathBuf::from("notes.txt")));
        ed.compose().unwrap();
        let s = ed.surface();
        assert!(s.row_text(0).starts_with("hello"));
        assert!(s.row_text(1).starts_with("world"));
        assert!(s.row_text(9).starts_with("notes.txt  0/11"));
        // Whole document visible: the thumb fills the track.
        let thumb = DrawStyle::default().marks;
        for row in 0..9 {
            assert_eq!(s.cell(39, row).unwrap().bg, thumb);
        }
        assert_eq!(s.caret(), Some((0, 0)));
    }

    #[test]
    fn save_writes_file_and_clears_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut ed = editor("one\ntwo", Some(path.clone()));
        ed.document.line_ending = LineEnding::Crlf;
        ed.handle_event(&key(KeyCode::Char('>'), KeyModifiers::empty()));
        let control = ed.handle_event(&key(KeyCode::Char('s'), KeyModifiers::CTRL));
        assert_eq!(control, LoopControl::Continue);
        assert!(!ed.document().modified);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ">one\r\ntwo");
        assert_eq!(ed.message(), Some("wrote 9 bytes"));
    }

    #[test]
    fn save_without_path_reports() {
        let mut ed = editor("abc", None);
        ed.handle_event(&Event::Command(CommandEvent::Save));
        assert_eq!(ed.message(), Some("no file name"));
    }

    #[test]
    fn message_expires_on_tick_deadline() {
        let mut ed = editor("abc", None);
        ed.save();
        assert!(ed.message().is_some());
        ed.expire_message(Instant::now());
        assert!(ed.message().is_some());
        ed.expire_message(Instant::now() + MESSAGE_TTL + Duration::from_millis(1));
        assert!(ed.message().is_none());
    }

    #[test]
    fn quit_and_shutdown_break_the_loop() {
        let mut ed = editor("abc", None);
        assert_eq!(
            ed.handle_event(&key(KeyCode::Char('q'), KeyModifiers::CTRL)),
            LoopControl::Break(ShutdownReason::Quit)
        );
        assert_eq!(
            ed.handle_event(&Event::Shutdown),
            LoopControl::Break(ShutdownReason::ShutdownEvent)
        );
    }

    #[test]
    fn f2_toggles_marks() {
        let mut ed = editor("a b", None);
        ed.handle_event(&key(KeyCode::F(2), KeyModifiers::empty()));
        assert_eq!(ed.mode(), DrawMode::ShowMarks);
        ed.compose().unwrap();
        assert_eq!(ed.surface().cell(1, 0).unwrap().symbol, "·");
        ed.handle_event(&key(KeyCode::F(2), KeyModifiers::empty()));
        assert_eq!(ed.mode(), DrawMode::Normal);
    }

    #[test]
    fn resize_reshapes_view_and_scrollbar() {
        let mut ed = editor("abc", None);
        ed.resize(20, 5).unwrap();
        assert_eq!(ed.surface().size(), (20, 5));
        let size = ed.view().window().size;
        assert_eq!((size.width, size.height), (152.0, 64.0));
    }

    #[test]
    fn click_in_text_moves_cursor() {
        let mut ed = editor("hello world", None);
        let (x, y) = ed.metrics().to_pixels(6, 0);
        ed.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            x,
            y,
            mods: KeyModifiers::empty(),
        })));
        assert_eq!(ed.view().cursor(), 6);
        assert!(ed.needs_redraw());
    }

    #[test]
    fn render_presents_once_until_dirty() {
        let mut ed = editor("abc", None);
        let mut out = Vec::new();
        ed.render(&mut out).unwrap();
        assert!(!out.is_empty());
        assert!(!ed.needs_redraw());
        let mut second = Vec::new();
        ed.render(&mut second).unwrap();
        assert!(second.is_empty());
    }
}
