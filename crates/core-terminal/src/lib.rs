//! Terminal backend and crossterm implementation.
//!
//! `CrosstermBackend` owns raw mode, the alternate screen and the input
//! reporting modes (mouse capture, bracketed paste, focus changes).
//! `TerminalSurface` is the cell grid the view paints into.

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture,
};
use crossterm::queue;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use std::io::{Stdout, Write, stdout};

pub mod capabilities;
pub mod surface;
pub use capabilities::TerminalCapabilities;
pub use surface::{Cell, TerminalSurface};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

/// Crossterm session on `out`. Leaving is idempotent and also runs on drop.
pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
    entered: bool,
}

/// Leaves the terminal session when dropped, including on early return or panic.
pub struct TerminalGuard<'a, W: Write = Stdout> {
    backend: &'a mut CrosstermBackend<W>,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::with_writer(stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            entered: false,
        }
    }

    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_, W>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }

    /// Current size in cells (columns, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> TerminalBackend for CrosstermBackend<W> {
    fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        enable_raw_mode()?;
        queue!(
            self.out,
            EnterAlternateScreen,
            Hide,
            EnableMouseCapture,
            EnableBracketedPaste,
            EnableFocusChange
        )?;
        self.out.flush()?;
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        queue!(
            self.out,
            DisableFocusChange,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            Show
        )?;
        self.out.flush()?;
        disable_raw_mode()?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        queue!(self.out, SetTitle(title))?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<W: Write> Drop for TerminalGuard<'_, W> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_written_as_osc_sequence() {
        let mut backend = CrosstermBackend::with_writer(Vec::new());
        backend.set_title("vellum - notes.txt").unwrap();
        let written = String::from_utf8(backend.writer().clone()).unwrap();
        assert!(written.contains("vellum - notes.txt"), "{written:?}");
        assert!(written.starts_with("\x1b]0;"), "{written:?}");
    }

    #[test]
    fn leave_without_enter_writes_nothing() {
        let mut backend = CrosstermBackend::with_writer(Vec::new());
        backend.leave().unwrap();
        assert!(backend.writer().is_empty());
    }
}
