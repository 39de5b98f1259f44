//! Terminal capability detection.
//!
//! Detection runs once at startup and only reads the environment; nothing is
//! written to the terminal.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    /// 24-bit color escapes are understood; otherwise colors are quantized
    /// to the xterm 256-color palette.
    pub truecolor: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        Self::from_colorterm(std::env::var("COLORTERM").ok().as_deref())
    }

    pub fn from_colorterm(colorterm: Option<&str>) -> Self {
        let truecolor = matches!(colorterm, Some(v) if v.eq_ignore_ascii_case("truecolor") || v.eq_ignore_ascii_case("24bit"));
        Self { truecolor }
    }

    pub const fn palette_256() -> Self {
        Self { truecolor: false }
    }
}
