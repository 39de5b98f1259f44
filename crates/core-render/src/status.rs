//! Status line composition.
//!
//! Format: `<name>[*]  <cursor>/<len>[  sel <begin>..<end>][  <message>]`
//! * `<name>` is the base file name or `[No Name]`.
//! * `*` marks unsaved changes.
//! * The selection segment only appears for a non-empty selection.
//!
//! Composition is two-stage: `compose_status` yields ordered segments and
//! `format_status` renders them, so hosts can drop or restyle segments
//! without re-deriving them.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

pub struct StatusContext<'a> {
    pub file_name: Option<&'a Path>,
    pub dirty: bool,
    pub cursor: usize,
    pub len: usize,
    pub selection: Option<(usize, usize)>,
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    FileName(Cow<'a, str>),
    Position { cursor: usize, len: usize },
    Selection { begin: usize, end: usize },
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'_, str> = match ctx.file_name.and_then(|p| p.file_name()) {
        Some(n) => n.to_string_lossy(),
        None => Cow::Borrowed("[No Name]"),
    };
    let name = if ctx.dirty {
        Cow::Owned(format!("{name}*"))
    } else {
        name
    };

    let mut out = Vec::with_capacity(4);
    out.push(StatusSegment::FileName(name));
    out.push(StatusSegment::Position {
        cursor: ctx.cursor,
        len: ctx.len,
    });
    if let Some((begin, end)) = ctx.selection
        && begin != end
    {
        out.push(StatusSegment::Selection { begin, end });
    }
    if let Some(m) = ctx.message {
        out.push(StatusSegment::Message(m));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(48);
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            s.push_str("  ");
        }
        match seg {
            StatusSegment::FileName(name) => s.push_str(name),
            StatusSegment::Position { cursor, len } => {
                let _ = write!(s, "{cursor}/{len}");
            }
            StatusSegment::Selection { begin, end } => {
                let _ = write!(s, "sel {begin}..{end}");
            }
            StatusSegment::Message(m) => s.push_str(m),
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx<'a>() -> StatusContext<'a> {
        StatusContext {
            file_name: None,
            dirty: false,
            cursor: 0,
            len: 0,
            selection: None,
            message: None,
        }
    }

    #[test]
    fn unnamed_clean() {
        assert_eq!(build_status(&ctx()), "[No Name]  0/0");
    }

    #[test]
    fn named_dirty_with_selection() {
        let c = StatusContext {
            file_name: Some(Path::new("/tmp/notes.txt")),
            dirty: true,
            cursor: 12,
            len: 40,
            selection: Some((5, 12)),
            ..ctx()
        };
        assert_eq!(build_status(&c), "notes.txt*  12/40  sel 5..12");
    }

    #[test]
    fn empty_selection_is_hidden() {
        let c = StatusContext {
            cursor: 3,
            len: 9,
            selection: Some((3, 3)),
            message: Some("saved"),
            ..ctx()
        };
        let segs = compose_status(&c);
        assert!(!segs
            .iter()
            .any(|s| matches!(s, StatusSegment::Selection { .. })));
        assert_eq!(format_status(&segs), "[No Name]  3/9  saved");
    }
}
