//! Input to view operations.
//!
//! Two stages, kept apart so each is testable without the other:
//! * `EventTranslator` turns host-neutral `InputEvent`s into `Action`s. It
//!   holds the little state a pointer needs (drag in progress, scrollbar
//!   grab) and reads key/wheel settings from `Config`.
//! * `dispatch` applies one `Action` to a `TextView` and reports what the
//!   host has to do next (redraw, mark modified, save, quit).
//!
//! `io_ops` holds plain-text load/save with line ending round-tripping.

mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use core_events::CommandEvent;
pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{EventTranslator, Scrollbar};

/// Cursor movement; collapses any selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,
    PageUp,
    PageDown,
}

/// Shift+arrow selection growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendKind {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    /// Pasted text; large payloads bypass the overlay.
    InsertText(String),
    Newline,
    Backspace,
    Delete,
}

/// Pointer gestures in text box pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Press { x: f32, y: f32 },
    /// Shift+click: grow the selection to the point.
    ExtendTo { x: f32, y: f32 },
    Drag { x: f32, y: f32 },
    DoubleClick { x: f32, y: f32 },
    Release,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Motion(MotionKind),
    Extend(ExtendKind),
    Edit(EditKind),
    /// Visual lines; positive scrolls towards the end.
    Scroll(isize),
    /// Scrollbar position in `[0, 1]`.
    ScrollTo(f64),
    Pointer(PointerAction),
    Command(CommandEvent),
}
