//! Dispatcher applying an `Action` to a `TextView`.
//!
//! Sub-modules:
//! * `motion`  - cursor movement and scrolling
//! * `edit`    - text mutation
//! * `pointer` - click, drag and double click
//! * `command` - host commands (save, quit, marks)
//!
//! View errors propagate unchanged; boundary no-ops come back as a clean
//! result so the host can skip the redraw.

use crate::Action;
use core_layout::LayoutEngine;
use core_model::{TextView, ViewResult};

mod command;
mod edit;
mod motion;
mod pointer;

/// What the host must do after one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed; redraw.
    pub dirty: bool,
    /// Document text changed.
    pub edited: bool,
    pub quit: bool,
    pub save: bool,
    pub toggle_marks: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn clean() -> Self {
        Self::default()
    }

    pub fn edited() -> Self {
        Self {
            dirty: true,
            edited: true,
            ..Self::default()
        }
    }

    pub(crate) fn from_changed(changed: bool) -> Self {
        if changed { Self::dirty() } else { Self::clean() }
    }
}

pub fn dispatch<E: LayoutEngine>(action: Action, view: &mut TextView<E>) -> ViewResult<DispatchResult> {
    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, view)?,
        Action::Extend(kind) => motion::handle_extend(kind, view)?,
        Action::Scroll(lines) => DispatchResult::from_changed(view.v_scroll(lines)?),
        Action::ScrollTo(fraction) => {
            let before = view.window().start;
            view.scrollbox_move(fraction)?;
            DispatchResult::from_changed(view.window().start != before)
        }
        Action::Edit(kind) => edit::handle_edit(kind, view)?,
        Action::Pointer(p) => pointer::handle_pointer(p, view)?,
        Action::Command(c) => command::handle_command(c),
    };
    tracing::trace!(
        target: "actions.dispatch",
        dirty = result.dirty,
        edited = result.edited,
        cursor = view.cursor(),
        "dispatched"
    );
    Ok(result)
}
