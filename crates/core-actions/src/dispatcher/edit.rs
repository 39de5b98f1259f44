use super::DispatchResult;
use crate::EditKind;
use core_layout::LayoutEngine;
use core_model::{TextView, ViewResult};

pub(crate) fn handle_edit<E: LayoutEngine>(
    kind: EditKind,
    view: &mut TextView<E>,
) -> ViewResult<DispatchResult> {
    let changed = match kind {
        EditKind::InsertChar(c) => view.insert_char(c)?,
        EditKind::InsertText(text) => {
            tracing::debug!(target: "actions.dispatch", len = text.len(), "paste");
            view.insert_text(&text)?
        }
        EditKind::Newline => view.insert_char('\n')?,
        EditKind::Backspace => view.back_erase()?,
        EditKind::Delete => view.forward_erase()?,
    };
    Ok(if changed {
        DispatchResult::edited()
    } else {
        DispatchResult::clean()
    })
}
