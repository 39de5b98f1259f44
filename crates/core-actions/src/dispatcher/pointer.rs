use super::DispatchResult;
use crate::PointerAction;
use core_layout::LayoutEngine;
use core_model::{TextView, ViewResult};

pub(crate) fn handle_pointer<E: LayoutEngine>(
    action: PointerAction,
    view: &mut TextView<E>,
) -> ViewResult<DispatchResult> {
    match action {
        PointerAction::Press { x, y } => view.move_cursor_to(x, y)?,
        PointerAction::ExtendTo { x, y } | PointerAction::Drag { x, y } => {
            view.change_selection(x, y)?
        }
        PointerAction::DoubleClick { x, y } => {
            view.move_cursor_to(x, y)?;
            view.select_word()?;
        }
        PointerAction::Release => return Ok(DispatchResult::clean()),
    }
    Ok(DispatchResult::dirty())
}
