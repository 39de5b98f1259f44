use super::DispatchResult;
use crate::{ExtendKind, MotionKind};
use core_layout::LayoutEngine;
use core_model::{TextView, ViewResult};

pub(crate) fn handle_motion<E: LayoutEngine>(
    kind: MotionKind,
    view: &mut TextView<E>,
) -> ViewResult<DispatchResult> {
    let had_selection = !view.selection().is_empty();
    let moved = match kind {
        MotionKind::Left => view.move_left()?,
        MotionKind::Right => view.move_right()?,
        MotionKind::Up => view.move_up()?,
        MotionKind::Down => view.move_down()?,
        MotionKind::LineStart => view.move_line_start()?,
        MotionKind::LineEnd => view.move_line_end()?,
        MotionKind::DocStart => view.move_doc_start()?,
        MotionKind::DocEnd => view.move_doc_end()?,
        MotionKind::PageUp => view.page(false)?,
        MotionKind::PageDown => view.page(true)?,
    };
    Ok(DispatchResult::from_changed(moved || had_selection))
}

pub(crate) fn handle_extend<E: LayoutEngine>(
    kind: ExtendKind,
    view: &mut TextView<E>,
) -> ViewResult<DispatchResult> {
    let moved = match kind {
        ExtendKind::Left => view.extend_left()?,
        ExtendKind::Right => view.extend_right()?,
    };
    Ok(DispatchResult::from_changed(moved))
}
