use super::DispatchResult;
use crate::CommandEvent;

pub(crate) fn handle_command(command: CommandEvent) -> DispatchResult {
    match command {
        CommandEvent::Quit => DispatchResult {
            quit: true,
            ..DispatchResult::clean()
        },
        CommandEvent::Save => DispatchResult {
            save: true,
            ..DispatchResult::dirty()
        },
        CommandEvent::ToggleMarks => DispatchResult {
            toggle_marks: true,
            ..DispatchResult::dirty()
        },
    }
}
