use core_events::{KeyCode, KeyEvent};
use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind};

use crate::map_mods;

/// Map a crossterm key event onto the editor's key model.
///
/// Returns `None` for releases and for keys the editor has no use for
/// (media keys, lock keys, bare modifiers).
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let mut mods = map_mods(event.modifiers);
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::BackTab => {
            mods |= core_events::KeyModifiers::SHIFT;
            KeyCode::Tab
        }
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::F(n) => KeyCode::F(n),
        CKeyCode::Insert
        | CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(KeyEvent {
        code,
        mods,
        repeat: matches!(event.kind, CKeyEventKind::Repeat),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyModifiers;
    use crossterm::event::{KeyEventState as CKeyEventState, KeyModifiers as CKeyModifiers};

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    #[test]
    fn maps_basic_char() {
        let ev = key_event(CKeyCode::Char('a'), CKeyModifiers::NONE, CKeyEventKind::Press);
        let key = map_key_event(&ev).expect("char should map");
        assert_eq!(key.code, KeyCode::Char('a'));
        assert!(key.mods.is_empty());
        assert!(!key.repeat);
    }

    #[test]
    fn maps_navigation_and_function_keys() {
        for (c, k) in [
            (CKeyCode::Home, KeyCode::Home),
            (CKeyCode::End, KeyCode::End),
            (CKeyCode::PageDown, KeyCode::PageDown),
            (CKeyCode::Delete, KeyCode::Delete),
            (CKeyCode::F(2), KeyCode::F(2)),
        ] {
            let ev = key_event(c, CKeyModifiers::NONE, CKeyEventKind::Press);
            assert_eq!(map_key_event(&ev).map(|k| k.code), Some(k));
        }
    }

    #[test]
    fn maps_modifiers() {
        let ev = key_event(
            CKeyCode::Left,
            CKeyModifiers::CONTROL | CKeyModifiers::SHIFT,
            CKeyEventKind::Press,
        );
        let key = map_key_event(&ev).expect("ctrl-shift-left should map");
        assert!(key.mods.contains(KeyModifiers::CTRL | KeyModifiers::SHIFT));
    }

    #[test]
    fn back_tab_is_shift_tab() {
        let ev = key_event(CKeyCode::BackTab, CKeyModifiers::NONE, CKeyEventKind::Press);
        let key = map_key_event(&ev).expect("backtab should map");
        assert_eq!(key.code, KeyCode::Tab);
        assert!(key.shift());
    }

    #[test]
    fn repeat_and_release() {
        let ev = key_event(CKeyCode::Char('j'), CKeyModifiers::NONE, CKeyEventKind::Repeat);
        assert!(map_key_event(&ev).expect("repeat should map").repeat);
        let ev = key_event(CKeyCode::Char('j'), CKeyModifiers::NONE, CKeyEventKind::Release);
        assert!(map_key_event(&ev).is_none());
    }

    #[test]
    fn unsupported_keys_return_none() {
        let ev = key_event(CKeyCode::CapsLock, CKeyModifiers::NONE, CKeyEventKind::Press);
        assert!(map_key_event(&ev).is_none());
    }
}
