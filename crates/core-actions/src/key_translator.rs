//! EventTranslator: stateful InputEvent -> Action translation.
//!
//! Key map:
//! * printable chars (no Ctrl/Alt), Enter, Tab, Backspace, Delete edit;
//! * arrows, Home/End, PageUp/PageDown move; Ctrl+Home/End jump to the
//!   document ends; Shift+Left/Right extend the selection;
//! * Ctrl+S save, Ctrl+Q quit, F2 toggles whitespace marks.
//!
//! Pointer state: a left press starts a drag that lasts until release. A
//! press inside the scrollbar column grabs the scrollbar instead; drags then
//! become `ScrollTo` fractions of the track height.

use crate::{Action, CommandEvent, EditKind, ExtendKind, MotionKind, PointerAction};
use core_config::Config;
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

/// Scrollbar track: everything at or right of `x`, `height` pixels tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrollbar {
    pub x: f32,
    pub height: f32,
}

impl Scrollbar {
    fn fraction(&self, y: f32) -> f64 {
        if self.height <= 0.0 {
            return 0.0;
        }
        (y / self.height).clamp(0.0, 1.0) as f64
    }
}

#[derive(Debug, Default)]
pub struct EventTranslator {
    dragging: bool,
    grabbed_scrollbar: bool,
    scrollbar: Option<Scrollbar>,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or clear) the scrollbar track after a resize.
    pub fn set_scrollbar(&mut self, scrollbar: Option<Scrollbar>) {
        self.scrollbar = scrollbar;
    }

    /// Drop any gesture in progress (focus loss).
    pub fn reset(&mut self) {
        self.dragging = false;
        self.grabbed_scrollbar = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn translate(&mut self, event: &InputEvent, cfg: &Config) -> Option<Action> {
        let action = match event {
            InputEvent::Key(key) => translate_key(key),
            InputEvent::Paste(text) => Some(Action::Edit(EditKind::InsertText(text.clone()))),
            InputEvent::Mouse(m) => self.translate_mouse(m, cfg),
            InputEvent::FocusLost => {
                self.reset();
                None
            }
            InputEvent::Resize(..) | InputEvent::FocusGained => None,
        };
        if let Some(a) = &action {
            trace!(target: "actions.translate", action = action_label(a), "translated");
        }
        action
    }

    fn translate_mouse(&mut self, m: &MouseEvent, cfg: &Config) -> Option<Action> {
        let in_scrollbar = self.scrollbar.is_some_and(|s| m.x >= s.x);
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::DoubleClick(MouseButton::Left)
                if in_scrollbar =>
            {
                self.grabbed_scrollbar = true;
                let bar = self.scrollbar?;
                Some(Action::ScrollTo(bar.fraction(m.y)))
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.dragging = true;
                let (x, y) = (m.x, m.y);
                if m.mods.contains(KeyModifiers::SHIFT) {
                    Some(Action::Pointer(PointerAction::ExtendTo { x, y }))
                } else {
                    Some(Action::Pointer(PointerAction::Press { x, y }))
                }
            }
            MouseEventKind::DoubleClick(MouseButton::Left) => {
                self.dragging = false;
                Some(Action::Pointer(PointerAction::DoubleClick { x: m.x, y: m.y }))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.grabbed_scrollbar {
                    let bar = self.scrollbar?;
                    Some(Action::ScrollTo(bar.fraction(m.y)))
                } else if self.dragging {
                    Some(Action::Pointer(PointerAction::Drag { x: m.x, y: m.y }))
                } else {
                    None
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let was_active = self.dragging || self.grabbed_scrollbar;
                self.reset();
                was_active.then_some(Action::Pointer(PointerAction::Release))
            }
            MouseEventKind::Wheel(delta) => {
                let lines = cfg.wheel_lines_for(delta);
                (lines != 0).then_some(Action::Scroll(lines))
            }
            _ => None,
        }
    }
}

fn translate_key(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.mods.contains(KeyModifiers::CTRL);
    let alt = key.mods.contains(KeyModifiers::ALT);
    let shift = key.mods.contains(KeyModifiers::SHIFT);
    let action = match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            's' => Action::Command(CommandEvent::Save),
            'q' => Action::Command(CommandEvent::Quit),
            _ => return None,
        },
        KeyCode::Char(_) if alt => return None,
        KeyCode::Char(c) => Action::Edit(EditKind::InsertChar(c)),
        KeyCode::Enter => Action::Edit(EditKind::Newline),
        KeyCode::Tab => Action::Edit(EditKind::InsertChar('\t')),
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Delete => Action::Edit(EditKind::Delete),
        KeyCode::Left if shift => Action::Extend(ExtendKind::Left),
        KeyCode::Right if shift => Action::Extend(ExtendKind::Right),
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Home if ctrl => Action::Motion(MotionKind::DocStart),
        KeyCode::End if ctrl => Action::Motion(MotionKind::DocEnd),
        KeyCode::Home => Action::Motion(MotionKind::LineStart),
        KeyCode::End => Action::Motion(MotionKind::LineEnd),
        KeyCode::PageUp => Action::Motion(MotionKind::PageUp),
        KeyCode::PageDown => Action::Motion(MotionKind::PageDown),
        KeyCode::F(2) => Action::Command(CommandEvent::ToggleMarks),
        KeyCode::F(_) | KeyCode::Esc => return None,
    };
    Some(action)
}

fn action_label(a: &Action) -> &'static str {
    match a {
        Action::Motion(_) => "motion",
        Action::Extend(_) => "extend",
        Action::Edit(_) => "edit",
        Action::Scroll(_) => "scroll",
        Action::ScrollTo(_) => "scroll_to",
        Action::Pointer(_) => "pointer",
        Action::Command(_) => "command",
    }
}
