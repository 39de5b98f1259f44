#![allow(dead_code)] // Each test binary uses a subset of helpers.

use core_actions::{Action, DispatchResult, EventTranslator, dispatch};
use core_config::Config;
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use core_layout::{BoxSize, MonospaceEngine};
use core_model::{TextView, ViewOptions};

/// 10x20 px cells, 4-cell tabs.
pub fn view(text: &str, width: f32, height: f32) -> TextView<MonospaceEngine> {
    let mut v = TextView::new(
        MonospaceEngine::new(10.0, 20.0, 4),
        ViewOptions::default(),
        BoxSize::new(width, height),
    );
    v.load_text(text).expect("load_text");
    v
}

/// Translator plus config, the way the host drives a view.
pub struct Harness {
    pub view: TextView<MonospaceEngine>,
    pub translator: EventTranslator,
    pub config: Config,
}

impl Harness {
    pub fn new(text: &str, width: f32, height: f32) -> Self {
        Self {
            view: view(text, width, height),
            translator: EventTranslator::new(),
            config: Config::default(),
        }
    }

    /// Translate and dispatch; `None` when the event maps to no action.
    pub fn feed(&mut self, event: InputEvent) -> Option<DispatchResult> {
        let action: Action = self.translator.translate(&event, &self.config)?;
        Some(dispatch(action, &mut self.view).expect("dispatch"))
    }

    pub fn key(&mut self, code: KeyCode, mods: KeyModifiers) -> Option<DispatchResult> {
        self.feed(InputEvent::Key(KeyEvent::new(code, mods)))
    }

    pub fn press(&mut self, code: KeyCode) -> Option<DispatchResult> {
        self.key(code, KeyModifiers::empty())
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    pub fn mouse(&mut self, kind: MouseEventKind, x: f32, y: f32, mods: KeyModifiers) -> Option<DispatchResult> {
        self.feed(InputEvent::Mouse(MouseEvent { kind, x, y, mods }))
    }

    pub fn click(&mut self, x: f32, y: f32) -> Option<DispatchResult> {
        self.mouse(MouseEventKind::Down(MouseButton::Left), x, y, KeyModifiers::empty())
    }

    pub fn text(&mut self) -> String {
        self.view.get_full_text().expect("full text")
    }
}
