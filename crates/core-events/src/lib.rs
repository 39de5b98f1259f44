//! Host-neutral event types and channel helpers.
//!
//! Input arrives from the terminal task already translated: keys carry a
//! small logical key code plus modifier bits, mouse events carry pixel
//! coordinates in the text box (the input layer owns the cell to pixel
//! mapping). The view layer never sees crossterm types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Capacity of the one channel feeding the view actor. Producers await
/// `send`, so a slow consumer parks the input task instead of losing keys.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// One wheel notch.
pub const WHEEL_DELTA: i32 = 120;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Input(InputEvent),
    Command(CommandEvent),
    RenderRequested,
    /// Periodic tick; drives status message expiry.
    Tick,
    Shutdown,
}

/// Host commands that do not touch the view directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEvent {
    Quit,
    Save,
    ToggleMarks,
}

/// Normalized input events.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Bracketed paste payload. Never logged verbatim; log `len` only.
    Paste(String),
    Mouse(MouseEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
    FocusGained,
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    pub repeat: bool,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            repeat: false,
        }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    pub fn shift(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, _) in self.mods.iter_names() {
            write!(f, "{name}+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Logical keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

/// Pointer event in text box pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: f32,
    pub y: f32,
    pub mods: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    /// Second press at the same spot within the double-click interval.
    DoubleClick(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    /// Wheel rotation in 120-unit notches; positive rolls away from the user
    /// (towards the start of the document).
    Wheel(i32),
    Moved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Why the input task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Signal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl StopReason {
    const ALL: [StopReason; 4] = [
        StopReason::Signal,
        StopReason::ChannelClosed,
        StopReason::StreamEnded,
        StopReason::StreamError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::Signal => "shutdown_signal",
            StopReason::ChannelClosed => "channel_closed",
            StopReason::StreamEnded => "stream_ended",
            StopReason::StreamError => "stream_error",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Process-wide input counters. Relaxed ordering; read for diagnostics only.
#[derive(Debug)]
pub struct InputStats {
    pub keys: AtomicU64,
    pub paste_bytes: AtomicU64,
    pub double_clicks: AtomicU64,
    pub send_failures: AtomicU64,
    pub starts: AtomicU64,
    stops: [AtomicU64; StopReason::ALL.len()],
}

impl InputStats {
    const fn new() -> Self {
        Self {
            keys: AtomicU64::new(0),
            paste_bytes: AtomicU64::new(0),
            double_clicks: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            starts: AtomicU64::new(0),
            stops: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    pub fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub fn record_stop(&self, reason: StopReason) {
        Self::bump(&self.stops[reason.slot()], 1);
    }

    pub fn stops(&self, reason: StopReason) -> u64 {
        self.stops[reason.slot()].load(Ordering::Relaxed)
    }
}

pub static INPUT_STATS: InputStats = InputStats::new();

/// An async producer for the event channel. It owns one task and ends once
/// `send` fails because the consumer is gone.
pub trait AsyncEventSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Sources registered at startup and spawned together.
#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) -> &mut Self {
        self.sources.push(Box::new(src));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Start every source on its own clone of `tx`. The caller drops its own
    /// sender before joining the handles at shutdown.
    pub fn spawn_all(self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        self.sources
            .into_iter()
            .map(|src| {
                tracing::info!(target: "runtime", source = src.name(), "spawning_event_source");
                src.spawn(tx.clone())
            })
            .collect()
    }
}

/// Emits `Event::Tick` every `period`. Late ticks are skipped, not bunched.
pub struct TickEventSource {
    period: Duration,
}

impl TickEventSource {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let period = self.period;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; nothing to expire yet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        })
    }
}
