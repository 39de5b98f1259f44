//! Terminal input: crossterm's async `EventStream` translated into
//! `core_events` on a tokio task.

mod async_service;
mod click_tracker;
mod keys;
mod mouse;

pub use async_service::AsyncInputShutdown;
pub use click_tracker::{ClickTracker, DOUBLE_CLICK_INTERVAL};
pub use keys::map_key_event;
pub use mouse::{CellMetrics, MouseMapper};

use async_service::spawn_async_event_task;
use core_events::{Event, KeyModifiers};
use crossterm::event::KeyModifiers as CMods;
use tokio::task::JoinHandle;

#[inline]
pub(crate) fn log_paste(data: &str) {
    tracing::trace!(target: "input.paste", len = data.len(), "paste");
}

/// Spawn the input task. Mouse cells are mapped to pixels with `metrics`.
///
/// Returns the task handle and a shutdown handle that stops it promptly.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
    metrics: CellMetrics,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender, metrics)
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
