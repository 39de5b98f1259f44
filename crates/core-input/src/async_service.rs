use crate::keys::map_key_event;
use crate::log_paste;
use crate::mouse::{CellMetrics, MouseMapper};
use core_events::{Event, INPUT_STATS, InputEvent, InputStats, StopReason};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::time::Instant;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch;
use tokio::task;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, trace, warn};

/// Stops the input task. Cloneable; the first `signal` wins.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    tx: watch::Sender<bool>,
}

impl AsyncInputShutdown {
    fn pair() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, rx)
    }

    pub fn signal(&self) {
        self.tx.send_replace(true);
    }
}

/// Resolves once shutdown is signalled. A dropped handle never signals.
async fn stop_requested(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
    metrics: CellMetrics,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, stop_rx) = AsyncInputShutdown::pair();
    let handle = task::spawn(async move {
        InputPump::new(sender, EventStream::new(), stop_rx, metrics)
            .run()
            .await;
    });
    (handle, shutdown)
}

/// Reads terminal events, translates them and forwards them until stopped.
struct InputPump<S> {
    sender: Sender<Event>,
    stream: S,
    mouse: MouseMapper,
    stop_rx: watch::Receiver<bool>,
}

impl<S> InputPump<S>
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    fn new(
        sender: Sender<Event>,
        stream: S,
        stop_rx: watch::Receiver<bool>,
        metrics: CellMetrics,
    ) -> Self {
        Self {
            sender,
            stream,
            mouse: MouseMapper::new(metrics),
            stop_rx,
        }
    }

    async fn run(mut self) -> StopReason {
        info!(target: "input.thread", "async_input_task_started");
        InputStats::bump(&INPUT_STATS.starts, 1);
        let reason = self.pump().await;
        INPUT_STATS.record_stop(reason);
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
        reason
    }

    async fn pump(&mut self) -> StopReason {
        loop {
            let next = tokio::select! {
                biased;
                _ = stop_requested(&mut self.stop_rx) => return StopReason::Signal,
                next = self.stream.next() => next,
            };
            let raw = match next {
                None => return StopReason::StreamEnded,
                Some(Err(err)) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    return StopReason::StreamError;
                }
                Some(Ok(raw)) => raw,
            };
            let Some(input) = self.translate(raw) else {
                continue;
            };
            if self.sender.send(Event::Input(input)).await.is_err() {
                InputStats::bump(&INPUT_STATS.send_failures, 1);
                return StopReason::ChannelClosed;
            }
        }
    }

    fn translate(&mut self, ev: CEvent) -> Option<InputEvent> {
        match ev {
            CEvent::Key(key) => {
                let key = map_key_event(&key)?;
                InputStats::bump(&INPUT_STATS.keys, 1);
                trace!(target: "input.event", repeat = key.repeat, mods = ?key.mods, "key");
                Some(InputEvent::Key(key))
            }
            CEvent::Mouse(m) => {
                let mapped = self.mouse.map(&m, Instant::now())?;
                trace!(target: "input.mouse", kind = ?mapped.kind, x = mapped.x, y = mapped.y, "mouse");
                Some(InputEvent::Mouse(mapped))
            }
            CEvent::Resize(w, h) => {
                trace!(target: "input.event", w, h, "resize");
                Some(InputEvent::Resize(w, h))
            }
            CEvent::Paste(data) => {
                log_paste(&data);
                InputStats::bump(&INPUT_STATS.paste_bytes, data.len() as u64);
                Some(InputEvent::Paste(data))
            }
            CEvent::FocusGained => Some(InputEvent::FocusGained),
            CEvent::FocusLost => Some(InputEvent::FocusLost),
        }
    }
}
