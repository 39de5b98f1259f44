//! vellum entrypoint.
//!
//! Startup order: CLI, logging, config, document, terminal. The view then
//! lives on the main task of a current-thread runtime; input and tick
//! sources feed it through one bounded channel.

mod editor;
mod frame;
mod settings;

use anyhow::Result;
use clap::Parser;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, TickEventSource};
use core_render::DrawMode;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalCapabilities};
use editor::{Document, Editor, LoopControl, ShutdownReason};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "vellum.log";
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const SOURCE_JOIN_TIMEOUT: Duration = Duration::from_millis(200);
const INPUT_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "Windowed plain-text editor")]
struct Args {
    /// File to open. Created on first save if it does not exist.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `vellum.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Start with whitespace and newline marks shown.
    #[arg(long = "show-marks")]
    pub show_marks: bool,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Subscriber already installed; dropping the guard stops the writer.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

struct EditorRuntime {
    editor: Editor,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
}

impl EditorRuntime {
    async fn run(&mut self) -> Result<()> {
        let mut stdout = std::io::stdout();
        self.editor.render(&mut stdout)?;

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            if let LoopControl::Break(r) = self.editor.handle_event(&event) {
                reason = r;
                break;
            }
            if let Err(e) = self.editor.render(&mut stdout) {
                error!(target: "runtime", error = %e, "render_error");
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", reason = reason.as_str(), "shutdown_begin");
        // Sources exit once every sender is gone.
        self.tx.take();
        for handle in self.source_handles.drain(..) {
            join_task("event_source", handle, SOURCE_JOIN_TIMEOUT).await;
        }

        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            join_task("input", handle, INPUT_JOIN_TIMEOUT).await;
        }
        info!(target: "runtime.shutdown", reason = reason.as_str(), "shutdown_complete");
    }
}

async fn join_task(name: &'static str, handle: JoinHandle<()>, limit: Duration) {
    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(())) => trace!(target: "runtime.shutdown", task = name, "task_joined"),
        Ok(Err(err)) if err.is_cancelled() => {
            trace!(target: "runtime.shutdown", task = name, "task_cancelled")
        }
        Ok(Err(err)) => error!(target: "runtime.shutdown", task = name, ?err, "task_failed"),
        Err(_) => warn!(target: "runtime.shutdown", task = name, "task_join_timeout"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let (document, text) = Document::open(args.path.clone())?;
    let mode = if args.show_marks {
        DrawMode::ShowMarks
    } else {
        DrawMode::Normal
    };

    let mut backend = CrosstermBackend::new();
    backend.set_title(&format!("vellum - {}", document.display_name()))?;
    let grid = match backend.size() {
        Ok(size) => size,
        Err(e) => {
            warn!(target: "runtime", error = %e, "terminal_size_unavailable");
            settings::fallback_grid(&config)
        }
    };
    let metrics = settings::cell_metrics(&config);
    let editor = Editor::new(
        config,
        document,
        &text,
        grid,
        TerminalCapabilities::detect(),
        mode,
    )?;
    info!(
        target: "runtime",
        columns = grid.0,
        rows = grid.1,
        chars = editor.view().len(),
        "bootstrap_complete"
    );
    drop(text);

    let _terminal_guard = backend.enter_guard()?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone(), metrics);
    let mut sources = EventSourceRegistry::new();
    sources.register(TickEventSource::new(TICK_INTERVAL));
    let source_handles = sources.spawn_all(&tx);

    let mut runtime = EditorRuntime {
        editor,
        rx,
        tx: Some(tx),
        source_handles,
        input_task: Some(input_task),
        input_shutdown: Some(input_shutdown),
    };
    runtime.run().await
}
