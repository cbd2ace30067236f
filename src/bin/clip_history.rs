//! Clipboard history daemon
//!
//! Watches the system clipboard and records every text change into the
//! persistent history until interrupted.
//!
//! # Usage
//!
//! ```text
//! clip-history [CONFIG_PATH]
//! ```
//!
//! Without an argument the settings are read from
//! `<config_dir>/clip-history/config.json`. Log output goes to stderr and
//! honours `RUST_LOG` (default level `info`).

use anyhow::Context;
use chrono::Utc;
use clip_history::clipboard::{ClipboardEvent, ClipboardWatcher, SystemClipboard};
use clip_history::config::{default_config_path, load_config_file, ClipHistoryConfig};
use clip_history::history::{format_status, HistoryStore, JsonFileStorage, QueuedStorage};
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use std::path::PathBuf;
use std::time::Duration;

/// How often expired entries are swept while the clipboard is idle.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting clip-history {}", env!("CARGO_PKG_VERSION"));

    let config = load_settings()?;
    let history_path = config
        .history_path()
        .context("Could not determine history file location")?;
    log::info!("History file: {}", history_path.display());

    let storage = QueuedStorage::new(JsonFileStorage::new(history_path))
        .context("Could not start history writer")?;
    let store = HistoryStore::open(storage, config.retention_policy(), Utc::now());
    log::info!("{}", format_status(store.stats(), false));

    let (event_sender, event_receiver) = channel::unbounded();
    let watcher = ClipboardWatcher::new(config.poll_interval())
        .with_last_text(store.head().map(|entry| entry.content.clone()))
        .spawn(SystemClipboard::new(), event_sender)
        .context("Could not start clipboard watcher")?;

    let recorder = tokio::task::spawn_blocking(move || record_events(store, event_receiver));

    shutdown_signal().await?;
    log::info!("Shutting down");

    // Stopping the watcher closes the event channel, which ends the recorder
    watcher.stop();
    let store = recorder.await.context("History recorder failed")?;
    log::info!("{}", format_status(store.stats(), false));

    // Dropping the store drains the queued writes
    drop(store);
    log::info!("History saved");

    Ok(())
}

fn load_settings() -> anyhow::Result<ClipHistoryConfig> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) => Some(PathBuf::from(arg)),
        None => default_config_path(),
    };

    match path {
        Some(path) => {
            log::debug!("Loading settings from {}", path.display());
            load_config_file(&path)
                .with_context(|| format!("Could not load settings from {}", path.display()))
        }
        None => Ok(ClipHistoryConfig::default()),
    }
}

/// Inserts clipboard events into the store until the channel closes.
fn record_events(mut store: HistoryStore, events: Receiver<ClipboardEvent>) -> HistoryStore {
    loop {
        match events.recv_timeout(PRUNE_INTERVAL) {
            Ok(event) => {
                if let Some(id) = store.insert(&event.text, event.observed_at) {
                    log::debug!("Recorded entry {} ({} total)", id, store.len());
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                let removed = store.prune(Utc::now());
                if removed > 0 {
                    log::info!("Removed {} expired entries", removed);
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    store
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl+C")?;
                log::debug!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                log::debug!("Received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        log::debug!("Received Ctrl+C");
    }

    Ok(())
}
