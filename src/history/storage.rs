//! Persistent storage for clipboard history.
//!
//! The history is stored as a single JSON array, newest entry first:
//!
//! ```json
//! [
//!   { "content": "hello", "timestamp": "2025-01-15T14:30:45.123Z", "isFavorite": true }
//! ]
//! ```
//!
//! Saves always rewrite the whole file through a temporary file followed by
//! a rename, so an interrupted write never destroys the previous valid copy.

use super::models::{ClipEntry, HistoryError};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use crossbeam::channel::{self, Receiver, Sender};
use serde::{Deserialize, Deserializer, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

/// Directory name used under the platform data and config directories.
pub const APP_DIR_NAME: &str = "clip-history";

/// File name of the persisted history.
pub const HISTORY_FILE_NAME: &str = "history.json";

/// Durable home of a history log.
///
/// Implementations must be `Send` so a store can be moved onto the thread
/// that consumes clipboard events.
pub trait HistoryStorage: Send {
    /// Reads the persisted entries, newest first.
    ///
    /// A location that does not exist yet yields an empty history.
    fn load(&self) -> Result<Vec<ClipEntry>, HistoryError>;

    /// Replaces the persisted entries with `entries`.
    fn save(&self, entries: &[ClipEntry]) -> Result<(), HistoryError>;
}

/// Gets the default history file path.
///
/// Returns `<data_local_dir>/clip-history/history.json`, e.g.
/// `~/.local/share/clip-history/history.json` on Linux or
/// `%LOCALAPPDATA%\clip-history\history.json` on Windows.
///
/// # Errors
///
/// Returns `HistoryError::StoragePathUnavailable` if the platform has no
/// per-user data directory.
pub fn default_history_path() -> Result<PathBuf, HistoryError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(HISTORY_FILE_NAME))
        .ok_or(HistoryError::StoragePathUnavailable)
}

/// On-disk record for a single entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    #[serde(alias = "Content")]
    content: String,

    #[serde(alias = "Timestamp", deserialize_with = "deserialize_timestamp")]
    timestamp: DateTime<Utc>,

    #[serde(rename = "isFavorite", alias = "IsFavorite")]
    is_favorite: bool,
}

impl From<&ClipEntry> for StoredEntry {
    fn from(entry: &ClipEntry) -> Self {
        Self {
            content: entry.content.clone(),
            timestamp: entry.captured_at,
            is_favorite: entry.is_favorite,
        }
    }
}

impl From<StoredEntry> for ClipEntry {
    fn from(stored: StoredEntry) -> Self {
        let mut entry = ClipEntry::new(stored.content, stored.timestamp);
        entry.is_favorite = stored.is_favorite;
        entry
    }
}

/// Accepts RFC 3339 timestamps and offset-less ISO timestamps. The latter
/// were written by the older desktop tool in local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

/// Stores the history as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage backed by the file at `path`. Nothing is touched on
    /// disk until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a storage at [`default_history_path`].
    pub fn at_default_location() -> Result<Self, HistoryError> {
        default_history_path().map(Self::new)
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(HISTORY_FILE_NAME));
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl HistoryStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<ClipEntry>, HistoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<StoredEntry> = serde_json::from_str(&raw)?;
        Ok(stored.into_iter().map(ClipEntry::from).collect())
    }

    fn save(&self, entries: &[ClipEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let stored: Vec<StoredEntry> = entries.iter().map(StoredEntry::from).collect();
        let json = serde_json::to_vec_pretty(&stored)?;

        // Write to a temporary file first
        let temp_path = self.temp_path();
        let mut temp_file = File::create(&temp_path)?;
        temp_file.write_all(&json)?;
        temp_file.sync_all()?;
        drop(temp_file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<ClipEntry>,
    saves: usize,
    fail_saves: bool,
}

/// Keeps the "persisted" history in memory.
///
/// Clones share the same state, so a test can hand one clone to a store and
/// inspect what was saved through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage whose next load returns `entries`.
    pub fn with_entries(entries: Vec<ClipEntry>) -> Self {
        let storage = Self::default();
        storage.lock().entries = entries;
        storage
    }

    /// Entries written by the most recent successful save.
    pub fn snapshot(&self) -> Vec<ClipEntry> {
        self.lock().entries.clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    /// Makes every following save fail until reset.
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HistoryStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<ClipEntry>, HistoryError> {
        Ok(self.snapshot())
    }

    fn save(&self, entries: &[ClipEntry]) -> Result<(), HistoryError> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(HistoryError::Storage(std::io::Error::new(
                ErrorKind::Other,
                "memory storage is set to fail",
            )));
        }
        state.entries = entries.to_vec();
        state.saves += 1;
        Ok(())
    }
}

enum WriteCommand {
    Save(Vec<ClipEntry>),
    Flush(Sender<()>),
}

/// Applies saves on a background thread so callers never wait on disk I/O.
///
/// Saves are queued on a single channel and written by a single worker, so
/// they reach the inner storage in exactly the order they were requested.
/// Dropping the queue writes everything still pending before returning.
pub struct QueuedStorage<S: HistoryStorage + Sync + 'static> {
    inner: Arc<S>,
    sender: Option<Sender<WriteCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: HistoryStorage + Sync + 'static> QueuedStorage<S> {
    /// Starts the writer thread for `inner`.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Storage` if the thread cannot be spawned.
    pub fn new(inner: S) -> Result<Self, HistoryError> {
        let inner = Arc::new(inner);
        let (sender, receiver) = channel::unbounded();
        let worker_storage = Arc::clone(&inner);

        let worker = thread::Builder::new()
            .name("clip-history-writer".to_string())
            .spawn(move || run_writer(worker_storage.as_ref(), receiver))?;

        Ok(Self {
            inner,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Blocks until every save queued so far has been applied.
    pub fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };

        let (ack_sender, ack_receiver) = channel::bounded(1);
        if sender.send(WriteCommand::Flush(ack_sender)).is_ok() {
            let _ = ack_receiver.recv();
        }
    }

    /// The wrapped storage.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn run_writer<S: HistoryStorage>(storage: &S, commands: Receiver<WriteCommand>) {
    for command in commands {
        match command {
            WriteCommand::Save(entries) => {
                if let Err(err) = storage.save(&entries) {
                    log::warn!(
                        "Background save of {} history entries failed: {}",
                        entries.len(),
                        err
                    );
                }
            }
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    log::debug!("History writer stopped");
}

impl<S: HistoryStorage + Sync + 'static> HistoryStorage for QueuedStorage<S> {
    fn load(&self) -> Result<Vec<ClipEntry>, HistoryError> {
        self.inner.load()
    }

    fn save(&self, entries: &[ClipEntry]) -> Result<(), HistoryError> {
        match &self.sender {
            Some(sender) => match sender.send(WriteCommand::Save(entries.to_vec())) {
                Ok(()) => Ok(()),
                // Worker is gone; write inline to keep ordering intact.
                Err(_) => self.inner.save(entries),
            },
            None => self.inner.save(entries),
        }
    }
}

impl<S: HistoryStorage + Sync + 'static> Drop for QueuedStorage<S> {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("History writer thread panicked");
            }
        }
    }
}
