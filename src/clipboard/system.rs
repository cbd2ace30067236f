//! System clipboard backed by `arboard`.

use super::{ClipboardSink, ClipboardSource};
use crate::history::HistoryError;
use arboard::Clipboard;

/// The operating system clipboard.
///
/// A fresh `arboard` handle is opened for every call, so the value can be
/// moved freely between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<Clipboard, HistoryError> {
        Clipboard::new().map_err(|err| HistoryError::Clipboard(err.to_string()))
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>, HistoryError> {
        let mut clipboard = Self::open()?;
        match clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            // Images, files and an empty clipboard all land here
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(err) => Err(HistoryError::Clipboard(err.to_string())),
        }
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), HistoryError> {
        let mut clipboard = Self::open()?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|err| HistoryError::Clipboard(err.to_string()))
    }
}
