//! Search and filtering for clipboard history.
//!
//! Queries are lazy: [`Matches`] walks the history slice on demand and can
//! be cloned to restart from the current position.

use super::models::ClipEntry;
use std::slice;

/// Filter applied by [`crate::history::HistoryStore::query`].
///
/// Both conditions must hold for an entry to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Only include favorites.
    pub favorites_only: bool,

    /// Case-insensitive substring to look for in the content. Empty or
    /// whitespace-only text does not filter anything.
    pub search_text: Option<String>,
}

impl HistoryFilter {
    /// A filter that matches every entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter that matches favorites only.
    pub fn favorites() -> Self {
        Self {
            favorites_only: true,
            search_text: None,
        }
    }

    /// Adds a search term to the filter.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Checks a single entry against the filter.
    pub fn matches(&self, entry: &ClipEntry) -> bool {
        matches_entry(entry, self.favorites_only, self.needle().as_deref())
    }

    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(str::to_lowercase)
    }
}

fn matches_entry(entry: &ClipEntry, favorites_only: bool, needle_lower: Option<&str>) -> bool {
    if favorites_only && !entry.is_favorite {
        return false;
    }

    match needle_lower {
        Some(needle) => entry.contains_lowercase(needle),
        None => true,
    }
}

/// Lazy iterator over the entries matching a [`HistoryFilter`], newest
/// first.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    entries: slice::Iter<'a, ClipEntry>,
    favorites_only: bool,
    needle: Option<String>,
}

impl<'a> Matches<'a> {
    pub(crate) fn new(entries: &'a [ClipEntry], filter: &HistoryFilter) -> Self {
        Self {
            entries: entries.iter(),
            favorites_only: filter.favorites_only,
            needle: filter.needle(),
        }
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a ClipEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let favorites_only = self.favorites_only;
        let needle = self.needle.as_deref();
        self.entries
            .find(|entry| matches_entry(entry, favorites_only, needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entries.size_hint().1)
    }
}
