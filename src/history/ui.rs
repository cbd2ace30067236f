//! Formatting helpers for displaying clipboard history.
//!
//! Everything here is a pure function of an entry (or of the store's
//! counts) and a reference time, so a view layer can call them on every
//! redraw without touching the store.

use super::models::ClipEntry;
use super::store::HistoryStats;
use chrono::{DateTime, Local, Utc};

/// Formats a relative age label.
///
/// Format: "Just now", "5m ago", "3h ago", "2d ago", and the calendar date
/// ("Mar 01") once the entry is a week old or more.
///
/// # Arguments
///
/// * `timestamp` - When the entry was captured
/// * `now` - Reference time
pub fn format_relative_time(timestamp: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*timestamp);

    if duration.num_minutes() < 1 {
        "Just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        let local_time: DateTime<Local> = timestamp.with_timezone(&Local);
        local_time.format("%b %d").to_string()
    }
}

/// Formats a timestamp in local time for display.
///
/// Format: "YYYY-MM-DD HH:MM:SS"
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    let local_time: DateTime<Local> = timestamp.with_timezone(&Local);
    local_time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats a single entry as one list line.
///
/// Format: "[KIND] preview (age)", prefixed with `★` for favorites.
/// Newlines in the preview are shown as `⏎` to keep the line single.
pub fn format_entry_line(entry: &ClipEntry, now: DateTime<Utc>, preview_length: usize) -> String {
    let preview = entry.preview(preview_length).replace('\n', "⏎");
    let marker = if entry.is_favorite { "★ " } else { "" };

    format!(
        "{}[{}] {} ({})",
        marker,
        entry.kind(),
        preview,
        format_relative_time(&entry.captured_at, now)
    )
}

/// Formats a list of entries, one line each.
pub fn format_entry_list<'a>(
    entries: impl IntoIterator<Item = &'a ClipEntry>,
    now: DateTime<Utc>,
    preview_length: usize,
) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| format_entry_line(entry, now, preview_length))
        .collect()
}

/// Creates the status line shown next to the history.
///
/// # Arguments
///
/// * `stats` - Current entry counts
/// * `favorites_only` - Whether the view currently shows favorites only
pub fn format_status(stats: HistoryStats, favorites_only: bool) -> String {
    if favorites_only && stats.favorites > 0 {
        format!("{} favorites", stats.favorites)
    } else if stats.total == 0 {
        "Empty".to_string()
    } else if stats.favorites > 0 {
        format!("{} items · {} favorites", stats.total, stats.favorites)
    } else {
        format!("{} items", stats.total)
    }
}
