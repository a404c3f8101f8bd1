//! Selection state for the Wallhaven browser window.

use std::collections::VecDeque;

use crate::wallhaven::Entry;

pub const HISTORY_LEN: usize = 10;

/// The last few applied remote wallpapers, oldest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    items: VecDeque<String>,
}

impl History {
    pub fn push(&mut self, url: impl Into<String>) {
        if self.items.len() == HISTORY_LEN {
            self.items.pop_front();
        }
        self.items.push_back(url.into());
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn latest(&self) -> Option<&str> {
        self.items.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct Gallery {
    entries: Vec<Entry>,
    selected: Option<usize>,
    history: History,
    in_flight: bool,
    queued: bool,
}

impl Gallery {
    pub fn replace(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
        self.selected = None;
    }

    pub fn select(&mut self, index: usize) -> Option<&Entry> {
        let entry = self.entries.get(index)?;
        self.selected = Some(index);
        Some(entry)
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Claims the single operation slot.
    ///
    /// Returns false when something is already running; the refused request
    /// is remembered so [`Gallery::finish`] can ask for one refresh.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            self.queued = true;
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Releases the slot and reports whether a refresh was requested meanwhile.
    pub fn finish(&mut self) -> bool {
        self.in_flight = false;
        std::mem::take(&mut self.queued)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn record_applied(&mut self, url: impl Into<String>) {
        self.history.push(url);
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
