//! Per-page window cache scoped to one page-size configuration.

use std::collections::HashMap;

use crate::fetch::Record;

/// Mapping from page number to the window last fetched for that page.
///
/// Entries are only meaningful under the page size they were fetched with,
/// so the owning controller discards the whole cache whenever the page size
/// changes. There is no other eviction: a session that walks many pages
/// keeps them all in memory, a deliberate simplicity trade-off.
#[derive(Debug, Clone, Default)]
pub struct PageCache<T> {
    windows: HashMap<u32, Vec<T>>,
}

impl<T> PageCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }

    /// The cached window for a page, if any.
    pub fn get(&self, page: u32) -> Option<&[T]> {
        self.windows.get(&page).map(Vec::as_slice)
    }

    /// Store the window fetched for a page, replacing any previous one.
    pub fn put(&mut self, page: u32, window: Vec<T>) {
        self.windows.insert(page, window);
    }

    /// Drop a single page's window.
    pub fn remove(&mut self, page: u32) {
        self.windows.remove(&page);
    }

    /// Drop every cached window. Required whenever the page size changes.
    pub fn clear(&mut self) {
        self.windows.clear();
    }

    /// Page numbers currently cached, in no particular order.
    pub fn pages(&self) -> Vec<u32> {
        self.windows.keys().copied().collect()
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no pages are cached.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl<T: Record> PageCache<T> {
    /// Replace a record in place in whichever cached window holds it.
    ///
    /// Returns the page that was patched, or `None` when no cached window
    /// contains the record's id.
    pub fn patch(&mut self, record: &T) -> Option<u32> {
        let id = record.id();
        for (page, window) in &mut self.windows {
            if let Some(slot) = window.iter_mut().find(|entry| entry.id() == id) {
                *slot = record.clone();
                return Some(*page);
            }
        }
        None
    }
}
