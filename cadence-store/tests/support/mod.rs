//! Scripted in-memory collection standing in for the network.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::{Mutex, Notify};

use cadence_store::{Fetch, FetchError, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub label: String,
}

impl Record for Item {
    fn id(&self) -> i64 {
        self.id
    }
}

pub fn item(id: i64, label: &str) -> Item {
    Item {
        id,
        label: label.to_owned(),
    }
}

struct Gate {
    page: u32,
    limit: u32,
    reached: Arc<Notify>,
    release: Arc<Notify>,
}

/// Serves windows from an ordered in-memory collection, counts calls,
/// and can inject one failure or hold one specific window fetch open.
pub struct ScriptedFetch {
    items: Mutex<Vec<Item>>,
    pub count_calls: AtomicUsize,
    pub window_calls: AtomicUsize,
    pub record_calls: AtomicUsize,
    fail_next: AtomicBool,
    gate: Mutex<Option<Gate>>,
}

impl ScriptedFetch {
    /// A collection of `n` items with ids `1..=n`, newest-first order not
    /// modelled: windows are served in vec order, creations go in front.
    pub fn with_items(n: i64) -> Arc<Self> {
        let items = (1..=n).map(|id| item(id, &format!("item-{id}"))).collect();
        Arc::new(Self {
            items: Mutex::new(items),
            count_calls: AtomicUsize::new(0),
            window_calls: AtomicUsize::new(0),
            record_calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            gate: Mutex::new(None),
        })
    }

    /// Create a record server-side, at the front of the collection.
    pub async fn push_front(&self, new: Item) {
        self.items.lock().await.insert(0, new);
    }

    /// Mutate a record server-side.
    pub async fn update_item(&self, id: i64, label: &str) {
        let mut items = self.items.lock().await;
        if let Some(slot) = items.iter_mut().find(|entry| entry.id == id) {
            slot.label = label.to_owned();
        }
    }

    /// Fail the next fetch call with a network error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Hold the next window fetch matching `(page, limit)` open.
    ///
    /// Returns `(reached, release)`: `reached` fires when the fetch has
    /// arrived at the gate, `release` lets it proceed.
    pub async fn gate_window(&self, page: u32, limit: u32) -> (Arc<Notify>, Arc<Notify>) {
        let reached = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.gate.lock().await = Some(Gate {
            page,
            limit,
            reached: Arc::clone(&reached),
            release: Arc::clone(&release),
        });
        (reached, release)
    }

    pub fn window_call_count(&self) -> usize {
        self.window_calls.load(Ordering::SeqCst)
    }

    pub fn count_call_count(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    fn take_injected_failure(&self) -> Result<(), FetchError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(FetchError::Network("injected failure".to_owned()));
        }
        Ok(())
    }

    async fn wait_at_gate(&self, page: u32, limit: u32) {
        let gate = {
            let mut slot = self.gate.lock().await;
            let armed = matches!(&*slot, Some(gate) if gate.page == page && gate.limit == limit);
            if armed { slot.take() } else { None }
        };

        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
    }
}

impl Fetch<Item> for ScriptedFetch {
    async fn count(&self) -> Result<u64, FetchError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_failure()?;
        Ok(self.items.lock().await.len() as u64)
    }

    async fn window(&self, page: u32, limit: u32) -> Result<Vec<Item>, FetchError> {
        self.window_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_failure()?;
        self.wait_at_gate(page, limit).await;

        let items = self.items.lock().await;
        let start = (page.saturating_sub(1) as usize) * limit as usize;
        let end = (start + limit as usize).min(items.len());
        Ok(items
            .get(start.min(items.len())..end)
            .unwrap_or_default()
            .to_vec())
    }

    async fn record(&self, id: i64) -> Result<Item, FetchError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.take_injected_failure()?;
        self.items
            .lock()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or(FetchError::Server(404))
    }
}
