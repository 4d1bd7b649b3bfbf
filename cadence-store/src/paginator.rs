//! Generic pagination controller over one remote collection.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::PageCache;
use crate::fetch::{Fetch, FetchError, Record};
use crate::page;

/// Errors surfaced by controller operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// `set_limit` was called with a page size of zero.
    #[error("page size must be greater than zero")]
    InvalidLimit,
    /// The underlying fetch failed; previous state is untouched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A cheap snapshot of the controller's visible window and meta state.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    pub current_page: u32,
    pub limit: u32,
    /// `None` until the first successful count fetch.
    pub total_count: Option<u64>,
    pub total_pages: u32,
    pub visible: Vec<T>,
}

struct PageState<T> {
    current_page: u32,
    limit: u32,
    total_count: Option<u64>,
    total_pages: u32,
    visible: Vec<T>,
    cache: PageCache<T>,
}

/// Windowed view of a server-side collection, one instance per resource.
///
/// The controller keeps a per-page cache under the current page size,
/// serves cache hits without touching the network, and commits fetch
/// results atomically. Every network fetch is tagged with a generation
/// taken at start; `set_limit` and newer fetches bump the generation, so
/// a completion that lost the race commits nothing (last write wins).
/// The state lock is never held across a network await.
pub struct Paginator<T, F> {
    fetcher: F,
    state: Mutex<PageState<T>>,
    generation: AtomicU64,
    in_flight: AtomicUsize,
}

impl<T: Record, F: Fetch<T>> Paginator<T, F> {
    /// Create a controller with the default page size.
    ///
    /// Callers are expected to follow up with an eager `fetch_page(1)`.
    pub fn new(fetcher: F) -> Self {
        Self::with_limit(fetcher, crate::DEFAULT_PAGE_SIZE)
    }

    /// Create a controller with an explicit initial page size.
    pub fn with_limit(fetcher: F, limit: u32) -> Self {
        Self {
            fetcher,
            state: Mutex::new(PageState {
                current_page: 1,
                limit: limit.max(1),
                total_count: None,
                total_pages: 1,
                visible: Vec::new(),
                cache: PageCache::new(),
            }),
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Navigate to a page under the current page size, using the cache.
    pub async fn fetch_page(&self, page: u32) -> Result<(), StoreError> {
        let limit = self.state.lock().await.limit;
        self.fetch_page_with(page, limit, true).await
    }

    /// Navigate to a page, optionally bypassing the cache.
    ///
    /// A cache hit under the current page size commits synchronously with
    /// zero network calls. On a miss the total count is fetched once while
    /// unknown, then the page window; both land in a single atomic commit.
    /// A failed fetch logs and leaves every piece of prior state unchanged.
    /// Keeping `page` within `1..=total_pages` is the caller's job.
    pub async fn fetch_page_with(
        &self,
        page: u32,
        limit: u32,
        use_cache: bool,
    ) -> Result<(), StoreError> {
        {
            let mut state = self.state.lock().await;
            let cached = if use_cache && limit == state.limit {
                state.cache.get(page).map(<[T]>::to_vec)
            } else {
                None
            };

            if let Some(window) = cached {
                state.current_page = page;
                state.visible = window;
                return Ok(());
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = self.fetch_and_commit(page, limit, generation).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Err(err) = &result {
            warn!(%err, page, limit, "page fetch failed; keeping previous window");
        }

        result.map_err(StoreError::from)
    }

    async fn fetch_and_commit(
        &self,
        page: u32,
        limit: u32,
        generation: u64,
    ) -> Result<(), FetchError> {
        // A zero count is treated as unknown: an empty collection may have
        // gained records since, and counting it again is one cheap query.
        let known_total = self.state.lock().await.total_count;
        let total = match known_total {
            Some(total) if total > 0 => total,
            _ => self.fetcher.count().await?,
        };

        let window = self.fetcher.window(page, limit).await?;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(page, limit, "discarding superseded fetch result");
            return Ok(());
        }

        state.current_page = page;
        state.limit = limit;
        state.total_count = Some(total);
        state.total_pages = page::total_pages(total, limit);
        state.visible = window.clone();
        state.cache.put(page, window);

        Ok(())
    }

    /// Change the page size, flush the cache, and reload page one.
    ///
    /// A page size of zero is rejected without touching state. The known
    /// total count survives; only the windows keyed by the old size go.
    pub async fn set_limit(&self, limit: u32) -> Result<(), StoreError> {
        if limit == 0 {
            warn!("rejecting page size of zero");
            return Err(StoreError::InvalidLimit);
        }

        {
            let mut state = self.state.lock().await;
            // Invalidate any fetch still in flight under the old size.
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.cache.clear();
            state.current_page = 1;
            state.limit = limit;
            state.visible.clear();
        }

        self.fetch_page_with(1, limit, false).await
    }

    /// The fetcher backing this controller, for single-record lookups.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Whether a network fetch is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Snapshot the visible window and pagination meta for rendering.
    pub async fn snapshot(&self) -> PageView<T> {
        let state = self.state.lock().await;
        PageView {
            current_page: state.current_page,
            limit: state.limit,
            total_count: state.total_count,
            total_pages: state.total_pages,
            visible: state.visible.clone(),
        }
    }

    /// The cached window for a page, if one exists under the current size.
    pub async fn cached_window(&self, page: u32) -> Option<Vec<T>> {
        let state = self.state.lock().await;
        state.cache.get(page).map(<[T]>::to_vec)
    }

    /// Page numbers currently cached.
    pub async fn cached_pages(&self) -> Vec<u32> {
        let state = self.state.lock().await;
        let mut pages = state.cache.pages();
        pages.sort_unstable();
        pages
    }

    /// Account for an out-of-band creation without refetching.
    ///
    /// Bumps the known total and derived page count; a controller that has
    /// never counted stays unknown until its next fetch.
    pub async fn note_created(&self) {
        let mut state = self.state.lock().await;
        if let Some(total) = state.total_count.as_mut() {
            *total += 1;
            let total = *total;
            state.total_pages = page::total_pages(total, state.limit);
        }
    }

    /// Prepend a freshly created record to the leading page.
    ///
    /// When page one is visible the record lands at the front of both the
    /// window and `cache[1]`; the window may transiently exceed the page
    /// size until the next real fetch, as the server still reports the
    /// pushed-out row on page two. From any other page the record is not
    /// shown, but the stale leading-page cache entry is dropped so the next
    /// navigation to page one refetches.
    pub async fn apply_created(&self, record: T) {
        self.note_created().await;

        let mut state = self.state.lock().await;
        if state.current_page == 1 {
            state.visible.insert(0, record);
            let window = state.visible.clone();
            state.cache.put(1, window);
        } else {
            state.cache.remove(1);
        }
    }

    /// Replace an updated record in place, wherever it currently lives.
    ///
    /// Order, window length, and the total count are unchanged. A record
    /// that is neither visible nor cached is dropped silently.
    pub async fn apply_updated(&self, record: T) {
        let mut state = self.state.lock().await;
        let id = record.id();

        if let Some(slot) = state.visible.iter_mut().find(|entry| entry.id() == id) {
            *slot = record;
            let page = state.current_page;
            let window = state.visible.clone();
            state.cache.put(page, window);
            return;
        }

        if state.cache.patch(&record).is_none() {
            debug!(id, "update event for a record outside every cached page");
        }
    }
}
