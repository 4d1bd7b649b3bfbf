//! Stable facade for the paginated store used by every dashboard resource.

/// Default page size for freshly mounted controllers.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub mod cache;
pub mod fetch;
pub mod page;
pub mod paginator;
pub mod reconcile;

pub use cache::PageCache;
pub use fetch::{Fetch, FetchError, Record};
pub use page::{clamp_page, total_pages};
pub use paginator::{PageView, Paginator, StoreError};
pub use reconcile::{CreatePolicy, LiveEvent, Reconciler};
