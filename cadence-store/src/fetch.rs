//! The seam between the pagination controller and the remote collection.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

/// An item of a remote collection with a stable server-assigned identity.
///
/// Ids are unique within their collection, never reused, and immutable.
pub trait Record: Clone + Send + Sync + 'static {
    /// The record's collection-unique id.
    fn id(&self) -> i64;
}

/// Failure modes of a remote collection fetch.
///
/// Neither variant is retried automatically; the controller logs the
/// failure, keeps its previous state, and waits for the next trigger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The transport failed before a response arrived.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Server(u16),
}

/// Read access to one remote collection.
pub trait Fetch<T>: Send + Sync {
    /// Total number of records in the collection.
    fn count(&self) -> impl Future<Output = Result<u64, FetchError>> + Send;

    /// One page window, ordered by server-defined recency.
    fn window(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<T>, FetchError>> + Send;

    /// A single record by id, with details expanded.
    fn record(&self, id: i64) -> impl Future<Output = Result<T, FetchError>> + Send;
}

impl<T, F: Fetch<T>> Fetch<T> for Arc<F> {
    fn count(&self) -> impl Future<Output = Result<u64, FetchError>> + Send {
        (**self).count()
    }

    fn window(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<T>, FetchError>> + Send {
        (**self).window(page, limit)
    }

    fn record(&self, id: i64) -> impl Future<Output = Result<T, FetchError>> + Send {
        (**self).record(id)
    }
}
