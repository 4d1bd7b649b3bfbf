//! Applies push-channel events to a controller without full refetches.

use std::sync::Arc;

use tracing::warn;

use crate::fetch::{Fetch, Record};
use crate::paginator::Paginator;

/// One push event, consumed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEvent {
    /// A record was created. Some sources do not carry the new id.
    Created { id: Option<i64> },
    /// An existing record changed.
    Updated { id: i64 },
}

/// How a collection reacts to a creation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Refetch page one wholesale; other cached pages stay valid because
    /// rows below the leading page keep their relative order. Two racing
    /// creations both refetch, and the later commit wins wholesale.
    RefreshLeadingPage,
    /// Fetch the single new record and prepend it to the leading page.
    /// Needs the event to carry an id; falls back to a leading-page
    /// refresh when it does not.
    PrependRecord,
}

/// Routes live events into one controller under a per-collection policy.
pub struct Reconciler<T, F> {
    paginator: Arc<Paginator<T, F>>,
    create_policy: CreatePolicy,
}

impl<T: Record, F: Fetch<T>> Reconciler<T, F> {
    /// Wrap a shared controller with a creation policy.
    pub fn new(paginator: Arc<Paginator<T, F>>, create_policy: CreatePolicy) -> Self {
        Self {
            paginator,
            create_policy,
        }
    }

    /// Apply one event. Failures are logged and swallowed: a lost event
    /// only delays freshness until the next navigation or fetch.
    pub async fn apply(&self, event: LiveEvent) {
        match event {
            LiveEvent::Created { id } => match (self.create_policy, id) {
                (CreatePolicy::PrependRecord, Some(id)) => self.prepend(id).await,
                _ => self.refresh_leading_page().await,
            },
            LiveEvent::Updated { id } => self.patch(id).await,
        }
    }

    async fn prepend(&self, id: i64) {
        match self.paginator.fetcher().record(id).await {
            Ok(record) => self.paginator.apply_created(record).await,
            Err(err) => warn!(%err, id, "dropping create event; record fetch failed"),
        }
    }

    async fn refresh_leading_page(&self) {
        self.paginator.note_created().await;

        let limit = self.paginator.snapshot().await.limit;
        if let Err(err) = self.paginator.fetch_page_with(1, limit, false).await {
            warn!(%err, "leading-page refresh failed; keeping previous window");
        }
    }

    async fn patch(&self, id: i64) {
        match self.paginator.fetcher().record(id).await {
            Ok(record) => self.paginator.apply_updated(record).await,
            Err(err) => warn!(%err, id, "dropping update event; record fetch failed"),
        }
    }
}
