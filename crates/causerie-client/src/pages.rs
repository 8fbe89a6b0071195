//! Cursor-based backward pagination over the backing store.
//!
//! History is read newest-first in fixed windows: cursor `k` covers rows
//! `[k * PAGE_SIZE, (k + 1) * PAGE_SIZE)` of the reverse-chronological
//! ordering.  A short page means history is exhausted.

use tracing::warn;

use causerie_shared::constants::PAGE_SIZE;
use causerie_shared::types::StoredMessage;

use crate::backend::{BackendError, MessageBackend};

/// One fetched page, newest first as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub messages: Vec<StoredMessage>,
    /// Cursor of the next older page; `None` once history is exhausted.
    pub next_cursor: Option<u64>,
}

impl Page {
    /// An empty terminal page.
    pub fn end_of_history() -> Self {
        Self {
            messages: Vec::new(),
            next_cursor: None,
        }
    }
}

/// Fetch the page at `cursor`.
pub async fn fetch_page<B: MessageBackend>(
    backend: &B,
    cursor: u64,
) -> Result<Page, BackendError> {
    let offset = cursor * u64::from(PAGE_SIZE);
    let messages = backend.select_page(offset, PAGE_SIZE).await?;

    let next_cursor = (messages.len() as u32 == PAGE_SIZE).then(|| cursor + 1);

    Ok(Page {
        messages,
        next_cursor,
    })
}

/// Degraded variant for history backfill: a failed fetch is logged and
/// becomes an empty terminal page so the view keeps moving, at the cost of
/// silently truncating older history.  Initial loads must use [`fetch_page`]
/// and surface the failure instead.
pub async fn fetch_page_or_empty<B: MessageBackend>(backend: &B, cursor: u64) -> Page {
    match fetch_page(backend, cursor).await {
        Ok(page) => page,
        Err(e) => {
            warn!(cursor, error = %e, "history fetch failed; treating as end of history");
            Page::end_of_history()
        }
    }
}

/// Claim/finish bookkeeping for backfill cursors.
///
/// At most one fetch is in flight at a time, and each cursor is claimed at
/// most once, so a burst of scroll events cannot issue duplicate requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    next_cursor: Option<u64>,
    in_flight: Option<u64>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor of the next page to fetch, if any remains.
    pub fn next_cursor(&self) -> Option<u64> {
        self.next_cursor
    }

    /// Whether a claimed fetch has not finished yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record the continuation cursor reported by a page.
    pub fn set_next(&mut self, cursor: Option<u64>) {
        self.next_cursor = cursor;
    }

    /// Claim the next cursor for fetching.
    ///
    /// Returns `None` while a fetch is in flight or history is exhausted;
    /// callers can therefore invoke this on every scroll event.
    pub fn claim(&mut self) -> Option<u64> {
        if self.in_flight.is_some() {
            return None;
        }
        let cursor = self.next_cursor?;
        self.in_flight = Some(cursor);
        Some(cursor)
    }

    /// Record completion of the fetch claimed for `cursor`.
    pub fn finish(&mut self, cursor: u64, next: Option<u64>) {
        if self.in_flight == Some(cursor) {
            self.in_flight = None;
            self.next_cursor = next;
        }
    }
}
