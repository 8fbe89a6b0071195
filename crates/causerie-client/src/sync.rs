//! Orchestration of fetching, caching, optimistic send, and reconciliation.
//!
//! The controller is the only writer of shared client state: it drives the
//! page fetches, owns the cursor progression, applies merges to the
//! [`Timeline`], and consults the [`ScrollAnchor`] to decide which viewport
//! effects to emit.  All operations run on one logical task; suspension
//! happens only at backing-store I/O.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use causerie_shared::time;
use causerie_shared::types::{PendingId, StoredMessage};

use crate::backend::{BackendError, MessageBackend};
use crate::events::{self, EventSender, SendFailedPayload, UiEvent};
use crate::pages::{self, Page, Pagination};
use crate::scroll::{ScrollAnchor, ScrollMetrics, ScrollState};
use crate::timeline::Timeline;

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded yet.
    Idle,
    /// First page fetch in flight.
    LoadingInitial,
    /// Interactive.
    Ready,
    /// Older-history fetch in flight.
    LoadingMore,
    /// A write is in flight.
    Sending,
    /// The last write was rejected; the failed entry can be retried.
    SendFailed,
}

/// A claimed backfill fetch.  Produced by [`SyncController::poll_load_more`]
/// and handed back to [`SyncController::apply_page`] with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    cursor: u64,
}

impl PageRequest {
    pub fn cursor(&self) -> u64 {
        self.cursor
    }
}

/// Synchronization controller for one message view.
pub struct SyncController<B> {
    backend: B,
    timeline: Timeline,
    pagination: Pagination,
    anchor: ScrollAnchor,
    phase: Phase,
    events: EventSender,
    closed: bool,
}

impl<B: MessageBackend> SyncController<B> {
    pub fn new(backend: B, events: EventSender) -> Self {
        Self {
            backend,
            timeline: Timeline::new(),
            pagination: Pagination::new(),
            anchor: ScrollAnchor::new(),
            phase: Phase::Idle,
            events,
            closed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Feed one scroll event through the anchor.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> ScrollState {
        self.anchor.on_scroll(metrics)
    }

    /// Scroll target for the rendering layer after content changed.
    pub fn follow_target(&self, new_scroll_height: f64) -> Option<f64> {
        self.anchor.follow_target(new_scroll_height)
    }

    /// Load the newest page of history.
    ///
    /// Unlike backfill, a failure here is surfaced: starting from an empty
    /// view with silently truncated history would look like an empty room.
    /// Calling again after success is a no-op, so the initial force-scroll
    /// fires exactly once.
    pub async fn load_initial(&mut self) -> Result<(), BackendError> {
        if self.phase != Phase::Idle {
            return Ok(());
        }
        self.phase = Phase::LoadingInitial;

        let page = match pages::fetch_page(&self.backend, 0).await {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "initial load failed");
                self.phase = Phase::Idle;
                return Err(e);
            }
        };

        if self.closed {
            debug!("dropping initial page for closed controller");
            return Ok(());
        }

        self.pagination.set_next(page.next_cursor);

        let mut rows = page.messages;
        rows.reverse(); // pages arrive newest first, the cache is oldest first
        self.timeline.merge(rows);

        self.phase = Phase::Ready;
        self.anchor.force_follow();

        events::emit(&self.events, UiEvent::TimelineUpdated);
        events::emit(&self.events, UiEvent::ForceScrollToBottom);

        info!(messages = self.timeline.len(), "initial history loaded");
        Ok(())
    }

    /// Claim the next older page when the user is near the top.
    ///
    /// Idempotent under scroll-event bursts: while a fetch is in flight (or
    /// history is exhausted) nothing is claimed.
    pub fn poll_load_more(&mut self, scroll: &ScrollState) -> Option<PageRequest> {
        if self.closed || self.phase != Phase::Ready || !scroll.is_near_top {
            return None;
        }

        let cursor = self.pagination.claim()?;
        self.phase = Phase::LoadingMore;
        debug!(cursor, "loading older history");
        Some(PageRequest { cursor })
    }

    /// Apply a completed backfill fetch.
    ///
    /// A completion arriving after [`close`](Self::close) is dropped, never
    /// applied.
    pub fn apply_page(&mut self, request: PageRequest, page: Page) {
        if self.closed {
            debug!(cursor = request.cursor, "dropping page for closed controller");
            return;
        }

        self.pagination.finish(request.cursor, page.next_cursor);

        let mut rows = page.messages;
        rows.reverse();
        self.timeline.merge(rows);

        if self.phase == Phase::LoadingMore {
            self.phase = Phase::Ready;
        }

        events::emit(&self.events, UiEvent::TimelineUpdated);
        if self.anchor.auto_follow() {
            events::emit(&self.events, UiEvent::StickToBottom);
        }
    }

    /// Claim, fetch (degraded), and apply in one step.
    ///
    /// Returns `true` when a page was actually fetched.
    pub async fn load_more_if_needed(&mut self, scroll: &ScrollState) -> bool {
        let Some(request) = self.poll_load_more(scroll) else {
            return false;
        };

        let page = pages::fetch_page_or_empty(&self.backend, request.cursor()).await;
        self.apply_page(request, page);
        true
    }

    /// Begin an optimistic send: stamp the text with the current instant and
    /// make it visible immediately, before the write completes.
    ///
    /// Returns `None` (and does nothing) for blank input.
    pub fn begin_send(&mut self, text: &str) -> Option<(PendingId, StoredMessage)> {
        if self.closed || text.trim().is_empty() {
            return None;
        }

        let message = StoredMessage {
            text: text.to_string(),
            time: time::encode(Utc::now()),
        };
        let id = PendingId::new();

        self.timeline.insert_pending(id, message.clone());
        self.phase = Phase::Sending;

        events::emit(&self.events, UiEvent::TimelineUpdated);
        if self.anchor.auto_follow() {
            events::emit(&self.events, UiEvent::StickToBottom);
        }

        Some((id, message))
    }

    /// Reconcile an optimistic entry with the write result.
    ///
    /// Success makes the store of record authoritative: the newest page is
    /// read back and supersedes both the optimistic entry and the confirmed
    /// window it covers.  If that read-back fails the entry is kept and
    /// promoted to confirmed.  Failure marks the entry as failed — it is
    /// never silently shown as confirmed — and the error is both emitted as
    /// a retry affordance and returned to the caller.
    pub async fn complete_send(
        &mut self,
        id: PendingId,
        result: Result<(), BackendError>,
    ) -> Result<(), BackendError> {
        if self.closed {
            debug!(pending = %id, "dropping send completion for closed controller");
            return Ok(());
        }

        match result {
            Ok(()) => {
                match pages::fetch_page(&self.backend, 0).await {
                    Ok(page) => {
                        if self.closed {
                            return Ok(());
                        }
                        self.timeline.resolve_pending(id);
                        let mut rows = page.messages;
                        rows.reverse();
                        self.timeline.supersede_newest(rows);
                    }
                    Err(e) => {
                        warn!(error = %e, "read-back after send failed; keeping optimistic entry");
                        self.timeline.mark_confirmed(id);
                    }
                }

                self.phase = Phase::Ready;
                events::emit(&self.events, UiEvent::TimelineUpdated);
                if self.anchor.auto_follow() {
                    events::emit(&self.events, UiEvent::StickToBottom);
                }

                info!(pending = %id, "message sent");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "message write failed");
                self.timeline.mark_failed(id);
                self.phase = Phase::SendFailed;

                events::emit(&self.events, UiEvent::TimelineUpdated);
                events::emit(
                    &self.events,
                    UiEvent::SendFailed(SendFailedPayload {
                        pending_id: id,
                        reason: e.to_string(),
                    }),
                );

                Err(e)
            }
        }
    }

    /// Full send path: optimistic insert, write-through, reconcile.
    pub async fn send(&mut self, text: &str) -> Result<(), BackendError> {
        let Some((id, message)) = self.begin_send(text) else {
            return Ok(());
        };

        let result = self.backend.insert(&message).await;
        self.complete_send(id, result).await
    }

    /// Re-submit a failed entry through the same write/reconcile path.
    pub async fn retry(&mut self, id: PendingId) -> Result<(), BackendError> {
        let Some(message) = self.timeline.overlay_message(id) else {
            warn!(pending = %id, "retry requested for an unknown entry");
            return Ok(());
        };

        self.timeline.mark_pending(id);
        self.phase = Phase::Sending;
        events::emit(&self.events, UiEvent::TimelineUpdated);

        let result = self.backend.insert(&message).await;
        self.complete_send(id, result).await
    }

    /// Tear the view down: any in-flight completion is ignored from here on.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
