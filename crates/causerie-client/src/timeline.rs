//! Client-side message cache.
//!
//! The timeline owns every message the client currently knows about and keeps
//! the whole set ordered by stored time, whatever order pages and sends
//! arrive in.  Confirmed rows come from the backing store; on top of them an
//! overlay of pending and failed entries tracks writes that have not been
//! acknowledged.  A write that was rejected stays visible as failed — it is
//! never displayed as if it had been confirmed.

use serde::Serialize;
use tracing::warn;

use causerie_shared::time;
use causerie_shared::types::{PendingId, StoredMessage, StoredTime};

/// Delivery state of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Delivery {
    /// Held by the store of record.
    Confirmed,
    /// Optimistically shown; the write is still in flight.
    Pending,
    /// The write was rejected; eligible for retry.
    Failed,
}

/// One message held by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub message: StoredMessage,
    pub delivery: Delivery,
    /// Local identity while unconfirmed; `None` for store-confirmed rows.
    pub pending_id: Option<PendingId>,
}

/// Ordered cache of all known messages.
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a batch of confirmed rows into the cache.
    ///
    /// Overlapping pages can hand us a row we already hold.  The select
    /// contract exposes no stable row identity, so merges keep duplicates
    /// rather than guessing by `(text, time)`.
    pub fn merge(&mut self, rows: Vec<StoredMessage>) {
        self.entries
            .extend(rows.into_iter().map(TimelineEntry::confirmed));
        self.resort();
    }

    /// Add a single confirmed message (e.g. from a push-capable transport).
    pub fn append(&mut self, message: StoredMessage) {
        self.entries.push(TimelineEntry::confirmed(message));
        self.resort();
    }

    /// Replace the confirmed newest window with an authoritative refetch.
    ///
    /// Every confirmed entry at or after the window's oldest time is dropped
    /// and the window's rows (oldest first) take their place.  Pending and
    /// failed overlay entries are kept untouched.
    pub fn supersede_newest(&mut self, rows: Vec<StoredMessage>) {
        let Some(window_start) = rows.first().map(|r| r.time.clone()) else {
            return;
        };
        self.entries
            .retain(|e| e.delivery != Delivery::Confirmed || e.message.time < window_start);
        self.entries
            .extend(rows.into_iter().map(TimelineEntry::confirmed));
        self.resort();
    }

    /// Insert an optimistic entry for a write that was just issued.
    pub fn insert_pending(&mut self, id: PendingId, message: StoredMessage) {
        self.entries.push(TimelineEntry {
            message,
            delivery: Delivery::Pending,
            pending_id: Some(id),
        });
        self.resort();
    }

    /// Mark a pending entry as rejected.  Returns `false` if the id is gone.
    pub fn mark_failed(&mut self, id: PendingId) -> bool {
        self.set_delivery(id, Delivery::Failed)
    }

    /// Put a failed entry back in flight for a retry.
    pub fn mark_pending(&mut self, id: PendingId) -> bool {
        self.set_delivery(id, Delivery::Pending)
    }

    /// Promote an overlay entry to confirmed without a refetch (fallback when
    /// the post-send invalidation could not be read back).
    pub fn mark_confirmed(&mut self, id: PendingId) -> bool {
        if let Some(entry) = self.entry_mut(id) {
            entry.delivery = Delivery::Confirmed;
            entry.pending_id = None;
            true
        } else {
            false
        }
    }

    /// Drop an overlay entry whose authoritative copy has been fetched.
    pub fn resolve_pending(&mut self, id: PendingId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.pending_id != Some(id));
        self.entries.len() != before
    }

    /// The message carried by an overlay entry, if it is still present.
    pub fn overlay_message(&self, id: PendingId) -> Option<StoredMessage> {
        self.entries
            .iter()
            .find(|e| e.pending_id == Some(id))
            .map(|e| e.message.clone())
    }

    /// Current order for rendering.  Pure read.
    pub fn snapshot(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group consecutive messages sharing a calendar date under one header.
    ///
    /// Recomputed from the current entries on every call, never cached.  A
    /// message whose stored time cannot be decoded joins the current run with
    /// empty labels instead of being dropped.
    pub fn date_groups(&self) -> Vec<DateGroup> {
        let mut groups: Vec<DateGroup> = Vec::new();

        for entry in &self.entries {
            let (date_label, time_label) = match time::decode(&entry.message.time) {
                Ok(instant) => (
                    Some(time::format_date(&instant)),
                    time::format_time(&instant),
                ),
                Err(e) => {
                    warn!(error = %e, "message with unparsable time; omitting from date grouping");
                    (None, String::new())
                }
            };

            let view = MessageView {
                text: entry.message.text.clone(),
                time_label,
                pending: entry.delivery == Delivery::Pending,
                failed: entry.delivery == Delivery::Failed,
            };

            match (groups.last_mut(), date_label) {
                (Some(last), Some(label)) if last.label == label => last.messages.push(view),
                (Some(last), None) => last.messages.push(view),
                (None, None) => groups.push(DateGroup {
                    label: String::new(),
                    messages: vec![view],
                }),
                (_, Some(label)) => groups.push(DateGroup {
                    label,
                    messages: vec![view],
                }),
            }
        }

        groups
    }

    fn entry_mut(&mut self, id: PendingId) -> Option<&mut TimelineEntry> {
        self.entries.iter_mut().find(|e| e.pending_id == Some(id))
    }

    fn set_delivery(&mut self, id: PendingId, delivery: Delivery) -> bool {
        if let Some(entry) = self.entry_mut(id) {
            entry.delivery = delivery;
            true
        } else {
            false
        }
    }

    // Vec::sort_by is stable: entries with equal stored times keep the
    // relative order they arrived in.
    fn resort(&mut self) {
        self.entries
            .sort_by(|a, b| a.message.time.cmp(&b.message.time));
    }
}

impl TimelineEntry {
    fn confirmed(message: StoredMessage) -> Self {
        Self {
            message,
            delivery: Delivery::Confirmed,
            pending_id: None,
        }
    }

    pub fn time(&self) -> &StoredTime {
        &self.message.time
    }
}

/// Render model of a single message, handed to the UI layer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub text: String,
    pub time_label: String,
    pub pending: bool,
    pub failed: bool,
}

/// Render model of one date run: the header is emitted exactly once,
/// immediately before the first message of the run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup {
    pub label: String,
    pub messages: Vec<MessageView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use causerie_shared::time::encode;

    fn msg(text: &str, day: u32, minute: u32) -> StoredMessage {
        StoredMessage {
            text: text.to_string(),
            time: encode(Utc.with_ymd_and_hms(2026, 8, day, 3, minute, 0).unwrap()),
        }
    }

    fn texts(timeline: &Timeline) -> Vec<String> {
        timeline
            .snapshot()
            .iter()
            .map(|e| e.message.text.clone())
            .collect()
    }

    fn assert_non_decreasing(timeline: &Timeline) {
        let times: Vec<&StoredTime> = timeline.snapshot().iter().map(|e| e.time()).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "order broken: {times:?}");
    }

    #[test]
    fn merge_order_is_independent_of_arrival_order() {
        let newest_page = vec![msg("e", 7, 40), msg("f", 7, 50)];
        let older_page = vec![msg("c", 7, 20), msg("d", 7, 30)];
        let oldest_page = vec![msg("a", 7, 0), msg("b", 7, 10)];

        // Backfill arrives newest page first.
        let mut forward = Timeline::new();
        forward.merge(newest_page.clone());
        forward.merge(older_page.clone());
        forward.merge(oldest_page.clone());

        // A hypothetical replay arrives oldest page first.
        let mut replay = Timeline::new();
        replay.merge(oldest_page);
        replay.merge(older_page);
        replay.merge(newest_page);

        assert_non_decreasing(&forward);
        assert_non_decreasing(&replay);
        assert_eq!(texts(&forward), texts(&replay));
        assert_eq!(texts(&forward), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn equal_times_keep_arrival_order() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("first", 7, 0), msg("second", 7, 0)]);
        timeline.merge(vec![msg("third", 7, 0)]);

        assert_eq!(texts(&timeline), vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicates_across_overlapping_pages_are_kept() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("dup", 7, 0)]);
        timeline.merge(vec![msg("dup", 7, 0), msg("next", 7, 1)]);

        // Known limitation: no stable row identity, so both copies survive.
        assert_eq!(texts(&timeline), vec!["dup", "dup", "next"]);
    }

    #[test]
    fn pending_entry_is_visible_and_flagged() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("old", 7, 0)]);

        let id = PendingId::new();
        timeline.insert_pending(id, msg("mine", 7, 5));

        let entry = timeline
            .snapshot()
            .iter()
            .find(|e| e.message.text == "mine")
            .unwrap();
        assert_eq!(entry.delivery, Delivery::Pending);
        assert_eq!(entry.pending_id, Some(id));
        assert_non_decreasing(&timeline);
    }

    #[test]
    fn failed_send_is_never_shown_confirmed() {
        let mut timeline = Timeline::new();
        let id = PendingId::new();
        timeline.insert_pending(id, msg("doomed", 7, 0));

        assert!(timeline.mark_failed(id));

        let groups = timeline.date_groups();
        assert!(groups[0].messages[0].failed);
        assert!(!groups[0].messages[0].pending);

        // Retry puts it back in flight.
        assert!(timeline.mark_pending(id));
        assert!(timeline.date_groups()[0].messages[0].pending);
    }

    #[test]
    fn resolve_pending_removes_the_overlay_entry() {
        let mut timeline = Timeline::new();
        let id = PendingId::new();
        timeline.insert_pending(id, msg("sent", 7, 0));

        assert!(timeline.resolve_pending(id));
        assert!(timeline.is_empty());
        assert!(!timeline.resolve_pending(id));
    }

    #[test]
    fn supersede_newest_replaces_the_confirmed_window() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("a", 7, 0), msg("b", 7, 10), msg("c", 7, 20)]);

        let id = PendingId::new();
        timeline.insert_pending(id, msg("mine", 7, 30));

        // Authoritative refetch covers b onward and includes our send.
        timeline.resolve_pending(id);
        timeline.supersede_newest(vec![msg("b", 7, 10), msg("c", 7, 20), msg("mine", 7, 30)]);

        assert_eq!(texts(&timeline), vec!["a", "b", "c", "mine"]);
        assert!(timeline
            .snapshot()
            .iter()
            .all(|e| e.delivery == Delivery::Confirmed));
    }

    #[test]
    fn supersede_newest_keeps_other_overlay_entries() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("a", 7, 0)]);

        let in_flight = PendingId::new();
        timeline.insert_pending(in_flight, msg("still sending", 7, 5));

        timeline.supersede_newest(vec![msg("a", 7, 0), msg("b", 7, 10)]);

        assert_eq!(texts(&timeline), vec!["a", "still sending", "b"]);
        assert_eq!(
            timeline.overlay_message(in_flight).unwrap().text,
            "still sending"
        );
    }

    #[test]
    fn date_headers_appear_once_per_run() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![
            msg("d1 m1", 6, 0),
            msg("d1 m2", 6, 10),
            msg("d2 m1", 7, 0),
        ]);

        let groups = timeline.date_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "August 6, 2026");
        assert_eq!(groups[0].messages.len(), 2);
        assert_eq!(groups[1].label, "August 7, 2026");
        assert_eq!(groups[1].messages.len(), 1);
    }

    #[test]
    fn unparsable_time_joins_the_current_run_with_empty_labels() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("ok", 7, 0)]);
        timeline.append(StoredMessage {
            text: "broken clock".to_string(),
            time: StoredTime("garbage".to_string()),
        });

        let groups = timeline.date_groups();
        // The broken row joins the current run instead of opening one.
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "August 7, 2026");
        assert_eq!(groups[0].messages[1].text, "broken clock");
        assert_eq!(groups[0].messages[1].time_label, "");
    }

    #[test]
    fn views_serialize_camel_case() {
        let mut timeline = Timeline::new();
        timeline.merge(vec![msg("hello", 7, 0)]);

        let json = serde_json::to_string(&timeline.date_groups()).unwrap();
        assert!(json.contains("\"timeLabel\""));
        assert!(json.contains("\"messages\""));
    }
}
