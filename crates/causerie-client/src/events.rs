//! UI effect surface.
//!
//! The synchronization core never touches the viewport directly: it emits
//! events the embedding shell applies (re-render, move the scroll position,
//! show a retry affordance).  Events travel over an unbounded channel; a
//! gone receiver is logged, never a panic.

use serde::Serialize;
use tokio::sync::mpsc;

use causerie_shared::types::PendingId;

/// Effects the rendering layer must apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum UiEvent {
    /// The ordered timeline changed; re-render the list.
    TimelineUpdated,
    /// Keep the viewport pinned to the newest message.
    StickToBottom,
    /// One-shot jump to the bottom after the initial load.
    ForceScrollToBottom,
    /// A send was rejected; the entry stays visible as failed and can be
    /// retried with the carried id.
    SendFailed(SendFailedPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFailedPayload {
    pub pending_id: PendingId,
    pub reason: String,
}

pub type EventSender = mpsc::UnboundedSender<UiEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Create the event channel connecting the core to the rendering layer.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Emit one event, logging (not panicking) when the receiver is gone.
pub fn emit(sender: &EventSender, event: UiEvent) {
    if let Err(e) = sender.send(event) {
        tracing::error!(error = %e, "Failed to emit event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_failed_serializes_camel_case() {
        let event = UiEvent::SendFailed(SendFailedPayload {
            pending_id: PendingId::new(),
            reason: "Service replied 503".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"sendFailed\""));
        assert!(json.contains("\"pendingId\""));
    }

    #[test]
    fn emit_survives_a_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        emit(&tx, UiEvent::TimelineUpdated);
    }
}
