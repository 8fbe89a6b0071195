//! Scroll-position bookkeeping for the message list.
//!
//! The rendering layer reports raw viewport numbers on every scroll event;
//! the anchor derives the per-event state and remembers whether the viewport
//! should keep following newly arrived content.

use serde::{Deserialize, Serialize};

use causerie_shared::constants::{BOTTOM_SLOP_PX, NEAR_TOP_PX};

/// Raw viewport numbers as reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

/// State derived from one scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    /// Close enough to the top to trigger a history backfill.
    pub is_near_top: bool,
    /// Pinned to the bottom (within slop).
    pub is_at_bottom: bool,
    /// Whether new content should pull the viewport down.
    pub auto_follow: bool,
}

/// Decides whether the viewport follows new content or stays put.
#[derive(Debug, Clone)]
pub struct ScrollAnchor {
    auto_follow: bool,
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        // Follow until the user scrolls away.
        Self { auto_follow: true }
    }
}

impl ScrollAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the state for one scroll event.
    ///
    /// Auto-follow is re-evaluated on every event: scrolling away from the
    /// bottom disables it until the user manually returns.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> ScrollState {
        let is_near_top = metrics.scroll_top < NEAR_TOP_PX;
        let is_at_bottom =
            metrics.scroll_top + metrics.client_height >= metrics.scroll_height - BOTTOM_SLOP_PX;

        self.auto_follow = is_at_bottom;

        ScrollState {
            is_near_top,
            is_at_bottom,
            auto_follow: self.auto_follow,
        }
    }

    pub fn auto_follow(&self) -> bool {
        self.auto_follow
    }

    /// Scroll target after new content was merged, or `None` when the user
    /// has scrolled away and the viewport must not move.
    pub fn follow_target(&self, new_scroll_height: f64) -> Option<f64> {
        self.auto_follow.then_some(new_scroll_height)
    }

    /// Re-engage following regardless of position (used once after the
    /// initial load).
    pub fn force_follow(&mut self) {
        self.auto_follow = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scroll_top: f64, scroll_height: f64, client_height: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    #[test]
    fn near_top_is_detected() {
        let mut anchor = ScrollAnchor::new();
        let state = anchor.on_scroll(&metrics(0.0, 2000.0, 500.0));

        assert!(state.is_near_top);
        assert!(!state.is_at_bottom);
        assert!(!state.auto_follow);
    }

    #[test]
    fn bottom_slop_is_tolerated() {
        let mut anchor = ScrollAnchor::new();

        // 1490 + 500 = 1990 >= 2000 - 10: still counts as bottom.
        let state = anchor.on_scroll(&metrics(1490.0, 2000.0, 500.0));
        assert!(state.is_at_bottom);
        assert!(state.auto_follow);

        let state = anchor.on_scroll(&metrics(1489.0, 2000.0, 500.0));
        assert!(!state.is_at_bottom);
        assert!(!state.auto_follow);
    }

    #[test]
    fn follow_target_tracks_the_latest_at_bottom_state() {
        let mut anchor = ScrollAnchor::new();

        anchor.on_scroll(&metrics(1500.0, 2000.0, 500.0));
        assert_eq!(anchor.follow_target(2400.0), Some(2400.0));

        anchor.on_scroll(&metrics(300.0, 2400.0, 500.0));
        assert_eq!(anchor.follow_target(2800.0), None);
    }

    #[test]
    fn follow_starts_enabled_and_can_be_forced() {
        let mut anchor = ScrollAnchor::new();
        assert!(anchor.auto_follow());

        anchor.on_scroll(&metrics(0.0, 2000.0, 500.0));
        assert!(!anchor.auto_follow());

        anchor.force_follow();
        assert_eq!(anchor.follow_target(2000.0), Some(2000.0));
    }
}
