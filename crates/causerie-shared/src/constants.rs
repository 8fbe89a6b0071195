/// Application name
pub const APP_NAME: &str = "Causerie";

/// Number of messages returned per history page
pub const PAGE_SIZE: u32 = 20;

/// Scroll offset (px) under which the view counts as "near the top"
pub const NEAR_TOP_PX: f64 = 100.0;

/// Slack (px) tolerated when deciding the view is pinned to the bottom
pub const BOTTOM_SLOP_PX: f64 = 10.0;

/// Fixed reference offset of the stored time representation, in hours east of UTC
pub const STORED_TIME_OFFSET_HOURS: i32 = 9;

/// Name of the message table in the backing store
pub const MESSAGE_TABLE: &str = "message";

/// Preference key holding the dark-mode flag ("true" / "false")
pub const DARK_MODE_KEY: &str = "darkMode";
