//! Shared numeric constants and defaults for the scene graph.

// ── Stage ───────────────────────────────────────────────────────

/// Stage width in CSS pixels when the configuration does not give one.
pub const DEFAULT_STAGE_WIDTH: f64 = 300.0;

/// Stage height in CSS pixels when the configuration does not give one.
pub const DEFAULT_STAGE_HEIGHT: f64 = 150.0;

// ── Gestures ────────────────────────────────────────────────────

/// Minimum hold time, in milliseconds, for a touch to count as a long press.
pub const LONG_PRESS_MS: f64 = 500.0;

/// Maximum per-axis travel, in pixels, for a touch to still count as a press.
pub const LONG_PRESS_DISTANCE: f64 = 5.0;

// ── Text ────────────────────────────────────────────────────────

/// Font size in pixels for text objects that do not set one.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Font weight for text objects that do not set one.
pub const DEFAULT_FONT_WEIGHT: &str = "normal";

/// Fill color for text objects that do not set one.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Font stack for text objects that do not set one.
pub const DEFAULT_FONT_FAMILY: &str = "\"PingFang SC\", Verdana, \"Helvetica Neue\", \"Microsoft Yahei\", \
     \"Hiragino Sans GB\", \"Microsoft Sans Serif\", \"WenQuanYi Micro Hei\", sans-serif";
