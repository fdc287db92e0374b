//! Input model: stage events, touch gesture classification, and move throttling.
//!
//! The stage feeds raw pointer and touch positions through these types and
//! hands the resulting [`StageEvent`]s back to the host. `GestureTracker` is
//! the touch state machine: it remembers where and when a touch began and,
//! on release, decides whether the touch was a long press, a tap, or a plain
//! release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::{LONG_PRESS_DISTANCE, LONG_PRESS_MS};
use crate::geom::Point;
use crate::hit::Hit;

/// Kind of event delivered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Click,
    ContextMenu,
    /// The pointer moved onto a new top-most target.
    PointerEnter,
    /// The pointer left its previous top-most target.
    PointerLeave,
    TouchStart,
    TouchMove,
    /// A touch ended without qualifying as a long press.
    TouchEnd,
    /// A short touch that stayed in place. Always preceded by `TouchEnd`.
    Tap,
    /// A touch held in place longer than the long-press threshold.
    LongTap,
}

/// An input event resolved to the object it landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageEvent {
    pub kind: EventKind,
    pub target: Hit,
    /// Stage-space position of the event.
    pub point: Point,
}

/// How a completed touch was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Held past the threshold while staying in place.
    LongTap,
    /// Released quickly while staying in place.
    Tap,
    /// Moved too far to be either.
    Release,
}

/// Touch tracking state between touch-start and touch-end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchState {
    /// No touch in progress.
    #[default]
    Idle,
    /// A touch is down.
    Pressed {
        /// Client-space position where the touch began.
        start: Point,
        /// Host timestamp (ms) of the touch-start.
        started_at: f64,
    },
}

/// Classifies touches into long presses, taps, and releases.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: TouchState,
    long_press_ms: f64,
    long_press_distance: f64,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(LONG_PRESS_MS, LONG_PRESS_DISTANCE)
    }
}

impl GestureTracker {
    #[must_use]
    pub fn new(long_press_ms: f64, long_press_distance: f64) -> Self {
        Self { state: TouchState::Idle, long_press_ms, long_press_distance }
    }

    #[must_use]
    pub fn state(&self) -> TouchState {
        self.state
    }

    /// Record a touch-start. A second start before an end restarts tracking.
    pub fn begin(&mut self, client: Point, now: f64) {
        self.state = TouchState::Pressed { start: client, started_at: now };
    }

    /// Classify the touch ending at `client`. Returns `None` when no touch
    /// was being tracked.
    pub fn end(&mut self, client: Point, now: f64) -> Option<Gesture> {
        let TouchState::Pressed { start, started_at } = std::mem::take(&mut self.state) else {
            return None;
        };
        let in_place = (client.x - start.x).abs() < self.long_press_distance
            && (client.y - start.y).abs() < self.long_press_distance;
        let gesture = match (in_place, now - started_at > self.long_press_ms) {
            (true, true) => Gesture::LongTap,
            (true, false) => Gesture::Tap,
            (false, _) => Gesture::Release,
        };
        Some(gesture)
    }

    pub fn cancel(&mut self) {
        self.state = TouchState::Idle;
    }
}

/// Rate limiter for move events: drops events that arrive within `window_ms`
/// of the last accepted one. A zero window accepts everything.
#[derive(Debug, Clone, Default)]
pub struct Throttle {
    window_ms: f64,
    last: Option<f64>,
}

impl Throttle {
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms, last: None }
    }

    #[must_use]
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Whether an event at `now` should be delivered. Accepted events restart
    /// the window.
    pub fn accept(&mut self, now: f64) -> bool {
        if self.window_ms <= 0.0 {
            return true;
        }
        if self.last.is_some_and(|last| now - last < self.window_ms) {
            return false;
        }
        self.last = Some(now);
        true
    }
}
