use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// GestureTracker
// =============================================================

#[test]
fn tracker_starts_idle() {
    let tracker = GestureTracker::default();
    assert_eq!(tracker.state(), TouchState::Idle);
}

#[test]
fn begin_records_start() {
    let mut tracker = GestureTracker::default();
    tracker.begin(pt(10.0, 20.0), 1000.0);
    assert_eq!(tracker.state(), TouchState::Pressed { start: pt(10.0, 20.0), started_at: 1000.0 });
}

#[test]
fn held_in_place_is_long_tap() {
    let mut tracker = GestureTracker::default();
    tracker.begin(pt(10.0, 10.0), 0.0);
    assert_eq!(tracker.end(pt(12.0, 8.0), 600.0), Some(Gesture::LongTap));
    assert_eq!(tracker.state(), TouchState::Idle);
}

#[test]
fn exactly_threshold_is_not_long() {
    let mut tracker = GestureTracker::default();
    tracker.begin(pt(0.0, 0.0), 0.0);
    assert_eq!(tracker.end(pt(0.0, 0.0), 500.0), Some(Gesture::Tap));
}

#[test]
fn quick_touch_in_place_is_tap() {
    let mut tracker = GestureTracker::default();
    tracker.begin(pt(0.0, 0.0), 0.0);
    assert_eq!(tracker.end(pt(4.0, 4.0), 120.0), Some(Gesture::Tap));
}

#[test]
fn moving_five_pixels_breaks_the_press() {
    let mut tracker = GestureTracker::default();
    tracker.begin(pt(0.0, 0.0), 0.0);
    assert_eq!(tracker.end(pt(5.0, 0.0), 900.0), Some(Gesture::Release));

    tracker.begin(pt(0.0, 0.0), 0.0);
    assert_eq!(tracker.end(pt(0.0, -7.0), 100.0), Some(Gesture::Release));
}

#[test]
fn end_without_begin_is_ignored() {
    let mut tracker = GestureTracker::default();
    assert_eq!(tracker.end(pt(0.0, 0.0), 0.0), None);
}

#[test]
fn cancel_drops_touch() {
    let mut tracker = GestureTracker::default();
    tracker.begin(pt(0.0, 0.0), 0.0);
    tracker.cancel();
    assert_eq!(tracker.end(pt(0.0, 0.0), 900.0), None);
}

#[test]
fn custom_thresholds() {
    let mut tracker = GestureTracker::new(100.0, 20.0);
    tracker.begin(pt(0.0, 0.0), 0.0);
    assert_eq!(tracker.end(pt(15.0, 15.0), 150.0), Some(Gesture::LongTap));
}

// =============================================================
// Throttle
// =============================================================

#[test]
fn zero_window_accepts_everything() {
    let mut throttle = Throttle::new(0.0);
    assert!(throttle.accept(0.0));
    assert!(throttle.accept(0.0));
}

#[test]
fn window_drops_close_events() {
    let mut throttle = Throttle::new(50.0);
    assert!(throttle.accept(0.0));
    assert!(!throttle.accept(20.0));
    assert!(!throttle.accept(49.0));
    assert!(throttle.accept(50.0));
    assert!(!throttle.accept(80.0));
    assert!(throttle.accept(120.0));
}

// =============================================================
// EventKind
// =============================================================

#[test]
fn event_kind_debug_format() {
    assert_eq!(format!("{:?}", EventKind::LongTap), "LongTap");
    assert_eq!(format!("{:?}", EventKind::PointerEnter), "PointerEnter");
}
