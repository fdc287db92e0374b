#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::props::BASE_PROPS;
use crate::surface::{DisplayList, DrawOp};

/// Minimal display type that records its update hooks and draws nothing.
struct Probe {
    base: ObjectBase,
    updates: Vec<Prop>,
    draws: usize,
}

impl Probe {
    fn new() -> Self {
        Self { base: ObjectBase::new(), updates: Vec::new(), draws: 0 }
    }

    fn with(options: serde_json::Value) -> Self {
        let mut probe = Self::new();
        probe.set(options.as_object().unwrap()).unwrap();
        probe
    }
}

impl DisplayObject for Probe {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Polygon
    }

    fn tracked(&self) -> &'static [Prop] {
        &BASE_PROPS
    }

    fn assign(&mut self, prop: Prop, value: &Value) -> Result<(), SceneError> {
        self.base.assign(prop, value)?;
        Ok(())
    }

    fn update(&mut self, prop: Prop) {
        self.updates.push(prop);
        self.base.mark_dirty();
    }

    fn draw(&mut self, _surface: &mut dyn Surface, _now: f64) {
        self.draws += 1;
        self.base.clear_dirty();
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.base.hit_rect(Point::ZERO).contains(pt)
    }
}

// =============================================================
// Identity
// =============================================================

#[test]
fn ids_are_unique_and_increasing() {
    let a = ObjectBase::new();
    let b = ObjectBase::new();
    assert!(b.id() > a.id());
}

#[test]
fn defaults() {
    let base = ObjectBase::new();
    assert!(base.visible());
    assert_eq!(base.scale_x(), 1.0);
    assert_eq!(base.opacity(), 1.0);
    assert_eq!(base.origin_x(), OriginX::Left);
    assert!(!base.needs_update());
}

// =============================================================
// Write path
// =============================================================

#[test]
fn tracked_write_runs_update_and_marks_dirty() {
    let mut probe = Probe::new();
    probe.set_property("left", &json!(12)).unwrap();
    assert_eq!(probe.base().left(), 12.0);
    assert_eq!(probe.updates, vec![Prop::Left]);
    assert!(probe.needs_update());
}

#[test]
fn typed_setter_shares_the_write_path() {
    let mut probe = Probe::new();
    probe.set_angle(30.0);
    probe.set_origin_x(OriginX::Right);
    assert_eq!(probe.updates, vec![Prop::Angle, Prop::OriginX]);
    assert!(probe.needs_update());
}

#[test]
fn unknown_name_is_ignored() {
    let mut probe = Probe::new();
    probe.set_property("rotation", &json!(45)).unwrap();
    assert!(probe.updates.is_empty());
    assert!(!probe.needs_update());
}

#[test]
fn property_of_another_type_is_ignored() {
    let mut probe = Probe::new();
    probe.set_property("src", &json!("a.png")).unwrap();
    assert!(probe.updates.is_empty());
}

#[test]
fn wrongly_typed_value_is_rejected_without_side_effects() {
    let mut probe = Probe::new();
    let err = probe.set_property("top", &json!("ten")).unwrap_err();
    assert!(matches!(err, SceneError::InvalidValue { prop: "top", .. }));
    assert_eq!(probe.base().top(), 0.0);
    assert!(!probe.needs_update());
}

#[test]
fn options_apply_in_tracked_order() {
    let probe = Probe::with(json!({ "top": 5, "visible": false, "left": 3, "unknown": 1 }));
    assert_eq!(probe.updates, vec![Prop::Visible, Prop::Left, Prop::Top]);
    assert!(!probe.base().visible());
}

#[test]
fn opacity_is_clamped() {
    let mut probe = Probe::with(json!({ "opacity": 3.0 }));
    assert_eq!(probe.base().opacity(), 1.0);
    probe.set_opacity(-1.0);
    assert_eq!(probe.base().opacity(), 0.0);
}

// =============================================================
// Dirty-flag contract
// =============================================================

#[test]
fn render_consumes_dirty_flag() {
    let mut probe = Probe::new();
    let mut list = DisplayList::new();
    probe.set_top(4.0);
    assert!(probe.needs_update());
    probe.render(&mut list, 0.0);
    assert!(!probe.needs_update());
    probe.render(&mut list, 16.0);
    assert!(!probe.needs_update());
}

#[test]
fn hidden_object_consumes_dirty_flag_without_drawing() {
    let mut probe = Probe::new();
    let mut list = DisplayList::new();
    probe.set_visible(false);
    probe.render(&mut list, 0.0);
    assert_eq!(probe.draws, 0);
    assert!(!probe.needs_update());
}

// =============================================================
// Origin geometry
// =============================================================

#[test]
fn centered_top_origin_scenario() {
    let mut probe = Probe::with(json!({
        "left": 10, "top": 20, "width": 50, "height": 30,
        "originX": "center", "originY": "top",
    }));
    assert_eq!(probe.base().origin_point(), Point::new(25.0, 0.0));
    assert_eq!(probe.base().origin_left(), -15.0);
    assert_eq!(probe.base().origin_top(), 20.0);
    assert_eq!(probe.base().flip_offset(), Point::ZERO);

    probe.set_scale_x(-1.0);
    assert_eq!(probe.base().origin_point().x, 25.0);
    assert_eq!(probe.base().flip_offset(), Point::new(-50.0, 0.0));
}

#[test]
fn origin_point_scales_with_magnitude() {
    let probe = Probe::with(json!({
        "width": 40, "height": 20, "originX": "right", "originY": "bottom",
        "scaleX": 2, "scaleY": -0.5,
    }));
    assert_eq!(probe.base().origin_point(), Point::new(80.0, 10.0));
    assert_eq!(probe.base().scaled_width(), 80.0);
    assert_eq!(probe.base().scaled_height(), 10.0);
}

// =============================================================
// Hit-testing
// =============================================================

#[test]
fn hit_uses_anchor_adjusted_bounds() {
    let probe = Probe::with(json!({
        "left": 100, "top": 100, "width": 20, "height": 10, "originX": "center", "originY": "center",
    }));
    assert!(probe.hit_test(Point::new(91.0, 96.0)));
    assert!(!probe.hit_test(Point::new(111.0, 100.0)));
}

#[test]
fn hidden_object_never_hits() {
    let mut probe = Probe::with(json!({ "width": 20, "height": 10 }));
    assert!(probe.hit_test(Point::new(5.0, 5.0)));
    probe.set_visible(false);
    assert!(!probe.hit_test(Point::new(5.0, 5.0)));
}

// =============================================================
// Transform
// =============================================================

#[test]
fn unrotated_transform_translates_to_anchor() {
    let probe = Probe::with(json!({ "left": 10, "top": 20, "width": 50, "height": 30, "originX": "center" }));
    let mut list = DisplayList::new();
    push_transform(&mut list, probe.base(), Point::new(1.0, 2.0));
    assert_eq!(
        list.ops(),
        &[DrawOp::Save, DrawOp::Translate { x: -16.0, y: 18.0 }, DrawOp::Scale { x: 1.0, y: 1.0 }]
    );
}

#[test]
fn rotated_transform_rotates_around_left_top() {
    let probe = Probe::with(json!({ "left": 10, "top": 20, "width": 50, "height": 30, "angle": 90, "opacity": 0.5 }));
    let mut list = DisplayList::new();
    push_transform(&mut list, probe.base(), Point::ZERO);
    assert_eq!(list.ops()[1], DrawOp::GlobalAlpha(0.5));
    assert_eq!(list.ops()[2], DrawOp::Translate { x: 10.0, y: 20.0 });
    assert_eq!(list.ops()[3], DrawOp::Rotate { radians: 90f64.to_radians() });
    assert_eq!(list.ops()[4], DrawOp::Translate { x: 0.0, y: 0.0 });
}
