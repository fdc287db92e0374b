#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::surface::{DisplayList, DrawOp};

fn triangle(extra: Value) -> Polygon {
    let mut options = json!({ "points": [{ "x": 0, "y": 0 }, { "x": 30, "y": 0 }, { "x": 15, "y": 20 }] });
    if let (Some(base), Some(extra)) = (options.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    Polygon::new(options.as_object().unwrap()).unwrap()
}

#[test]
fn size_is_point_extent() {
    let tri = triangle(json!({}));
    assert_eq!(tri.base().width(), 30.0);
    assert_eq!(tri.base().height(), 20.0);
}

#[test]
fn fill_and_stroke_are_drawn_when_set() {
    let mut tri = triangle(json!({ "fillColor": "#0f0", "strokeColor": "#000", "lineWidth": 2 }));
    let mut list = DisplayList::new();
    tri.render(&mut list, 0.0);
    let ops = list.ops();
    assert!(ops.contains(&DrawOp::FillStyle(FillStyle::Color("#0f0".into()))));
    assert!(ops.contains(&DrawOp::StrokeStyle { color: "#000".into(), line_width: 2.0 }));
    assert!(ops.iter().any(|op| matches!(op, DrawOp::FillPath(p) if p.len() == 3)));
    assert!(ops.iter().any(|op| matches!(op, DrawOp::StrokePath(_))));
    assert!(!tri.needs_update());
}

#[test]
fn unstyled_polygon_draws_no_paths() {
    let mut tri = triangle(json!({}));
    let mut list = DisplayList::new();
    tri.render(&mut list, 0.0);
    assert!(!list.ops().iter().any(|op| matches!(op, DrawOp::FillPath(_) | DrawOp::StrokePath(_))));
}

#[test]
fn horizontal_flip_shifts_path() {
    let mut tri = triangle(json!({ "fillColor": "red", "scaleX": -1 }));
    let mut list = DisplayList::new();
    tri.render(&mut list, 0.0);
    let path = list.ops().iter().find_map(|op| match op {
        DrawOp::FillPath(p) => Some(p.clone()),
        _ => None,
    });
    assert_eq!(path.unwrap()[1], Point::new(0.0, 0.0));
}

#[test]
fn hit_region_is_bounding_box() {
    let tri = triangle(json!({ "left": 10, "top": 10 }));
    assert!(tri.hit_test(Point::new(12.0, 28.0)));
    assert!(!tri.hit_test(Point::new(41.0, 15.0)));
}

#[test]
fn malformed_points_are_rejected() {
    let err = Polygon::new(json!({ "points": [1, 2] }).as_object().unwrap()).unwrap_err();
    assert!(matches!(err, SceneError::InvalidValue { prop: "points", .. }));
}

#[test]
fn set_points_recomputes_size() {
    let mut tri = triangle(json!({}));
    tri.set_points(vec![Point::ZERO, Point::new(5.0, 50.0)]);
    assert_eq!(tri.base().height(), 50.0);
    assert!(tri.needs_update());
}
