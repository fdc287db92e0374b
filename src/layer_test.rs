#![allow(clippy::float_cmp)]

use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::bitmap::Bitmap;
use crate::polygon::Polygon;
use crate::resource::ImageLoader;
use crate::sprite::Sprite;
use crate::support_test::StubLoader;
use crate::surface::{DisplayList, DrawOp};

fn square(left: f64, top: f64) -> Polygon {
    let options = json!({
        "points": [{ "x": 0, "y": 0 }, { "x": 10, "y": 0 }, { "x": 10, "y": 10 }, { "x": 0, "y": 10 }],
        "left": left, "top": top, "fillColor": "#333",
    });
    Polygon::new(options.as_object().unwrap()).unwrap()
}

fn layer() -> Layer<DisplayList> {
    Layer::new(DisplayList::new(), 300.0, 150.0)
}

#[test]
fn first_render_paints_and_clears_dirty_state() {
    let mut layer = layer();
    layer.add(square(0.0, 0.0));
    assert!(layer.needs_update());
    assert!(layer.render_objects(0.0, false));
    assert_eq!(layer.surface().ops()[0], DrawOp::Clear { width: 300.0, height: 150.0 });
    assert!(!layer.needs_update());
}

#[test]
fn clean_layer_skips_render_unless_forced() {
    let mut layer = layer();
    layer.add(square(0.0, 0.0));
    layer.render_objects(0.0, false);
    layer.surface_mut().take();

    assert!(!layer.render_objects(16.0, false));
    assert!(layer.surface().ops().is_empty());
    assert!(layer.render_objects(32.0, true));
    assert!(!layer.surface().ops().is_empty());
}

#[test]
fn dirty_object_repaints_whole_layer() {
    let mut layer = layer();
    let a = layer.add(square(0.0, 0.0));
    layer.add(square(20.0, 0.0));
    layer.render_objects(0.0, false);
    layer.surface_mut().take();

    layer.get_mut(a).unwrap().set_left(5.0);
    assert!(layer.render_objects(16.0, false));
    let fills = layer.surface().ops().iter().filter(|op| matches!(op, DrawOp::FillPath(_))).count();
    assert_eq!(fills, 2);
}

#[test]
fn resize_forces_redraw_at_new_size() {
    let mut layer = layer();
    layer.render_objects(0.0, false);
    layer.resize(640.0, 480.0);
    assert!(layer.needs_update());
    layer.render_objects(16.0, false);
    assert!(layer.surface().ops().contains(&DrawOp::Clear { width: 640.0, height: 480.0 }));
}

#[test]
fn remove_returns_object_and_schedules_redraw() {
    let mut layer = layer();
    let id = layer.add(square(0.0, 0.0));
    layer.render_objects(0.0, false);
    let removed = layer.remove(id).unwrap();
    assert_eq!(removed.id(), id);
    assert!(layer.is_empty());
    assert!(layer.needs_update());
    assert!(layer.remove(id).is_none());
}

#[test]
fn typed_access_downcasts() {
    let mut layer = layer();
    let id = layer.add(square(0.0, 0.0));
    assert!(layer.get_as::<Polygon>(id).is_some());
    assert!(layer.get_as::<Sprite>(id).is_none());
    layer.get_as_mut::<Polygon>(id).unwrap().set_fill_color("blue");
    assert!(layer.needs_update());
}

#[test]
fn hit_test_prefers_top_most() {
    let mut layer = layer();
    let below = layer.add(square(0.0, 0.0));
    let above = layer.add(square(5.0, 5.0));
    assert_eq!(layer.hit_test(Point::new(7.0, 7.0)), Some(above));
    assert_eq!(layer.hit_test(Point::new(2.0, 2.0)), Some(below));
    assert_eq!(layer.hit_test(Point::new(50.0, 50.0)), None);
}

#[test]
fn hidden_objects_are_skipped_by_hit_test() {
    let mut layer = layer();
    let below = layer.add(square(0.0, 0.0));
    let above = layer.add(square(0.0, 0.0));
    layer.get_mut(above).unwrap().set_visible(false);
    assert_eq!(layer.hit_test(Point::new(5.0, 5.0)), Some(below));
}

#[test]
fn render_polls_pending_loads() {
    let loader = StubLoader::new().with_image("a.png", 8.0, 8.0).deferring("a.png").shared();
    let bitmap = Bitmap::new(json!({ "src": "a.png" }).as_object().unwrap(), Rc::clone(&loader) as Rc<dyn ImageLoader>).unwrap();
    let mut layer = layer();
    let id = layer.add(bitmap);
    layer.render_objects(0.0, false);
    assert!(layer.surface().image_draws().is_empty());

    loader.complete("a.png");
    layer.surface_mut().take();
    assert!(layer.render_objects(16.0, false));
    assert_eq!(layer.surface().image_draws().len(), 1);
    assert!(!layer.get_as::<Bitmap>(id).unwrap().is_loading());
}
