#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::support_test::FixedMeasure;
use crate::surface::{DisplayList, DrawOp};

fn label(options: Value) -> Text {
    let measure = Rc::new(FixedMeasure { char_width: 5.0, line_height: 16.0 });
    Text::new(options.as_object().unwrap(), measure).unwrap()
}

fn fill_texts(list: &DisplayList) -> Vec<(String, f64)> {
    list.ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillText { text, x, .. } => Some((text.clone(), *x)),
            _ => None,
        })
        .collect()
}

#[test]
fn defaults() {
    let t = label(json!({}));
    assert_eq!(t.font().size, 14.0);
    assert_eq!(t.font().weight, "normal");
    assert_eq!(t.color(), "#000000");
    assert_eq!(t.base().width(), 0.0);
}

#[test]
fn size_follows_text_and_font() {
    let mut t = label(json!({ "text": "hello", "fontSize": 10 }));
    assert_eq!(t.base().width(), 25.0);
    assert_eq!(t.base().height(), 16.0);

    t.set_font_size(20.0);
    assert_eq!(t.base().width(), 50.0);

    t.set_text("");
    assert_eq!(t.base().width(), 0.0);
    assert_eq!(t.base().height(), 0.0);
}

#[test]
fn letter_spacing_widens_between_glyphs() {
    let t = label(json!({ "text": "abcd", "fontSize": 10, "letterSpacing": 2 }));
    assert_eq!(t.base().width(), 20.0 + 3.0 * 2.0);

    let single = label(json!({ "text": "a", "fontSize": 10, "letterSpacing": 2 }));
    assert_eq!(single.base().width(), 5.0);
}

#[test]
fn numeric_font_weight_is_accepted() {
    let t = label(json!({ "text": "x", "fontWeight": 700 }));
    assert_eq!(t.font().weight, "700");
    assert_eq!(t.font().css(), format!("700 14px {DEFAULT_FONT_FAMILY}"));
}

#[test]
fn draws_whole_string_with_font_and_color() {
    let mut t = label(json!({ "text": "hi", "color": "red", "fontSize": 10, "fontFamily": "serif" }));
    let mut list = DisplayList::new();
    t.render(&mut list, 0.0);
    assert!(list.ops().contains(&DrawOp::FillStyle(FillStyle::Color("red".into()))));
    assert!(list.ops().contains(&DrawOp::Font("normal 10px serif".into())));
    assert_eq!(fill_texts(&list), vec![("hi".to_owned(), 0.0)]);
    assert!(!list.ops().iter().any(|op| matches!(op, DrawOp::Shadow(_))));
    assert!(!t.needs_update());
}

#[test]
fn spaced_text_draws_glyph_by_glyph() {
    let mut t = label(json!({ "text": "héy", "fontSize": 10, "letterSpacing": 1 }));
    let mut list = DisplayList::new();
    t.render(&mut list, 0.0);
    assert_eq!(
        fill_texts(&list),
        vec![("h".to_owned(), 0.0), ("é".to_owned(), 6.0), ("y".to_owned(), 12.0)]
    );
}

#[test]
fn gradient_spans_the_label_box() {
    let mut t = label(json!({
        "text": "ab", "fontSize": 10,
        "gradient": { "colorStops": [{ "percent": 0, "color": "#f00" }, { "percent": 1, "color": "#00f" }] },
    }));
    let mut list = DisplayList::new();
    t.render(&mut list, 0.0);
    let fill = list.ops().iter().find_map(|op| match op {
        DrawOp::FillStyle(style) => Some(style.clone()),
        _ => None,
    });
    let Some(FillStyle::LinearGradient { start, end, stops }) = fill else {
        panic!("expected a gradient fill, got {fill:?}");
    };
    assert_eq!(start, Point::ZERO);
    assert_eq!(end, Point::new(10.0, 16.0));
    assert_eq!(stops.len(), 2);

    t.set_gradient(None);
    assert!(t.gradient().is_none());
}

#[test]
fn shadow_is_applied_when_colored() {
    let mut t = label(json!({ "text": "a", "shadowColor": "#000", "shadowOffsetX": 2, "shadowBlur": 4 }));
    let mut list = DisplayList::new();
    t.render(&mut list, 0.0);
    let shadow = Shadow { color: "#000".into(), offset_x: 2.0, offset_y: 0.0, blur: 4.0 };
    assert!(list.ops().contains(&DrawOp::Shadow(shadow)));
}

#[test]
fn flipped_text_starts_in_negative_space() {
    let mut t = label(json!({ "text": "ab", "fontSize": 10, "scaleX": -1 }));
    let mut list = DisplayList::new();
    t.render(&mut list, 0.0);
    assert_eq!(fill_texts(&list), vec![("ab".to_owned(), -10.0)]);
}

#[test]
fn invalid_gradient_is_rejected() {
    let measure = Rc::new(FixedMeasure { char_width: 5.0, line_height: 16.0 });
    let options = json!({ "gradient": { "colorStops": "red" } });
    let err = Text::new(options.as_object().unwrap(), measure).err().unwrap();
    assert!(matches!(err, SceneError::InvalidValue { prop: "gradient", .. }));
}
