//! The drawing surface display objects render onto.
//!
//! [`Surface`] is the narrow set of 2D primitives the scene graph needs. The
//! `web` feature implements it for `CanvasRenderingContext2d`; [`DisplayList`]
//! implements it by recording every call, for headless rendering and tests.
//!
//! Surface calls are infallible from the caller's side. Implementations that
//! wrap fallible APIs log and drop the failure so a render pass always runs to
//! completion.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::Deserialize;

use crate::geom::{Point, Rect};
use crate::resource::ImageHandle;

/// One stop of a linear gradient. `percent` is in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorStop {
    pub percent: f64,
    pub color: String,
}

/// How shapes and text are filled.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStyle {
    /// A CSS color string.
    Color(String),
    /// A linear gradient from `start` to `end` in the current local space.
    LinearGradient { start: Point, end: Point, stops: Vec<ColorStop> },
}

/// Drop shadow applied to subsequent fills.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub color: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
}

/// 2D drawing primitives consumed by display objects.
pub trait Surface {
    /// Push the current transform, alpha, and styles.
    fn save(&mut self);
    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    /// Rotate the local space clockwise by `radians`.
    fn rotate(&mut self, radians: f64);
    fn scale(&mut self, x: f64, y: f64);
    fn set_global_alpha(&mut self, alpha: f64);
    /// Clear the whole surface (`width` × `height` in untransformed space).
    fn clear(&mut self, width: f64, height: f64);
    /// Draw the `src` region of `image` into the `dst` region.
    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dst: Rect);
    fn set_fill_style(&mut self, style: &FillStyle);
    fn set_stroke_style(&mut self, color: &str, line_width: f64);
    /// Set the CSS font shorthand. Text is drawn left-aligned from its top edge.
    fn set_font(&mut self, font: &str);
    fn set_shadow(&mut self, shadow: &Shadow);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Fill the closed polygon through `points`.
    fn fill_path(&mut self, points: &[Point]);
    /// Stroke the closed polygon through `points`.
    fn stroke_path(&mut self, points: &[Point]);
}

/// A single recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { x: f64, y: f64 },
    Rotate { radians: f64 },
    Scale { x: f64, y: f64 },
    GlobalAlpha(f64),
    Clear { width: f64, height: f64 },
    DrawImage { src: Rect, dst: Rect },
    FillStyle(FillStyle),
    StrokeStyle { color: String, line_width: f64 },
    Font(String),
    Shadow(Shadow),
    FillText { text: String, x: f64, y: f64 },
    FillPath(Vec<Point>),
    StrokePath(Vec<Point>),
}

/// A [`Surface`] that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls recorded since creation or the last [`DisplayList::take`].
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// The recorded image draws, in order.
    #[must_use]
    pub fn image_draws(&self) -> Vec<(Rect, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::DrawImage { src, dst } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Translate { x, y });
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(DrawOp::Rotate { radians });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Scale { x, y });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::GlobalAlpha(alpha));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn draw_image(&mut self, _image: &ImageHandle, src: Rect, dst: Rect) {
        self.ops.push(DrawOp::DrawImage { src, dst });
    }

    fn set_fill_style(&mut self, style: &FillStyle) {
        self.ops.push(DrawOp::FillStyle(style.clone()));
    }

    fn set_stroke_style(&mut self, color: &str, line_width: f64) {
        self.ops.push(DrawOp::StrokeStyle { color: color.to_owned(), line_width });
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_owned()));
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ops.push(DrawOp::Shadow(shadow.clone()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText { text: text.to_owned(), x, y });
    }

    fn fill_path(&mut self, points: &[Point]) {
        self.ops.push(DrawOp::FillPath(points.to_vec()));
    }

    fn stroke_path(&mut self, points: &[Point]) {
        self.ops.push(DrawOp::StrokePath(points.to_vec()));
    }
}
