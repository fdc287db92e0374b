//! Filled and stroked vector shapes.

#[cfg(test)]
#[path = "polygon_test.rs"]
mod polygon_test;

use serde_json::Value;

use crate::error::SceneError;
use crate::geom::Point;
use crate::object::{DisplayObject, ObjectBase, ObjectKind, push_transform};
use crate::props::{self, BASE_PROPS, Options, Prop};
use crate::surface::{FillStyle, Surface};

/// Properties tracked by [`Polygon`].
pub const POLYGON_PROPS: [Prop; 15] =
    props::extend(BASE_PROPS, [Prop::Points, Prop::FillColor, Prop::StrokeColor, Prop::LineWidth]);

/// A closed polygon. Points are relative to the shape's own top-left corner,
/// and its size is the extent of those points.
#[derive(Debug, Clone)]
pub struct Polygon {
    base: ObjectBase,
    points: Vec<Point>,
    fill_color: String,
    stroke_color: String,
    line_width: f64,
}

impl Polygon {
    /// # Errors
    ///
    /// Returns the first rejected option.
    pub fn new(options: &Options) -> Result<Self, SceneError> {
        let mut polygon = Self {
            base: ObjectBase::new(),
            points: Vec::new(),
            fill_color: String::new(),
            stroke_color: String::new(),
            line_width: 1.0,
        };
        polygon.set(options)?;
        Ok(polygon)
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.notify(Prop::Points);
    }

    pub fn set_fill_color(&mut self, color: impl Into<String>) {
        self.fill_color = color.into();
        self.notify(Prop::FillColor);
    }

    pub fn set_stroke(&mut self, color: impl Into<String>, line_width: f64) {
        self.stroke_color = color.into();
        self.line_width = line_width;
        self.notify(Prop::StrokeColor);
    }

    fn calc_dimensions(&mut self) {
        let (w, h) = self
            .points
            .iter()
            .fold((0.0_f64, 0.0_f64), |(w, h), p| (w.max(p.x), h.max(p.y)));
        self.base.width = w;
        self.base.height = h;
    }
}

impl DisplayObject for Polygon {
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
        &POLYGON_PROPS
    }

    fn assign(&mut self, prop: Prop, value: &Value) -> Result<(), SceneError> {
        match prop {
            Prop::Points => self.points = props::decode(prop, value)?,
            Prop::FillColor => self.fill_color = props::as_string(prop, value)?,
            Prop::StrokeColor => self.stroke_color = props::as_string(prop, value)?,
            Prop::LineWidth => self.line_width = props::as_f64(prop, value)?,
            _ => {
                self.base.assign(prop, value)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, prop: Prop) {
        if prop == Prop::Points {
            self.calc_dimensions();
        }
        self.base.mark_dirty();
    }

    fn draw(&mut self, surface: &mut dyn Surface, _now: f64) {
        self.base.clear_dirty();
        if self.points.len() < 2 {
            return;
        }
        let dst = self.base.flip_offset();
        let path: Vec<Point> = self.points.iter().map(|p| Point::new(p.x + dst.x, p.y + dst.y)).collect();

        push_transform(surface, &self.base, Point::ZERO);
        if !self.fill_color.is_empty() {
            surface.set_fill_style(&FillStyle::Color(self.fill_color.clone()));
            surface.fill_path(&path);
        }
        if !self.stroke_color.is_empty() && self.line_width > 0.0 {
            surface.set_stroke_style(&self.stroke_color, self.line_width);
            surface.stroke_path(&path);
        }
        surface.restore();
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.base.hit_rect(Point::ZERO).contains(pt)
    }
}
