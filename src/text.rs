//! Single-line text labels.
//!
//! Size is derived from the measurement collaborator whenever the text, its
//! font, or its letter spacing changes. With non-zero letter spacing the
//! label is drawn one character at a time so the extra advance can be
//! inserted between glyphs.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::consts::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_FONT_WEIGHT, DEFAULT_TEXT_COLOR};
use crate::error::SceneError;
use crate::geom::Point;
use crate::object::{DisplayObject, ObjectBase, ObjectKind, push_transform};
use crate::props::{self, BASE_PROPS, Options, Prop};
use crate::resource::{FontSpec, TextMeasure};
use crate::surface::{ColorStop, FillStyle, Shadow, Surface};

/// Properties tracked by [`Text`].
pub const TEXT_PROPS: [Prop; 22] = props::extend(
    BASE_PROPS,
    [
        Prop::Text,
        Prop::FontSize,
        Prop::FontWeight,
        Prop::FontFamily,
        Prop::Color,
        Prop::ShadowColor,
        Prop::ShadowOffsetX,
        Prop::ShadowOffsetY,
        Prop::ShadowBlur,
        Prop::Gradient,
        Prop::LetterSpacing,
    ],
);

/// A diagonal linear gradient spanning the label's box.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub color_stops: Vec<ColorStop>,
}

pub struct Text {
    base: ObjectBase,
    measure: Rc<dyn TextMeasure>,
    text: String,
    font: FontSpec,
    color: String,
    letter_spacing: f64,
    shadow: Shadow,
    gradient: Option<Gradient>,
}

impl Text {
    /// # Errors
    ///
    /// Returns the first rejected option.
    pub fn new(options: &Options, measure: Rc<dyn TextMeasure>) -> Result<Self, SceneError> {
        let mut text = Self {
            base: ObjectBase::new(),
            measure,
            text: String::new(),
            font: FontSpec {
                size: DEFAULT_FONT_SIZE,
                weight: DEFAULT_FONT_WEIGHT.to_owned(),
                family: DEFAULT_FONT_FAMILY.to_owned(),
            },
            color: DEFAULT_TEXT_COLOR.to_owned(),
            letter_spacing: 0.0,
            shadow: Shadow { color: String::new(), offset_x: 0.0, offset_y: 0.0, blur: 0.0 },
            gradient: None,
        };
        text.set(options)?;
        Ok(text)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn letter_spacing(&self) -> f64 {
        self.letter_spacing
    }

    #[must_use]
    pub fn gradient(&self) -> Option<&Gradient> {
        self.gradient.as_ref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.notify(Prop::Text);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font.size = size;
        self.notify(Prop::FontSize);
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
        self.notify(Prop::Color);
    }

    pub fn set_letter_spacing(&mut self, spacing: f64) {
        self.letter_spacing = spacing;
        self.notify(Prop::LetterSpacing);
    }

    pub fn set_gradient(&mut self, gradient: Option<Gradient>) {
        self.gradient = gradient;
        self.notify(Prop::Gradient);
    }

    fn spaced(&self) -> bool {
        self.letter_spacing != 0.0 && self.text.chars().nth(1).is_some()
    }

    fn calc_dimensions(&mut self) {
        if self.text.is_empty() || self.font.size == 0.0 {
            self.base.width = 0.0;
            self.base.height = 0.0;
            return;
        }
        let size = self.measure.measure(&self.text, &self.font);
        let mut width = size.width;
        if self.spaced() {
            let gaps = self.text.chars().count() - 1;
            width += gaps as f64 * self.letter_spacing;
        }
        self.base.width = width;
        self.base.height = size.height;
    }
}

impl DisplayObject for Text {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Text
    }

    fn tracked(&self) -> &'static [Prop] {
        &TEXT_PROPS
    }

    fn assign(&mut self, prop: Prop, value: &Value) -> Result<(), SceneError> {
        match prop {
            Prop::Text => self.text = props::as_string(prop, value)?,
            Prop::FontSize => self.font.size = props::as_f64(prop, value)?,
            Prop::FontWeight => self.font.weight = font_weight(prop, value)?,
            Prop::FontFamily => self.font.family = props::as_string(prop, value)?,
            Prop::Color => self.color = props::as_string(prop, value)?,
            Prop::LetterSpacing => self.letter_spacing = props::as_f64(prop, value)?,
            Prop::ShadowColor => self.shadow.color = props::as_string(prop, value)?,
            Prop::ShadowOffsetX => self.shadow.offset_x = props::as_f64(prop, value)?,
            Prop::ShadowOffsetY => self.shadow.offset_y = props::as_f64(prop, value)?,
            Prop::ShadowBlur => self.shadow.blur = props::as_f64(prop, value)?,
            Prop::Gradient => self.gradient = props::decode(prop, value)?,
            _ => {
                self.base.assign(prop, value)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, prop: Prop) {
        if matches!(
            prop,
            Prop::Text | Prop::FontSize | Prop::FontWeight | Prop::FontFamily | Prop::LetterSpacing
        ) {
            self.calc_dimensions();
        }
        self.base.mark_dirty();
    }

    fn draw(&mut self, surface: &mut dyn Surface, _now: f64) {
        let dst = self.base.flip_offset();
        push_transform(surface, &self.base, Point::ZERO);

        let fill = match &self.gradient {
            Some(gradient) => FillStyle::LinearGradient {
                start: Point::ZERO,
                end: Point::new(self.base.width, self.base.height),
                stops: gradient.color_stops.clone(),
            },
            None => FillStyle::Color(self.color.clone()),
        };
        if !self.shadow.color.is_empty() {
            surface.set_shadow(&self.shadow);
        }
        surface.set_fill_style(&fill);
        surface.set_font(&self.font.css());

        if self.spaced() {
            let mut indent = 0.0;
            let mut buf = [0u8; 4];
            for ch in self.text.chars() {
                let glyph = ch.encode_utf8(&mut buf);
                surface.fill_text(glyph, dst.x + indent, dst.y);
                indent += self.measure.measure(glyph, &self.font).width + self.letter_spacing;
            }
        } else {
            surface.fill_text(&self.text, dst.x, dst.y);
        }

        surface.restore();
        self.base.clear_dirty();
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.base.hit_rect(Point::ZERO).contains(pt)
    }
}

/// Font weights arrive either as keywords (`"bold"`) or numbers (`700`).
fn font_weight(prop: Prop, value: &Value) -> Result<String, SceneError> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        _ => props::as_string(prop, value),
    }
}
