//! Property names, anchor modes, and typed access to option-bag values.
//!
//! Every concrete display type declares an ordered list of tracked
//! properties. Writing one of them runs the type's `update` hook; the same
//! list fixes the order in which an options bag is applied at construction.
//! Lists are compile-time constants built by extending [`BASE_PROPS`].

#[cfg(test)]
#[path = "props_test.rs"]
mod props_test;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SceneError;

/// A flat mapping of property names (camelCase) to initial values.
pub type Options = serde_json::Map<String, Value>;

/// Every property name recognised by some display type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    Visible,
    Left,
    Top,
    Width,
    Height,
    OriginX,
    OriginY,
    ScaleX,
    ScaleY,
    Angle,
    Opacity,
    // Image-backed objects
    Src,
    // Sprite
    Frames,
    Status,
    PlaybackRate,
    // Text
    Text,
    FontSize,
    FontWeight,
    FontFamily,
    Color,
    LetterSpacing,
    ShadowColor,
    ShadowOffsetX,
    ShadowOffsetY,
    ShadowBlur,
    Gradient,
    // Polygon
    Points,
    FillColor,
    StrokeColor,
    LineWidth,
}

impl Prop {
    /// The option-bag key for this property.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Left => "left",
            Self::Top => "top",
            Self::Width => "width",
            Self::Height => "height",
            Self::OriginX => "originX",
            Self::OriginY => "originY",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::Angle => "angle",
            Self::Opacity => "opacity",
            Self::Src => "src",
            Self::Frames => "frames",
            Self::Status => "status",
            Self::PlaybackRate => "playbackRate",
            Self::Text => "text",
            Self::FontSize => "fontSize",
            Self::FontWeight => "fontWeight",
            Self::FontFamily => "fontFamily",
            Self::Color => "color",
            Self::LetterSpacing => "letterSpacing",
            Self::ShadowColor => "shadowColor",
            Self::ShadowOffsetX => "shadowOffsetX",
            Self::ShadowOffsetY => "shadowOffsetY",
            Self::ShadowBlur => "shadowBlur",
            Self::Gradient => "gradient",
            Self::Points => "points",
            Self::FillColor => "fillColor",
            Self::StrokeColor => "strokeColor",
            Self::LineWidth => "lineWidth",
        }
    }

    /// Look up a property by its option-bag key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_PROPS.iter().copied().find(|p| p.name() == name)
    }
}

const ALL_PROPS: [Prop; 30] = [
    Prop::Visible,
    Prop::Left,
    Prop::Top,
    Prop::Width,
    Prop::Height,
    Prop::OriginX,
    Prop::OriginY,
    Prop::ScaleX,
    Prop::ScaleY,
    Prop::Angle,
    Prop::Opacity,
    Prop::Src,
    Prop::Frames,
    Prop::Status,
    Prop::PlaybackRate,
    Prop::Text,
    Prop::FontSize,
    Prop::FontWeight,
    Prop::FontFamily,
    Prop::Color,
    Prop::LetterSpacing,
    Prop::ShadowColor,
    Prop::ShadowOffsetX,
    Prop::ShadowOffsetY,
    Prop::ShadowBlur,
    Prop::Gradient,
    Prop::Points,
    Prop::FillColor,
    Prop::StrokeColor,
    Prop::LineWidth,
];

/// Properties tracked by every display object.
pub const BASE_PROPS: [Prop; 11] = [
    Prop::Visible,
    Prop::Left,
    Prop::Top,
    Prop::Width,
    Prop::Height,
    Prop::OriginX,
    Prop::OriginY,
    Prop::ScaleX,
    Prop::ScaleY,
    Prop::Angle,
    Prop::Opacity,
];

/// Build a subtype's tracked list: `base` followed by `extra`.
#[must_use]
pub const fn extend<const A: usize, const B: usize, const C: usize>(base: [Prop; A], extra: [Prop; B]) -> [Prop; C] {
    assert!(A + B == C, "extended property list has the wrong length");
    let mut out = [Prop::Visible; C];
    let mut i = 0;
    while i < A {
        out[i] = base[i];
        i += 1;
    }
    let mut j = 0;
    while j < B {
        out[A + j] = extra[j];
        j += 1;
    }
    out
}

/// Horizontal anchor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginX {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginY {
    #[default]
    Top,
    Center,
    Bottom,
}

// =============================================================
// Value coercion
// =============================================================

pub(crate) fn as_f64(prop: Prop, value: &Value) -> Result<f64, SceneError> {
    value
        .as_f64()
        .ok_or_else(|| SceneError::invalid(prop.name(), format!("expected a number, got {value}")))
}

pub(crate) fn as_bool(prop: Prop, value: &Value) -> Result<bool, SceneError> {
    value
        .as_bool()
        .ok_or_else(|| SceneError::invalid(prop.name(), format!("expected a boolean, got {value}")))
}

pub(crate) fn as_string(prop: Prop, value: &Value) -> Result<String, SceneError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| SceneError::invalid(prop.name(), format!("expected a string, got {value}")))
}

pub(crate) fn decode<T: DeserializeOwned>(prop: Prop, value: &Value) -> Result<T, SceneError> {
    serde_json::from_value(value.clone()).map_err(|e| SceneError::invalid(prop.name(), e.to_string()))
}
