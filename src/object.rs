//! The display-object base: shared geometry, the dirty flag, and the
//! property-write path every concrete type goes through.
//!
//! A write to a tracked property (via [`DisplayObject::set_property`], an
//! options bag, or a typed setter such as [`DisplayObject::set_left`]) first
//! assigns the value and then synchronously calls the type's
//! [`DisplayObject::update`] hook. The default hook only marks the object
//! dirty; subtypes add work keyed by the property that changed.
//!
//! The dirty flag is the only signal a layer uses to decide whether to redraw.
//! It is set by every tracked write and by animation advance, and cleared by
//! the render pass that consumes it.

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::SceneError;
use crate::geom::{Point, Rect};
use crate::hit::RotatedRect;
use crate::props::{self, Options, OriginX, OriginY, Prop};
use crate::surface::Surface;

/// Process-unique identifier of a display object.
pub type ObjectId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Hand out the next object id. Ids increase monotonically and are never reused.
fn next_id() -> ObjectId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Concrete display type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Bitmap,
    Sprite,
    Text,
    Polygon,
}

/// State shared by every display object.
#[derive(Debug, Clone)]
pub struct ObjectBase {
    id: ObjectId,
    pub(crate) visible: bool,
    pub(crate) left: f64,
    pub(crate) top: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) origin_x: OriginX,
    pub(crate) origin_y: OriginY,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
    pub(crate) angle: f64,
    pub(crate) opacity: f64,
    dirty: bool,
}

impl Default for ObjectBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectBase {
    /// Fresh base state with a new id, unit scale, and a top-left anchor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: next_id(),
            visible: true,
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            opacity: 1.0,
            dirty: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn origin_x(&self) -> OriginX {
        self.origin_x
    }

    #[must_use]
    pub fn origin_y(&self) -> OriginY {
        self.origin_y
    }

    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Rendered width: intrinsic width times the absolute horizontal scale.
    #[must_use]
    pub fn scaled_width(&self) -> f64 {
        (self.width * self.scale_x).abs()
    }

    /// Rendered height: intrinsic height times the absolute vertical scale.
    #[must_use]
    pub fn scaled_height(&self) -> f64 {
        (self.height * self.scale_y).abs()
    }

    /// Offset of the anchor from the object's top-left corner, after scaling.
    ///
    /// The magnitude is independent of the scale sign: flipping an object
    /// does not move its anchor.
    #[must_use]
    pub fn origin_point(&self) -> Point {
        let x = match self.origin_x {
            OriginX::Left => 0.0,
            OriginX::Center => self.width / 2.0,
            OriginX::Right => self.width,
        };
        let y = match self.origin_y {
            OriginY::Top => 0.0,
            OriginY::Center => self.height / 2.0,
            OriginY::Bottom => self.height,
        };
        Point::new((x * self.scale_x).abs(), (y * self.scale_y).abs())
    }

    /// Stage x of the rendered box's left edge.
    #[must_use]
    pub fn origin_left(&self) -> f64 {
        self.left - self.origin_point().x
    }

    /// Stage y of the rendered box's top edge.
    #[must_use]
    pub fn origin_top(&self) -> f64 {
        self.top - self.origin_point().y
    }

    /// Local draw destination. Negative scales draw into negative space so the
    /// content flips in place instead of flipping away from its anchor.
    #[must_use]
    pub fn flip_offset(&self) -> Point {
        Point::new(
            if self.scale_x < 0.0 { -self.width } else { 0.0 },
            if self.scale_y < 0.0 { -self.height } else { 0.0 },
        )
    }

    /// Hit region: the anchor-adjusted box shifted by `shift`, rotated around
    /// the unscaled `left`/`top`.
    #[must_use]
    pub fn hit_rect(&self, shift: Point) -> RotatedRect {
        RotatedRect {
            rotate_origin: Point::new(self.left, self.top),
            bounds: Rect::new(
                self.origin_left() + shift.x,
                self.origin_top() + shift.y,
                self.scaled_width(),
                self.scaled_height(),
            ),
            angle: self.angle,
        }
    }

    /// Store a base property from an option value. Returns `false` when `prop`
    /// is not a base property.
    pub(crate) fn assign(&mut self, prop: Prop, value: &Value) -> Result<bool, SceneError> {
        match prop {
            Prop::Visible => self.visible = props::as_bool(prop, value)?,
            Prop::Left => self.left = props::as_f64(prop, value)?,
            Prop::Top => self.top = props::as_f64(prop, value)?,
            Prop::Width => self.width = props::as_f64(prop, value)?,
            Prop::Height => self.height = props::as_f64(prop, value)?,
            Prop::OriginX => self.origin_x = props::decode(prop, value)?,
            Prop::OriginY => self.origin_y = props::decode(prop, value)?,
            Prop::ScaleX => self.scale_x = props::as_f64(prop, value)?,
            Prop::ScaleY => self.scale_y = props::as_f64(prop, value)?,
            Prop::Angle => self.angle = props::as_f64(prop, value)?,
            Prop::Opacity => self.opacity = props::as_f64(prop, value)?.clamp(0.0, 1.0),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Apply the object's opacity, rotation, anchor translation, and scale.
///
/// `pivot` is subtracted from the anchor translation (sprites use it to keep
/// a frame's pivot fixed under scaling). With a non-zero angle the rotation is
/// applied around the unscaled `left`/`top` first, then the anchor offset is
/// applied in the rotated space. Callers must `restore` afterwards.
pub(crate) fn push_transform(surface: &mut dyn Surface, base: &ObjectBase, pivot: Point) {
    surface.save();
    if base.opacity < 1.0 {
        surface.set_global_alpha(base.opacity);
    }
    if base.angle == 0.0 {
        surface.translate(base.origin_left() - pivot.x, base.origin_top() - pivot.y);
    } else {
        surface.translate(base.left, base.top);
        surface.rotate(base.angle.to_radians());
        surface.translate(
            base.origin_left() - base.left - pivot.x,
            base.origin_top() - base.top - pivot.y,
        );
    }
    surface.scale(base.scale_x, base.scale_y);
}

/// A renderable, hit-testable scene element.
///
/// Implementors supply storage ([`DisplayObject::base`]), their tracked
/// property list, value assignment, drawing, and containment. Everything else
/// (the write path, typed setters, visibility handling) is provided.
pub trait DisplayObject: Any {
    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    fn kind(&self) -> ObjectKind;

    /// Tracked properties in the order an options bag is applied.
    fn tracked(&self) -> &'static [Prop];

    /// Store `value` into `prop` with no side effects beyond validation.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidValue`] when `value` has the wrong shape.
    fn assign(&mut self, prop: Prop, value: &Value) -> Result<(), SceneError>;

    /// React to a tracked property having changed.
    fn update(&mut self, _prop: Prop) {
        self.base_mut().mark_dirty();
    }

    /// Draw the object. Called only when visible; must leave the dirty flag
    /// in its post-render state.
    fn draw(&mut self, surface: &mut dyn Surface, now: f64);

    /// Geometric containment, ignoring visibility.
    fn contains_point(&self, pt: Point) -> bool;

    /// Drive any in-flight resource loads. Called by the owning layer every tick.
    fn poll_resources(&mut self) {}

    // --- Provided ---

    fn id(&self) -> ObjectId {
        self.base().id()
    }

    fn needs_update(&self) -> bool {
        self.base().needs_update()
    }

    /// Run the update hook for `prop` if this type tracks it.
    fn notify(&mut self, prop: Prop) {
        if self.tracked().contains(&prop) {
            self.update(prop);
        }
    }

    /// Write one property by name. Unknown or untracked names are ignored.
    ///
    /// # Errors
    ///
    /// Propagates validation errors from [`DisplayObject::assign`]; the
    /// object is left unchanged in that case.
    fn set_property(&mut self, name: &str, value: &Value) -> Result<(), SceneError> {
        let Some(prop) = Prop::from_name(name).filter(|p| self.tracked().contains(p)) else {
            tracing::trace!(property = name, kind = ?self.kind(), "ignoring unrecognised property");
            return Ok(());
        };
        self.assign(prop, value)?;
        self.update(prop);
        Ok(())
    }

    /// Apply an options bag in tracked-property order.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected value. Earlier writes stay applied.
    fn set(&mut self, options: &Options) -> Result<(), SceneError> {
        for &prop in self.tracked() {
            if let Some(value) = options.get(prop.name()) {
                self.assign(prop, value)?;
                self.update(prop);
            }
        }
        Ok(())
    }

    /// Render if visible; hidden objects just consume their dirty flag.
    fn render(&mut self, surface: &mut dyn Surface, now: f64) {
        if !self.base().visible() {
            self.base_mut().clear_dirty();
            return;
        }
        self.draw(surface, now);
    }

    /// Whether `pt` falls on the rendered object. Hidden objects never hit.
    fn hit_test(&self, pt: Point) -> bool {
        self.base().visible() && self.contains_point(pt)
    }

    // --- Typed setters ---

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().visible = visible;
        self.notify(Prop::Visible);
    }

    fn set_left(&mut self, left: f64) {
        self.base_mut().left = left;
        self.notify(Prop::Left);
    }

    fn set_top(&mut self, top: f64) {
        self.base_mut().top = top;
        self.notify(Prop::Top);
    }

    fn set_width(&mut self, width: f64) {
        self.base_mut().width = width;
        self.notify(Prop::Width);
    }

    fn set_height(&mut self, height: f64) {
        self.base_mut().height = height;
        self.notify(Prop::Height);
    }

    fn set_origin_x(&mut self, origin: OriginX) {
        self.base_mut().origin_x = origin;
        self.notify(Prop::OriginX);
    }

    fn set_origin_y(&mut self, origin: OriginY) {
        self.base_mut().origin_y = origin;
        self.notify(Prop::OriginY);
    }

    fn set_scale_x(&mut self, scale: f64) {
        self.base_mut().scale_x = scale;
        self.notify(Prop::ScaleX);
    }

    fn set_scale_y(&mut self, scale: f64) {
        self.base_mut().scale_y = scale;
        self.notify(Prop::ScaleY);
    }

    fn set_angle(&mut self, degrees: f64) {
        self.base_mut().angle = degrees;
        self.notify(Prop::Angle);
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.base_mut().opacity = opacity.clamp(0.0, 1.0);
        self.notify(Prop::Opacity);
    }
}
