//! Static images.

#[cfg(test)]
#[path = "bitmap_test.rs"]
mod bitmap_test;

use std::rc::Rc;

use serde_json::Value;

use crate::error::SceneError;
use crate::geom::{Point, Rect};
use crate::object::{DisplayObject, ObjectBase, ObjectKind, push_transform};
use crate::props::{self, BASE_PROPS, Options, Prop};
use crate::resource::{ImageLoader, ImageSlot, LoadOutcome};
use crate::surface::Surface;

/// Properties tracked by [`Bitmap`].
pub const BITMAP_PROPS: [Prop; 12] = props::extend(BASE_PROPS, [Prop::Src]);

/// A whole image drawn at its natural size (before scaling).
pub struct Bitmap {
    base: ObjectBase,
    src: Option<String>,
    image: ImageSlot,
}

impl Bitmap {
    /// # Errors
    ///
    /// Returns the first rejected option.
    pub fn new(options: &Options, loader: Rc<dyn ImageLoader>) -> Result<Self, SceneError> {
        let mut bitmap = Self { base: ObjectBase::new(), src: None, image: ImageSlot::new(loader) };
        bitmap.set(options)?;
        Ok(bitmap)
    }

    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.image.is_loading()
    }

    pub fn set_src(&mut self, src: impl Into<String>) {
        self.src = Some(src.into());
        self.notify(Prop::Src);
    }

    fn on_load_settled(&mut self, outcome: LoadOutcome) {
        if outcome != LoadOutcome::Loaded {
            return;
        }
        if let Some(image) = self.image.image() {
            self.base.width = image.width();
            self.base.height = image.height();
        }
        self.base.mark_dirty();
    }
}

impl DisplayObject for Bitmap {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Bitmap
    }

    fn tracked(&self) -> &'static [Prop] {
        &BITMAP_PROPS
    }

    fn assign(&mut self, prop: Prop, value: &Value) -> Result<(), SceneError> {
        if prop == Prop::Src {
            self.src = Some(props::as_string(prop, value)?);
        } else {
            self.base.assign(prop, value)?;
        }
        Ok(())
    }

    fn update(&mut self, prop: Prop) {
        if prop == Prop::Src
            && let Some(src) = self.src.clone()
            && let Some(outcome) = self.image.request(&src)
        {
            self.on_load_settled(outcome);
        }
        self.base.mark_dirty();
    }

    fn poll_resources(&mut self) {
        if let Some(outcome) = self.image.poll() {
            self.on_load_settled(outcome);
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, _now: f64) {
        self.base.clear_dirty();
        let Some(image) = self.image.image() else {
            return;
        };
        let dst = self.base.flip_offset();
        push_transform(surface, &self.base, Point::ZERO);
        surface.draw_image(
            image,
            Rect::new(0.0, 0.0, image.width(), image.height()),
            Rect::new(dst.x, dst.y, self.base.width, self.base.height),
        );
        surface.restore();
    }

    fn contains_point(&self, pt: Point) -> bool {
        self.base.hit_rect(Point::ZERO).contains(pt)
    }
}
