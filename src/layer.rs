//! A layer: one drawing surface and the ordered objects painted onto it.
//!
//! Objects are painted in insertion order, so later objects sit on top and
//! win hit tests. A layer only repaints when something asked for it: an
//! object is dirty, the layer was resized or its object list changed, or the
//! caller forces a redraw. A repaint clears the whole surface and renders
//! every object.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use std::any::Any;

use crate::geom::Point;
use crate::object::{DisplayObject, ObjectId};
use crate::surface::Surface;

pub struct Layer<S> {
    surface: S,
    width: f64,
    height: f64,
    objects: Vec<Box<dyn DisplayObject>>,
    /// Set by structural changes (resize, add, remove) until the next repaint.
    stale: bool,
}

impl<S: Surface> Layer<S> {
    #[must_use]
    pub fn new(surface: S, width: f64, height: f64) -> Self {
        Self { surface, width, height, objects: Vec::new(), stale: true }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // --- Object list ---

    /// Add an object on top of the existing ones and return its id.
    pub fn add<T: DisplayObject>(&mut self, object: T) -> ObjectId {
        self.add_boxed(Box::new(object))
    }

    pub fn add_boxed(&mut self, object: Box<dyn DisplayObject>) -> ObjectId {
        let id = object.id();
        tracing::debug!(id, kind = ?object.kind(), "object added to layer");
        self.objects.push(object);
        self.stale = true;
        id
    }

    /// Remove and return the object with `id`.
    pub fn remove(&mut self, id: ObjectId) -> Option<Box<dyn DisplayObject>> {
        let idx = self.objects.iter().position(|o| o.id() == id)?;
        self.stale = true;
        Some(self.objects.remove(idx))
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.stale = true;
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&dyn DisplayObject> {
        let object = self.objects.iter().find(|o| o.id() == id)?;
        Some(&**object)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn DisplayObject> {
        let object = self.objects.iter_mut().find(|o| o.id() == id)?;
        Some(&mut **object)
    }

    /// The object with `id`, if it is a `T`.
    #[must_use]
    pub fn get_as<T: DisplayObject>(&self, id: ObjectId) -> Option<&T> {
        let object = self.objects.iter().find(|o| o.id() == id)?;
        let any: &dyn Any = &**object;
        any.downcast_ref::<T>()
    }

    pub fn get_as_mut<T: DisplayObject>(&mut self, id: ObjectId) -> Option<&mut T> {
        let object = self.objects.iter_mut().find(|o| o.id() == id)?;
        let any: &mut dyn Any = &mut **object;
        any.downcast_mut::<T>()
    }

    /// Objects in paint order (bottom first).
    pub fn objects(&self) -> impl Iterator<Item = &(dyn DisplayObject + 'static)> {
        self.objects.iter().map(|o| &**o)
    }

    // --- Rendering ---

    /// Whether the next [`Layer::render_objects`] will repaint.
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.stale || self.objects.iter().any(|o| o.needs_update())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.stale = true;
    }

    /// Drive pending loads, then repaint if forced or anything changed.
    /// Returns whether the surface was repainted.
    pub fn render_objects(&mut self, now: f64, force: bool) -> bool {
        for object in &mut self.objects {
            object.poll_resources();
        }
        if !force && !self.needs_update() {
            return false;
        }
        self.surface.clear(self.width, self.height);
        for object in &mut self.objects {
            object.render(&mut self.surface, now);
        }
        self.stale = false;
        true
    }

    // --- Hit-testing ---

    /// The top-most object under `pt`.
    #[must_use]
    pub fn hit_test(&self, pt: Point) -> Option<ObjectId> {
        self.objects.iter().rev().find(|o| o.hit_test(pt)).map(|o| o.id())
    }
}
