//! Rotation-aware hit-testing primitives.
//!
//! Objects rotate around their unscaled `left`/`top` anchor (the rotate
//! origin), while their visible bounds are the anchor-adjusted, scaled box.
//! A query point is therefore brought into the object's unrotated frame by
//! turning it back around the rotate origin, then tested against the box.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::{Point, Rect};
use crate::object::ObjectId;

/// The bounds an object occupies before rotation, plus how it is rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    /// Point the rotation is applied around.
    pub rotate_origin: Point,
    /// Unrotated bounding box.
    pub bounds: Rect,
    /// Clockwise rotation in degrees.
    pub angle: f64,
}

impl RotatedRect {
    /// Whether `pt` lies inside the rotated box (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let local = pt.rotate_around(self.rotate_origin, -self.angle);
        self.bounds.contains(local)
    }
}

/// Result of a stage-level hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index of the layer holding the object; higher layers are drawn on top.
    pub layer: usize,
    pub object_id: ObjectId,
}
