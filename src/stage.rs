//! The stage: a stack of layers sharing one size, plus input routing.
//!
//! The stage never touches the host directly. The host calls [`Stage::tick`]
//! once per animation frame and forwards pointer and touch input to the
//! `on_*` handlers, which resolve the top-most object under the input and
//! return the [`StageEvent`]s for the host to dispatch. Higher layers are
//! tested first.
//!
//! Pointer handlers take stage-space points. Touch handlers take client
//! coordinates and convert them with the container origin and page scale, so
//! gesture thresholds are measured in client pixels.

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;

use std::convert::Infallible;

use serde::Deserialize;
use serde_json::Value;

use crate::consts::{DEFAULT_STAGE_HEIGHT, DEFAULT_STAGE_WIDTH, LONG_PRESS_DISTANCE, LONG_PRESS_MS};
use crate::error::SceneError;
use crate::geom::Point;
use crate::hit::Hit;
use crate::input::{EventKind, Gesture, GestureTracker, StageEvent, Throttle};
use crate::layer::Layer;
use crate::surface::Surface;

/// Stage construction options.
///
/// Deserializes from camelCase JSON. Every field is optional; the legacy
/// names `layerNumber` and `throttleDelay` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageConfig {
    pub width: f64,
    pub height: f64,
    /// CSS scale applied to the page; client offsets are divided by it.
    pub page_scale: f64,
    #[serde(alias = "layerNumber")]
    pub layer_count: usize,
    /// Minimum gap in milliseconds between delivered move events. Zero disables throttling.
    #[serde(alias = "throttleDelay")]
    pub throttle_ms: f64,
    pub long_press_ms: f64,
    pub long_press_distance: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_STAGE_WIDTH,
            height: DEFAULT_STAGE_HEIGHT,
            page_scale: 1.0,
            layer_count: 1,
            throttle_ms: 0.0,
            long_press_ms: LONG_PRESS_MS,
            long_press_distance: LONG_PRESS_DISTANCE,
        }
    }
}

impl StageConfig {
    /// Parse and normalize a JSON config string.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Config`] if the JSON is malformed or mistyped.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// # Errors
    ///
    /// Returns [`SceneError::Config`] if `value` does not describe a config.
    pub fn from_value(value: Value) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_value(value)?;
        Ok(config.normalized())
    }

    /// Replace zero or non-finite sizes and scales with defaults and keep at
    /// least one layer.
    #[must_use]
    pub fn normalized(self) -> Self {
        let positive_or = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            width: positive_or(self.width, DEFAULT_STAGE_WIDTH),
            height: positive_or(self.height, DEFAULT_STAGE_HEIGHT),
            page_scale: positive_or(self.page_scale, 1.0),
            layer_count: self.layer_count.max(1),
            throttle_ms: self.throttle_ms.max(0.0),
            long_press_ms: self.long_press_ms,
            long_press_distance: self.long_press_distance,
        }
    }
}

/// Layers plus input state. `S` is the surface type each layer draws on.
pub struct Stage<S> {
    layers: Vec<Layer<S>>,
    width: f64,
    height: f64,
    page_scale: f64,
    container_origin: Point,
    force_render: bool,
    gestures: GestureTracker,
    move_throttle: Throttle,
    touch_throttle: Throttle,
    hover: Option<Hit>,
}

impl<S: Surface> Stage<S> {
    /// Build a stage, creating one surface per layer with `factory(index)`.
    pub fn new<F>(config: &StageConfig, mut factory: F) -> Self
    where
        F: FnMut(usize) -> S,
    {
        match Self::try_new(config, |idx| Ok::<_, Infallible>(factory(idx))) {
            Ok(stage) => stage,
            Err(never) => match never {},
        }
    }

    /// Like [`Stage::new`] with a fallible surface factory.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `factory`.
    pub fn try_new<F, E>(config: &StageConfig, mut factory: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<S, E>,
    {
        let config = config.clone().normalized();
        let layers = (0..config.layer_count)
            .map(|idx| factory(idx).map(|surface| Layer::new(surface, config.width, config.height)))
            .collect::<Result<Vec<_>, E>>()?;
        tracing::debug!(
            layers = layers.len(),
            width = config.width,
            height = config.height,
            "stage created"
        );
        Ok(Self {
            layers,
            width: config.width,
            height: config.height,
            page_scale: config.page_scale,
            container_origin: Point::ZERO,
            force_render: true,
            gestures: GestureTracker::new(config.long_press_ms, config.long_press_distance),
            move_throttle: Throttle::new(config.throttle_ms),
            touch_throttle: Throttle::new(config.throttle_ms),
            hover: None,
        })
    }

    // --- Queries ---

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn page_scale(&self) -> f64 {
        self.page_scale
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn layer(&self, idx: usize) -> Option<&Layer<S>> {
        self.layers.get(idx)
    }

    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer<S>> {
        self.layers.get_mut(idx)
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer<S>> {
        self.layers.iter()
    }

    /// The object currently under the pointer, as of the last delivered move.
    #[must_use]
    pub fn hovered(&self) -> Option<Hit> {
        self.hover
    }

    // --- Geometry ---

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        for layer in &mut self.layers {
            layer.resize(width, height);
        }
        self.force_render = true;
    }

    /// Set the page scale. Non-positive scales are ignored.
    pub fn set_page_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.page_scale = scale;
        } else {
            tracing::warn!(scale, "ignoring non-positive page scale");
        }
    }

    /// Client-space position of the stage container's top-left corner.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.container_origin = origin;
    }

    /// Convert a client coordinate to stage space: whole client pixels
    /// relative to the container, divided by the page scale.
    #[must_use]
    pub fn to_stage_point(&self, client: Point) -> Point {
        Point::new(
            (client.x - self.container_origin.x).trunc() / self.page_scale,
            (client.y - self.container_origin.y).trunc() / self.page_scale,
        )
    }

    // --- Frame loop ---

    /// Render every layer that needs it. Returns whether anything was repainted.
    pub fn tick(&mut self, now: f64) -> bool {
        let force = std::mem::take(&mut self.force_render);
        let mut painted = false;
        for layer in &mut self.layers {
            painted |= layer.render_objects(now, force);
        }
        painted
    }

    /// Repaint every layer on the next tick.
    pub fn request_render(&mut self) {
        self.force_render = true;
    }

    // --- Hit-testing ---

    /// The top-most visible object under `pt`, searching higher layers first.
    #[must_use]
    pub fn hit_test(&self, pt: Point) -> Option<Hit> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .find_map(|(layer, l)| l.hit_test(pt).map(|object_id| Hit { layer, object_id }))
    }

    fn event(&self, kind: EventKind, point: Point) -> Option<StageEvent> {
        self.hit_test(point).map(|target| StageEvent { kind, target, point })
    }

    // --- Pointer input (stage-space points) ---

    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<StageEvent> {
        self.event(EventKind::PointerDown, pt).into_iter().collect()
    }

    /// Deliver a move, emitting leave/enter when the top-most target changes.
    /// Moves inside the throttle window are dropped entirely.
    pub fn on_pointer_move(&mut self, pt: Point, now: f64) -> Vec<StageEvent> {
        if !self.move_throttle.accept(now) {
            return Vec::new();
        }
        let target = self.hit_test(pt);
        let mut events = Vec::new();
        if target != self.hover {
            if let Some(prev) = self.hover {
                events.push(StageEvent { kind: EventKind::PointerLeave, target: prev, point: pt });
            }
            if let Some(next) = target {
                events.push(StageEvent { kind: EventKind::PointerEnter, target: next, point: pt });
            }
            self.hover = target;
        }
        if let Some(target) = target {
            events.push(StageEvent { kind: EventKind::PointerMove, target, point: pt });
        }
        events
    }

    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<StageEvent> {
        self.event(EventKind::PointerUp, pt).into_iter().collect()
    }

    pub fn on_click(&mut self, pt: Point) -> Vec<StageEvent> {
        self.event(EventKind::Click, pt).into_iter().collect()
    }

    pub fn on_context_menu(&mut self, pt: Point) -> Vec<StageEvent> {
        self.event(EventKind::ContextMenu, pt).into_iter().collect()
    }

    /// The pointer left the stage: the hovered object, if any, is left too.
    pub fn on_pointer_leave(&mut self, pt: Point) -> Vec<StageEvent> {
        self.hover
            .take()
            .map(|target| StageEvent { kind: EventKind::PointerLeave, target, point: pt })
            .into_iter()
            .collect()
    }

    // --- Touch input (client coordinates) ---

    pub fn on_touch_start(&mut self, client: Point, now: f64) -> Vec<StageEvent> {
        self.gestures.begin(client, now);
        let pt = self.to_stage_point(client);
        self.event(EventKind::TouchStart, pt).into_iter().collect()
    }

    pub fn on_touch_move(&mut self, client: Point, now: f64) -> Vec<StageEvent> {
        if !self.touch_throttle.accept(now) {
            return Vec::new();
        }
        let pt = self.to_stage_point(client);
        self.event(EventKind::TouchMove, pt).into_iter().collect()
    }

    /// The host cancelled the touch; a later touch end is not classified.
    pub fn on_touch_cancel(&mut self) {
        self.gestures.cancel();
    }

    /// Classify the finished touch. A long press yields `LongTap` alone; any
    /// other touch yields `TouchEnd`, followed by `Tap` if it stayed in place.
    pub fn on_touch_end(&mut self, client: Point, now: f64) -> Vec<StageEvent> {
        let gesture = self.gestures.end(client, now);
        let pt = self.to_stage_point(client);
        let kinds: &[EventKind] = match gesture {
            Some(Gesture::LongTap) => &[EventKind::LongTap],
            Some(Gesture::Tap) => &[EventKind::TouchEnd, EventKind::Tap],
            Some(Gesture::Release) | None => &[EventKind::TouchEnd],
        };
        let Some(target) = self.hit_test(pt) else {
            return Vec::new();
        };
        kinds.iter().map(|&kind| StageEvent { kind, target, point: pt }).collect()
    }
}
