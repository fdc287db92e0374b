//! Frame-table sprites and their animation state machine.
//!
//! A sprite plays one named *status* at a time. Each status is a sequence of
//! source rectangles on a sprite sheet, advanced on render attempts once
//! `duration / playback_rate` milliseconds have passed since the previous
//! advance. A status may cap its iteration count; when the cap is reached the
//! cursor freezes on the last frame, completion callbacks run, and the sprite
//! stops requesting redraws until its status changes or it is replayed.
//!
//! ```text
//!            pause()                cap reached
//!  Playing ───────────► Paused    Playing ───────► Ended
//!     ▲     ◄───────────  │          ▲               │
//!     │       resume()    │          │   replay() /  │
//!     └───────────────────┴──────────┴── set_status ─┘
//! ```

#[cfg(test)]
#[path = "sprite_test.rs"]
mod sprite_test;

use std::collections::HashMap;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SceneError;
use crate::geom::{Point, Rect};
use crate::object::{DisplayObject, ObjectBase, ObjectKind, push_transform};
use crate::props::{self, BASE_PROPS, Options, Prop};
use crate::resource::{ImageLoader, ImageSlot, LoadOutcome};
use crate::surface::Surface;

/// Properties tracked by [`Sprite`].
pub const SPRITE_PROPS: [Prop; 15] =
    props::extend(BASE_PROPS, [Prop::Frames, Prop::Src, Prop::Status, Prop::PlaybackRate]);

/// One frame: a source rectangle on the sheet and its pivot point.
///
/// The pivot `(cx, cy)` is relative to the frame's own top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub cx: f64,
    pub cy: f64,
}

/// The frames of one status plus its timing.
///
/// Deserializes from the compact sheet format
/// `{"0": {...}, "1": {...}, "l": 2, "d": 100, "i": 1, "src": "..."}` where
/// `l` is the length, `d` the per-frame duration in milliseconds, `i` the
/// optional iteration cap, and `src` an optional sheet override.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSequence")]
pub struct FrameSequence {
    frames: Vec<Frame>,
    duration_ms: f64,
    src: Option<String>,
    iterations: Option<u32>,
}

#[derive(Deserialize)]
struct RawSequence {
    l: usize,
    d: f64,
    #[serde(default)]
    i: Option<u32>,
    #[serde(default)]
    src: Option<String>,
    #[serde(flatten)]
    indexed: HashMap<String, Frame>,
}

impl TryFrom<RawSequence> for FrameSequence {
    type Error = String;

    fn try_from(raw: RawSequence) -> Result<Self, Self::Error> {
        let frames = (0..raw.l)
            .map(|idx| {
                raw.indexed
                    .get(&idx.to_string())
                    .copied()
                    .ok_or_else(|| format!("missing frame {idx} of {}", raw.l))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut seq = Self::new(frames, raw.d).map_err(|e| e.to_string())?;
        seq.src = raw.src;
        seq.iterations = raw.i.filter(|&n| n > 0);
        Ok(seq)
    }
}

impl FrameSequence {
    /// A looping sequence.
    ///
    /// # Errors
    ///
    /// Rejects an empty frame list or a negative or non-finite duration.
    pub fn new(frames: Vec<Frame>, duration_ms: f64) -> Result<Self, SceneError> {
        if frames.is_empty() {
            return Err(SceneError::invalid(Prop::Frames.name(), "a status needs at least one frame"));
        }
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(SceneError::invalid(Prop::Frames.name(), format!("bad frame duration {duration_ms}")));
        }
        Ok(Self { frames, duration_ms, src: None, iterations: None })
    }

    /// Play `n` times, then stop on the last frame. Zero means loop forever.
    #[must_use]
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = (n > 0).then_some(n);
        self
    }

    /// Draw this status from a different sheet.
    #[must_use]
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    #[must_use]
    pub fn iterations(&self) -> Option<u32> {
        self.iterations
    }
}

/// Status name → frame sequence.
pub type FrameTable = HashMap<String, FrameSequence>;

/// Outcome of a completion callback. Errors are logged; later callbacks still run.
pub type CallbackResult = Result<(), Box<dyn std::error::Error>>;

/// Called when a status's animation ends.
pub type StatusEndCallback = Box<dyn FnMut() -> CallbackResult>;

struct Registered {
    callback: StatusEndCallback,
    once: bool,
}

/// Where the animation of the current status stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Playing,
    Paused,
    /// The iteration cap was reached.
    Ended,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    frame_index: usize,
    /// Unset after a reset; the next render advances unconditionally.
    last_frame_time: Option<f64>,
    iterations: u32,
    paused: bool,
    end_notified: bool,
    /// Frame shown by the last render; hit-testing follows it.
    drawn_index: Option<usize>,
}

impl Cursor {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn capped(&self, cap: Option<u32>) -> bool {
        cap.is_some_and(|n| self.iterations >= n)
    }

    fn is_ended(&self, cap: Option<u32>) -> bool {
        self.paused || self.capped(cap)
    }

    fn advance(&mut self, now: f64, threshold: f64, len: usize, cap: Option<u32>) {
        let due = self.last_frame_time.is_none_or(|last| now - last >= threshold);
        if !due {
            return;
        }
        self.last_frame_time = Some(now);
        self.frame_index += 1;
        if self.frame_index >= len {
            self.frame_index = 0;
            self.iterations = self.iterations.saturating_add(1);
            if self.capped(cap) {
                self.frame_index = len - 1;
            }
        }
    }
}

/// A status switch waiting on the status's own sheet. Until the sheet loads
/// the sprite keeps animating the status it switched away from.
#[derive(Debug, Clone)]
struct SheetSwitch {
    status: String,
    src: Option<String>,
}

/// A frame-animated image.
pub struct Sprite {
    base: ObjectBase,
    src: Option<String>,
    frames: FrameTable,
    status: String,
    previous_status: String,
    switching: Option<SheetSwitch>,
    playback_rate: f64,
    image: ImageSlot,
    cursor: Cursor,
    callbacks: HashMap<String, Vec<Registered>>,
}

impl Sprite {
    /// Build a sprite from an options bag (`frames`, `src`, `status`,
    /// `playbackRate`, and the base properties).
    ///
    /// # Errors
    ///
    /// Returns the first rejected option, e.g. a status missing from `frames`.
    pub fn new(options: &Options, loader: Rc<dyn ImageLoader>) -> Result<Self, SceneError> {
        let mut sprite = Self {
            base: ObjectBase::new(),
            src: None,
            frames: FrameTable::new(),
            status: String::new(),
            previous_status: String::new(),
            switching: None,
            playback_rate: 1.0,
            image: ImageSlot::new(loader),
            cursor: Cursor::default(),
            callbacks: HashMap::new(),
        };
        sprite.set(options)?;
        Ok(sprite)
    }

    // --- Accessors ---

    #[must_use]
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    #[must_use]
    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.cursor.frame_index
    }

    /// Completed passes through the current status.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.cursor.iterations
    }

    /// Whether the current status is still waiting on its own sheet.
    #[must_use]
    pub fn is_switching(&self) -> bool {
        self.switching.is_some()
    }

    /// Whether an image load is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.image.is_loading()
    }

    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        if self.cursor.paused {
            AnimationState::Paused
        } else if self.cursor.capped(self.current_cap()) {
            AnimationState::Ended
        } else {
            AnimationState::Playing
        }
    }

    // --- Typed writes ---

    pub fn set_src(&mut self, src: impl Into<String>) {
        self.src = Some(src.into());
        self.notify(Prop::Src);
    }

    pub fn set_frames(&mut self, frames: FrameTable) {
        self.frames = frames;
        self.notify(Prop::Frames);
    }

    /// Switch to another status and restart its animation.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownStatus`] if `status` has no frames; the
    /// sprite is left untouched.
    pub fn set_status(&mut self, status: &str) -> Result<(), SceneError> {
        self.check_status(status)?;
        self.replace_status(status.to_owned());
        self.notify(Prop::Status);
        Ok(())
    }

    /// Register `on_end` for `status`, then switch to it.
    ///
    /// With `once`, the callback is dropped after it first runs.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownStatus`] if `status` has no frames; no
    /// callback is registered in that case.
    pub fn set_status_with<F>(&mut self, status: &str, on_end: F, once: bool) -> Result<(), SceneError>
    where
        F: FnMut() -> CallbackResult + 'static,
    {
        self.check_status(status)?;
        self.on_status_end(status, on_end, once);
        self.set_status(status)
    }

    /// Register a completion callback for `status` without switching to it.
    pub fn on_status_end<F>(&mut self, status: &str, on_end: F, once: bool)
    where
        F: FnMut() -> CallbackResult + 'static,
    {
        self.callbacks
            .entry(status.to_owned())
            .or_default()
            .push(Registered { callback: Box::new(on_end), once });
    }

    /// Number of callbacks waiting on `status`.
    #[must_use]
    pub fn status_end_callbacks(&self, status: &str) -> usize {
        self.callbacks.get(status).map_or(0, Vec::len)
    }

    /// # Errors
    ///
    /// Rejects rates that are not strictly positive and finite.
    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), SceneError> {
        self.playback_rate = check_rate(rate)?;
        self.notify(Prop::PlaybackRate);
        Ok(())
    }

    // --- Animation control ---

    /// Hold the current frame. Takes effect on the next render attempt.
    pub fn pause(&mut self) {
        self.cursor.paused = true;
    }

    pub fn resume(&mut self) {
        if self.cursor.paused {
            self.cursor.paused = false;
            self.cursor.end_notified = false;
        }
        self.base.mark_dirty();
    }

    /// Restart the current status from its first frame.
    pub fn replay(&mut self) {
        self.cursor.reset();
        self.base.mark_dirty();
    }

    // --- Internals ---

    fn check_status(&self, status: &str) -> Result<(), SceneError> {
        if self.frames.contains_key(status) {
            Ok(())
        } else {
            Err(SceneError::UnknownStatus(status.to_owned()))
        }
    }

    fn replace_status(&mut self, status: String) {
        self.previous_status = std::mem::replace(&mut self.status, status);
    }

    /// The status being drawn: the previous one while a sheet switch is pending.
    fn active_status(&self) -> &str {
        self.switching.as_ref().map_or(self.status.as_str(), |s| s.status.as_str())
    }

    fn current_cap(&self) -> Option<u32> {
        self.frames.get(self.active_status()).and_then(FrameSequence::iterations)
    }

    /// Take width/height from the current status's first frame.
    fn apply_first_frame(&mut self) {
        if let Some(first) = self.frames.get(&self.status).and_then(|seq| seq.frames.first()) {
            self.base.width = first.w;
            self.base.height = first.h;
        }
    }

    fn on_load_settled(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded => {
                self.switching = None;
                self.apply_first_frame();
                self.cursor.reset();
                self.base.mark_dirty();
            }
            LoadOutcome::Failed => {
                if let Some(switch) = self.switching.take() {
                    tracing::warn!(
                        id = self.base.id(),
                        status = %self.status,
                        restored = %switch.status,
                        "sheet for status failed to load; keeping previous status"
                    );
                    self.status = switch.status;
                    self.src = switch.src;
                }
            }
        }
    }

    fn on_status_changed(&mut self) {
        let Some(seq) = self.frames.get(&self.status) else {
            return;
        };
        let sheet = seq.src.as_ref().filter(|s| self.src.as_ref() != Some(*s)).cloned();
        tracing::debug!(id = self.base.id(), status = %self.status, "sprite status changed");
        match sheet {
            Some(src) => {
                if self.switching.is_none() && self.frames.contains_key(&self.previous_status) {
                    self.switching = Some(SheetSwitch { status: self.previous_status.clone(), src: self.src.clone() });
                }
                // Cursor and dimensions follow once the new sheet has loaded.
                self.set_src(src);
            }
            None => {
                self.switching = None;
                self.cursor.reset();
                self.apply_first_frame();
            }
        }
    }

    fn fire_status_end(&mut self) {
        let status = self.active_status().to_owned();
        let Some(entries) = self.callbacks.get_mut(&status) else {
            return;
        };
        entries.retain_mut(|entry| {
            if let Err(e) = (entry.callback)() {
                tracing::warn!(error = %e, %status, "status end callback failed");
            }
            !entry.once
        });
    }
}

fn check_rate(rate: f64) -> Result<f64, SceneError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(SceneError::invalid(Prop::PlaybackRate.name(), format!("must be positive, got {rate}")))
    }
}

impl DisplayObject for Sprite {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Sprite
    }

    fn tracked(&self) -> &'static [Prop] {
        &SPRITE_PROPS
    }

    fn assign(&mut self, prop: Prop, value: &Value) -> Result<(), SceneError> {
        match prop {
            Prop::Frames => self.frames = props::decode(prop, value)?,
            Prop::Src => self.src = Some(props::as_string(prop, value)?),
            Prop::Status => {
                let status = props::as_string(prop, value)?;
                self.check_status(&status)?;
                self.replace_status(status);
            }
            Prop::PlaybackRate => self.playback_rate = check_rate(props::as_f64(prop, value)?)?,
            _ => {
                self.base.assign(prop, value)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, prop: Prop) {
        match prop {
            Prop::Src => {
                if let Some(src) = self.src.clone()
                    && let Some(outcome) = self.image.request(&src)
                {
                    self.on_load_settled(outcome);
                }
            }
            Prop::Status => self.on_status_changed(),
            Prop::Frames => {
                let len = self.frames.get(self.active_status()).map_or(0, FrameSequence::len);
                if self.cursor.frame_index >= len {
                    self.cursor.reset();
                }
            }
            _ => {}
        }
        self.base.mark_dirty();
    }

    fn poll_resources(&mut self) {
        if let Some(outcome) = self.image.poll() {
            self.on_load_settled(outcome);
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, now: f64) {
        let Some(image) = self.image.image().cloned() else {
            self.base.clear_dirty();
            return;
        };
        let Some(seq) = self.frames.get(self.active_status()) else {
            tracing::warn!(id = self.base.id(), status = %self.active_status(), "sprite has no frames for its status");
            self.base.clear_dirty();
            return;
        };
        let len = seq.len();
        let threshold = seq.duration_ms / self.playback_rate;
        let cap = seq.iterations;

        if self.cursor.capped(cap) {
            self.cursor.frame_index = len - 1;
        }
        self.cursor.frame_index = self.cursor.frame_index.min(len - 1);
        let Some(frame) = seq.frames.get(self.cursor.frame_index).copied() else {
            self.base.clear_dirty();
            return;
        };
        self.cursor.drawn_index = Some(self.cursor.frame_index);

        self.base.width = frame.w;
        self.base.height = frame.h;
        let pivot = Point::new(
            self.base.scale_x * (frame.cx - frame.w / 2.0),
            self.base.scale_y * (frame.cy - frame.h / 2.0),
        );
        let dst = self.base.flip_offset();

        push_transform(surface, &self.base, pivot);
        surface.draw_image(
            &image,
            Rect::new(frame.x, frame.y, frame.w, frame.h),
            Rect::new(dst.x, dst.y, frame.w, frame.h),
        );
        surface.restore();

        if !self.cursor.is_ended(cap) {
            self.cursor.advance(now, threshold, len, cap);
        }

        if self.cursor.is_ended(cap) {
            if !self.cursor.end_notified {
                self.cursor.end_notified = true;
                self.fire_status_end();
            }
            self.base.clear_dirty();
        } else {
            self.base.mark_dirty();
        }
    }

    fn contains_point(&self, pt: Point) -> bool {
        let index = self.cursor.drawn_index.unwrap_or(self.cursor.frame_index);
        let Some(frame) = self.frames.get(self.active_status()).and_then(|seq| seq.frames.get(index)) else {
            return false;
        };
        let shift = Point::new(
            (frame.w / 2.0 - frame.cx) * self.base.scale_x,
            (frame.h / 2.0 - frame.cy) * self.base.scale_y,
        );
        self.base.hit_rect(shift).contains(pt)
    }
}
