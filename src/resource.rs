//! External collaborators: image loading and text metrics.
//!
//! Image loading is the only asynchronous boundary in the scene graph. A
//! loader hands back a future; the object that requested it keeps the future
//! in an [`ImageSlot`] and polls it once on request and again on every layer
//! tick. There is no executor and no cross-thread wakeup: everything runs on
//! the host's frame timeline. Requesting a new source drops the pending
//! future, so a slow, stale load can never overwrite a newer one.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use futures::task::noop_waker_ref;

use crate::error::ResourceError;

/// A loaded image, opaque to the scene graph.
///
/// The surface that draws it downcasts `source` to its own native type
/// (e.g. `HtmlImageElement` for the web surface).
#[derive(Clone)]
pub struct ImageHandle {
    width: f64,
    height: f64,
    source: Rc<dyn Any>,
}

impl ImageHandle {
    #[must_use]
    pub fn new(width: f64, height: f64, source: impl Any) -> Self {
        Self { width, height, source: Rc::new(source) }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The native image, if it is a `T`.
    #[must_use]
    pub fn source<T: Any>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Future returned by [`ImageLoader::load`].
pub type ImageFuture = LocalBoxFuture<'static, Result<ImageHandle, ResourceError>>;

/// Loads image resources by identifier (URL, path, atlas key).
pub trait ImageLoader {
    fn load(&self, src: &str) -> ImageFuture;
}

/// What became of a pending load once it settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadOutcome {
    Loaded,
    Failed,
}

struct PendingLoad {
    src: String,
    future: ImageFuture,
}

/// The currently displayed image of an object plus at most one in-flight load.
pub(crate) struct ImageSlot {
    loader: Rc<dyn ImageLoader>,
    image: Option<ImageHandle>,
    pending: Option<PendingLoad>,
}

impl ImageSlot {
    pub(crate) fn new(loader: Rc<dyn ImageLoader>) -> Self {
        Self { loader, image: None, pending: None }
    }

    /// The last successfully loaded image.
    pub(crate) fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start loading `src`, replacing any load still in flight.
    ///
    /// Polls once immediately, so loaders that answer from a cache settle
    /// within the triggering write.
    pub(crate) fn request(&mut self, src: &str) -> Option<LoadOutcome> {
        if let Some(stale) = self.pending.take() {
            tracing::debug!(stale = %stale.src, %src, "superseding pending image load");
        }
        self.pending = Some(PendingLoad { src: src.to_owned(), future: self.loader.load(src) });
        self.poll()
    }

    /// Poll the pending load, if any. Returns `None` while nothing settled.
    pub(crate) fn poll(&mut self) -> Option<LoadOutcome> {
        let pending = self.pending.as_mut()?;
        let mut cx = Context::from_waker(noop_waker_ref());
        let Poll::Ready(result) = pending.future.poll_unpin(&mut cx) else {
            return None;
        };
        let src = self.pending.take().map(|p| p.src).unwrap_or_default();
        match result {
            Ok(image) => {
                tracing::debug!(%src, width = image.width(), height = image.height(), "image loaded");
                self.image = Some(image);
                Some(LoadOutcome::Loaded)
            }
            Err(e) => {
                tracing::error!(error = %e, %src, "image load failed; keeping previous image");
                Some(LoadOutcome::Failed)
            }
        }
    }
}

// =============================================================
// Text metrics
// =============================================================

/// Font styling used to measure and draw text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub weight: String,
    pub family: String,
}

impl FontSpec {
    /// The CSS `font` shorthand, e.g. `bold 14px sans-serif`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size, self.family)
    }
}

/// Rendered extent of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// Measures rendered text.
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> TextSize;
}
