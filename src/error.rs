//! Error types for scene construction and resource loading.

/// An image resource failed to load or decode.
///
/// Raised only by [`crate::resource::ImageLoader`] futures. Objects log it and
/// keep their previous image; it never surfaces from a property write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load image {src}: {reason}")]
pub struct ResourceError {
    pub src: String,
    pub reason: String,
}

impl ResourceError {
    #[must_use]
    pub fn new(src: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { src: src.into(), reason: reason.into() }
    }
}

/// Errors raised while writing object properties or building a stage.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no frames defined for status {0:?}")]
    UnknownStatus(String),
    #[error("invalid value for {prop}: {reason}")]
    InvalidValue { prop: &'static str, reason: String },
    #[error("invalid stage config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SceneError {
    pub(crate) fn invalid(prop: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue { prop, reason: reason.into() }
    }
}
