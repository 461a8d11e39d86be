// error.rs - Failure kinds of a relief build
//
// Decode and parameter errors abort a run before any stage executes.
// Geometry errors come out of mesh validation after synthesis; the caller
// keeps whatever mesh it held before.

use thiserror::Error;

pub type ReliefResult<T> = Result<T, ReliefError>;

#[derive(Debug, Error)]
pub enum ReliefError {
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParams { name: &'static str, reason: String },

    #[error("geometry construction failed: {0}")]
    Geometry(String),
}

impl ReliefError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParams { name, reason: reason.into() }
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Load failures: nothing was built, there is nothing to keep
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::ImageDecode(_) | Self::EmptyImage { .. })
    }
}
