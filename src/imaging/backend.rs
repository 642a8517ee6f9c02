//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, resize (bounded fit) and fill (cover fit).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::{FillParams, ResizeParams};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to encode output: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Backends are shared across request handlers and blocking worker threads,
/// so they must be `Send + Sync`.
pub trait ImageBackend: Send + Sync {
    /// Get the intrinsic dimensions of a source image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize to exact output dimensions (aspect already computed by the caller).
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Center-crop to the target aspect ratio, then resize to exactly the target box.
    fn fill(&self, params: &FillParams) -> Result<(), BackendError>;
}
