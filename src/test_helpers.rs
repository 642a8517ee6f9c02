//! Shared test utilities for the crop-review unit tests.
//!
//! Provides synthetic image builders and lifecycle managers rooted in a
//! temporary directory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let manager = real_manager(&tmp);
//!
//! let job = manager
//!     .ingest(upload("cat.jpg", jpeg_bytes(640, 480), "thumbnail"))
//!     .unwrap();
//! assert_eq!(file_count(&manager.settings().cropped_dir), 1);
//! ```

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::imaging::{RustBackend, TransformOptions};
use crate::jobs::{LifecycleManager, LifecycleSettings, MemoryJobStore, Upload};

// =========================================================================
// Synthetic images
// =========================================================================

/// A gradient so resized output is not a flat color.
fn gradient(width: u32, height: u32) -> image::RgbImage {
    image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encoded JPEG bytes of a `width`×`height` gradient.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// Write a `width`×`height` JPEG to `path`.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Write a `width`×`height` PNG to `path`.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf.into_inner()).unwrap();
}

// =========================================================================
// Lifecycle fixtures
// =========================================================================

/// Settings rooted at `root`. Directories are not created.
pub fn test_settings(root: &Path) -> LifecycleSettings {
    LifecycleSettings {
        uploads_dir: root.join("uploads"),
        cropped_dir: root.join("cropped"),
        max_upload_bytes: 10 * 1024 * 1024,
        transform: TransformOptions::default(),
    }
}

/// A manager with the real image backend and its directories created.
pub fn real_manager(tmp: &TempDir) -> LifecycleManager {
    let manager = LifecycleManager::new(
        Arc::new(MemoryJobStore::new()),
        Arc::new(RustBackend::new()),
        test_settings(tmp.path()),
    );
    manager.ensure_directories().unwrap();
    manager
}

/// An upload for a preset crop type.
pub fn upload(name: &str, bytes: Vec<u8>, crop_type: &str) -> Upload {
    Upload {
        original_name: name.to_string(),
        bytes,
        crop_type: crop_type.to_string(),
        custom_width: None,
        custom_height: None,
    }
}

/// Number of entries in `dir`.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
