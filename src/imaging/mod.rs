//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` after magic-byte sniffing |
//! | **Cover crop** | center `crop_imm` at the target aspect, then resize (Lanczos3) |
//! | **Bounded resize** | aspect-preserving Lanczos3 resize, no upscale by default |
//! | **Encode** | JPEG at the configured quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`transform`], turning a crop policy into a backend call

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_bounded_dimensions;
pub use operations::{PlannedOp, TransformOptions, Transformed, plan_transform, transform};
pub use params::{FillParams, Quality, ResizeParams};
pub use rust_backend::RustBackend;
