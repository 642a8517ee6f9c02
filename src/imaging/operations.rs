//! High-level image operations.
//!
//! These functions combine a [`ResizeSpec`] with the calculations and call the
//! backend. [`plan_transform`] is pure and decides which backend call a crop
//! needs; [`transform`] identifies the source, runs the plan and reports what
//! it produced.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_bounded_dimensions;
use super::params::{FillParams, Quality, ResizeParams};
use crate::policy::{FitMode, ResizeSpec};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Encoding options that apply to every derived artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformOptions {
    pub quality: Quality,
    /// Let bounded crops enlarge sources smaller than the target box.
    pub allow_upscale: bool,
}

/// A planned backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedOp {
    Fill(FillParams),
    Resize(ResizeParams),
}

impl PlannedOp {
    /// Dimensions of the file this operation will write.
    pub fn output_dimensions(&self) -> Dimensions {
        match self {
            PlannedOp::Fill(p) => Dimensions::new(p.width, p.height),
            PlannedOp::Resize(p) => Dimensions::new(p.width, p.height),
        }
    }
}

/// What a successful [`transform`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub derived_path: PathBuf,
    pub source_dimensions: Dimensions,
    pub output_dimensions: Dimensions,
}

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &dyn ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// Plan a transform without executing it.
pub fn plan_transform(
    source: &Path,
    output: &Path,
    source_dims: Dimensions,
    spec: &ResizeSpec,
    options: &TransformOptions,
) -> PlannedOp {
    match spec.fit {
        FitMode::Cover => PlannedOp::Fill(FillParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            width: spec.width,
            height: spec.height,
            quality: options.quality,
        }),
        FitMode::Bounded => {
            let (width, height) = calculate_bounded_dimensions(
                source_dims.as_tuple(),
                (spec.width, spec.height),
                options.allow_upscale,
            );
            PlannedOp::Resize(ResizeParams {
                source: source.to_path_buf(),
                output: output.to_path_buf(),
                width,
                height,
                quality: options.quality,
            })
        }
    }
}

/// Produce the derived artifact for `source` at `output`.
///
/// The source is identified first, so an undecodable upload fails before any
/// output file is created.
pub fn transform(
    backend: &dyn ImageBackend,
    source: &Path,
    output: &Path,
    spec: &ResizeSpec,
    options: &TransformOptions,
) -> Result<Transformed> {
    let source_dimensions = get_dimensions(backend, source)?;
    if source_dimensions.width == 0 || source_dimensions.height == 0 {
        return Err(BackendError::Decode(format!(
            "{} has zero-sized dimensions",
            source.display()
        )));
    }

    let plan = plan_transform(source, output, source_dimensions, spec, options);
    match &plan {
        PlannedOp::Fill(params) => backend.fill(params)?,
        PlannedOp::Resize(params) => backend.resize(params)?,
    }

    Ok(Transformed {
        derived_path: output.to_path_buf(),
        source_dimensions,
        output_dimensions: plan.output_dimensions(),
    })
}
