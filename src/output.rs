//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Presets
//!
//! ```text
//! Presets
//! 001 thumbnail  150×150  cover
//! 002 banner     1200×400 cover
//! 003 avatar     200×200  cover
//! 004 product    800×600  bounded
//! 005 square     500×500  cover
//!     custom: customWidth × customHeight, cover, up to 10000px per edge
//! ```
//!
//! ## Config check
//!
//! ```text
//! Config OK
//!     Source: crop-review.toml
//!     Listen: 127.0.0.1:3000
//!     Uploads: uploads/
//!     Cropped: cropped/
//!     Max upload: 10.0 MiB
//!     Output: JPEG q90, no upscaling
//!     Transforms: 8 concurrent (auto)
//! ```

use crate::config::{ServiceConfig, effective_transform_slots};
use crate::policy::{MAX_CUSTOM_DIMENSION, ResizeSpec};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_bytes(bytes: usize) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / MIB)
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Display a directory with a trailing slash.
fn dir_display(path: &Path) -> String {
    let shown = path.display().to_string();
    if shown.ends_with('/') {
        shown
    } else {
        format!("{shown}/")
    }
}

// ============================================================================
// presets
// ============================================================================

/// Format the preset table, one line per preset plus the custom rule.
pub fn format_presets(presets: &[ResizeSpec]) -> Vec<String> {
    let mut lines = vec!["Presets".to_string()];
    let name_width = presets
        .iter()
        .map(|p| p.kind.as_str().len())
        .max()
        .unwrap_or(0);
    let dims: Vec<String> = presets
        .iter()
        .map(|p| format!("{}×{}", p.width, p.height))
        .collect();
    let dims_width = dims.iter().map(|d| d.chars().count()).max().unwrap_or(0);

    for (i, (preset, dim)) in presets.iter().zip(&dims).enumerate() {
        lines.push(format!(
            "{} {:<name_width$} {:<dims_width$} {}",
            format_index(i + 1),
            preset.kind.as_str(),
            dim,
            preset.fit,
        ));
    }
    lines.push(format!(
        "{}custom: customWidth × customHeight, cover, up to {}px per edge",
        indent(1),
        MAX_CUSTOM_DIMENSION
    ));
    lines
}

pub fn print_presets(presets: &[ResizeSpec]) {
    for line in format_presets(presets) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Summarize a validated config.
///
/// `source` is the file the overrides came from, `None` for stock defaults.
pub fn format_config_summary(config: &ServiceConfig, source: Option<&Path>) -> Vec<String> {
    let ind = indent(1);
    let source_line = match source {
        Some(path) => path.display().to_string(),
        None => "stock defaults".to_string(),
    };
    let upscale = if config.output.allow_upscale {
        "upscaling allowed"
    } else {
        "no upscaling"
    };
    let slots_origin = if config.processing.max_concurrent_transforms.is_some() {
        "configured"
    } else {
        "auto"
    };

    vec![
        "Config OK".to_string(),
        format!("{ind}Source: {source_line}"),
        format!("{ind}Listen: {}", config.server.bind),
        format!("{ind}Uploads: {}", dir_display(&config.storage.uploads_dir)),
        format!("{ind}Cropped: {}", dir_display(&config.storage.cropped_dir)),
        format!(
            "{ind}Max upload: {}",
            format_bytes(config.server.max_upload_bytes)
        ),
        format!("{ind}Output: JPEG q{}, {upscale}", config.output.quality),
        format!(
            "{ind}Transforms: {} concurrent ({slots_origin})",
            effective_transform_slots(&config.processing)
        ),
    ]
}

pub fn print_config_summary(config: &ServiceConfig, source: Option<&Path>) {
    for line in format_config_summary(config, source) {
        println!("{}", line);
    }
}
