//! Crop policy: maps a requested crop type to concrete resize parameters.
//!
//! Every upload names a crop type. Fixed presets carry their own target box
//! and fit mode; `custom` takes its box from two client-supplied fields.
//!
//! | Crop type | Target | Fit |
//! |-----------|--------|-----|
//! | `thumbnail` | 150×150 | cover |
//! | `banner` | 1200×400 | cover |
//! | `avatar` | 200×200 | cover |
//! | `product` | 800×600 | bounded |
//! | `square` | 500×500 | cover |
//! | `custom` | client-supplied | cover |
//!
//! [`resolve`] is pure: no I/O, same inputs always give the same [`ResizeSpec`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest edge accepted for a custom crop.
pub const MAX_CUSTOM_DIMENSION: u32 = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CropSpecError {
    #[error("Invalid crop type: {0}")]
    UnknownCropType(String),
    #[error("Custom width and height are required")]
    MissingCustomDimensions,
    #[error("Custom {field} must be a positive integer, got {value:?}")]
    InvalidCustomDimension { field: &'static str, value: String },
    #[error("Custom {field} must not exceed 10000px, got {value}")]
    CustomDimensionTooLarge { field: &'static str, value: u32 },
}

/// How the source aspect ratio is reconciled with the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Fill the box, center-crop the overflow. Output is exactly the target size.
    Cover,
    /// Fit inside the box preserving aspect. Nothing is cropped.
    Bounded,
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMode::Cover => f.write_str("cover"),
            FitMode::Bounded => f.write_str("bounded"),
        }
    }
}

/// Crop type identifiers accepted on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    Thumbnail,
    Banner,
    Avatar,
    Product,
    Square,
    Custom,
}

impl CropKind {
    /// The fixed presets, in display order. `Custom` is not a preset.
    pub const PRESETS: [CropKind; 5] = [
        CropKind::Thumbnail,
        CropKind::Banner,
        CropKind::Avatar,
        CropKind::Product,
        CropKind::Square,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CropKind::Thumbnail => "thumbnail",
            CropKind::Banner => "banner",
            CropKind::Avatar => "avatar",
            CropKind::Product => "product",
            CropKind::Square => "square",
            CropKind::Custom => "custom",
        }
    }

    /// Parse a crop type identifier. Matching is exact (lowercase).
    pub fn parse(value: &str) -> Result<Self, CropSpecError> {
        match value {
            "thumbnail" => Ok(CropKind::Thumbnail),
            "banner" => Ok(CropKind::Banner),
            "avatar" => Ok(CropKind::Avatar),
            "product" => Ok(CropKind::Product),
            "square" => Ok(CropKind::Square),
            "custom" => Ok(CropKind::Custom),
            other => Err(CropSpecError::UnknownCropType(other.to_string())),
        }
    }

    /// Fixed resize spec for a preset; `None` for `Custom`.
    pub fn preset_spec(self) -> Option<ResizeSpec> {
        let (width, height, fit) = match self {
            CropKind::Thumbnail => (150, 150, FitMode::Cover),
            CropKind::Banner => (1200, 400, FitMode::Cover),
            CropKind::Avatar => (200, 200, FitMode::Cover),
            CropKind::Product => (800, 600, FitMode::Bounded),
            CropKind::Square => (500, 500, FitMode::Cover),
            CropKind::Custom => return None,
        };
        Some(ResizeSpec {
            kind: self,
            width,
            height,
            fit,
        })
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved crop: target box plus fit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizeSpec {
    #[serde(rename = "name")]
    pub kind: CropKind,
    pub width: u32,
    pub height: u32,
    pub fit: FitMode,
}

/// Resolve a crop request into a [`ResizeSpec`].
///
/// Custom dimensions are ignored for presets. For `custom`, both must be
/// present and parse as integers in `1..=MAX_CUSTOM_DIMENSION`.
pub fn resolve(
    crop_type: &str,
    custom_width: Option<&str>,
    custom_height: Option<&str>,
) -> Result<ResizeSpec, CropSpecError> {
    let kind = CropKind::parse(crop_type)?;
    if let Some(spec) = kind.preset_spec() {
        return Ok(spec);
    }

    let (Some(width), Some(height)) = (non_blank(custom_width), non_blank(custom_height)) else {
        return Err(CropSpecError::MissingCustomDimensions);
    };

    Ok(ResizeSpec {
        kind,
        width: parse_dimension("width", width)?,
        height: parse_dimension("height", height)?,
        fit: FitMode::Cover,
    })
}

/// All fixed presets with their resolved specs.
pub fn presets() -> Vec<ResizeSpec> {
    CropKind::PRESETS
        .iter()
        .filter_map(|kind| kind.preset_spec())
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_dimension(field: &'static str, value: &str) -> Result<u32, CropSpecError> {
    let parsed = value
        .parse::<u32>()
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| CropSpecError::InvalidCustomDimension {
            field,
            value: value.to_string(),
        })?;
    if parsed > MAX_CUSTOM_DIMENSION {
        return Err(CropSpecError::CustomDimensionTooLarge {
            field,
            value: parsed,
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_table() {
        let table: Vec<(&str, u32, u32, FitMode)> = presets()
            .iter()
            .map(|s| (s.kind.as_str(), s.width, s.height, s.fit))
            .collect();
        assert_eq!(
            table,
            vec![
                ("thumbnail", 150, 150, FitMode::Cover),
                ("banner", 1200, 400, FitMode::Cover),
                ("avatar", 200, 200, FitMode::Cover),
                ("product", 800, 600, FitMode::Bounded),
                ("square", 500, 500, FitMode::Cover),
            ]
        );
    }

    #[test]
    fn every_preset_resolves_with_positive_dimensions() {
        for kind in CropKind::PRESETS {
            let spec = resolve(kind.as_str(), None, None).unwrap();
            assert_eq!(spec.kind, kind);
            assert!(spec.width > 0 && spec.height > 0, "{kind} has zero edge");
        }
    }

    #[test]
    fn preset_ignores_custom_fields() {
        let spec = resolve("avatar", Some("0"), Some("abc")).unwrap();
        assert_eq!((spec.width, spec.height), (200, 200));
    }

    #[test]
    fn custom_with_both_dimensions() {
        let spec = resolve("custom", Some("640"), Some("480")).unwrap();
        assert_eq!(spec.kind, CropKind::Custom);
        assert_eq!((spec.width, spec.height), (640, 480));
        assert_eq!(spec.fit, FitMode::Cover);
    }

    #[test]
    fn custom_trims_whitespace() {
        let spec = resolve("custom", Some(" 64 "), Some("32\n")).unwrap();
        assert_eq!((spec.width, spec.height), (64, 32));
    }

    #[test]
    fn custom_missing_dimension_fails() {
        assert_eq!(
            resolve("custom", Some("100"), None),
            Err(CropSpecError::MissingCustomDimensions)
        );
        assert_eq!(
            resolve("custom", None, None),
            Err(CropSpecError::MissingCustomDimensions)
        );
        assert_eq!(
            resolve("custom", Some(""), Some("100")),
            Err(CropSpecError::MissingCustomDimensions)
        );
    }

    #[test]
    fn custom_zero_width_fails() {
        assert!(matches!(
            resolve("custom", Some("0"), Some("100")),
            Err(CropSpecError::InvalidCustomDimension { field: "width", .. })
        ));
    }

    #[test]
    fn custom_non_numeric_or_negative_fails() {
        for bad in ["-5", "12px", "1.5", "abc"] {
            assert!(
                matches!(
                    resolve("custom", Some("100"), Some(bad)),
                    Err(CropSpecError::InvalidCustomDimension {
                        field: "height",
                        ..
                    })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn custom_over_limit_fails() {
        assert_eq!(
            resolve("custom", Some("10001"), Some("10")),
            Err(CropSpecError::CustomDimensionTooLarge {
                field: "width",
                value: 10_001
            })
        );
    }

    #[test]
    fn unknown_crop_type_fails() {
        assert_eq!(
            resolve("poster", None, None),
            Err(CropSpecError::UnknownCropType("poster".into()))
        );
        assert!(resolve("Thumbnail", None, None).is_err());
        assert!(resolve("", None, None).is_err());
    }

    #[test]
    fn resolve_is_deterministic() {
        let a = resolve("custom", Some("300"), Some("200"));
        let b = resolve("custom", Some("300"), Some("200"));
        assert_eq!(a, b);
    }

    #[test]
    fn spec_serializes_with_lowercase_names() {
        let json = serde_json::to_value(resolve("product", None, None).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "product", "width": 800, "height": 600, "fit": "bounded"})
        );
    }
}
