//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest centered window of the source that has the target's aspect ratio.
///
/// Cover crops cut this window out of the source and then scale it to the
/// target box, so no intermediate image is ever larger than the source or
/// the target. The window is at least 1×1 and never exceeds the source.
///
/// ```text
/// source 800x600, target 150x150  →  600x600 at (100, 0)
/// source 300x500, target 1200x400 →  300x100 at (0, 200)
/// ```
pub fn calculate_cover_crop(source: (u32, u32), target: (u32, u32)) -> CropWindow {
    let (src_w, src_h) = (u64::from(source.0), u64::from(source.1));
    let (tgt_w, tgt_h) = (u64::from(target.0.max(1)), u64::from(target.1.max(1)));

    // Compare aspect ratios by cross-multiplying to stay in integers.
    let (width, height) = if src_w * tgt_h > src_h * tgt_w {
        // Source is wider: keep full height, trim the sides
        let w = (src_h * tgt_w + tgt_h / 2) / tgt_h;
        (w.clamp(1, src_w.max(1)), src_h)
    } else {
        // Source is taller: keep full width, trim top and bottom
        let h = (src_w * tgt_h + tgt_w / 2) / tgt_w;
        (src_w, h.clamp(1, src_h.max(1)))
    };

    // Both values are bounded by the u32 source edges.
    let (width, height) = (width as u32, height as u32);
    CropWindow {
        x: source.0.saturating_sub(width) / 2,
        y: source.1.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Calculate output dimensions that fit inside a bounding box.
///
/// Preserves the source aspect ratio and never crops. Unless `allow_upscale`
/// is set, sources already smaller than the box keep their size.
///
/// # Examples
/// ```
/// # use crop_review::imaging::calculate_bounded_dimensions;
/// // 1600x1200 into 800x600 → exact 2x downscale
/// assert_eq!(calculate_bounded_dimensions((1600, 1200), (800, 600), false), (800, 600));
///
/// // Tall source is limited by height
/// assert_eq!(calculate_bounded_dimensions((1000, 2000), (800, 600), false), (300, 600));
/// ```
pub fn calculate_bounded_dimensions(
    source: (u32, u32),
    bounds: (u32, u32),
    allow_upscale: bool,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let scale = if allow_upscale { scale } else { scale.min(1.0) };

    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}
