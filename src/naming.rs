//! File naming for stored uploads and derived artifacts.
//!
//! The client-declared filename is display-only. Stored files are always
//! named from values the service generates itself:
//!
//! - upload: `<unix-millis>-<job-id>.<ext>` in the uploads directory, where
//!   `<ext>` is kept only if it is one of the accepted image extensions
//! - derived: `cropped-<job-id>.jpg` in the cropped directory
//!
//! A hostile name such as `../../etc/passwd` therefore never influences where
//! anything is written.

use crate::jobs::JobId;
use std::path::Path;

/// Extensions carried over from the declared filename onto the stored upload.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff"];

/// Extension of every derived artifact.
pub const DERIVED_EXTENSION: &str = "jpg";

/// Name used when a client sends an empty filename.
const FALLBACK_DISPLAY_NAME: &str = "upload";

/// Lowercased extension of `original_name` if it is an accepted image extension.
///
/// - `"Photo.JPG"` → `Some("jpg")`
/// - `"scan.tiff"` → `Some("tiff")`
/// - `"payload.php"` → `None`
/// - `"README"` → `None`
pub fn accepted_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(display_name(original_name).as_str())
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ACCEPTED_EXTENSIONS
        .contains(&ext.as_str())
        .then_some(ext)
}

/// Stored file name for an upload.
pub fn source_file_name(timestamp_millis: i64, id: &JobId, original_name: &str) -> String {
    match accepted_extension(original_name) {
        Some(ext) => format!("{timestamp_millis}-{id}.{ext}"),
        None => format!("{timestamp_millis}-{id}"),
    }
}

/// Stored file name for a job's derived artifact.
pub fn derived_file_name(id: &JobId) -> String {
    format!("cropped-{id}.{DERIVED_EXTENSION}")
}

/// Final path component of a client-declared filename, for display.
///
/// Some browsers send a full local path; both `/` and `\` separators are
/// stripped. Blank names fall back to `"upload"`.
pub fn display_name(original_name: &str) -> String {
    let last = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
        .trim();
    if last.is_empty() {
        FALLBACK_DISPLAY_NAME.to_string()
    } else {
        last.to_string()
    }
}
