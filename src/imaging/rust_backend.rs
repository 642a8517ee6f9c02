//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::ImageReader::with_guessed_format` (magic bytes, not extension) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Cover crop | `crop_imm` of the centered target-aspect window, then resize |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//!
//! Every derived artifact is a baseline RGB JPEG regardless of the source format.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_cover_crop;
use super::params::{FillParams, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Source encodings accepted for upload.
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Tiff,
];

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a source image and check its sniffed format against [`ACCEPTED_FORMATS`].
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    match reader.format() {
        Some(format) if ACCEPTED_FORMATS.contains(&format) => Ok(reader),
        Some(format) => Err(BackendError::UnsupportedFormat(format!(
            "{format:?} is not accepted (JPEG, PNG, WebP and TIFF only)"
        ))),
        None => Err(BackendError::UnsupportedFormat(format!(
            "unrecognised image data in {}",
            path.display()
        ))),
    }
}

fn decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::Unsupported(e) => BackendError::UnsupportedFormat(e.to_string()),
        other => BackendError::Decode(format!("{}: {}", path.display(), other)),
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Encode as RGB JPEG. JPEG has no alpha channel, so transparency is dropped.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| match e {
            ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::Encode(other.to_string()),
        })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_jpeg(&resized, &params.output, params.quality.value())
    }

    fn fill(&self, params: &FillParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        // Crop in source space first so the resize never works on more
        // than max(source, target) pixels.
        let window = calculate_cover_crop(
            (img.width(), img.height()),
            (params.width, params.height),
        );
        let cropped = img
            .crop_imm(window.x, window.y, window.width, window.height)
            .resize_exact(params.width, params.height, FilterType::Lanczos3);

        save_jpeg(&cropped, &params.output, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{create_test_jpeg, create_test_png};

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions::new(200, 150));
    }

    #[test]
    fn identify_ignores_misleading_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-a-png.jpg");
        create_test_png(&path, 64, 32);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims, Dimensions::new(64, 32));
    }

    #[test]
    fn identify_nonexistent_file_is_io_error() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn identify_garbage_is_unsupported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = RustBackend::new().identify(&path);
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }

    #[test]
    fn gif_is_rejected_as_unsupported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("anim.gif");
        std::fs::write(&path, b"GIF89a\x01\x00\x01\x00\x00\x00\x00;").unwrap();

        let result = RustBackend::new().identify(&path);
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }

    #[test]
    fn corrupt_jpeg_fails_to_decode() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.jpg");
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend_from_slice(&[0x13; 64]);
        std::fs::write(&source, bytes).unwrap();

        let result = RustBackend::new().fill(&FillParams {
            source,
            output: tmp.path().join("out.jpg"),
            width: 10,
            height: 10,
            quality: Quality::default(),
        });
        assert!(matches!(
            result,
            Err(BackendError::Decode(_) | BackendError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn fill_produces_exact_target_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 800, 600);

        let output = tmp.path().join("thumb.jpg");
        RustBackend::new()
            .fill(&FillParams {
                source,
                output: output.clone(),
                width: 150,
                height: 150,
                quality: Quality::new(85),
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (150, 150));
    }

    #[test]
    fn fill_portrait_source_to_banner() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 300, 500);

        let output = tmp.path().join("banner.jpg");
        RustBackend::new()
            .fill(&FillParams {
                source,
                output: output.clone(),
                width: 1200,
                height: 400,
                quality: Quality::new(85),
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (1200, 400));
    }

    #[test]
    fn fill_extreme_aspect_source_to_banner() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("sliver.png");
        create_test_png(&source, 1, 60000);

        let output = tmp.path().join("banner.jpg");
        RustBackend::new()
            .fill(&FillParams {
                source,
                output: output.clone(),
                width: 1200,
                height: 400,
                quality: Quality::default(),
            })
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (1200, 400));
    }

    #[test]
    fn resize_png_input_to_jpeg_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 400, 300);

        let output = tmp.path().join("resized.jpg");
        RustBackend::new()
            .resize(&ResizeParams {
                source,
                output: output.clone(),
                width: 200,
                height: 150,
                quality: Quality::new(85),
            })
            .unwrap();

        let format = image::ImageReader::open(&output)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(ImageFormat::Jpeg));
        assert_eq!(image::image_dimensions(&output).unwrap(), (200, 150));
    }

    #[test]
    fn resize_into_missing_directory_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let result = RustBackend::new().resize(&ResizeParams {
            source,
            output: tmp.path().join("missing/out.jpg"),
            width: 50,
            height: 50,
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
