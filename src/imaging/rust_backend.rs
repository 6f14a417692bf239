//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only, no full decode) |
//! | EXIF metadata | `kamadak-exif` via [`exif_reader`](super::exif_reader) |
//! | Decode | `image` crate (pure Rust JPEG decoder) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with configured quality |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::exif_reader;
use super::params::ThumbnailParams;
use crate::metadata::RawMetadata;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` and `kamadak-exif` crates.
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

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => save_jpeg(img, path, quality),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

/// Encode and save as baseline JPEG. Colour types JPEG cannot hold are flattened to RGB8.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
    let result = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img.write_with_encoder(encoder),
        other => DynamicImage::ImageRgb8(other.to_rgb8()).write_with_encoder(encoder),
    };
    result.map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn read_metadata(&self, path: &Path) -> Result<RawMetadata, BackendError> {
        exif_reader::read_raw_metadata(path)
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let (width, height) = calculate_fit_dimensions(
            (img.width(), img.height()),
            (params.max_width, params.max_height),
        );

        let thumb = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        save_image(&thumb, &params.output, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::metadata::MetadataError;
    use crate::test_helpers::{sample_exif_fields, write_jpeg, write_jpeg_with_exif};

    fn thumbnail_params(source: &Path, output: &Path) -> ThumbnailParams {
        ThumbnailParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            max_width: 60,
            max_height: 80,
            quality: Quality::new(85),
        }
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn read_metadata_from_exif_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg_with_exif(&path, 120, 90, &sample_exif_fields());

        let backend = RustBackend::new();
        let raw = backend.read_metadata(&path).unwrap();
        assert_eq!(raw.sensitivity, Some(400));
        assert_eq!(raw.model.as_deref(), Some("SuperCam X"));
    }

    #[test]
    fn read_metadata_plain_jpeg_is_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 100, 100);

        let backend = RustBackend::new();
        let err = backend.read_metadata(&path).unwrap_err();
        assert!(matches!(
            err,
            BackendError::Metadata(MetadataError::NoExifBlock)
        ));
    }

    #[test]
    fn exif_jpeg_still_decodes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg_with_exif(&path, 120, 90, &sample_exif_fields());

        let backend = RustBackend::new();
        assert_eq!(
            backend.identify(&path).unwrap(),
            Dimensions {
                width: 120,
                height: 90
            }
        );
    }

    #[test]
    fn thumbnail_landscape_fits_bound() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        let output = tmp.path().join("source_thumbnail.jpg");
        write_jpeg(&source, 400, 300);

        let backend = RustBackend::new();
        backend.thumbnail(&thumbnail_params(&source, &output)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (60, 45));
    }

    #[test]
    fn thumbnail_portrait_fits_bound() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        let output = tmp.path().join("source_thumbnail.jpg");
        write_jpeg(&source, 100, 400);

        let backend = RustBackend::new();
        backend.thumbnail(&thumbnail_params(&source, &output)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (20, 80));
    }

    #[test]
    fn thumbnail_small_source_is_not_upscaled() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        let output = tmp.path().join("source_thumbnail.jpg");
        write_jpeg(&source, 30, 20);

        let backend = RustBackend::new();
        backend.thumbnail(&thumbnail_params(&source, &output)).unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (30, 20));
    }

    #[test]
    fn thumbnail_does_not_touch_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        let output = tmp.path().join("source_thumbnail.jpg");
        write_jpeg(&source, 400, 300);

        let backend = RustBackend::new();
        backend.thumbnail(&thumbnail_params(&source, &output)).unwrap();

        assert_eq!(image::image_dimensions(&source).unwrap(), (400, 300));
    }

    #[test]
    fn thumbnail_unsupported_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        write_jpeg(&source, 100, 100);

        let output = tmp.path().join("output.webp");
        let backend = RustBackend::new();
        let result = backend.thumbnail(&thumbnail_params(&source, &output));
        assert!(result.is_err());
    }
}
