//! Post-download checks on generated images.
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::{AppError, AppResult};

/// Smallest accepted width and height, in pixels.
pub const MIN_DIMENSION: u32 = 256;

/// Check that the file at `path` is a PNG or JPEG of at least
/// `MIN_DIMENSION` on both sides. Only the header is read.
pub fn validate_image(path: &Path) -> AppResult<(u32, u32)> {
    let invalid = |e: &dyn std::fmt::Display| AppError::Validation(format!("Invalid image file: {}", e));

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| invalid(&e))?;

    match reader.format() {
        Some(ImageFormat::Png) | Some(ImageFormat::Jpeg) => {}
        Some(other) => {
            return Err(AppError::Validation(format!("Unsupported image format: {:?}", other)));
        }
        None => return Err(invalid(&"unrecognised format")),
    }

    let (width, height) = reader.into_dimensions().map_err(|e| invalid(&e))?;
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(AppError::Validation(format!("Image too small: {}x{}", width, height)));
    }
    Ok((width, height))
}
