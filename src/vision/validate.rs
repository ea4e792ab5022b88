// Image validation and the upload extension gate
// Author: kelexine (https://github.com/kelexine)

use super::models::{mime_type_for, validate_image_size, ImagePayload, ALLOWED_EXTENSIONS};
use crate::error::{AppError, Result};
use bytes::Bytes;
use image::ImageReader;
use std::io::Cursor;
use tracing::debug;

/// Decode `data` as an image and label it with its real MIME type.
///
/// The format is sniffed from the bytes, never from a filename. Data that
/// cannot be identified or decoded is an [`AppError::Processing`] failure.
/// A real image in a format with no `image/*` mapping is rejected with
/// [`AppError::InvalidImage`], which callers may treat as skippable.
pub fn validate_image(data: impl Into<Bytes>) -> Result<ImagePayload> {
    let data: Bytes = data.into();

    let reader = ImageReader::new(Cursor::new(&data[..]))
        .with_guessed_format()
        .map_err(|e| AppError::Processing(format!("Failed to read image: {}", e)))?;

    let format = reader
        .format()
        .ok_or_else(|| AppError::Processing("cannot identify image file".to_string()))?;

    reader
        .decode()
        .map_err(|e| AppError::Processing(format!("Failed to decode {:?} image: {}", format, e)))?;

    let mime_type = mime_type_for(format).ok_or_else(|| {
        AppError::InvalidImage(format!("Unsupported image format: {:?}", format))
    })?;

    validate_image_size(data.len()).map_err(AppError::InvalidImage)?;

    debug!("Validated {} image ({} bytes)", mime_type, data.len());
    Ok(ImagePayload::new(mime_type, data))
}

/// Returns true iff `filename` has an extension in the allow-list.
///
/// Only the text after the last `.` counts, compared case-insensitively.
pub fn is_allowed(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
