// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use bytes::Bytes;
use image::ImageFormat;

/// Extensions accepted by the upload gate (compared lowercased).
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// A decoded-and-verified image ready to be sent to the model.
///
/// Only [`validate_image`](super::validate_image) builds these, so the MIME
/// type always starts with `image/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: &'static str,
    data: Bytes,
}

impl ImagePayload {
    pub(crate) fn new(mime_type: &'static str, data: Bytes) -> Self {
        Self { mime_type, data }
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Map a detected image format to its MIME type.
///
/// Formats missing from this table are not sent upstream.
pub fn mime_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        ImageFormat::Ico => Some("image/x-icon"),
        _ => None,
    }
}

/// Validation limits
pub const MAX_IMAGE_SIZE_BYTES: usize = 20 * 1024 * 1024; // 20MB (Gemini inline limit)

/// Validate image data size
pub fn validate_image_size(data_len: usize) -> Result<(), String> {
    if data_len > MAX_IMAGE_SIZE_BYTES {
        return Err(format!(
            "Image size {} bytes exceeds maximum of {} bytes (20MB)",
            data_len, MAX_IMAGE_SIZE_BYTES
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_and_png_always_map() {
        assert_eq!(mime_type_for(ImageFormat::Jpeg), Some("image/jpeg"));
        assert_eq!(mime_type_for(ImageFormat::Png), Some("image/png"));
    }

    #[test]
    fn test_unmapped_formats_have_no_mime() {
        assert_eq!(mime_type_for(ImageFormat::Farbfeld), None);
        assert_eq!(mime_type_for(ImageFormat::Tga), None);
    }

    #[test]
    fn test_every_mapping_is_an_image_type() {
        for format in ImageFormat::all() {
            if let Some(mime) = mime_type_for(format) {
                assert!(mime.starts_with("image/"), "{:?} -> {}", format, mime);
            }
        }
    }

    #[test]
    fn test_size_limit() {
        assert!(validate_image_size(1024).is_ok());
        assert!(validate_image_size(MAX_IMAGE_SIZE_BYTES + 1).is_err());
    }
}
