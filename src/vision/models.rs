// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use base64::Engine;
use bytes::Bytes;
use std::path::Path;

/// Validation limits
pub const MAX_IMAGE_SIZE_BYTES: usize = 20 * 1024 * 1024; // 20MB

/// MIME type of every normalized image.
pub const NORMALIZED_MIME_TYPE: &str = "image/jpeg";

/// A user-selected image, exactly as it was read or uploaded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub data: Bytes,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Read an image file; the file name becomes the image name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(name, data))
    }

    /// MIME type guessed from magic bytes, if recognizable.
    pub fn mime_type(&self) -> Option<&'static str> {
        image::guess_format(&self.data)
            .ok()
            .map(|format| format.to_mime_type())
    }
}

/// Downscaled, JPEG re-encoded image ready for embedding in a request.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl NormalizedImage {
    pub fn mime_type(&self) -> &'static str {
        NORMALIZED_MIME_TYPE
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// `data:image/jpeg;base64,<payload>` as expected by `image_url` parts.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }
}

/// Validate image data size
pub fn validate_image_size(data_len: usize) -> Result<(), String> {
    if data_len == 0 {
        return Err("Image data is empty".to_string());
    }
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
    fn test_data_url_prefix() {
        let image = NormalizedImage {
            name: "scan.jpg".to_string(),
            width: 1,
            height: 1,
            data: vec![0xFF, 0xD8, 0xFF],
        };
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_validate_image_size() {
        assert!(validate_image_size(0).is_err());
        assert!(validate_image_size(1024).is_ok());
        assert!(validate_image_size(MAX_IMAGE_SIZE_BYTES + 1).is_err());
    }

    #[test]
    fn test_mime_type_from_magic_bytes() {
        let png = SourceImage::new("a.png", b"\x89PNG\r\n\x1a\n0000000000".to_vec());
        assert_eq!(png.mime_type(), Some("image/png"));

        let junk = SourceImage::new("a.txt", b"hello world, not an image".to_vec());
        assert_eq!(junk.mime_type(), None);
    }
}
