use std::fmt;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const HASH_PREFIX: &str = "sha256:";

/// Content address of a captured image. The bytes themselves live in the
/// image vault so history entries stay small.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub hash: String,
    pub media_type: String,
}

impl ImageRef {
    pub fn for_bytes(bytes: &[u8], media_type: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            hash: format!("{HASH_PREFIX}{}", hex::encode(hasher.finalize())),
            media_type: media_type.to_string(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash)
    }
}

/// Raw capture plus the media type sniffed from its header.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
}

impl CapturedImage {
    /// Returns `None` when the bytes are not one of the formats the
    /// classifier accepts.
    pub fn sniff(bytes: Vec<u8>) -> Option<Self> {
        let format = image::guess_format(&bytes).ok()?;
        let media_type = media_type_for(format)?;
        Some(Self { bytes, media_type })
    }

    pub fn image_ref(&self) -> ImageRef {
        ImageRef::for_bytes(&self.bytes, self.media_type)
    }
}

fn media_type_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn sniffs_png_and_jpeg() {
        let png = CapturedImage::sniff(PNG_HEADER.to_vec()).unwrap();
        assert_eq!(png.media_type, "image/png");

        let jpeg = CapturedImage::sniff(JPEG_HEADER.to_vec()).unwrap();
        assert_eq!(jpeg.media_type, "image/jpeg");
    }

    #[test]
    fn rejects_non_images() {
        assert!(CapturedImage::sniff(b"hello, world".to_vec()).is_none());
        assert!(CapturedImage::sniff(Vec::new()).is_none());
    }

    #[test]
    fn identical_bytes_share_an_address() {
        let a = ImageRef::for_bytes(PNG_HEADER, "image/png");
        let b = ImageRef::for_bytes(PNG_HEADER, "image/png");
        let c = ImageRef::for_bytes(JPEG_HEADER, "image/jpeg");
        assert_eq!(a, b);
        assert_ne!(a.hash, c.hash);
        assert!(a.hash.starts_with("sha256:"));
        assert_eq!(a.hash.len(), "sha256:".len() + 64);
    }
}
