//! Signature images submitted as `data:image/...;base64,` URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

use crate::domain::foundation::ValidationError;

const FIELD: &str = "signature";

/// Image formats accepted for signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Webp,
    ];

    fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::from_subtype(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A decoded signature image.
#[derive(Clone, PartialEq, Eq)]
pub struct SignatureImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for SignatureImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SignatureImage {
    /// Parses and decodes `data:image/<subtype>;base64,<payload>`.
    pub fn from_data_url(data_url: &str) -> Result<Self, ValidationError> {
        let rest = data_url
            .trim()
            .strip_prefix("data:image/")
            .ok_or_else(|| ValidationError::invalid_format(FIELD, "expected data:image/ URL"))?;

        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| ValidationError::invalid_format(FIELD, "missing payload"))?;

        let subtype = meta
            .strip_suffix(";base64")
            .ok_or_else(|| ValidationError::invalid_format(FIELD, "payload must be base64"))?;

        let format = ImageFormat::from_subtype(subtype).ok_or_else(|| {
            ValidationError::invalid_format(FIELD, format!("unsupported image type '{}'", subtype))
        })?;

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ValidationError::invalid_format(FIELD, format!("invalid base64: {}", e)))?;

        if bytes.is_empty() {
            return Err(ValidationError::empty_field(FIELD));
        }

        Ok(Self { format, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_png_data_url() {
        let image = SignatureImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(&image.bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn jpeg_aliases_share_extension() {
        let a = SignatureImage::from_data_url("data:image/jpeg;base64,/9j/4A==").unwrap();
        let b = SignatureImage::from_data_url("data:image/jpg;base64,/9j/4A==").unwrap();
        assert_eq!(a.format.extension(), "jpg");
        assert_eq!(a.format, b.format);
    }

    #[test]
    fn rejects_non_image_prefix() {
        let err = SignatureImage::from_data_url("data:text/plain;base64,aGk=").unwrap_err();
        assert_eq!(err.field(), Some("signature"));
    }

    #[test]
    fn rejects_non_base64_encoding() {
        assert!(SignatureImage::from_data_url("data:image/svg+xml,<svg/>").is_err());
    }

    #[test]
    fn rejects_unsupported_subtype() {
        assert!(SignatureImage::from_data_url("data:image/bmp;base64,Qk0=").is_err());
    }

    #[test]
    fn rejects_invalid_payload() {
        assert!(SignatureImage::from_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(
            SignatureImage::from_data_url("data:image/png;base64,").unwrap_err(),
            ValidationError::empty_field("signature")
        );
    }

    #[test]
    fn extension_round_trips() {
        for format in ImageFormat::ALL {
            assert_eq!(ImageFormat::from_extension(format.extension()), Some(format));
        }
    }
}
