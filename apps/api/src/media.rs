//! Crop photos travel as data URIs: `data:<mime>;base64,<payload>`.
//!
//! Parsing checks the MIME type and that the payload is real base64 within the
//! upload limit. The encoded payload is kept as-is and forwarded to the model.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Largest decoded photo accepted (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Image types a photo may be uploaded as.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, Error, PartialEq)]
pub enum DataUriError {
    #[error("a photo of the crop is required")]
    Missing,

    #[error("expected a data URI of the form 'data:<mimetype>;base64,<encoded_data>'")]
    Malformed,

    #[error("unsupported image type '{0}'; only .jpg, .jpeg, .png and .webp are accepted")]
    UnsupportedType(String),

    #[error("image payload is empty")]
    EmptyPayload,

    #[error("image payload is not valid base64")]
    InvalidBase64,

    #[error("photo must be 5MB or less (got {0} bytes)")]
    TooLarge(usize),
}

/// A validated, base64-encoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    /// Normalised MIME type (`image/jpg` is reported as `image/jpeg`).
    pub mime_type: String,
    /// Standard base64 payload, without the `data:` header.
    pub data: String,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(DataUriError::Missing);
        }

        let rest = uri.strip_prefix("data:").ok_or(DataUriError::Malformed)?;
        let (mime, payload) = rest.split_once(";base64,").ok_or(DataUriError::Malformed)?;

        let mime_type = normalise_mime(mime)?;
        if payload.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }

        let decoded = STANDARD
            .decode(payload)
            .map_err(|_| DataUriError::InvalidBase64)?;
        if decoded.len() > MAX_IMAGE_BYTES {
            return Err(DataUriError::TooLarge(decoded.len()));
        }

        Ok(Self {
            mime_type,
            data: payload.to_string(),
        })
    }

    /// Encodes raw upload bytes. `content_type` comes from the multipart part.
    pub fn from_bytes(content_type: &str, bytes: &[u8]) -> Result<Self, DataUriError> {
        let mime_type = normalise_mime(content_type)?;
        if bytes.is_empty() {
            return Err(DataUriError::EmptyPayload);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(DataUriError::TooLarge(bytes.len()));
        }

        Ok(Self {
            mime_type,
            data: STANDARD.encode(bytes),
        })
    }

    /// Renders back to `data:<mime>;base64,<payload>`.
    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn normalise_mime(mime: &str) -> Result<String, DataUriError> {
    let mime = mime.trim().to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(DataUriError::UnsupportedType(mime));
    }
    if mime == "image/jpg" {
        return Ok("image/jpeg".to_string());
    }
    Ok(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const TINY_PNG_B64: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_parse_valid_png() {
        let uri = format!("data:image/png;base64,{TINY_PNG_B64}");
        let parsed = DataUri::parse(&uri).unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.data, TINY_PNG_B64);
        assert_eq!(parsed.to_uri(), uri);
    }

    #[test]
    fn test_jpg_is_normalised_to_jpeg() {
        let parsed = DataUri::parse("data:image/jpg;base64,/9j/4AAQSkZJRg==").unwrap();
        assert_eq!(parsed.mime_type, "image/jpeg");
    }

    #[test]
    fn test_empty_input_is_missing() {
        assert_eq!(DataUri::parse("   "), Err(DataUriError::Missing));
    }

    #[test]
    fn test_missing_data_prefix_is_malformed() {
        assert_eq!(
            DataUri::parse("image/png;base64,AAAA"),
            Err(DataUriError::Malformed)
        );
    }

    #[test]
    fn test_non_base64_marker_is_malformed() {
        assert_eq!(
            DataUri::parse("data:image/png,rawbytes"),
            Err(DataUriError::Malformed)
        );
    }

    #[test]
    fn test_unsupported_type_rejected() {
        assert_eq!(
            DataUri::parse("data:image/gif;base64,R0lGODlh"),
            Err(DataUriError::UnsupportedType("image/gif".to_string()))
        );
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert_eq!(
            DataUri::parse("data:image/png;base64,@@not-base64@@"),
            Err(DataUriError::InvalidBase64)
        );
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert_eq!(
            DataUri::parse("data:image/png;base64,"),
            Err(DataUriError::EmptyPayload)
        );
    }

    #[test]
    fn test_from_bytes_encodes_payload() {
        let uri = DataUri::from_bytes("image/webp", b"RIFF....WEBP").unwrap();
        assert_eq!(uri.mime_type, "image/webp");
        assert_eq!(STANDARD.decode(&uri.data).unwrap(), b"RIFF....WEBP");
    }

    #[test]
    fn test_from_bytes_rejects_oversized_upload() {
        let bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert_eq!(
            DataUri::from_bytes("image/png", &bytes),
            Err(DataUriError::TooLarge(MAX_IMAGE_BYTES + 1))
        );
    }

    #[test]
    fn test_parse_rejects_payload_over_limit() {
        let payload = STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 1]);
        let uri = format!("data:image/png;base64,{payload}");
        assert_eq!(
            DataUri::parse(&uri),
            Err(DataUriError::TooLarge(MAX_IMAGE_BYTES + 1))
        );
    }

    #[test]
    fn test_parse_accepts_payload_at_limit() {
        let payload = STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES]);
        let uri = format!("data:image/webp;base64,{payload}");
        assert!(DataUri::parse(&uri).is_ok());
    }

    #[test]
    fn test_from_bytes_rejects_pdf() {
        assert!(matches!(
            DataUri::from_bytes("application/pdf", b"%PDF-1.7"),
            Err(DataUriError::UnsupportedType(_))
        ));
    }
}
