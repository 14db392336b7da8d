//! Media upload, lookup and validation helpers.
//!
//! Media referenced by inbound messages (see [`Message::media_id`]) and media
//! uploaded for outbound messages both live on the platform under an opaque ID.
//! [`Client::get_media`] resolves an ID into a short-lived download URL.
//!
//! [`Message::media_id`]: crate::notification::Message::media_id
//! [`Client::get_media`]: crate::Client::get_media

use serde::Deserialize;
use std::borrow::Cow;

use crate::error::Error;

pub const MAX_IMAGE_SIZE: i64 = 5 * 1024 * 1024;
pub const MAX_AUDIO_SIZE: i64 = 16 * 1024 * 1024;
pub const MAX_VIDEO_SIZE: i64 = 16 * 1024 * 1024;
pub const MAX_DOCUMENT_SIZE: i64 = 100 * 1024 * 1024;
pub const MAX_STICKER_SIZE: i64 = 100 * 1024;

/// Every MIME type the platform accepts for upload.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "audio/aac",
    "audio/mp4",
    "audio/mpeg",
    "audio/amr",
    "audio/ogg",
    "video/mp4",
    "video/3gpp",
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// The size class a MIME type falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    Document,
    Sticker,
}

impl MediaCategory {
    /// Classifies a supported MIME type.
    ///
    /// `image/webp` is classified as [`Image`](Self::Image). Stickers share that
    /// MIME type, so callers sending stickers should check against
    /// [`MAX_STICKER_SIZE`] themselves.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let category = match mime_type {
            "image/jpeg" | "image/png" | "image/webp" => Self::Image,
            "audio/aac" | "audio/mp4" | "audio/mpeg" | "audio/amr" | "audio/ogg" => Self::Audio,
            "video/mp4" | "video/3gpp" => Self::Video,
            "application/pdf"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Self::Document
            }
            _ => return None,
        };
        Some(category)
    }

    /// Largest accepted size in bytes.
    pub fn max_size(self) -> i64 {
        match self {
            Self::Image => MAX_IMAGE_SIZE,
            Self::Audio => MAX_AUDIO_SIZE,
            Self::Video => MAX_VIDEO_SIZE,
            Self::Document => MAX_DOCUMENT_SIZE,
            Self::Sticker => MAX_STICKER_SIZE,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Document => "document",
            Self::Sticker => "sticker",
        }
    }
}

/// Fails unless `mime_type` is one of [`SUPPORTED_MIME_TYPES`].
pub fn validate_mime_type(mime_type: &str) -> Result<(), Error> {
    if SUPPORTED_MIME_TYPES.contains(&mime_type) {
        Ok(())
    } else {
        Err(Error::validation(format!("unsupported MIME type: {mime_type}")))
    }
}

/// Fails if `size` is not positive, `mime_type` is unsupported, or `size` exceeds
/// the platform limit for the type's [`MediaCategory`].
pub fn validate_media_size(mime_type: &str, size: i64) -> Result<(), Error> {
    if size <= 0 {
        return Err(Error::validation(format!("invalid media size: {size}")));
    }

    let category = MediaCategory::from_mime(mime_type)
        .ok_or_else(|| Error::validation(format!("unsupported MIME type: {mime_type}")))?;

    let max = category.max_size();
    if size > max {
        return Err(Error::validation(format!(
            "{} size {size} exceeds maximum allowed size {max}",
            category.as_str()
        )));
    }
    Ok(())
}

/// Metadata of an uploaded or received media object.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct MediaInfo {
    pub id: String,
    /// Download URL. Expires 5 minutes after it is issued and requires the access
    /// token, so fetch it with [`Client::download_media`](crate::Client::download_media).
    pub url: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub sha256: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub messaging_product: String,
}

/// A file to upload with [`Client::upload_media`](crate::Client::upload_media).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadMedia {
    pub(crate) bytes: Vec<u8>,
    pub(crate) filename: Cow<'static, str>,
    pub(crate) mime_type: Cow<'static, str>,
}

impl UploadMedia {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<Cow<'static, str>>,
        mime_type: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Like [`new`](Self::new) but detects the MIME type from the file's magic bytes.
    ///
    /// Returns `None` when the content is not recognized.
    pub fn sniffed(bytes: impl Into<Vec<u8>>, filename: impl Into<Cow<'static, str>>) -> Option<Self> {
        let bytes = bytes.into();
        let mime_type = infer::get(&bytes)?.mime_type();
        Some(Self {
            bytes,
            filename: filename.into(),
            mime_type: Cow::Borrowed(mime_type),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checks the upload before any request is made.
    pub fn validate(&self) -> Result<(), Error> {
        if self.filename.is_empty() {
            return Err(Error::validation("filename is required"));
        }
        if self.mime_type.is_empty() {
            return Err(Error::validation("MIME type is required"));
        }
        validate_mime_type(&self.mime_type)
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct UploadMediaResponse {
    pub id: String,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct DeleteMediaResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types() {
        for mime in SUPPORTED_MIME_TYPES {
            assert!(validate_mime_type(mime).is_ok(), "{mime}");
            assert!(MediaCategory::from_mime(mime).is_some(), "{mime}");
        }
        assert!(validate_mime_type("image/gif").is_err());
        assert!(validate_mime_type("").is_err());
    }

    #[test]
    fn media_sizes() {
        assert!(validate_media_size("image/png", MAX_IMAGE_SIZE).is_ok());
        assert!(validate_media_size("image/png", MAX_IMAGE_SIZE + 1).is_err());
        assert!(validate_media_size("audio/ogg", MAX_AUDIO_SIZE).is_ok());
        assert!(validate_media_size("video/mp4", MAX_VIDEO_SIZE + 1).is_err());
        assert!(validate_media_size("application/pdf", MAX_DOCUMENT_SIZE).is_ok());
        assert!(validate_media_size("application/pdf", 0).is_err());
        assert!(validate_media_size("text/plain", 10).is_err());

        // webp is checked against the image limit
        assert!(validate_media_size("image/webp", MAX_STICKER_SIZE + 1).is_ok());

        let err = validate_media_size("image/jpeg", MAX_IMAGE_SIZE + 1).unwrap_err();
        assert!(err.to_string().contains("image size"));
    }

    #[test]
    fn upload_validation() {
        assert!(UploadMedia::new(vec![1, 2, 3], "a.png", "image/png").validate().is_ok());
        assert!(UploadMedia::new(vec![1], "", "image/png").validate().is_err());
        assert!(UploadMedia::new(vec![1], "a.png", "").validate().is_err());
        assert!(UploadMedia::new(vec![1], "a.txt", "text/plain").validate().is_err());
    }

    #[test]
    fn sniffed_upload() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let upload = UploadMedia::sniffed(png.to_vec(), "pic.png").unwrap();
        assert_eq!(upload.mime_type(), "image/png");
        assert_eq!(upload.len(), png.len());

        assert!(UploadMedia::sniffed(b"plain words".to_vec(), "a.txt").is_none());
    }

    #[test]
    fn media_info() {
        let info: MediaInfo = serde_json::from_str(
            r#"{
                "messaging_product": "whatsapp",
                "url": "https://lookaside.fbsbx.com/whatsapp_business/attachments/?mid=1",
                "mime_type": "image/jpeg",
                "sha256": "abc",
                "file_size": 303833,
                "id": "2621233374848975"
            }"#,
        )
        .unwrap();
        assert_eq!(info.id, "2621233374848975");
        assert_eq!(info.file_size, 303833);
    }
}
