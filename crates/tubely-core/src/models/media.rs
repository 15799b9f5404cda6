use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::{THUMBNAIL_PART_NAME, VIDEO_PART_NAME};
use crate::AppError;

/// Kind of file accepted by an upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Thumbnail,
}

impl MediaKind {
    /// Content types accepted for this kind, with the extension used in storage keys.
    pub fn allowed_types(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            MediaKind::Video => &[("video/mp4", "mp4")],
            MediaKind::Thumbnail => &[("image/jpeg", "jpg"), ("image/png", "png")],
        }
    }

    /// Map a normalized media type to its file extension, rejecting anything not on the
    /// allow-list.
    pub fn extension_for(&self, media_type: &str) -> Result<&'static str, AppError> {
        self.allowed_types()
            .iter()
            .find(|(allowed, _)| *allowed == media_type)
            .map(|(_, extension)| *extension)
            .ok_or_else(|| {
                let allowed: Vec<&str> = self.allowed_types().iter().map(|(t, _)| *t).collect();
                AppError::InvalidInput(format!(
                    "Unsupported file type {}. Allowed types: {}",
                    media_type,
                    allowed.join(", ")
                ))
            })
    }

    /// Name of the multipart part carrying the file.
    pub fn part_name(&self) -> &'static str {
        match self {
            MediaKind::Video => VIDEO_PART_NAME,
            MediaKind::Thumbnail => THUMBNAIL_PART_NAME,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_allow_list() {
        assert_eq!(MediaKind::Video.extension_for("video/mp4").unwrap(), "mp4");
        assert!(MediaKind::Video.extension_for("video/quicktime").is_err());
        assert!(MediaKind::Video.extension_for("image/png").is_err());
    }

    #[test]
    fn test_thumbnail_allow_list() {
        assert_eq!(
            MediaKind::Thumbnail.extension_for("image/jpeg").unwrap(),
            "jpg"
        );
        assert_eq!(MediaKind::Thumbnail.extension_for("image/png").unwrap(), "png");
        assert!(MediaKind::Thumbnail.extension_for("image/gif").is_err());
        assert!(MediaKind::Thumbnail.extension_for("video/mp4").is_err());
    }

    #[test]
    fn test_rejection_lists_allowed_types() {
        let err = MediaKind::Thumbnail.extension_for("image/webp").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("image/jpeg"));
        assert!(message.contains("image/png"));
    }

    #[test]
    fn test_part_names() {
        assert_eq!(MediaKind::Video.part_name(), "video");
        assert_eq!(MediaKind::Thumbnail.part_name(), "thumbnail");
    }
}
