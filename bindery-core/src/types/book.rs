//! The resolved book handed to the assembler

use super::Chapter;

/// An embedded cover image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Raw image payload
    pub data: Vec<u8>,

    /// MIME type (e.g. "image/png")
    pub media_type: String,
}

impl CoverImage {
    /// Create a cover image, taking the declared media type when it names an
    /// image and sniffing the payload otherwise
    pub fn new(data: Vec<u8>, declared: Option<&str>) -> Self {
        let declared = declared
            .and_then(|d| d.split(';').next())
            .map(|d| d.trim().to_ascii_lowercase())
            .filter(|d| d.starts_with("image/"));

        let media_type = declared.unwrap_or_else(|| sniff_media_type(&data).to_string());
        Self { data, media_type }
    }

    /// File extension matching the media type
    pub fn extension(&self) -> &'static str {
        match self.media_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "jpg",
        }
    }
}

/// Guess an image MIME type from magic bytes
pub fn sniff_media_type(data: &[u8]) -> &'static str {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if data.starts_with(b"\xff\xd8\xff") {
        "image/jpeg"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else if data.starts_with(b"<svg") || data.starts_with(b"<?xml") {
        "image/svg+xml"
    } else {
        "image/jpeg"
    }
}

/// A book with every input resolved, ready for packaging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookContent {
    pub title: String,
    pub author: String,
    pub cover: Option<CoverImage>,

    /// Chapters in reading order
    pub chapters: Vec<Chapter>,
}

impl BookContent {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover: None,
            chapters: Vec::new(),
        }
    }

    /// Set the cover image
    pub fn with_cover(mut self, cover: CoverImage) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Add a chapter to the end of the book
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_image_type_wins() {
        let cover = CoverImage::new(vec![0, 1, 2], Some("image/png; charset=binary"));
        assert_eq!(cover.media_type, "image/png");
        assert_eq!(cover.extension(), "png");
    }

    #[test]
    fn test_non_image_type_falls_back_to_sniffing() {
        let cover = CoverImage::new(b"GIF89a....".to_vec(), Some("application/octet-stream"));
        assert_eq!(cover.media_type, "image/gif");

        let cover = CoverImage::new(b"unknown".to_vec(), None);
        assert_eq!(cover.media_type, "image/jpeg");
        assert_eq!(cover.extension(), "jpg");
    }
}
