//! Output formats and the finished product

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Epub,
    Mobi,
}

impl BookFormat {
    /// MIME type served with the book
    pub fn content_type(self) -> &'static str {
        match self {
            BookFormat::Epub => "application/epub+zip",
            BookFormat::Mobi => "application/vnd.amazon.mobi8-ebook",
        }
    }

    /// File extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            BookFormat::Epub => "epub",
            BookFormat::Mobi => "mobi",
        }
    }

    /// Whether the assembled EPUB goes through the external converter
    pub fn needs_conversion(self) -> bool {
        matches!(self, BookFormat::Mobi)
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for BookFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "epub" => Ok(BookFormat::Epub),
            "mobi" => Ok(BookFormat::Mobi),
            other => Err(format!("unsupported format: {other}")),
        }
    }
}

/// A finished book, fully in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBook {
    pub format: BookFormat,

    /// Download name, `<title>.<ext>`
    pub filename: String,

    pub bytes: Vec<u8>,
}

impl GeneratedBook {
    pub fn new(title: &str, format: BookFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            filename: format!("{}.{}", title, format.extension()),
            bytes,
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata() {
        assert_eq!(BookFormat::Epub.content_type(), "application/epub+zip");
        assert_eq!(
            BookFormat::Mobi.content_type(),
            "application/vnd.amazon.mobi8-ebook"
        );
        assert!(!BookFormat::Epub.needs_conversion());
        assert!(BookFormat::Mobi.needs_conversion());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("EPUB".parse::<BookFormat>(), Ok(BookFormat::Epub));
        assert_eq!("mobi".parse::<BookFormat>(), Ok(BookFormat::Mobi));
        assert!("pdf".parse::<BookFormat>().is_err());
    }

    #[test]
    fn test_generated_filename() {
        let book = GeneratedBook::new("my title", BookFormat::Mobi, vec![1, 2]);
        assert_eq!(book.filename, "my title.mobi");
        assert_eq!(book.content_type(), "application/vnd.amazon.mobi8-ebook");
    }
}
