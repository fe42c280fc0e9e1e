//! Incoming book requests and their wire shape

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Where the cover image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CoverSource {
    /// Fetched with a plain GET
    Url(String),

    /// Already in hand (e.g. read from a local file)
    Bytes(Vec<u8>),
}

/// A single chapter as supplied by the caller
///
/// Exactly one of `url` or `html` must be set; that is checked during
/// validation, not at deserialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterInput {
    /// Chapter title, used as heading and TOC label
    pub title: String,

    /// Page to run through content extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Inline chapter markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl ChapterInput {
    /// Chapter with inline markup
    pub fn html(title: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            html: Some(html.into()),
        }
    }

    /// Chapter whose content is extracted from a web page
    pub fn url(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            html: None,
        }
    }
}

/// Everything needed to produce a book
#[derive(Debug, Clone, PartialEq)]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub cover: Option<CoverSource>,
    pub chapters: Vec<ChapterInput>,
}

impl BookRequest {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover: None,
            chapters: Vec::new(),
        }
    }

    /// Set the cover source
    pub fn with_cover(mut self, cover: CoverSource) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Append a chapter
    pub fn with_chapter(mut self, chapter: ChapterInput) -> Self {
        self.chapters.push(chapter);
        self
    }
}

/// JSON body accepted by the HTTP endpoints and the CLI manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateBody {
    pub title: String,
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<ChapterInput>>,

    /// Legacy shape: a list of `{ "<title>": "<html>" }` objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_html: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

impl TryFrom<GenerateBody> for BookRequest {
    type Error = ValidationError;

    fn try_from(body: GenerateBody) -> Result<Self, Self::Error> {
        let chapters = match (body.chapters, body.chapter_html) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingChapterLists),
            (Some(chapters), None) => chapters,
            (None, Some(legacy)) => legacy_chapters(legacy)?,
            (None, None) => Vec::new(),
        };

        Ok(BookRequest {
            title: body.title,
            author: body.author,
            cover: body.title_image_url.map(CoverSource::Url),
            chapters,
        })
    }
}

fn legacy_chapters(
    entries: Vec<serde_json::Map<String, serde_json::Value>>,
) -> Result<Vec<ChapterInput>, ValidationError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut fields = entry.into_iter();
            match (fields.next(), fields.next()) {
                (Some((title, serde_json::Value::String(html))), None) => {
                    Ok(ChapterInput::html(title, html))
                }
                _ => Err(ValidationError::MalformedLegacyChapter { index }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_with_chapters() {
        let body: GenerateBody = serde_json::from_str(
            r#"{
                "title": "my title",
                "author": "Nicole",
                "title_image_url": "https://example.com/image.png",
                "chapters": [
                    {"title": "one", "html": "<p>1</p>"},
                    {"title": "two", "url": "https://example.com/2"}
                ]
            }"#,
        )
        .unwrap();

        let request = BookRequest::try_from(body).unwrap();
        assert_eq!(request.title, "my title");
        assert_eq!(
            request.cover,
            Some(CoverSource::Url("https://example.com/image.png".to_string()))
        );
        assert_eq!(request.chapters[0], ChapterInput::html("one", "<p>1</p>"));
        assert_eq!(
            request.chapters[1],
            ChapterInput::url("two", "https://example.com/2")
        );
    }

    #[test]
    fn test_legacy_chapter_html() {
        let body: GenerateBody = serde_json::from_str(
            r#"{
                "title": "my title",
                "author": "Nicole",
                "chapter_html": [{"chapter 1": "<h1>GREAT CHAPTER</h1>"}, {"chapter 2": "<p>x</p>"}]
            }"#,
        )
        .unwrap();

        let request = BookRequest::try_from(body).unwrap();
        assert_eq!(request.cover, None);
        assert_eq!(
            request.chapters,
            vec![
                ChapterInput::html("chapter 1", "<h1>GREAT CHAPTER</h1>"),
                ChapterInput::html("chapter 2", "<p>x</p>"),
            ]
        );
    }

    #[test]
    fn test_legacy_chapter_with_two_keys_rejected() {
        let body: GenerateBody = serde_json::from_str(
            r#"{"title": "t", "author": "a", "chapter_html": [{"a": "x", "b": "y"}]}"#,
        )
        .unwrap();

        assert_eq!(
            BookRequest::try_from(body),
            Err(ValidationError::MalformedLegacyChapter { index: 0 })
        );
    }

    #[test]
    fn test_both_chapter_lists_rejected() {
        let body: GenerateBody = serde_json::from_str(
            r#"{"title": "t", "author": "a", "chapters": [], "chapter_html": []}"#,
        )
        .unwrap();

        assert_eq!(
            BookRequest::try_from(body),
            Err(ValidationError::ConflictingChapterLists)
        );
    }
}
