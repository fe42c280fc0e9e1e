//! Request validation
//!
//! Everything here is pure: no network access happens until a request has
//! passed [`validate_request`] in full, so one bad URL anywhere aborts the
//! request before any fetch is attempted.

use crate::error::ValidationError;
use crate::types::{BookRequest, ChapterInput, CoverSource};
use url::Url;

/// Whether `candidate` is an absolute `http` or `https` URL
pub fn is_fetchable(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Check a URL-bearing field, naming the offending value on failure
pub fn check_url(candidate: &str) -> Result<(), ValidationError> {
    if is_fetchable(candidate) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl(candidate.to_string()))
    }
}

/// Where a validated chapter's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterSource<'a> {
    Html(&'a str),
    Url(&'a str),
}

/// Resolve the single content source of a chapter
pub fn chapter_source(index: usize, chapter: &ChapterInput) -> Result<ChapterSource<'_>, ValidationError> {
    match (chapter.url.as_deref(), chapter.html.as_deref()) {
        (Some(url), None) => Ok(ChapterSource::Url(url)),
        (None, Some(html)) => Ok(ChapterSource::Html(html)),
        _ => Err(ValidationError::AmbiguousChapterSource { index }),
    }
}

/// Validate a whole request, stopping at the first violation
pub fn validate_request(request: &BookRequest) -> Result<(), ValidationError> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::EmptyField("title"));
    }
    if request.author.trim().is_empty() {
        return Err(ValidationError::EmptyField("author"));
    }
    if request.chapters.is_empty() {
        return Err(ValidationError::NoChapters);
    }

    if let Some(CoverSource::Url(url)) = &request.cover {
        check_url(url)?;
    }

    for (index, chapter) in request.chapters.iter().enumerate() {
        // An untitled chapter would be dropped from the table of contents
        if chapter.title.trim().is_empty() {
            return Err(ValidationError::EmptyChapterTitle { index });
        }
        if let ChapterSource::Url(url) = chapter_source(index, chapter)? {
            check_url(url)?;
        }
    }

    Ok(())
}
