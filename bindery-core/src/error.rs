//! Error types for Bindery Core

use thiserror::Error;

/// Result type alias using BinderyError
pub type Result<T> = std::result::Result<T, BinderyError>;

/// Top-level error type for a book generation request
#[derive(Debug, Error)]
pub enum BinderyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BinderyError {
    /// Whether the failure is attributable to the caller's input or upstream
    /// sources rather than to this service
    pub fn is_client_error(&self) -> bool {
        matches!(self, BinderyError::Validation(_) | BinderyError::Fetch(_))
    }
}

/// Rejections raised while checking a request, before any network I/O
///
/// The display strings are user-facing and are returned verbatim as
/// response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("chapters must include either a url or html key")]
    AmbiguousChapterSource { index: usize },

    #[error("chapter titles must not be empty")]
    EmptyChapterTitle { index: usize },

    #[error("chapters must not be empty")]
    NoChapters,

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("chapter_html entries must have exactly one key")]
    MalformedLegacyChapter { index: usize },

    #[error("only one of chapters or chapter_html may be given")]
    ConflictingChapterLists,
}

/// Failures retrieving a cover image or chapter content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("title image does not exist")]
    CoverImage { url: String, status: u16 },

    #[error("could not extract chapter content: {url}")]
    Extraction { url: String, status: Option<u16> },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// Upstream HTTP status, when the collaborator answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FetchError::CoverImage { status, .. } => Some(*status),
            FetchError::Extraction { status, .. } => *status,
            FetchError::Transport { .. } => None,
        }
    }
}

/// Invalid environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { key: &'static str, value: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors that occur while building the EPUB package
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Packaging failed: {0}")]
    Packaging(String),

    #[error("Book has no chapters")]
    NoChapters,

    #[error("Chapter {0} has no resolved content")]
    UnresolvedChapter(usize),

    #[error("Chapter {0} has no title")]
    UntitledChapter(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external EPUB to MOBI converter
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Converter could not be started: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Converter exited with status {code:?}: {output}")]
    Failed { code: Option<i32>, output: String },

    #[error("Converter timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("Converter produced no output file at {0}")]
    MissingOutput(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reading an existing EPUB back
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
