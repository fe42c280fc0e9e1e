//! Request orchestration: validate, fetch, normalize, assemble, convert
//!
//! A request moves through
//! `ValidatingInput → FetchingAssets → Assembling → (Done | ConvertingMobi → Done)`
//! and leaves the pipeline as `Rejected` at the first failure. Nothing is returned from a
//! failed request, and every temporary file it created is gone by the time
//! [`BookGenerator::generate`] returns.

use crate::assemble::Assembler;
use crate::convert::MobiConverter;
use crate::error::{AssemblyError, Result};
use crate::fetch::ContentSource;
use crate::normalize::normalize;
use crate::types::{BookContent, BookFormat, BookRequest, CoverImage, CoverSource, GeneratedBook};
use crate::validate::{chapter_source, validate_request, ChapterSource};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Pipeline stages, as reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingInput,
    FetchingAssets,
    Assembling,
    ConvertingMobi,
    Done,
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidatingInput => "validating_input",
            Stage::FetchingAssets => "fetching_assets",
            Stage::Assembling => "assembling",
            Stage::ConvertingMobi => "converting_mobi",
            Stage::Done => "done",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Produces finished books from requests
pub struct BookGenerator {
    source: Arc<dyn ContentSource>,
    assembler: Arc<Assembler>,
    converter: MobiConverter,
}

impl BookGenerator {
    pub fn new(
        source: Arc<dyn ContentSource>,
        assembler: Assembler,
        converter: MobiConverter,
    ) -> Self {
        Self {
            source,
            assembler: Arc::new(assembler),
            converter,
        }
    }

    /// Run a request through the whole pipeline
    pub async fn generate(&self, request: BookRequest, format: BookFormat) -> Result<GeneratedBook> {
        let title = request.title.clone();
        let result = self.run(request, format).await;
        if let Err(e) = &result {
            info!(stage = %Stage::Rejected, %format, "Book '{}': {}", title, e);
        }
        result
    }

    async fn run(&self, request: BookRequest, format: BookFormat) -> Result<GeneratedBook> {
        enter(Stage::ValidatingInput, &request.title, format);
        validate_request(&request)?;

        enter(Stage::FetchingAssets, &request.title, format);
        let cover = self.resolve_cover(request.cover).await?;

        let mut fetched = Vec::with_capacity(request.chapters.len());
        for (index, chapter) in request.chapters.iter().enumerate() {
            let content = match chapter_source(index, chapter)? {
                ChapterSource::Url(url) => Some(self.source.fetch_chapter_content(url).await?),
                ChapterSource::Html(_) => None,
            };
            fetched.push(content);
        }

        let book = BookContent {
            chapters: normalize(request.chapters, fetched)?,
            title: request.title,
            author: request.author,
            cover,
        };
        let title = book.title.clone();

        enter(Stage::Assembling, &title, format);
        let assembler = Arc::clone(&self.assembler);
        let artifact = tokio::task::spawn_blocking(move || assembler.assemble(&book))
            .await
            .map_err(|e| AssemblyError::Packaging(format!("Assembly task failed: {}", e)))??;

        let bytes = if format.needs_conversion() {
            enter(Stage::ConvertingMobi, &title, format);
            self.converter.convert(artifact).await?
        } else {
            artifact.into_bytes().await.map_err(AssemblyError::from)?
        };

        enter(Stage::Done, &title, format);
        Ok(GeneratedBook::new(&title, format, bytes))
    }

    async fn resolve_cover(&self, cover: Option<CoverSource>) -> Result<Option<CoverImage>> {
        match cover {
            Some(CoverSource::Url(url)) => Ok(Some(self.source.fetch_cover_image(&url).await?)),
            Some(CoverSource::Bytes(data)) => {
                debug!("Using {} bytes of supplied cover image", data.len());
                Ok(Some(CoverImage::new(data, None)))
            }
            None => Ok(None),
        }
    }
}

fn enter(stage: Stage, title: &str, format: BookFormat) {
    info!(%stage, %format, "Book '{}'", title);
}
