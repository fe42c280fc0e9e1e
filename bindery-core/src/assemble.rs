//! EPUB package assembly
//!
//! A package holds, in order: the optional cover image, a generated
//! stylesheet, a generated title page and one generated document per chapter.
//! Chapter documents are named `text/ch_<n>.html` with `n` zero-padded to the
//! number of digits in the chapter count, so filenames sort in reading order.

use crate::artifact::{EpubArtifact, TempArtifact};
use crate::error::AssemblyError;
use crate::ids::IdGenerator;
use crate::types::{BookContent, Chapter};
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Language declared in every package
pub const LANGUAGE: &str = "en";

/// Stylesheet shipped with every book
pub const STYLESHEET: &str = r#"body {
    margin: 0 5%;
    text-align: justify;
    line-height: 1.4;
    font-family: serif;
}

h1, h2, h3, h4, h5, h6 {
    text-align: left;
    line-height: 1.2;
    page-break-after: avoid;
}

p {
    margin: 0;
    text-indent: 1.5em;
}

img {
    max-width: 100%;
}

sup, .footnote {
    font-size: 0.75em;
    line-height: 0;
    vertical-align: super;
}

.title-page {
    text-align: center;
    margin-top: 30%;
}

.title-page h1 {
    text-align: center;
}
"#;

/// Href of the generated title page
pub const TITLE_PAGE_HREF: &str = "text/title.html";

/// Digits used for chapter numbers in a book of `count` chapters (at least 1)
pub fn index_width(count: usize) -> usize {
    count.max(1).to_string().len()
}

/// Package path of the `index`-th chapter (1-based) of `count`
pub fn chapter_href(index: usize, count: usize) -> String {
    format!("text/ch_{:0width$}.html", index, width = index_width(count))
}

/// Builds EPUB packages into a work directory
pub struct Assembler {
    work_dir: PathBuf,
    ids: Arc<dyn IdGenerator>,
}

impl Assembler {
    pub fn new(work_dir: impl Into<PathBuf>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ids,
        }
    }

    /// Directory backing files are written to
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build the package and write it to a fresh file in the work directory
    pub fn assemble(&self, book: &BookContent) -> Result<EpubArtifact, AssemblyError> {
        if book.chapters.is_empty() {
            return Err(AssemblyError::NoChapters);
        }
        if let Some(i) = book.chapters.iter().position(|c| c.title.trim().is_empty()) {
            return Err(AssemblyError::UntitledChapter(i + 1));
        }

        let mut builder = EpubBuilder::new(ZipLibrary::new().map_err(|e| {
            AssemblyError::Packaging(format!("Failed to create zip: {}", e))
        })?)
        .map_err(|e| AssemblyError::Packaging(format!("Failed to create EPUB builder: {}", e)))?;

        builder.epub_version(EpubVersion::V30);
        builder.set_uuid(self.ids.next_id());

        builder
            .metadata("title", &book.title)
            .map_err(packaging)?;
        builder
            .metadata("author", &book.author)
            .map_err(packaging)?;
        builder.metadata("lang", LANGUAGE).map_err(packaging)?;

        if let Some(cover) = &book.cover {
            let path = format!("img/title.{}", cover.extension());
            builder
                .add_cover_image(&path, cover.data.as_slice(), cover.media_type.as_str())
                .map_err(packaging)?;
        }

        builder
            .stylesheet(STYLESHEET.as_bytes())
            .map_err(packaging)?;

        let title_page = title_page_xhtml(&book.title, &book.author);
        builder
            .add_content(
                EpubContent::new(TITLE_PAGE_HREF, title_page.as_bytes())
                    .reftype(ReferenceType::TitlePage),
            )
            .map_err(packaging)?;

        let count = book.chapters.len();
        for (i, chapter) in book.chapters.iter().enumerate() {
            let href = chapter_href(i + 1, count);
            let xhtml = chapter_xhtml(chapter);
            debug!("Adding chapter '{}' as {}", chapter.title, href);

            builder
                .add_content(
                    EpubContent::new(&href, xhtml.as_bytes())
                        .title(&chapter.title)
                        .reftype(ReferenceType::Text),
                )
                .map_err(packaging)?;
        }

        let path = self.work_dir.join(format!("{}.epub", self.ids.next_id()));
        // Owned before creation so a failed write still removes the file
        let file = TempArtifact::adopt(&path);

        let mut writer = BufWriter::new(File::create(&path)?);
        builder.generate(&mut writer).map_err(packaging)?;
        writer.flush()?;
        drop(writer);

        let len = std::fs::metadata(&path)?.len();
        info!(
            "Assembled '{}' ({} chapters, {} bytes) at {}",
            book.title,
            count,
            len,
            path.display()
        );

        Ok(EpubArtifact::new(file, len))
    }
}

fn packaging(e: impl std::fmt::Display) -> AssemblyError {
    AssemblyError::Packaging(e.to_string())
}

/// XHTML document for the title page
fn title_page_xhtml(title: &str, author: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
    <title>{title}</title>
    <meta charset="UTF-8"/>
    <link rel="stylesheet" type="text/css" href="../stylesheet.css"/>
</head>
<body>
<section class="title-page" epub:type="titlepage">
<h1>{title}</h1>
<p class="author">{author}</p>
</section>
</body>
</html>"#,
        title = escape_html(title),
        author = escape_html(author)
    )
}

/// XHTML document for a chapter; the content is embedded untouched
fn chapter_xhtml(chapter: &Chapter) -> String {
    let title = escape_html(&chapter.title);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
    <title>{title}</title>
    <meta charset="UTF-8"/>
    <link rel="stylesheet" type="text/css" href="../stylesheet.css"/>
</head>
<body>
<h1>{title}</h1>
<section id="{title}">
{}
</section>
</body>
</html>"#,
        chapter.content
    )
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
