//! Reading assembled packages back

use crate::error::InspectError;
use epub::doc::{EpubDoc, NavPoint};
use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// What a package says about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub has_cover: bool,

    /// TOC entries in reading order
    pub chapters: Vec<ChapterSummary>,
}

/// A chapter document as found in the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterSummary {
    /// TOC label
    pub title: String,

    /// Path of the document inside the archive
    pub href: String,

    /// Markup inside the chapter's `<section>`, or the whole document when
    /// it was not generated by this crate
    #[serde(skip)]
    pub content: String,
}

/// Summarize an EPUB held in memory
pub fn inspect_bytes(data: Vec<u8>) -> Result<PackageSummary, InspectError> {
    let mut doc = EpubDoc::from_reader(Cursor::new(data))
        .map_err(|e| InspectError::InvalidEpub(e.to_string()))?;

    let get = |doc: &EpubDoc<Cursor<Vec<u8>>>, key: &str| doc.mdata(key).map(|item| item.value.clone());
    let title = get(&doc, "title");
    let author = get(&doc, "creator");
    let language = get(&doc, "language");
    let has_cover = doc.get_cover_id().is_some();

    let nav_points: Vec<NavPoint> = std::mem::take(&mut doc.toc);
    let mut chapters = Vec::with_capacity(nav_points.len());
    for nav in nav_points {
        let path = strip_fragment(&nav.content);
        let document = doc.get_resource_str_by_path(&path).ok_or_else(|| {
            InspectError::InvalidEpub(format!("TOC points at missing {}", path.display()))
        })?;

        chapters.push(ChapterSummary {
            title: nav.label,
            href: path.to_string_lossy().into_owned(),
            content: section_body(&document).unwrap_or(&document).to_string(),
        });
    }

    Ok(PackageSummary {
        title,
        author,
        language,
        has_cover,
        chapters,
    })
}

/// Summarize an EPUB file
pub fn inspect_path(path: impl AsRef<Path>) -> Result<PackageSummary, InspectError> {
    inspect_bytes(std::fs::read(path)?)
}

fn strip_fragment(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.split_once('#') {
        Some((file, _)) => PathBuf::from(file),
        None => path.to_path_buf(),
    }
}

/// Markup between a generated chapter's `<section id=...>` line and its
/// closing tag
fn section_body(document: &str) -> Option<&str> {
    let open = document.find("<section id=")?;
    let start = open + document[open..].find(">\n")? + 2;
    let end = document.rfind("\n</section>")?;
    (start <= end).then(|| &document[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_body() {
        let doc = "<body>\n<h1>T</h1>\n<section id=\"T\">\n<p>a</p>\n<section>inner</section>\n</section>\n</body>";
        assert_eq!(
            section_body(doc),
            Some("<p>a</p>\n<section>inner</section>")
        );
        assert_eq!(section_body("<body></body>"), None);
    }

    #[test]
    fn test_strip_fragment() {
        assert_eq!(
            strip_fragment(Path::new("OEBPS/text/ch_1.html#top")),
            PathBuf::from("OEBPS/text/ch_1.html")
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            inspect_bytes(b"not a zip".to_vec()),
            Err(InspectError::InvalidEpub(_))
        ));
    }
}
