//! Assembly tests for bindery-core
//!
//! Packages are assembled into a temporary work directory and read back with
//! the inspector, so these tests check what a reader would actually see.

use bindery_core::assemble::{chapter_href, Assembler};
use bindery_core::inspect::{inspect_bytes, inspect_path};
use bindery_core::types::{BookContent, Chapter, CoverImage};
use bindery_core::{AssemblyError, SequentialIds};
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Minimal valid PNG header, enough for media type detection
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn assembler(dir: &TempDir) -> Assembler {
    Assembler::new(dir.path(), Arc::new(SequentialIds::starting_at(1)))
}

fn sample_book() -> BookContent {
    let mut book = BookContent::new("The Art of Testing", "Jane Doe");
    book.add_chapter(Chapter::new(
        "Introduction",
        "<p>This is a <strong>comprehensive</strong> guide.</p>",
    ));
    book.add_chapter(Chapter::new(
        "Advanced Topics",
        "<h2>Deeper</h2>\n<p>Let's explore &amp; test.</p><sup>1</sup>",
    ));
    book
}

fn numbered_book(count: usize) -> BookContent {
    let mut book = BookContent::new("Numbers", "Counter");
    for i in 1..=count {
        book.add_chapter(Chapter::new(format!("Chapter {i}"), format!("<p>{i}</p>")));
    }
    book
}

fn dir_is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

// =============================================================================
// Round trip
// =============================================================================

#[tokio::test]
async fn test_round_trip_preserves_metadata_and_chapters() {
    let dir = TempDir::new().unwrap();
    let book = sample_book();

    let artifact = assembler(&dir).assemble(&book).unwrap();
    let bytes = artifact.into_bytes().await.unwrap();
    let summary = inspect_bytes(bytes).unwrap();

    assert_eq!(summary.title.as_deref(), Some("The Art of Testing"));
    assert_eq!(summary.author.as_deref(), Some("Jane Doe"));
    assert_eq!(summary.language.as_deref(), Some("en"));
    assert!(!summary.has_cover);

    assert_eq!(summary.chapters.len(), book.chapters.len());
    for (read, written) in summary.chapters.iter().zip(&book.chapters) {
        assert_eq!(read.title, written.title);
        assert_eq!(read.content, written.content);
    }
}

#[tokio::test]
async fn test_package_summary_snapshot() {
    let dir = TempDir::new().unwrap();
    let artifact = assembler(&dir).assemble(&sample_book()).unwrap();
    let summary = inspect_bytes(artifact.into_bytes().await.unwrap()).unwrap();

    insta::assert_json_snapshot!("package_summary", summary);
}

#[test]
fn test_cover_image_is_registered() {
    let dir = TempDir::new().unwrap();
    let book = sample_book().with_cover(CoverImage::new(PNG.to_vec(), None));

    let artifact = assembler(&dir).assemble(&book).unwrap();
    let summary = inspect_path(artifact.path()).unwrap();

    assert!(summary.has_cover);
    assert_eq!(summary.chapters.len(), 2);
}

// =============================================================================
// Chapter numbering
// =============================================================================

#[test]
fn test_single_chapter_uses_one_digit() {
    let dir = TempDir::new().unwrap();
    let artifact = assembler(&dir).assemble(&numbered_book(1)).unwrap();
    let summary = inspect_path(artifact.path()).unwrap();

    assert_eq!(summary.chapters.len(), 1);
    assert!(summary.chapters[0].href.ends_with("text/ch_1.html"));
}

#[test]
fn test_ten_chapters_use_two_digits() {
    let dir = TempDir::new().unwrap();
    let artifact = assembler(&dir).assemble(&numbered_book(10)).unwrap();
    let summary = inspect_path(artifact.path()).unwrap();

    let hrefs: Vec<&str> = summary.chapters.iter().map(|c| c.href.as_str()).collect();
    assert!(hrefs[0].ends_with("text/ch_01.html"));
    assert!(hrefs[9].ends_with("text/ch_10.html"));

    let mut sorted = hrefs.clone();
    sorted.sort();
    assert_eq!(sorted, hrefs, "filenames must sort in reading order");

    let titles: Vec<&str> = summary.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles[0], "Chapter 1");
    assert_eq!(titles[9], "Chapter 10");
}

proptest! {
    #[test]
    fn prop_chapter_hrefs_sort_in_reading_order(count in 1usize..2000) {
        let hrefs: Vec<String> = (1..=count).map(|i| chapter_href(i, count)).collect();
        let mut sorted = hrefs.clone();
        sorted.sort();
        prop_assert_eq!(sorted, hrefs);
    }

    #[test]
    fn prop_chapter_numbers_share_one_width(count in 1usize..2000) {
        let width = count.to_string().len();
        for i in 1..=count {
            let href = chapter_href(i, count);
            let digits = href.trim_start_matches("text/ch_").trim_end_matches(".html");
            prop_assert_eq!(digits.len(), width);
            prop_assert_eq!(digits.parse::<usize>().unwrap(), i);
        }
    }
}

// =============================================================================
// Backing file lifecycle
// =============================================================================

#[test]
fn test_backing_file_named_by_identifier() {
    let dir = TempDir::new().unwrap();
    let artifact = assembler(&dir).assemble(&sample_book()).unwrap();

    // First identifier goes to the package, second to the file
    assert_eq!(
        artifact.path(),
        dir.path().join("00000000-0000-0000-0000-000000000002.epub")
    );
    assert!(artifact.len() > 0);
    assert_eq!(
        std::fs::metadata(artifact.path()).unwrap().len(),
        artifact.len()
    );
}

#[tokio::test]
async fn test_reading_bytes_removes_backing_file() {
    let dir = TempDir::new().unwrap();
    let artifact = assembler(&dir).assemble(&sample_book()).unwrap();
    let len = artifact.len();

    let bytes = artifact.into_bytes().await.unwrap();
    assert_eq!(bytes.len() as u64, len);
    assert!(dir_is_empty(&dir));
}

#[test]
fn test_dropping_artifact_removes_backing_file() {
    let dir = TempDir::new().unwrap();
    let artifact = assembler(&dir).assemble(&sample_book()).unwrap();
    assert!(!dir_is_empty(&dir));

    drop(artifact);
    assert!(dir_is_empty(&dir));
}

#[test]
fn test_empty_book_rejected() {
    let dir = TempDir::new().unwrap();
    let book = BookContent::new("Empty", "Nobody");

    let result = assembler(&dir).assemble(&book);
    assert!(matches!(result, Err(AssemblyError::NoChapters)));
    assert!(dir_is_empty(&dir));
}

#[tokio::test]
async fn test_every_chapter_gets_a_toc_entry() {
    let dir = TempDir::new().unwrap();
    let mut book = BookContent::new("Odd Titles", "Someone");
    for title in ["One", "x", "7", "  padded  ", "Last Words"] {
        book.add_chapter(Chapter::new(title, "<p>text</p>"));
    }

    let artifact = assembler(&dir).assemble(&book).unwrap();
    let summary = inspect_bytes(artifact.into_bytes().await.unwrap()).unwrap();

    let labels: Vec<&str> = summary.chapters.iter().map(|c| c.title.trim()).collect();
    assert_eq!(labels, vec!["One", "x", "7", "padded", "Last Words"]);
}

#[test]
fn test_untitled_chapter_rejected() {
    let dir = TempDir::new().unwrap();
    let mut book = BookContent::new("Gaps", "Someone");
    book.add_chapter(Chapter::new("One", "<p>1</p>"));
    book.add_chapter(Chapter::new("", "<p>2</p>"));
    book.add_chapter(Chapter::new("Three", "<p>3</p>"));

    let result = assembler(&dir).assemble(&book);
    assert!(matches!(result, Err(AssemblyError::UntitledChapter(2))));
    assert!(dir_is_empty(&dir));
}

#[test]
fn test_missing_work_dir_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    let assembler = Assembler::new(&missing, Arc::new(SequentialIds::new()));

    let result = assembler.assemble(&sample_book());
    assert!(matches!(result, Err(AssemblyError::Io(_))));
    assert!(!missing.exists());
}
