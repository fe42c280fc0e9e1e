//! Validate command implementation

use super::load_manifest;
use anyhow::{bail, Result};
use bindery_core::validate::{chapter_source, validate_request, ChapterSource};
use std::path::Path;

/// Check a manifest offline: parse it and run request validation
pub fn validate(manifest: &Path) -> Result<()> {
    let request = load_manifest(manifest)?;

    if let Err(e) = validate_request(&request) {
        eprintln!("Invalid manifest: {}", e);
        bail!("Validation failed for {}", manifest.display());
    }

    let remote = request
        .chapters
        .iter()
        .enumerate()
        .filter(|(index, chapter)| {
            matches!(chapter_source(*index, chapter), Ok(ChapterSource::Url(_)))
        })
        .count();

    println!("Valid manifest");
    println!("  Title: {}", request.title);
    println!("  Author: {}", request.author);
    println!(
        "  Chapters: {} ({} inline, {} from urls)",
        request.chapters.len(),
        request.chapters.len() - remote,
        remote
    );
    println!("  Cover: {}", if request.cover.is_some() { "yes" } else { "no" });

    Ok(())
}
