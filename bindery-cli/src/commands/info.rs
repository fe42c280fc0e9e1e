//! Info command implementation

use anyhow::{Context, Result};
use bindery_core::inspect::inspect_path;
use std::path::Path;

/// Display information about an EPUB
pub fn info(input: &Path, json: bool) -> Result<()> {
    let summary = inspect_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Title:    {}", summary.title.as_deref().unwrap_or("-"));
        println!("Author:   {}", summary.author.as_deref().unwrap_or("-"));
        if let Some(language) = &summary.language {
            println!("Language: {}", language);
        }
        println!("Cover:    {}", if summary.has_cover { "yes" } else { "no" });
        println!("Chapters: {}", summary.chapters.len());
        for (i, chapter) in summary.chapters.iter().enumerate() {
            println!("  {:>3}. {} ({})", i + 1, chapter.title, chapter.href);
        }
    }

    Ok(())
}
