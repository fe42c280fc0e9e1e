//! Generate command implementation

use super::load_manifest;
use anyhow::{Context, Result};
use bindery_core::{BookFormat, CoverSource, PipelineConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Flags for `bindery generate`
pub struct GenerateOptions {
    pub format: BookFormat,
    pub cover: Option<PathBuf>,
    pub converter: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

/// Build a book from a manifest and write it to `output`
pub async fn generate(manifest: &Path, output: &Path, options: GenerateOptions) -> Result<()> {
    let mut request = load_manifest(manifest)?;

    if let Some(cover) = &options.cover {
        let data = tokio::fs::read(cover)
            .await
            .with_context(|| format!("Failed to read cover image: {}", cover.display()))?;
        request.cover = Some(CoverSource::Bytes(data));
    }

    let mut config = PipelineConfig::from_env()?;
    if let Some(work_dir) = options.work_dir {
        config.work_dir = work_dir;
    }
    if let Some(converter) = options.converter {
        config.converter = converter;
    }

    tokio::fs::create_dir_all(&config.work_dir)
        .await
        .with_context(|| format!("Failed to create work dir: {}", config.work_dir.display()))?;
    let generator = config.build_generator()?;

    // Set up progress bar with animation
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Generating {} ({} chapters)...",
        options.format,
        request.chapters.len()
    ));

    let title = request.title.clone();
    let book = match generator.generate(request, options.format).await {
        Ok(book) => book,
        Err(e) => {
            pb.abandon_with_message("Generation failed");
            return Err(e).with_context(|| format!("Failed to generate '{}'", title));
        }
    };

    tokio::fs::write(output, &book.bytes)
        .await
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    tracing::info!("Wrote {} bytes to {}", book.bytes.len(), output.display());
    pb.finish_with_message(format!(
        "Generated '{}' as {} -> {}",
        title,
        book.format,
        output.display()
    ));

    Ok(())
}
