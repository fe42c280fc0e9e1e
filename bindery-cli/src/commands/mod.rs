//! CLI command implementations

mod generate;
mod info;
mod validate;

pub use generate::{generate, GenerateOptions};
pub use info::info;
pub use validate::validate;

use anyhow::{Context, Result};
use bindery_core::{BookRequest, GenerateBody};
use std::path::Path;

/// Read a manifest file into a request
fn load_manifest(path: &Path) -> Result<BookRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    let body: GenerateBody = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;
    Ok(BookRequest::try_from(body)?)
}
