//! Application state

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use bindery_core::BookGenerator;
use std::sync::Arc;

/// Shared application state
///
/// Holds no per-request data: every request builds and tears down its own
/// artifacts inside the generator.
#[derive(Clone)]
pub struct AppState {
    /// The book-assembly pipeline
    pub generator: Arc<BookGenerator>,

    /// `*` or a comma-separated origin list
    pub cors_origins: Option<String>,
}

impl AppState {
    /// Create application state from configuration
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let pipeline = &config.pipeline;
        tokio::fs::create_dir_all(&pipeline.work_dir)
            .await
            .with_context(|| format!("Failed to create work dir {}", pipeline.work_dir.display()))?;

        let generator = pipeline.build_generator()?;

        tracing::info!(
            "Work dir {}, converter {}",
            pipeline.work_dir.display(),
            pipeline.converter.display()
        );

        Ok(Self::with_generator(generator, config.cors_origins.clone()))
    }

    /// Wrap an already-built generator
    pub fn with_generator(generator: BookGenerator, cors_origins: Option<String>) -> Self {
        Self {
            generator: Arc::new(generator),
            cors_origins,
        }
    }
}
