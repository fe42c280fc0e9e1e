//! Temporary backing files for assembled and converted books
//!
//! Every file created while serving a request is owned by a [`TempArtifact`],
//! which removes it when dropped. Early returns, `?` propagation and panics
//! therefore all leave the work directory as they found it.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// A file in the work directory that is deleted when this handle is dropped
#[derive(Debug)]
pub struct TempArtifact {
    path: TempPath,
}

impl TempArtifact {
    /// Take ownership of `path`, whether or not it exists yet
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file, then delete it
    pub async fn into_bytes(self) -> io::Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        if let Err(e) = self.close() {
            tracing::warn!("Failed to remove temporary artifact: {}", e);
        }
        Ok(bytes)
    }

    /// Delete the file now, reporting failures that dropping would swallow
    pub fn close(self) -> io::Result<()> {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => {
                tracing::debug!(path = %shown, "Removed temporary artifact");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// An assembled EPUB package backed by a temporary file
#[derive(Debug)]
pub struct EpubArtifact {
    file: TempArtifact,
    len: u64,
}

impl EpubArtifact {
    pub(crate) fn new(file: TempArtifact, len: u64) -> Self {
        Self { file, len }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Size of the package in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consume the artifact, returning its bytes and deleting the file
    pub async fn into_bytes(self) -> io::Result<Vec<u8>> {
        self.file.into_bytes().await
    }

    pub(crate) fn into_file(self) -> TempArtifact {
        self.file
    }
}
