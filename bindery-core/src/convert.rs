//! EPUB to MOBI conversion through an external converter
//!
//! The converter is invoked as `<program> <epub> -c2 -o <name>.mobi` and
//! writes its output next to the input file. Both files are removed once the
//! MOBI bytes are in memory, or when conversion fails.

use crate::artifact::{EpubArtifact, TempArtifact};
use crate::error::ConversionError;
use crate::ids::IdGenerator;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default converter executable
pub const DEFAULT_CONVERTER: &str = "kindlegen";

/// Default bound on a single conversion
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest stretch of converter output kept in error messages
const OUTPUT_TAIL: usize = 512;

/// How a converter run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterExit {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,

    /// Combined stdout and stderr
    pub output: String,
}

impl ConverterExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs the converter executable to completion
#[async_trait]
pub trait ConverterRunner: Send + Sync {
    /// Convert `input`, writing `output_name` into the input's directory
    async fn run(
        &self,
        input: &Path,
        output_name: &str,
        timeout: Duration,
    ) -> Result<ConverterExit, ConversionError>;
}

/// Runs a kindlegen-compatible executable as a child process
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments passed before the input path, for wrappers such as `sh -c`
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

#[async_trait]
impl ConverterRunner for ProcessRunner {
    async fn run(
        &self,
        input: &Path,
        output_name: &str,
        timeout: Duration,
    ) -> Result<ConverterExit, ConversionError> {
        // The converter runs inside the input's directory, so it gets a bare
        // file name; the full path would be resolved twice when relative.
        let (dir, file_name) = match (input.parent(), input.file_name()) {
            (Some(dir), Some(name)) if !dir.as_os_str().is_empty() => (Some(dir), name),
            _ => (None, input.as_os_str()),
        };

        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg(file_name)
            .arg("-c2")
            .arg("-o")
            .arg(output_name)
            .kill_on_drop(true);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        debug!("Running {:?}", command);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| ConversionError::TimedOut(timeout))?
            .map_err(ConversionError::Spawn)?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ConverterExit {
            code: output.status.code(),
            output: text,
        })
    }
}

/// Turns assembled EPUB packages into MOBI bytes
pub struct MobiConverter {
    runner: Arc<dyn ConverterRunner>,
    ids: Arc<dyn IdGenerator>,
    timeout: Duration,
}

impl MobiConverter {
    pub fn new(runner: Arc<dyn ConverterRunner>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            runner,
            ids,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the conversion timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Convert the package, consuming it
    pub async fn convert(&self, epub: EpubArtifact) -> Result<Vec<u8>, ConversionError> {
        let epub = epub.into_file();
        let output_name = format!("{}.mobi", self.ids.next_id());
        let output_path = epub
            .path()
            .parent()
            .map(|dir| dir.join(&output_name))
            .unwrap_or_else(|| PathBuf::from(&output_name));
        // Adopted up front: a converter that fails halfway may still leave a file
        let mobi = TempArtifact::adopt(output_path);

        info!(
            "Converting {} to {}",
            epub.path().display(),
            mobi.path().display()
        );

        let exit = self
            .runner
            .run(epub.path(), &output_name, self.timeout)
            .await?;

        if !exit.success() {
            warn!("Converter exited with {:?}", exit.code);
            return Err(ConversionError::Failed {
                code: exit.code,
                output: tail(&exit.output, OUTPUT_TAIL).to_string(),
            });
        }

        if !tokio::fs::try_exists(mobi.path()).await.unwrap_or(false) {
            return Err(ConversionError::MissingOutput(mobi.path().to_path_buf()));
        }

        let bytes = mobi.into_bytes().await?;
        debug!("Read {} bytes of MOBI output", bytes.len());
        Ok(bytes)
    }
}

/// Last `max` bytes of `s`, cut on a char boundary
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_success() {
        let exit = ConverterExit {
            code: Some(0),
            output: String::new(),
        };
        assert!(exit.success());

        let killed = ConverterExit {
            code: None,
            output: String::new(),
        };
        assert!(!killed.success());
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        assert_eq!(tail("short", 10), "short");
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("aé", 1), "");
        assert_eq!(tail("aéb", 2), "b");
    }
}
