//! Pipeline configuration shared by the server and the CLI
//!
//! | Variable | Default |
//! |---|---|
//! | `BINDERY_WORK_DIR` | `<system tmp>/bindery` |
//! | `BINDERY_EXTRACTOR_URL` | [`DEFAULT_EXTRACTOR_URL`] |
//! | `BINDERY_EXTRACTOR_API_KEY` | empty |
//! | `BINDERY_FETCH_TIMEOUT_SECS` | 30 |
//! | `BINDERY_CONVERTER` | [`DEFAULT_CONVERTER`] |
//! | `BINDERY_CONVERTER_TIMEOUT_SECS` | 120 |
//!
//! Variables set to an empty string count as unset.

use crate::assemble::Assembler;
use crate::convert::{MobiConverter, ProcessRunner, DEFAULT_CONVERTER, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::fetch::{FetcherConfig, HttpFetcher, DEFAULT_EXTRACTOR_URL};
use crate::ids::{IdGenerator, RandomIds};
use crate::pipeline::BookGenerator;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Look up `key`, treating an empty value as absent
pub fn lookup_non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Parse a whole number of seconds from `key`, if set
pub fn lookup_seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    lookup_non_empty(lookup, key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidSeconds { key, value: raw })
        })
        .transpose()
}

/// Everything needed to build a [`BookGenerator`]
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory for temporary EPUB/MOBI files
    pub work_dir: PathBuf,

    /// Extraction service settings
    pub fetcher: FetcherConfig,

    /// Converter executable
    pub converter: PathBuf,

    /// Bound on a single conversion
    pub converter_timeout: Duration,
}

impl PipelineConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let work_dir = lookup_non_empty(&lookup, "BINDERY_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("bindery"));

        let fetcher = FetcherConfig {
            extractor_base: lookup_non_empty(&lookup, "BINDERY_EXTRACTOR_URL")
                .unwrap_or_else(|| DEFAULT_EXTRACTOR_URL.to_string()),
            api_key: lookup("BINDERY_EXTRACTOR_API_KEY").unwrap_or_default(),
            timeout: lookup_seconds(&lookup, "BINDERY_FETCH_TIMEOUT_SECS")?
                .unwrap_or(FetcherConfig::default().timeout),
        };

        let converter = lookup_non_empty(&lookup, "BINDERY_CONVERTER")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERTER));

        let converter_timeout =
            lookup_seconds(&lookup, "BINDERY_CONVERTER_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            work_dir,
            fetcher,
            converter,
            converter_timeout,
        })
    }

    /// Wire up the production pipeline: HTTP fetcher, random identifiers and
    /// the converter as a child process
    pub fn build_generator(&self) -> Result<BookGenerator, ConfigError> {
        let fetcher = HttpFetcher::new(self.fetcher.clone())?;

        let ids: Arc<dyn IdGenerator> = Arc::new(RandomIds);
        let assembler = Assembler::new(&self.work_dir, Arc::clone(&ids));
        let converter = MobiConverter::new(Arc::new(ProcessRunner::new(&self.converter)), ids)
            .with_timeout(self.converter_timeout);

        Ok(BookGenerator::new(Arc::new(fetcher), assembler, converter))
    }
}
