//! Retrieval of cover images and chapter content
//!
//! Cover images are fetched directly. Chapter pages go through a remote
//! content-extraction service that returns the main article markup as JSON.
//! Each URL is tried exactly once.

use crate::error::FetchError;
use crate::types::CoverImage;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Header carrying the extraction service credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default extraction service
pub const DEFAULT_EXTRACTOR_URL: &str = "https://mercury.postlight.com";

/// Source of remote book assets
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// GET a cover image; anything other than 200 is an error
    async fn fetch_cover_image(&self, url: &str) -> Result<CoverImage, FetchError>;

    /// Run a page through content extraction and return its article markup
    async fn fetch_chapter_content(&self, url: &str) -> Result<String, FetchError>;
}

/// Settings for [`HttpFetcher`]
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL of the extraction service; `/parser` is appended
    pub extractor_base: String,

    /// Credential sent in the `x-api-key` header
    pub api_key: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            extractor_base: DEFAULT_EXTRACTOR_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Extraction service response; only `content` is used
#[derive(Debug, Deserialize)]
struct ExtractedArticle {
    content: String,
}

/// reqwest-backed [`ContentSource`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    /// Create a fetcher with its own HTTP client
    pub fn new(config: FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn parser_endpoint(&self) -> String {
        format!("{}/parser", self.config.extractor_base.trim_end_matches('/'))
    }

    fn transport(url: &str, err: reqwest::Error) -> FetchError {
        FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl ContentSource for HttpFetcher {
    async fn fetch_cover_image(&self, url: &str) -> Result<CoverImage, FetchError> {
        info!("Fetching cover image from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::CoverImage {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::transport(url, e))?;

        debug!("Cover image is {} bytes", bytes.len());
        Ok(CoverImage::new(bytes.to_vec(), declared.as_deref()))
    }

    async fn fetch_chapter_content(&self, url: &str) -> Result<String, FetchError> {
        info!("Extracting chapter content from {}", url);

        let response = self
            .client
            .get(self.parser_endpoint())
            .query(&[("url", url)])
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(|e| Self::transport(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Extraction {
                url: url.to_string(),
                status: Some(response.status().as_u16()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport(url, e))?;

        let article: ExtractedArticle =
            serde_json::from_slice(&body).map_err(|e| {
                debug!("Extraction response for {} was not usable: {}", url, e);
                FetchError::Extraction {
                    url: url.to_string(),
                    status: None,
                }
            })?;

        debug!("Extracted {} bytes of markup", article.content.len());
        Ok(article.content)
    }
}
