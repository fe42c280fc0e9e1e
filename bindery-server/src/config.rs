//! Server configuration, read once from the environment at startup

use anyhow::{Context, Result};
use bindery_core::config::lookup_non_empty;
use bindery_core::PipelineConfig;
use std::net::SocketAddr;

/// Everything the server needs to know about its environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (`BINDERY_BIND_ADDR`)
    pub bind_addr: SocketAddr,

    /// `*` or a comma-separated origin list (`BINDERY_CORS_ORIGINS`)
    pub cors_origins: Option<String>,

    /// Work dir, extraction service and converter settings
    pub pipeline: PipelineConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup_non_empty(&lookup, "BINDERY_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .context("BINDERY_BIND_ADDR is not a socket address")?;

        Ok(Self {
            bind_addr,
            cors_origins: lookup_non_empty(&lookup, "BINDERY_CORS_ORIGINS"),
            pipeline: PipelineConfig::from_lookup(&lookup)?,
        })
    }
}
