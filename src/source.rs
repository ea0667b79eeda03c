// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Where data files come from
//!
//! Repositories never touch the network or disk directly; they ask a
//! [`Source`] for the raw bytes of a named resource.

use crate::config::DataSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fetch boundary for named JSON resources
#[async_trait]
pub trait Source: Send + Sync {
    /// Return the raw body of `resource` (e.g. `projects.json`)
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>>;
}

/// Fetches resources relative to a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, resource: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Source for HttpSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
        let url = self.url_for(resource);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status {
                resource: resource.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Reads resources from a local directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Source for DirSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
        let path = self.root.join(resource.trim_start_matches('/'));
        debug!("Reading {}", path.display());

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(resource.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Serves resources from memory; counts fetches
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl MemorySource {
    /// Empty source
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource body
    #[must_use]
    pub fn with_file(mut self, resource: &str, body: impl Into<Vec<u8>>) -> Self {
        self.files.insert(resource.to_string(), body.into());
        self
    }

    /// Delay every fetch by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches served so far, including misses
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MemorySource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.files
            .get(resource)
            .cloned()
            .ok_or_else(|| Error::NotFound(resource.to_string()))
    }
}

/// Pick the source configured in `settings`
#[must_use]
pub fn from_settings(settings: &DataSettings) -> Arc<dyn Source> {
    match settings.base_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Arc::new(HttpSource::new(url)),
        _ => Arc::new(DirSource::new(settings.dir.clone())),
    }
}
