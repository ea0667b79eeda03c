// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Lazily loaded, cached access to one JSON resource
//!
//! A [`Repository`] owns a single `{"items": [...]}` file. The first access
//! fetches and parses it; every caller that arrives while that fetch is in
//! flight waits on the same load, so a resource is fetched at most once until
//! it is explicitly invalidated.
//!
//! Lenient accessors (`get_list`, `get_by_code`, `search`, ...) never fail: a
//! fetch or parse error is logged and the repository settles on an empty
//! snapshot. [`Repository::try_load`] is the strict variant for callers that
//! want to see the error.

use crate::error::{Error, Result};
use crate::source::Source;
use crate::types::Envelope;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Capabilities a stored record must offer
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Numeric id, when the record carries one
    fn id(&self) -> Option<u64> {
        None
    }

    /// Code used for the code-indexed map
    fn code(&self) -> Option<&str>;
}

/// Default key normalisation: trimmed and uppercased
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Tuning knobs for a repository
#[derive(Clone, Copy)]
pub struct RepositoryOptions {
    /// Applied to codes both when indexing and when looking up
    pub normalize: fn(&str) -> String,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            normalize: normalize_code,
        }
    }
}

impl fmt::Debug for RepositoryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryOptions").finish_non_exhaustive()
    }
}

/// Lookup key for [`Repository::get_by_id`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Matches the record's `id`, falling back to position
    Index(u64),
    /// Matches the normalised code
    Code(String),
}

impl From<u64> for Key {
    fn from(n: u64) -> Self {
        Self::Index(n)
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Self::Index(n as u64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.parse::<u64>() {
            Ok(n) if trimmed.bytes().all(|b| b.is_ascii_digit()) => Self::Index(n),
            _ => Self::Code(s.to_string()),
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Where a repository is in its load lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    Unloaded,
    /// A fetch is in flight
    Loading,
    /// Items loaded from the source
    Loaded,
    /// The load failed; serving an empty collection
    LoadedEmptyFallback,
}

/// Loaded items plus the code index derived from them
///
/// Built in one go and never mutated, so the index always matches the items.
#[derive(Debug)]
pub struct Snapshot<T> {
    items: Vec<T>,
    code_map: HashMap<String, usize>,
    failure: Option<String>,
}

impl<T: Record> Snapshot<T> {
    /// Index `items` with `normalize`; on duplicate codes the first record wins
    #[must_use]
    pub fn build(items: Vec<T>, normalize: fn(&str) -> String) -> Self {
        let mut code_map = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if let Some(code) = item.code() {
                code_map.entry(normalize(code)).or_insert(idx);
            }
        }
        Self {
            items,
            code_map,
            failure: None,
        }
    }

    fn empty_fallback(reason: String) -> Self {
        Self {
            items: Vec::new(),
            code_map: HashMap::new(),
            failure: Some(reason),
        }
    }

    /// Items in file order
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Lookup by an already-normalised code
    #[must_use]
    pub fn by_normalized_code(&self, code: &str) -> Option<&T> {
        self.code_map.get(code).and_then(|&idx| self.items.get(idx))
    }

    /// Number of distinct codes indexed
    #[must_use]
    pub fn code_count(&self) -> usize {
        self.code_map.len()
    }

    /// Whether this snapshot stands in for a failed load
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }

    /// Why the load failed, for a fallback snapshot
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

/// Clears the in-flight flag when the fetch finishes or is dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Cached accessor over one JSON resource
pub struct Repository<T: Record> {
    resource: String,
    source: Arc<dyn Source>,
    options: RepositoryOptions,
    cell: OnceCell<Arc<Snapshot<T>>>,
    in_flight: AtomicBool,
    fetches: AtomicUsize,
}

impl<T: Record> fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("resource", &self.resource)
            .field("state", &self.load_state())
            .finish_non_exhaustive()
    }
}

impl<T: Record> Repository<T> {
    /// Repository for `resource` with default options
    #[must_use]
    pub fn new(source: Arc<dyn Source>, resource: impl Into<String>) -> Self {
        Self::with_options(source, resource, RepositoryOptions::default())
    }

    /// Repository for `resource` with custom options
    #[must_use]
    pub fn with_options(
        source: Arc<dyn Source>,
        resource: impl Into<String>,
        options: RepositoryOptions,
    ) -> Self {
        Self {
            resource: resource.into(),
            source,
            options,
            cell: OnceCell::new(),
            in_flight: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Name of the backing resource
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    async fn fetch_snapshot(&self) -> Result<Arc<Snapshot<T>>> {
        let guard = InFlight::enter(&self.in_flight);
        self.fetches.fetch_add(1, Ordering::SeqCst);
        debug!("Fetching {}", self.resource);

        let result = self.source.fetch(&self.resource).await.and_then(|body| {
            serde_json::from_slice::<Envelope<T>>(&body).map_err(|source| Error::Json {
                resource: self.resource.clone(),
                source,
            })
        });
        drop(guard);

        let envelope = result?;
        let snapshot = Snapshot::build(envelope.items, self.options.normalize);
        info!(
            "Loaded {} items ({} codes) from {}",
            snapshot.items.len(),
            snapshot.code_count(),
            self.resource
        );
        Ok(Arc::new(snapshot))
    }

    /// Load if needed and return the snapshot; failures yield an empty one
    pub async fn snapshot(&self) -> Arc<Snapshot<T>> {
        self.cell
            .get_or_init(|| async {
                match self.fetch_snapshot().await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!("Failed to load {}: {}; using empty collection", self.resource, e);
                        Arc::new(Snapshot::empty_fallback(e.to_string()))
                    }
                }
            })
            .await
            .clone()
    }

    /// Load if needed, propagating fetch and parse errors
    ///
    /// Shares the single-flight slot with the lenient accessors. An error
    /// leaves the repository unloaded so a later call can retry. If a lenient
    /// accessor already settled on the empty fallback, that failure is
    /// reported as [`Error::Unavailable`] until the repository is invalidated.
    pub async fn try_load(&self) -> Result<Arc<Snapshot<T>>> {
        let snapshot = self
            .cell
            .get_or_try_init(|| self.fetch_snapshot())
            .await?;

        match snapshot.failure() {
            Some(reason) => Err(Error::Unavailable {
                resource: self.resource.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(Arc::clone(snapshot)),
        }
    }

    /// The snapshot if a load has completed, without triggering one
    #[must_use]
    pub fn loaded(&self) -> Option<&Snapshot<T>> {
        self.cell.get().map(|s| &**s)
    }

    /// Current lifecycle state
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        match self.cell.get() {
            Some(s) if s.is_fallback() => LoadState::LoadedEmptyFallback,
            Some(_) => LoadState::Loaded,
            None if self.in_flight.load(Ordering::SeqCst) => LoadState::Loading,
            None => LoadState::Unloaded,
        }
    }

    /// Whether a snapshot (real or fallback) is cached
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Fetches issued against the source so far
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Drop the cached snapshot; the next access reloads and re-indexes
    pub fn invalidate(&mut self) {
        if self.cell.take().is_some() {
            debug!("Invalidated {}", self.resource);
        }
    }

    /// All items, in file order
    pub async fn get_list(&self) -> Vec<T> {
        self.snapshot().await.items.clone()
    }

    /// Find by numeric id (falling back to position) or by code
    pub async fn get_by_id(&self, key: impl Into<Key>) -> Option<T> {
        let snapshot = self.snapshot().await;
        match key.into() {
            Key::Index(n) => snapshot
                .items
                .iter()
                .find(|item| item.id() == Some(n))
                .or_else(|| usize::try_from(n).ok().and_then(|i| snapshot.items.get(i)))
                .cloned(),
            Key::Code(code) => snapshot
                .by_normalized_code(&(self.options.normalize)(&code))
                .cloned(),
        }
    }

    /// Find by code, case-insensitively with the default normaliser
    ///
    /// A blank code returns `None` without loading anything.
    pub async fn get_by_code(&self, code: &str) -> Option<T> {
        if code.trim().is_empty() {
            return None;
        }
        let key = (self.options.normalize)(code);
        self.snapshot().await.by_normalized_code(&key).cloned()
    }

    /// Resolve a record by code and pull a logo out of it with `extract`
    pub async fn get_logo_url_by_code<F>(&self, code: &str, extract: F) -> Option<String>
    where
        F: Fn(&T) -> Option<String>,
    {
        self.get_by_code(code).await.as_ref().and_then(extract)
    }

    /// Case-insensitive substring search
    ///
    /// With `fields`, only those top-level fields are scanned; otherwise the
    /// whole record's JSON text is. A blank query returns everything.
    pub async fn search(&self, query: &str, fields: Option<&[&str]>) -> Vec<T> {
        let snapshot = self.snapshot().await;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return snapshot.items.clone();
        }

        snapshot
            .items
            .iter()
            .filter(|item| matches_query(*item, &query, fields))
            .cloned()
            .collect()
    }
}

fn matches_query<T: Serialize>(item: &T, query: &str, fields: Option<&[&str]>) -> bool {
    let Ok(value) = serde_json::to_value(item) else {
        return false;
    };

    match fields {
        Some(fields) => fields.iter().any(|field| {
            value
                .get(*field)
                .map(value_text)
                .is_some_and(|text| text.to_lowercase().contains(query))
        }),
        None => value.to_string().to_lowercase().contains(query),
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
