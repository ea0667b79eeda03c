// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Concurrency tests for repository loading
//!
//! These tests verify that overlapping callers share one fetch:
//! 1. Concurrent `get_list` calls on a slow source
//! 2. Mixed lenient and strict callers
//! 3. Concurrent `Portfolio::init` calls

use folio::config::Settings;
use folio::portfolio::Portfolio;
use folio::repository::{LoadState, Repository};
use folio::source::{MemorySource, Source};
use folio::types::{Customer, Project};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Test Helpers
// =============================================================================

const CUSTOMERS: &str = r#"{"items":[
    {"code":"ERC","name":"Example Research Corp"},
    {"code":"ACME","name":"Acme Industries"}
]}"#;

fn slow_source() -> Arc<MemorySource> {
    Arc::new(
        MemorySource::new()
            .with_file("customers.json", CUSTOMERS)
            .with_file("experiences.json", r#"{"items":[]}"#)
            .with_file("projects.json", r#"{"items":[{"name":"atlas","title":"Atlas"}]}"#)
            .with_latency(Duration::from_millis(50)),
    )
}

// =============================================================================
// Repository
// =============================================================================

#[tokio::test]
async fn test_concurrent_get_list_fetches_once() {
    let source = slow_source();
    let repo: Repository<Customer> = Repository::new(source.clone(), "customers.json");

    let (a, b, c, d) = tokio::join!(
        repo.get_list(),
        repo.get_list(),
        repo.get_by_code("erc"),
        repo.search("acme", None),
    );

    assert_eq!(source.fetch_count(), 1);
    assert_eq!(repo.fetch_count(), 1);
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
    assert_eq!(c.unwrap().name, "Example Research Corp");
    assert_eq!(d.len(), 1);
}

#[tokio::test]
async fn test_concurrent_callers_across_tasks_fetch_once() {
    let source = slow_source();
    let repo: Arc<Repository<Customer>> = Arc::new(Repository::new(source.clone(), "customers.json"));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.get_list().await.len() })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), 2);
    }
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_loading_state_is_visible_while_in_flight() {
    let source = slow_source();
    let repo: Arc<Repository<Customer>> = Arc::new(Repository::new(source, "customers.json"));
    assert_eq!(repo.load_state(), LoadState::Unloaded);

    let background = {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move { repo.get_list().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(repo.load_state(), LoadState::Loading);

    background.await.unwrap();
    assert_eq!(repo.load_state(), LoadState::Loaded);
}

#[tokio::test]
async fn test_strict_and_lenient_callers_share_fetch() {
    let source = slow_source();
    let repo: Repository<Project> = Repository::new(source.clone(), "projects.json");

    let (strict, lenient) = tokio::join!(repo.try_load(), repo.get_list());

    assert_eq!(strict.unwrap().items().len(), 1);
    assert_eq!(lenient.len(), 1);
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_failed_load_is_shared_as_empty() {
    let source = Arc::new(MemorySource::new().with_latency(Duration::from_millis(20)));
    let repo: Repository<Customer> = Repository::new(source.clone(), "customers.json");

    let (a, b) = tokio::join!(repo.get_list(), repo.get_list());

    assert!(a.is_empty() && b.is_empty());
    assert_eq!(source.fetch_count(), 1);
    assert_eq!(repo.load_state(), LoadState::LoadedEmptyFallback);
}

// =============================================================================
// Portfolio
// =============================================================================

#[tokio::test]
async fn test_concurrent_init_fetches_each_resource_once() {
    let source = slow_source();
    let dyn_source: Arc<dyn Source> = source.clone();
    let portfolio = Portfolio::new(dyn_source, &Settings::default());

    let (a, b) = tokio::join!(portfolio.init(), portfolio.init());
    a.unwrap();
    b.unwrap();

    assert!(portfolio.is_ready());
    assert_eq!(source.fetch_count(), 3);
    assert_eq!(portfolio.resolve_project_titles(&["atlas"]), vec!["Atlas"]);
}

#[tokio::test]
async fn test_init_loads_resources_concurrently() {
    let source = slow_source();
    let portfolio = Portfolio::new(source, &Settings::default());

    let started = std::time::Instant::now();
    portfolio.init().await.unwrap();

    // three 50ms fetches in sequence would take at least 150ms
    assert!(started.elapsed() < Duration::from_millis(140));
}
