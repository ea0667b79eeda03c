// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! The loaded portfolio: customers, experiences and projects together
//!
//! [`Portfolio`] is constructed once by whatever composes the presentation
//! layer and passed around by reference. [`Portfolio::init`] loads the three
//! resources concurrently; the synchronous resolvers only look at the data
//! once all three have loaded, so callers never observe a half-initialised
//! portfolio. Before that (or after a failed init) they behave as if there
//! were no data: `None`, empty slices, or the key echoed back.

use crate::config::{AssetSettings, Settings};
use crate::dates::{calculate_duration, DateRange};
use crate::error::Result;
use crate::logos::LogoResolver;
use crate::repository::{normalize_code, Record, Repository, Snapshot};
use crate::source::{self, Source};
use crate::types::{Customer, Experience, Project};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Application-wide data context
#[derive(Debug)]
pub struct Portfolio {
    customers: Repository<Customer>,
    experiences: Repository<Experience>,
    projects: Repository<Project>,
    logos: LogoResolver,
    assets: AssetSettings,
    ready: AtomicBool,
}

impl Portfolio {
    /// Portfolio reading the files named in `settings` from `source`
    #[must_use]
    pub fn new(source: Arc<dyn Source>, settings: &Settings) -> Self {
        let data = &settings.data;
        Self {
            customers: Repository::new(Arc::clone(&source), data.customers.clone()),
            experiences: Repository::new(Arc::clone(&source), data.experiences.clone()),
            projects: Repository::new(source, data.projects.clone()),
            logos: LogoResolver::new(settings.assets.clone()),
            assets: settings.assets.clone(),
            ready: AtomicBool::new(false),
        }
    }

    /// Portfolio backed by the source configured in `settings`
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(source::from_settings(&settings.data), settings)
    }

    /// Load all three resources concurrently
    ///
    /// The first fetch or parse error is returned and the portfolio stays
    /// unready; the caller decides whether to carry on with degraded data.
    /// Once a call has succeeded, further calls return immediately.
    pub async fn init(&self) -> Result<()> {
        if self.is_ready() {
            debug!("Portfolio already initialised");
            return Ok(());
        }

        let (customers, experiences, projects) = tokio::try_join!(
            self.customers.try_load(),
            self.experiences.try_load(),
            self.projects.try_load(),
        )?;

        self.ready.store(true, Ordering::SeqCst);
        info!(
            "Portfolio ready: {} customers, {} experiences, {} projects",
            customers.items().len(),
            experiences.items().len(),
            projects.items().len()
        );
        Ok(())
    }

    /// Whether `init` has completed successfully
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn view<'a, T: Record>(&self, repo: &'a Repository<T>) -> Option<&'a Snapshot<T>> {
        if self.is_ready() {
            repo.loaded()
        } else {
            None
        }
    }

    /// Customers repository, for lazy queries independent of `init`
    #[must_use]
    pub fn customer_repository(&self) -> &Repository<Customer> {
        &self.customers
    }

    /// Experiences repository
    #[must_use]
    pub fn experience_repository(&self) -> &Repository<Experience> {
        &self.experiences
    }

    /// Projects repository
    #[must_use]
    pub fn project_repository(&self) -> &Repository<Project> {
        &self.projects
    }

    /// Loaded customers, empty before init
    #[must_use]
    pub fn customers(&self) -> &[Customer] {
        self.view(&self.customers).map(Snapshot::items).unwrap_or_default()
    }

    /// Loaded experiences, empty before init
    #[must_use]
    pub fn experiences(&self) -> &[Experience] {
        self.view(&self.experiences).map(Snapshot::items).unwrap_or_default()
    }

    /// Loaded projects, empty before init
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        self.view(&self.projects).map(Snapshot::items).unwrap_or_default()
    }

    /// Customer by code, ignoring case
    #[must_use]
    pub fn customer_by_code(&self, code: &str) -> Option<&Customer> {
        self.view(&self.customers)?
            .by_normalized_code(&normalize_code(code))
    }

    /// Logo path of the project whose title (or name) matches, ignoring case
    ///
    /// Uses the project's `logo`, falling back to its `icon`.
    #[must_use]
    pub fn resolve_project_logo(&self, name: &str) -> Option<String> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        let project = self.view(&self.projects)?.items().iter().find(|p| {
            p.title.to_lowercase() == wanted || p.name.to_lowercase() == wanted
        })?;
        let file = project.logo.as_deref().or(project.icon.as_deref())?;

        Some(AssetSettings::asset_path(&self.assets.project_logo_dir, file))
    }

    /// Company names for `codes`; unknown codes come back unchanged
    #[must_use]
    pub fn resolve_company_names<S: AsRef<str>>(&self, codes: &[S]) -> Vec<String> {
        let snapshot = self.view(&self.experiences);
        codes
            .iter()
            .map(|code| {
                let code = code.as_ref();
                snapshot
                    .and_then(|s| s.by_normalized_code(&normalize_code(code)))
                    .map_or_else(|| code.to_string(), |e| e.company.clone())
            })
            .collect()
    }

    /// Project titles for `names`; unknown names come back unchanged
    #[must_use]
    pub fn resolve_project_titles<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let snapshot = self.view(&self.projects);
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                snapshot
                    .and_then(|s| s.by_normalized_code(&normalize_code(name)))
                    .filter(|p| !p.title.is_empty())
                    .map_or_else(|| name.to_string(), |p| p.title.clone())
            })
            .collect()
    }

    /// Logo path for a company code from the static table
    #[must_use]
    pub fn resolve_company_logo(&self, code: &str) -> Option<String> {
        self.logos.company(code)
    }

    /// Logo path for a technology name from the static table
    #[must_use]
    pub fn resolve_technology_logo(&self, name: &str) -> Option<String> {
        self.logos.technology(name)
    }

    /// Project name → icon path for every project that declares an icon
    #[must_use]
    pub fn get_project_icon_map(&self, projects: &[Project]) -> BTreeMap<String, String> {
        projects
            .iter()
            .filter_map(|p| {
                let icon = p.icon.as_deref().filter(|i| !i.trim().is_empty())?;
                Some((
                    p.name.clone(),
                    AssetSettings::asset_path(&self.assets.project_logo_dir, icon),
                ))
            })
            .collect()
    }

    /// [`Self::get_project_icon_map`] over the loaded projects
    #[must_use]
    pub fn project_icon_map(&self) -> BTreeMap<String, String> {
        self.get_project_icon_map(self.projects())
    }

    /// Overall career span across all experiences
    #[must_use]
    pub fn total_experience(&self) -> String {
        let ranges: Vec<DateRange> = self.experiences().iter().map(Experience::period).collect();
        calculate_duration(&ranges)
    }

    /// Distinct technologies across experiences and projects, first-seen order
    #[must_use]
    pub fn technologies(&self) -> Vec<(String, Option<String>)> {
        let mut seen = HashSet::new();
        self.experiences()
            .iter()
            .flat_map(|e| e.technologies.iter())
            .chain(self.projects().iter().flat_map(|p| p.technologies.iter()))
            .filter(|t| !t.trim().is_empty() && seen.insert(t.trim().to_lowercase()))
            .map(|t| (t.trim().to_string(), self.resolve_technology_logo(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LoadState;
    use crate::source::MemorySource;

    fn portfolio_with(source: MemorySource) -> Portfolio {
        Portfolio::new(Arc::new(source), &Settings::default())
    }

    fn sample() -> MemorySource {
        MemorySource::new()
            .with_file("customers.json", r#"{"items":[{"code":"ERC","name":"Example Research Corp"}]}"#)
            .with_file(
                "experiences.json",
                r#"{"items":[{"code":"erc","company":"Example Research Corp","technologies":["react","Rust"]}]}"#,
            )
            .with_file(
                "projects.json",
                r#"{"items":[
                    {"name":"atlas","title":"Atlas Mapping","logo":"atlas.png","icon":"atlas-icon.png","technologies":["React"]},
                    {"name":"beacon","title":"Beacon","icon":"/cdn/beacon.svg"},
                    {"name":"crate","title":""}
                ]}"#,
            )
    }

    #[tokio::test]
    async fn test_resolvers_before_init_degrade() {
        let portfolio = portfolio_with(sample());

        assert!(portfolio.projects().is_empty());
        assert_eq!(portfolio.resolve_project_logo("Atlas Mapping"), None);
        assert_eq!(portfolio.resolve_company_names(&["ERC"]), vec!["ERC"]);
        assert_eq!(portfolio.resolve_project_titles(&["atlas"]), vec!["atlas"]);
        assert!(portfolio.project_icon_map().is_empty());
        // static tables do not depend on loaded data
        assert!(portfolio.resolve_technology_logo("rust").is_some());
    }

    #[tokio::test]
    async fn test_project_logo_resolution() {
        let portfolio = portfolio_with(sample());
        portfolio.init().await.unwrap();

        assert_eq!(
            portfolio.resolve_project_logo("atlas mapping").as_deref(),
            Some("/assets/files/projects/_logos/atlas.png")
        );
        assert_eq!(portfolio.resolve_project_logo("BEACON").as_deref(), Some("/cdn/beacon.svg"));
        assert_eq!(portfolio.resolve_project_logo("crate"), None);
        assert_eq!(portfolio.resolve_project_logo("unknown"), None);
    }

    #[tokio::test]
    async fn test_identity_fallback_keeps_length_and_order() {
        let portfolio = portfolio_with(sample());
        portfolio.init().await.unwrap();

        assert_eq!(
            portfolio.resolve_company_names(&["zzz", "ERC", "erc"]),
            vec!["zzz", "Example Research Corp", "Example Research Corp"]
        );
        assert_eq!(
            portfolio.resolve_project_titles(&["beacon", "nope", "crate"]),
            vec!["Beacon", "nope", "crate"]
        );
    }

    #[tokio::test]
    async fn test_icon_map() {
        let portfolio = portfolio_with(sample());
        portfolio.init().await.unwrap();

        let icons = portfolio.project_icon_map();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons["atlas"], "/assets/files/projects/_logos/atlas-icon.png");
        assert_eq!(icons["beacon"], "/cdn/beacon.svg");
    }

    #[tokio::test]
    async fn test_technologies_are_distinct() {
        let portfolio = portfolio_with(sample());
        portfolio.init().await.unwrap();

        let techs: Vec<String> = portfolio.technologies().into_iter().map(|(t, _)| t).collect();
        assert_eq!(techs, vec!["react", "Rust"]);
        assert!(portfolio.technologies().iter().all(|(_, logo)| logo.is_some()));
    }

    #[tokio::test]
    async fn test_init_failure_propagates_and_stays_unready() {
        let source = MemorySource::new()
            .with_file("customers.json", r#"{"items":[]}"#)
            .with_file("experiences.json", r#"{"items":[]}"#);
        let portfolio = portfolio_with(source);

        assert!(portfolio.init().await.is_err());
        assert!(!portfolio.is_ready());
        assert!(portfolio.customers().is_empty());
        assert_eq!(portfolio.customer_by_code("ERC"), None);
    }

    #[tokio::test]
    async fn test_init_after_lenient_miss_still_fails() {
        let source = MemorySource::new()
            .with_file("customers.json", r#"{"items":[]}"#)
            .with_file("experiences.json", r#"{"items":[]}"#);
        let portfolio = portfolio_with(source);

        assert!(portfolio.project_repository().get_list().await.is_empty());

        let err = portfolio.init().await.unwrap_err();
        assert!(matches!(err, crate::Error::Unavailable { .. }));
        assert!(!portfolio.is_ready());
        assert!(portfolio.projects().is_empty());
    }

    /// Fails `projects.json` at once; everything else answers after a delay
    struct FailingProjects;

    #[async_trait::async_trait]
    impl Source for FailingProjects {
        async fn fetch(&self, resource: &str) -> Result<Vec<u8>> {
            if resource == "projects.json" {
                return Err(crate::Error::NotFound(resource.to_string()));
            }
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
            Ok(br#"{"items":[]}"#.to_vec())
        }
    }

    #[tokio::test]
    async fn test_failed_init_leaves_sibling_loads_unloaded() {
        let portfolio = Portfolio::new(Arc::new(FailingProjects), &Settings::default());

        assert!(portfolio.init().await.is_err());
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;

        let customers = portfolio.customer_repository();
        assert_eq!(customers.fetch_count(), 1);
        assert_eq!(customers.load_state(), LoadState::Unloaded);
        assert_eq!(portfolio.experience_repository().load_state(), LoadState::Unloaded);

        // the cancelled loads can be retried lazily
        assert!(customers.get_list().await.is_empty());
        assert_eq!(customers.load_state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_second_init_is_a_no_op() {
        let source = Arc::new(sample());
        let portfolio = Portfolio::new(source.clone(), &Settings::default());

        portfolio.init().await.unwrap();
        portfolio.init().await.unwrap();

        assert_eq!(source.fetch_count(), 3);
        assert_eq!(portfolio.customer_by_code("erc").unwrap().name, "Example Research Corp");
    }
}
