// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Static logo tables for technologies and companies
//!
//! Technology names in the data are typed by hand ("ReactJS", "react",
//! "Postgres"), so technology lookup falls back through progressively looser
//! matches. Tables are slices, not hash maps: iteration order is insertion
//! order, which decides the winner when a loose match is ambiguous.

use crate::config::AssetSettings;

/// Technology name → logo file
pub static TECHNOLOGY_LOGOS: &[(&str, &str)] = &[
    ("React", "react.png"),
    ("React Native", "react_native.png"),
    ("Angular", "angular.png"),
    ("AngularJS", "angularjs.png"),
    ("Vue.js", "vue.png"),
    ("TypeScript", "typescript.png"),
    ("JavaScript", "javascript.png"),
    ("Node.js", "nodejs.png"),
    ("Java", "java.png"),
    ("Spring Boot", "spring.png"),
    ("Kotlin", "kotlin.png"),
    ("ASP.NET", "dotnet.png"),
    (".NET Core", "dotnet.png"),
    ("C#", "csharp.png"),
    ("Python", "python.png"),
    ("Django", "django.png"),
    ("Rust", "rust.png"),
    ("Golang", "go.png"),
    ("Docker", "docker.png"),
    ("Kubernetes", "kubernetes.png"),
    ("PostgreSQL", "postgresql.png"),
    ("MySQL", "mysql.png"),
    ("MongoDB", "mongodb.png"),
    ("Redis", "redis.png"),
    ("GraphQL", "graphql.png"),
    ("AWS", "aws.png"),
    ("Azure", "azure.png"),
    ("Git", "git.png"),
    ("Jenkins", "jenkins.png"),
    ("HTML5", "html5.png"),
    ("CSS3", "css3.png"),
    ("Sass", "sass.png"),
    ("Webpack", "webpack.png"),
    ("Linux", "linux.png"),
];

/// Company code → logo file
pub static COMPANY_LOGOS: &[(&str, &str)] = &[
    ("ERC", "erc.png"),
    ("EPAM", "epam.png"),
    ("LUXOFT", "luxoft.png"),
    ("GLOBALLOGIC", "globallogic.png"),
    ("SOFTSERVE", "softserve.png"),
    ("SIEMENS", "siemens.png"),
    ("BOSCH", "bosch.png"),
    ("SAP", "sap.png"),
    ("FREELANCE", "freelance.png"),
];

/// An ordered name → file table
#[derive(Debug, Clone, Copy)]
pub struct LogoTable {
    entries: &'static [(&'static str, &'static str)],
}

impl LogoTable {
    /// Wrap a static slice
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Exact key match
    #[must_use]
    pub fn exact(&self, key: &str) -> Option<&'static str> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, f)| *f)
    }

    /// Case-insensitive key match
    #[must_use]
    pub fn ignore_case(&self, key: &str) -> Option<&'static str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| k.to_lowercase() == key)
            .map(|(_, f)| *f)
    }

    /// First key that contains `key` or is contained in it, ignoring case
    #[must_use]
    pub fn partial(&self, key: &str) -> Option<&'static str> {
        let key = key.to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(k, _)| {
                let k = k.to_lowercase();
                k.contains(&key) || key.contains(&k)
            })
            .map(|(_, f)| *f)
    }

    /// Exact, then case-insensitive, then partial; first hit wins
    #[must_use]
    pub fn fuzzy(&self, key: &str) -> Option<&'static str> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.exact(key)
            .or_else(|| self.ignore_case(key))
            .or_else(|| self.partial(key))
    }
}

/// Builds asset paths from the static tables
#[derive(Debug, Clone)]
pub struct LogoResolver {
    assets: AssetSettings,
    technologies: LogoTable,
    companies: LogoTable,
}

impl Default for LogoResolver {
    fn default() -> Self {
        Self::new(AssetSettings::default())
    }
}

impl LogoResolver {
    /// Resolver over the built-in tables
    #[must_use]
    pub fn new(assets: AssetSettings) -> Self {
        Self {
            assets,
            technologies: LogoTable::new(TECHNOLOGY_LOGOS),
            companies: LogoTable::new(COMPANY_LOGOS),
        }
    }

    /// Logo path for a free-form technology name
    #[must_use]
    pub fn technology(&self, name: &str) -> Option<String> {
        let file = self.technologies.fuzzy(name)?;
        tracing::trace!("Technology {:?} -> {}", name, file);
        Some(AssetSettings::asset_path(&self.assets.technology_logo_dir, file))
    }

    /// Logo path for a company code (case-insensitive, trimmed)
    #[must_use]
    pub fn company(&self, code: &str) -> Option<String> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let file = self.companies.ignore_case(code)?;
        Some(AssetSettings::asset_path(&self.assets.company_logo_dir, file))
    }
}
