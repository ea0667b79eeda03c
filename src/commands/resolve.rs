// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Resolve command - map company codes or project names to display names

use super::Output;
use crate::config::Settings;
use crate::portfolio::Portfolio;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// Which cross-reference to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
    /// Company code → company name
    Companies,
    /// Project name → project title
    Projects,
}

/// Run the resolve command
pub async fn run(settings: &Settings, target: Target, keys: &[String], out: Output) -> Result<()> {
    let portfolio = Portfolio::from_settings(settings);
    portfolio
        .init()
        .await
        .context("Failed to load portfolio data")?;

    let resolved = match target {
        Target::Companies => portfolio.resolve_company_names(keys),
        Target::Projects => portfolio.resolve_project_titles(keys),
    };

    if out.json {
        let map: BTreeMap<&str, &str> = keys
            .iter()
            .map(String::as_str)
            .zip(resolved.iter().map(String::as_str))
            .collect();
        return out.print_json(&map);
    }

    for (key, value) in keys.iter().zip(&resolved) {
        if key == value {
            println!("{} {}", key, out.dim("(unresolved)"));
        } else {
            println!("{} -> {}", key, out.strong(value));
        }
    }
    Ok(())
}
