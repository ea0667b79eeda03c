// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Logo command - resolve a logo path for a technology, company or project

use super::Output;
use crate::config::Settings;
use crate::portfolio::Portfolio;
use anyhow::{Context, Result};

/// What kind of name is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogoKind {
    /// Free-form technology name
    Tech,
    /// Company code
    Company,
    /// Project title or name
    Project,
}

/// Run the logo command
pub async fn run(settings: &Settings, kind: LogoKind, name: &str, out: Output) -> Result<()> {
    let portfolio = Portfolio::from_settings(settings);

    let path = match kind {
        LogoKind::Tech => portfolio.resolve_technology_logo(name),
        LogoKind::Company => portfolio.resolve_company_logo(name),
        LogoKind::Project => {
            portfolio
                .init()
                .await
                .context("Failed to load portfolio data")?;
            portfolio.resolve_project_logo(name)
        }
    };

    if out.json {
        return out.print_json(&serde_json::json!({ "name": name, "logo": path }));
    }

    match path {
        Some(p) => {
            println!("{p}");
            Ok(())
        }
        None => anyhow::bail!("No logo for {:?}", name),
    }
}
