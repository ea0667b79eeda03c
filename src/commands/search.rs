// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Search command - case-insensitive substring search over a data file

use super::{print_records, Output, Resource};
use crate::config::Settings;
use crate::portfolio::Portfolio;
use anyhow::Result;
use tracing::info;

/// Run the search command
pub async fn run(
    settings: &Settings,
    resource: Resource,
    query: &str,
    fields: &[String],
    out: Output,
) -> Result<()> {
    let portfolio = Portfolio::from_settings(settings);
    let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    let fields = (!field_refs.is_empty()).then_some(field_refs.as_slice());

    info!("Searching {} for {:?}", resource.label(), query);

    match resource {
        Resource::Customers => {
            let hits = portfolio.customer_repository().search(query, fields).await;
            print_records(&hits, resource.label(), out)
        }
        Resource::Experiences => {
            let hits = portfolio.experience_repository().search(query, fields).await;
            print_records(&hits, resource.label(), out)
        }
        Resource::Projects => {
            let hits = portfolio.project_repository().search(query, fields).await;
            print_records(&hits, resource.label(), out)
        }
    }
}
