// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! List command - print every record of a data file

use super::{print_records, Output, Resource};
use crate::config::Settings;
use crate::portfolio::Portfolio;
use anyhow::Result;
use tracing::info;

/// Run the list command
pub async fn run(settings: &Settings, resource: Resource, out: Output) -> Result<()> {
    let portfolio = Portfolio::from_settings(settings);
    info!("Listing {}", resource.label());

    match resource {
        Resource::Customers => {
            let items = portfolio.customer_repository().get_list().await;
            print_records(&items, resource.label(), out)
        }
        Resource::Experiences => {
            let items = portfolio.experience_repository().get_list().await;
            print_records(&items, resource.label(), out)
        }
        Resource::Projects => {
            let items = portfolio.project_repository().get_list().await;
            print_records(&items, resource.label(), out)
        }
    }
}
