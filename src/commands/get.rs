// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Get command - fetch one record by id, position or code

use super::{print_records, Output, Resource};
use crate::config::Settings;
use crate::portfolio::Portfolio;
use crate::repository::{Key, Record, Repository};
use anyhow::Result;
use serde::Serialize;

/// Run the get command
pub async fn run(settings: &Settings, resource: Resource, key: &str, out: Output) -> Result<()> {
    let portfolio = Portfolio::from_settings(settings);

    match resource {
        Resource::Customers => show(portfolio.customer_repository(), resource, key, out).await,
        Resource::Experiences => show(portfolio.experience_repository(), resource, key, out).await,
        Resource::Projects => show(portfolio.project_repository(), resource, key, out).await,
    }
}

async fn show<T>(repo: &Repository<T>, resource: Resource, key: &str, out: Output) -> Result<()>
where
    T: Record + super::Describe + Serialize,
{
    let Some(item) = repo.get_by_id(Key::from(key)).await else {
        anyhow::bail!("No {} entry matches {:?}", resource.label(), key);
    };

    if out.json {
        out.print_json(&item)
    } else {
        print_records(std::slice::from_ref(&item), resource.label(), out)
    }
}
