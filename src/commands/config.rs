// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use crate::config::Settings;
use anyhow::{Context, Result};

/// Print the effective configuration, or a single dotted key of it
pub fn run(settings: &Settings, key: Option<&str>) -> Result<()> {
    let value = toml::Value::try_from(settings).context("Failed to serialize settings")?;

    let Some(key) = key else {
        print!("{}", toml::to_string_pretty(&value)?);
        return Ok(());
    };

    let found = key
        .split('.')
        .try_fold(&value, |v, part| v.get(part))
        .ok_or_else(|| anyhow::anyhow!("Unknown config key: {}", key))?;

    match found {
        toml::Value::String(s) => println!("{s}"),
        toml::Value::Table(_) => print!("{}", toml::to_string_pretty(found)?),
        other => println!("{other}"),
    }
    Ok(())
}
