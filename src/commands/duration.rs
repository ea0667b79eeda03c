// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Duration command - total span of one or more date ranges

use super::Output;
use crate::config::Settings;
use crate::dates::{calculate_duration, format_period, DateRange};
use crate::portfolio::Portfolio;
use anyhow::{Context, Result};

/// Parse `START[:END]`
#[must_use]
pub fn parse_range(text: &str) -> DateRange {
    match text.split_once(':') {
        Some((start, end)) => DateRange::new(start, Some(end).filter(|e| !e.trim().is_empty())),
        None => DateRange::new(text, None),
    }
}

/// Run the duration command
///
/// With no ranges, uses every experience in the configured data.
pub async fn run(settings: &Settings, specs: &[String], out: Output) -> Result<()> {
    let ranges: Vec<DateRange> = if specs.is_empty() {
        let portfolio = Portfolio::from_settings(settings);
        portfolio
            .init()
            .await
            .context("Failed to load portfolio data")?;
        portfolio.experiences().iter().map(|e| e.period()).collect()
    } else {
        specs.iter().map(|s| parse_range(s)).collect()
    };

    let total = calculate_duration(&ranges);

    if out.json {
        let periods: Vec<String> = ranges.iter().map(format_period).collect();
        return out.print_json(&serde_json::json!({ "total": total, "periods": periods }));
    }

    for range in &ranges {
        let period = format_period(range);
        if period.is_empty() {
            println!("  {}", out.dim("(unparseable)"));
        } else {
            println!("  {period}");
        }
    }
    if total.is_empty() {
        println!("Total: {}", out.dim("none"));
    } else {
        println!("Total: {}", out.strong(&total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("2020-01:2021-01"), DateRange::new("2020-01", Some("2021-01")));
        assert_eq!(parse_range("01.02.2020"), DateRange::new("01.02.2020", None));
        assert_eq!(parse_range("2020-01:"), DateRange::new("2020-01", None));
    }
}
