// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod animate;
pub mod completions;
pub mod config;
pub mod duration;
pub mod get;
pub mod list;
pub mod logo;
pub mod resolve;
pub mod search;

use crate::dates::format_period;
use crate::types::{Customer, Experience, Project};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

/// The three data files
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Resource {
    /// customers.json
    Customers,
    /// experiences.json
    Experiences,
    /// projects.json
    Projects,
}

impl Resource {
    /// Plural label for messages
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Experiences => "experiences",
            Self::Projects => "projects",
        }
    }
}

/// How command output is rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Emit JSON instead of text
    pub json: bool,
    /// Use ANSI colours in text output
    pub color: bool,
}

impl Output {
    /// Emphasise `text` when colours are on
    #[must_use]
    pub fn strong(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// De-emphasise `text` when colours are on
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print `value` as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{json}");
        Ok(())
    }
}

/// One-line text summary of a record
pub trait Describe {
    /// Heading shown first
    fn heading(&self) -> String;
    /// Secondary details, may be empty
    fn details(&self) -> String;
}

impl Describe for Customer {
    fn heading(&self) -> String {
        format!("{} [{}]", self.name, self.code)
    }

    fn details(&self) -> String {
        self.website.clone().unwrap_or_default()
    }
}

impl Describe for Experience {
    fn heading(&self) -> String {
        match &self.position {
            Some(position) => format!("{} @ {} [{}]", position, self.company, self.code),
            None => format!("{} [{}]", self.company, self.code),
        }
    }

    fn details(&self) -> String {
        format_period(&self.period())
    }
}

impl Describe for Project {
    fn heading(&self) -> String {
        if self.title.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.title, self.name)
        }
    }

    fn details(&self) -> String {
        self.technologies.join(", ")
    }
}

/// Print records either as JSON or one per line
pub fn print_records<T: Serialize + Describe>(items: &[T], what: &str, out: Output) -> Result<()> {
    if out.json {
        return out.print_json(items);
    }

    if items.is_empty() {
        println!("No {what} found");
        return Ok(());
    }

    for item in items {
        let details = item.details();
        if details.is_empty() {
            println!("  {}", out.strong(&item.heading()));
        } else {
            println!("  {}  {}", out.strong(&item.heading()), out.dim(&details));
        }
    }
    println!();
    println!("{} {}", items.len(), what);
    Ok(())
}
