// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Record types stored in the data files
//!
//! Every file is an object with an `items` array. Fields other than the
//! identifying ones are optional so that partially-filled entries still load.

use crate::dates::DateRange;
use crate::repository::Record;
use serde::{Deserialize, Serialize};

/// A client the work was done for (`customers.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Numeric id, if the file assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Short code, e.g. `ERC`
    pub code: String,
    /// Display name
    pub name: String,
    /// Logo file name or absolute path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Public website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Record for Customer {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }
}

/// A position held at a company (`experiences.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Numeric id, if the file assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Company code
    pub code: String,
    /// Company display name
    pub company: String,
    /// Job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Start date (`DD.MM.YYYY` or `YYYY-MM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// End date; absent while ongoing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// City / remote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Technology names as typed in the data
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Project names worked on
    #[serde(default)]
    pub projects: Vec<String>,
}

impl Experience {
    /// The start/end pair of this entry
    #[must_use]
    pub fn period(&self) -> DateRange {
        DateRange {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

impl Record for Experience {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }
}

/// A portfolio project (`projects.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Numeric id, if the file assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Stable project name used as a key elsewhere
    pub name: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Small icon file name or absolute path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Logo file name or absolute path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Customer code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Technology names as typed in the data
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Public link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Record for Project {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn code(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// On-disk shape of every data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The records
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}
