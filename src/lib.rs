// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Folio library - data and animation core for a portfolio / CV site
//!
//! This crate loads the site's static JSON data (customers, experiences,
//! projects) through cached, single-flight repositories, resolves names and
//! logo paths across them, and drives the cursor-reactive particle
//! background.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod commands;
pub mod config;
pub mod dates;
pub mod error;
pub mod logos;
pub mod portfolio;
pub mod repository;
pub mod source;
pub mod types;

pub use error::{Error, Result};

/// Prelude for common imports
pub mod prelude {
    pub use crate::animation::{Engine, Frame, Input, Particle};
    pub use crate::config::Settings;
    pub use crate::dates::{calculate_duration, parse_date, DateRange};
    pub use crate::portfolio::Portfolio;
    pub use crate::repository::{Key, Record, Repository};
    pub use crate::source::{DirSource, HttpSource, MemorySource, Source};
    pub use crate::types::*;
    pub use crate::{Error, Result};
}
