// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for data loading and configuration

use thiserror::Error;

/// Errors produced while fetching or decoding data resources
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Failed to fetch {resource}: HTTP {status}")]
    Status {
        /// Resource name that was requested
        resource: String,
        /// Status code returned
        status: u16,
    },

    /// Resource does not exist in the source
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource body was not valid JSON of the expected shape
    #[error("Failed to parse {resource}: {source}")]
    Json {
        /// Resource name that failed to decode
        resource: String,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// An earlier load failed and the empty fallback is cached
    #[error("{resource} is unavailable: {reason}")]
    Unavailable {
        /// Resource name
        resource: String,
        /// Message of the original failure
        reason: String,
    },

    /// Settings could not be assembled
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;
