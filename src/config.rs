// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `FOLIO_*` environment variables (`__` separates nested keys, e.g.
//! `FOLIO_DATA__BASE_URL`).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Where the JSON data files live
    pub data: DataSettings,
    /// Asset directories used when building logo paths
    pub assets: AssetSettings,
    /// Background animation constants
    pub animation: AnimationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data: DataSettings::default(),
            assets: AssetSettings::default(),
            animation: AnimationSettings::default(),
        }
    }
}

/// Location of the data files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Remote base URL; when set, files are fetched over HTTP
    pub base_url: Option<String>,
    /// Local directory used when no base URL is configured
    pub dir: PathBuf,
    /// Customers file name
    pub customers: String,
    /// Experiences file name
    pub experiences: String,
    /// Projects file name
    pub projects: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            dir: PathBuf::from("public/data"),
            customers: "customers.json".to_string(),
            experiences: "experiences.json".to_string(),
            projects: "projects.json".to_string(),
        }
    }
}

/// Canonical asset directories for produced logo paths
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Company logos
    pub company_logo_dir: String,
    /// Technology logos
    pub technology_logo_dir: String,
    /// Project logos and icons
    pub project_logo_dir: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            company_logo_dir: "/assets/logos/companies".to_string(),
            technology_logo_dir: "/assets/logos/technologies/small_50x50".to_string(),
            project_logo_dir: "/assets/files/projects/_logos".to_string(),
        }
    }
}

impl AssetSettings {
    /// Prefix a relative file name with `dir`; absolute paths pass through
    #[must_use]
    pub fn asset_path(dir: &str, file: &str) -> String {
        if file.starts_with('/') {
            file.to_string()
        } else {
            format!("{}/{}", dir.trim_end_matches('/'), file)
        }
    }
}

/// Half-open numeric range used for random draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl Span {
    /// Build a span
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Constants for the background particle simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Number of ambient particles created at construction
    pub ambient_count: usize,
    /// Ambient particle size range
    pub ambient_size: Span,
    /// Ambient particle opacity range
    pub ambient_opacity: Span,
    /// Ambient particle hue range in degrees
    pub ambient_hue: Span,
    /// Numerator of the inverse-distance attraction force
    pub attraction: f64,
    /// Upper bound on the attraction force
    pub attraction_cap: f64,
    /// Velocity multiplier applied to ambient particles each frame
    pub friction: f64,
    /// Burst particles spawned per click
    pub burst_count: usize,
    /// Initial burst speed range
    pub burst_speed: Span,
    /// Burst particle size range
    pub burst_size: Span,
    /// Frames a burst particle lives
    pub burst_lifetime: u32,
    /// Velocity multiplier applied to burst particles each frame
    pub burst_velocity_damping: f64,
    /// Opacity multiplier applied to burst particles each frame
    pub burst_opacity_damping: f64,
    /// Delay between frames in milliseconds
    pub frame_interval_ms: u64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            ambient_count: 80,
            ambient_size: Span::new(1.0, 3.0),
            ambient_opacity: Span::new(0.2, 0.7),
            ambient_hue: Span::new(190.0, 260.0),
            attraction: 40.0,
            attraction_cap: 0.4,
            friction: 0.96,
            burst_count: 30,
            burst_speed: Span::new(2.0, 7.0),
            burst_size: Span::new(1.5, 4.0),
            burst_lifetime: 60,
            burst_velocity_damping: 0.95,
            burst_opacity_damping: 0.96,
            frame_interval_ms: 16,
        }
    }
}

/// Default config file location (`<config dir>/folio/config.toml`)
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "hyperpolymath", "folio")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from defaults, an optional file, and the environment
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let defaults = config::Config::try_from(&Settings::default())?;
    let mut builder = config::Config::builder().add_source(defaults);

    match path {
        Some(p) => {
            builder = builder.add_source(config::File::from(p).required(true));
        }
        None => {
            if let Some(p) = default_path() {
                builder = builder.add_source(config::File::from(p).required(false));
            }
        }
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    tracing::debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_asset_path_prefixes_relative() {
        assert_eq!(
            AssetSettings::asset_path("/assets/logos/companies", "erc.png"),
            "/assets/logos/companies/erc.png"
        );
        assert_eq!(
            AssetSettings::asset_path("/assets/logos/companies/", "erc.png"),
            "/assets/logos/companies/erc.png"
        );
    }

    #[test]
    fn test_asset_path_keeps_absolute() {
        assert_eq!(
            AssetSettings::asset_path("/assets/x", "/cdn/logo.svg"),
            "/cdn/logo.svg"
        );
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "log_level = \"debug\"\n[data]\ndir = \"/srv/data\"\n[animation]\nburst_count = 5"
        )
        .unwrap();

        let settings = load(Some(file.path())).unwrap();

        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.data.dir, PathBuf::from("/srv/data"));
        assert_eq!(settings.data.projects, "projects.json");
        assert_eq!(settings.animation.burst_count, 5);
        assert_eq!(settings.animation.ambient_count, 80);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
