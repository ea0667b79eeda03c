// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Folio CLI - query portfolio data and run the particle background headlessly

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use folio::commands::{self, animate::AnimateOptions, logo::LogoKind, resolve::Target, Output, Resource};
use folio::config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "FOLIO_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Directory holding the JSON data files
    #[arg(long, env = "FOLIO_DATA_DIR", global = true)]
    data_dir: Option<std::path::PathBuf>,

    /// Base URL to fetch the JSON data files from
    #[arg(long, env = "FOLIO_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every record of a data file
    List {
        /// Which file
        #[arg(value_enum)]
        resource: Resource,
    },

    /// Show one record by id, position or code
    Get {
        /// Which file
        #[arg(value_enum)]
        resource: Resource,

        /// Numeric id / position, or a code
        key: String,
    },

    /// Case-insensitive substring search
    Search {
        /// Which file
        #[arg(value_enum)]
        resource: Resource,

        /// Text to look for (empty matches everything)
        query: String,

        /// Restrict the search to these fields
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Resolve a logo path
    Logo {
        /// Kind of name
        #[arg(value_enum)]
        kind: LogoKind,

        /// Technology name, company code or project title
        name: String,
    },

    /// Map company codes or project names to display names
    Resolve {
        /// Which cross-reference
        #[arg(value_enum)]
        target: Target,

        /// Keys to resolve
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Total span of date ranges (START[:END]); defaults to all experiences
    Duration {
        /// Ranges such as 01.03.2019:2021-06
        ranges: Vec<String>,
    },

    /// Run the particle background without a display
    Animate {
        /// Frames to simulate
        #[arg(long, default_value_t = 120)]
        frames: u64,

        /// Viewport width
        #[arg(long, default_value_t = 1280.0)]
        width: f64,

        /// Viewport height
        #[arg(long, default_value_t = 720.0)]
        height: f64,

        /// Pointer position X,Y
        #[arg(long, value_parser = commands::animate::parse_point)]
        pointer: Option<(f64, f64)>,

        /// Click position X,Y (repeatable)
        #[arg(long = "click", value_parser = commands::animate::parse_point)]
        clicks: Vec<(f64, f64)>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Use the timed frame loop
        #[arg(long)]
        realtime: bool,
    },

    /// Show effective configuration
    Config {
        /// Dotted key, e.g. animation.burst_count
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        settings.data.dir = dir;
    }
    if let Some(url) = cli.base_url {
        settings.data.base_url = Some(url);
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => settings.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let out = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::List { resource } => commands::list::run(&settings, resource, out).await,
        Commands::Get { resource, key } => commands::get::run(&settings, resource, &key, out).await,
        Commands::Search { resource, query, fields } => {
            commands::search::run(&settings, resource, &query, &fields, out).await
        }
        Commands::Logo { kind, name } => commands::logo::run(&settings, kind, &name, out).await,
        Commands::Resolve { target, keys } => {
            commands::resolve::run(&settings, target, &keys, out).await
        }
        Commands::Duration { ranges } => commands::duration::run(&settings, &ranges, out).await,
        Commands::Animate { frames, width, height, pointer, clicks, seed, realtime } => {
            let opts = AnimateOptions { frames, width, height, pointer, clicks, seed, realtime };
            commands::animate::run(&settings, opts, out).await
        }
        Commands::Config { key } => commands::config::run(&settings, key.as_deref()),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
