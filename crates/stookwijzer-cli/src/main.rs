//! Stookwijzer command-line client.
//!
//! Wood-burning advice per Dutch postcode area, from the RIVM advisory layer.
//!
//! # Quick Start
//!
//! ```bash
//! # Advice for a postcode
//! stookwijzer postcode 3511
//!
//! # Advice at a coordinate pair
//! stookwijzer check --lat 52.0907 --lon 5.1214
//!
//! # Interactive session
//! stookwijzer watch
//! ```

mod app;
mod commands;
mod render;
mod style;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use stookwijzer::Theme;
use tracing_subscriber::EnvFilter;

/// Stookwijzer - wood-burning advice for your postcode area.
#[derive(Parser)]
#[command(name = "stookwijzer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Extra configuration file, layered above stookwijzer.local.toml.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log lookups and requests to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Check the advice at a coordinate pair.
    Check {
        /// Latitude in degrees (WGS84).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        lat: String,

        /// Longitude in degrees (WGS84).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        lon: String,
    },

    /// Look up a 4-digit postcode (letters after the digits are ignored).
    Postcode {
        /// Postcode, e.g. 3511 or "3511 AB".
        text: String,
    },

    /// Check the advice at the configured location.
    Locate,

    /// Check the advice at the demo location (Utrecht).
    Demo,

    /// Repeat the saved postcode lookup, or locate when none is saved.
    Refresh,

    /// Set the display theme, or toggle it when no theme is given.
    Theme {
        #[arg(value_enum)]
        theme: Option<ThemeArg>,
    },

    /// Interactive session reading postcodes and commands from stdin.
    Watch,

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, json, toml).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the terminal clean unless asked; RUST_LOG still wins.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    if matches!(cli.command, Commands::Version) {
        commands::version::run();
        return Ok(());
    }

    let config = app::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Version => Ok(()),
        Commands::Check { lat, lon } => commands::lookup::check(&config, &lat, &lon),
        Commands::Postcode { text } => commands::lookup::postcode(&config, &text),
        Commands::Locate => commands::lookup::locate(&config),
        Commands::Demo => commands::lookup::demo(&config),
        Commands::Refresh => commands::lookup::refresh(&config),
        Commands::Theme { theme } => commands::theme::run(&config, theme.map(Theme::from)),
        Commands::Watch => commands::watch::run(&config),
        Commands::Config(ConfigCommands::Show { format }) => {
            commands::config::show(&config, &format)
        }
    }
}
