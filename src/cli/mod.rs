//! cli
//!
//! Command-line interface layer for aovkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Load configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers build a [`crate::manager::Session`] from
//! the [`Context`] and call into the library; they own formatting only.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::manager::Session;
use crate::ui::output::{self, Verbosity};

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "AOV_LOG";

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Extra definition directories, scanned first.
    pub paths: Vec<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Load configuration, honoring `--config` and `--path`.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))?,
            None => {
                let result = Config::load().context("Failed to load config")?;
                for warning in &result.warnings {
                    output::warn(
                        format!("{} ({})", warning.message, warning.path.display()),
                        self.verbosity(),
                    );
                }
                result.config
            }
        };

        config.prepend_search_paths(self.paths.iter().cloned());
        Ok(config)
    }

    /// A session over the configured search paths, loaded on first use.
    pub fn session(&self) -> Result<Session> {
        Ok(Session::new(self.load_config()?))
    }
}

/// Install the fmt subscriber.
///
/// `AOV_LOG` takes precedence; otherwise `--debug` and `--quiet` pick the level.
pub fn init_logging(debug: bool, quiet: bool) {
    let default = if debug {
        "aovkit=debug"
    } else if quiet {
        "aovkit=error"
    } else {
        "aovkit=warn"
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet);

    let ctx = Context {
        config: cli.config.clone(),
        paths: cli.paths.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
