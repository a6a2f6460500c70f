//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <file>`: Use this config file instead of the default lookup
//! - `--path <dir>`: Extra directory of definition files (repeatable)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::{LightExport, Quantize, SampleFilter, VexType};

/// aov - Load, merge, and emit AOV render-pass definitions
#[derive(Parser, Debug)]
#[command(name = "aov")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra directory of definition files, scanned first
    #[arg(long = "path", global = true, value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List discovered definition files
    #[command(
        name = "paths",
        long_about = "List definition files in the order they are merged.\n\n\
            Directories come from --path, the config's search_paths, then each \
            entry of the host path list (HOUDINI_PATH by default) joined with \
            config/aovs. Files within a directory are sorted by name."
    )]
    Paths,

    /// List merged AOVs or groups
    #[command(
        name = "list",
        after_help = "\
EXAMPLES:
    # Every AOV with its type and source file
    aov list

    # Groups and their members
    aov list --groups"
    )]
    List {
        /// List groups instead of AOVs
        #[arg(long)]
        groups: bool,
    },

    /// Show one AOV or @group as JSON
    #[command(name = "info")]
    Info {
        /// AOV variable, or group name prefixed with @
        name: String,
    },

    /// Resolve a compact AOV string to unique AOVs
    #[command(
        name = "resolve",
        after_help = "\
EXAMPLES:
    aov resolve \"N P @diagnostics\"
    aov resolve N,Pz,@lighting"
    )]
    Resolve {
        /// Space or comma separated variables and @groups
        tokens: String,
    },

    /// Check definition files for errors
    #[command(name = "validate")]
    Validate {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Emit plane blocks for a compact AOV string as IFD text
    #[command(
        name = "planes",
        long_about = "Expand AOVs into plane blocks and print them as IFD text.\n\n\
            Component and light exports are expanded against a scene description: \
            a JSON file holding camera parameters and lights. Without --scene the \
            scene is empty, so light exports see no lights.",
        after_help = "\
EXAMPLES:
    aov planes \"N @lighting\" --scene shot.json

    # Use the scene's auto_aovs parameter
    aov planes --auto --scene shot.json"
    )]
    Planes {
        /// Space or comma separated variables and @groups
        #[arg(required_unless_present = "auto")]
        tokens: Option<String>,

        /// Read the AOV string from the scene's auto_aovs parameter
        #[arg(long, conflicts_with = "tokens")]
        auto: bool,

        /// Scene description (JSON)
        #[arg(long, value_name = "FILE")]
        scene: Option<PathBuf>,

        /// Evaluation time
        #[arg(long, default_value_t = 0.0)]
        time: f64,
    },

    /// Add an AOV definition to a file
    #[command(name = "add-aov")]
    AddAov(AddAovArgs),

    /// Add a group definition to a file
    #[command(name = "add-group")]
    AddGroup(AddGroupArgs),

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    aov completion bash >> ~/.bashrc

    # Fish
    aov completion fish > ~/.config/fish/completions/aov.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Fields of a new AOV definition.
#[derive(clap::Args, Debug)]
pub struct AddAovArgs {
    /// Definition file to write; merged into if it exists
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long)]
    pub variable: String,

    #[arg(long)]
    pub vextype: VexType,

    #[arg(long)]
    pub channel: Option<String>,

    #[arg(long)]
    pub quantize: Option<Quantize>,

    #[arg(long)]
    pub sfilter: Option<SampleFilter>,

    #[arg(long)]
    pub pfilter: Option<String>,

    #[arg(long)]
    pub planefile: Option<String>,

    /// Export per-component channels
    #[arg(long)]
    pub componentexport: bool,

    /// Components to export (repeatable)
    #[arg(long = "component", requires = "componentexport")]
    pub components: Vec<String>,

    #[arg(long)]
    pub lightexport: Option<LightExport>,

    #[arg(long, requires = "lightexport")]
    pub lightexport_scope: Option<String>,

    #[arg(long, requires = "lightexport")]
    pub lightexport_select: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,

    #[arg(long)]
    pub priority: Option<i32>,
}

/// Fields of a new group definition.
#[derive(clap::Args, Debug)]
pub struct AddGroupArgs {
    /// Definition file to write; merged into if it exists
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long)]
    pub name: String,

    /// Member AOV variable (repeatable)
    #[arg(long = "include", required = true)]
    pub includes: Vec<String>,

    #[arg(long)]
    pub comment: Option<String>,

    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long)]
    pub priority: Option<i32>,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
