//! CLI parse: clap types for wrapview. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wrapview CLI - preview a vehicle wrap before you book an installer
#[derive(Parser, Debug)]
#[command(name = "wrapview", version)]
#[command(about = "Vehicle wrap preview configurator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/config.toml)
    #[arg(long, default_value = ".", global = true)]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the built-in demo catalog instead of the catalog service
    #[arg(long, global = true)]
    pub demo: bool,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the wrap palette
    Wraps {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List vehicle makes from the catalog
    Makes {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List models offered for a make
    Models {
        /// Vehicle make, e.g. "Audi"
        make: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a registration (VRM) to a make and model
    Lookup {
        /// Registration as typed, e.g. "ab12 cde"
        registration: String,
    },
    /// Configure a vehicle and wrap, then generate a preview
    Preview {
        /// Vehicle make
        #[arg(long)]
        make: Option<String>,

        /// Vehicle model (must be offered for the make)
        #[arg(long, requires = "make")]
        model: Option<String>,

        /// Registration to resolve before applying --make/--model
        #[arg(long)]
        registration: Option<String>,

        /// Photo of the vehicle to use instead of make/model
        #[arg(long)]
        image: Option<PathBuf>,

        /// Wrap name, e.g. "Gloss Black"
        #[arg(long)]
        wrap: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
