//! CLI command definitions and dispatch for the `fstore` binary.
//!
//! Uses clap derive macros for argument parsing. Every command is a pure
//! path inspection; none of them touch stored data.

pub mod config;
pub mod path;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use filestorage_types::path::StorageName;

use crate::state::AppState;

/// Inspect and validate namespaced storage paths.
#[derive(Parser)]
#[command(name = "fstore", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Write log lines to stderr as JSON objects.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Data directory holding config.toml.
    #[arg(long, global = true, env = "FILESTORAGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Qualify a path with a storage namespace.
    Path {
        /// Path to qualify (e.g. /dashboards/xyz).
        path: String,

        /// Storage namespace.
        #[arg(long, short, default_value = "grafanads")]
        storage: StorageName,
    },

    /// Check whether a qualified path belongs to a storage namespace.
    Belongs {
        /// Qualified path (e.g. grafanads/dashboards/xyz).
        path: String,

        /// Storage namespace.
        #[arg(long, short, default_value = "grafanads")]
        storage: StorageName,

        /// Match on whole path segments instead of a raw string prefix.
        #[arg(long)]
        segment: bool,
    },

    /// Validate one or more canonical paths.
    Validate {
        /// Paths to validate.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Check a path against a set of allowed prefixes.
    Allowed {
        /// Path to check.
        path: String,

        /// Allowed prefix (repeatable). No prefixes allows everything.
        #[arg(long = "prefix", short)]
        prefixes: Vec<String>,

        /// Match on whole path segments instead of a raw string prefix.
        #[arg(long)]
        segment: bool,
    },

    /// Resolve a qualified path to its namespace and backend path.
    Route {
        /// Qualified path (e.g. grafanads/dashboards/xyz).
        path: String,
    },

    /// Show the effective storage configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Dispatch a command that needs loaded state.
pub fn run(command: Commands, state: &AppState, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Path { path, storage } => path::qualify(&path, storage, json),
        Commands::Belongs {
            path,
            storage,
            segment,
        } => path::belongs(state, &path, storage, segment, json),
        Commands::Validate { paths } => path::validate(state, &paths, json),
        Commands::Allowed {
            path,
            prefixes,
            segment,
        } => path::allowed(state, &path, prefixes, segment, json),
        Commands::Route { path } => path::route(state, &path, json),
        Commands::Config => config::show(state, json),
        Commands::Completions { .. } => unreachable!("handled in main"),
    }
}
