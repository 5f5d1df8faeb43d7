//! # Tessera CLI Module
//!
//! This module implements the CLI interface for Tessera.
//!
//! ## Available Commands
//!
//! - `create manifests` - Resolve the manifest catalog and write it
//! - `graph` - Print the asset dependency graph (DOT)
//! - `hash` - Resolve and print the output checksums
//! - `list` - Resolve and print every asset and file

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tessera_core::TesseraError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tessera - installer asset graph
///
/// Generates interdependent cluster configuration manifests.
/// Each asset is produced exactly once, after its dependencies,
/// and persisted inputs are reused instead of regenerated.
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a tessera.toml config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create installation artifacts
    Create {
        #[command(subcommand)]
        target: CreateTarget,
    },

    /// Print the asset dependency graph in Graphviz DOT format
    Graph,

    /// Resolve the manifests and print their checksums
    Hash {
        /// Asset directory holding install-config.yaml
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Resolve the manifests and list every asset and file
    List {
        /// Asset directory holding install-config.yaml
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Targets of the `create` command.
#[derive(Subcommand, Debug)]
pub enum CreateTarget {
    /// Generate the cluster config manifests
    Manifests {
        /// Asset directory: holds install-config.yaml, receives manifests/
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli, config: &Config) -> Result<(), TesseraError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Create {
            target: CreateTarget::Manifests { dir },
        } => cmd_create_manifests(&config.asset_dir(dir.as_deref()), json_mode),
        Commands::Graph => cmd_graph(json_mode),
        Commands::Hash { dir } => cmd_hash(&config.asset_dir(dir.as_deref()), json_mode),
        Commands::List { dir } => cmd_list(&config.asset_dir(dir.as_deref()), json_mode),
    }
}
