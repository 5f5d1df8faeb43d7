//! # Tessera
//!
//! Generates cluster configuration manifests from `install-config.yaml`.
//!
//! ## Usage
//!
//! ```bash
//! # Write manifests/ next to install-config.yaml
//! tessera create manifests --dir ./cluster
//!
//! # Inspect without writing
//! tessera list --dir ./cluster
//! tessera hash --dir ./cluster --json-mode
//!
//! # Render the asset graph
//! tessera graph | dot -Tsvg > assets.svg
//! ```

use clap::Parser;
use tessera::cli;
use tessera::config::{Config, LogConfig};
use tessera::logging::{self, Verbosity};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();
    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);

    // Logging needs the config; a broken config is reported with defaults.
    let config = Config::load_or_default(cli.config.as_deref());
    match &config {
        Ok(config) => logging::init(&config.log, verbosity),
        Err(_) => logging::init(&LogConfig::default(), verbosity),
    }

    let result = config.and_then(|config| cli::execute(cli, &config));
    if let Err(e) = result {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
