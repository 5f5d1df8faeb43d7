//! # Logging
//!
//! `tracing-subscriber` setup. Events go to stderr so command output on
//! stdout stays machine-readable.

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither the environment nor the config sets one.
pub const DEFAULT_FILTER: &str = "tessera=info,tessera_core=info,tessera_manifests=info";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "tessera=debug,tessera_core=debug,tessera_manifests=debug";

/// Verbosity requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// `--quiet` wins over `--verbose`.
    #[must_use]
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Self::Quiet,
            (true, false) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }
}

/// Pick the filter directive.
///
/// `TESSERA_LOG`, then `RUST_LOG`, then the CLI flags, then the config
/// file, then `DEFAULT_FILTER`.
#[must_use]
pub fn filter_directive(config: &LogConfig, verbosity: Verbosity) -> String {
    for var in ["TESSERA_LOG", "RUST_LOG"] {
        if let Ok(value) = std::env::var(var)
            && !value.trim().is_empty()
        {
            return value;
        }
    }
    match verbosity {
        Verbosity::Quiet => "warn".to_string(),
        Verbosity::Verbose => VERBOSE_FILTER.to_string(),
        Verbosity::Normal => config
            .filter
            .clone()
            .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
    }
}

/// Install the global subscriber.
pub fn init(config: &LogConfig, verbosity: Verbosity) {
    let filter = EnvFilter::try_new(filter_directive(config, verbosity))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
