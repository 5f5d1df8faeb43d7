//! # Tessera
//!
//! The command-line front end of the Tessera asset graph.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/tessera (THE BINARY)             │
//! │                                                      │
//! │   ┌─────────────┐   ┌──────────────┐   ┌─────────┐   │
//! │   │    CLI      │   │    Config    │   │ Logging │   │
//! │   │   (clap)    │   │ (tessera.toml│   │(tracing)│   │
//! │   └──────┬──────┘   └──────┬───────┘   └────┬────┘   │
//! │          └─────────────────┼────────────────┘        │
//! │                            ▼                         │
//! │     ┌───────────────────┐     ┌────────────────┐     │
//! │     │ tessera-manifests │ ──▶ │  tessera-core  │     │
//! │     │   (THE CATALOG)   │     │  (THE ENGINE)  │     │
//! │     └───────────────────┘     └────────────────┘     │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod logging;
