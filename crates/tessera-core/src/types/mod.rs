//! # Core Type Definitions
//!
//! This module contains the data model shared by every part of the engine:
//! - Asset identity (`AssetId`)
//! - Produced output (`File`)
//! - Materialization bookkeeping (`Outcome`, `Record`)
//! - Error types (`TesseraError`, `AssetError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they key a `BTreeMap`/`BTreeSet`
//! - Carry no hidden state that could differ between two identical passes

use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use thiserror::Error;

// =============================================================================
// ASSET IDENTITY
// =============================================================================

/// Identity of an asset variant.
///
/// Two asset instances are "the same asset" when they share a concrete Rust
/// type. The type name is carried only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId {
    type_id: TypeId,
    type_name: &'static str,
}

impl AssetId {
    /// Identity of the asset type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub(crate) const fn from_parts(type_id: TypeId, type_name: &'static str) -> Self {
        Self {
            type_id,
            type_name,
        }
    }

    /// Fully qualified Rust type name of the variant.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path (`InstallConfig` rather than
    /// `tessera_manifests::install_config::InstallConfig`).
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self
            .type_name
            .split('<')
            .next()
            .unwrap_or(self.type_name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// A produced (or persisted) file: a logical destination path relative to
/// the output root, and its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct File {
    /// `/`-separated path relative to the output root.
    pub path: String,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl File {
    /// Create a new file.
    #[must_use]
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }

    /// Destination path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check that the destination path stays inside the output root.
    pub fn validate_path(&self) -> Result<(), &'static str> {
        validate_relative_path(&self.path)
    }
}

/// Validate a logical, `/`-separated path relative to the output root.
///
/// Rejected:
/// - empty paths
/// - absolute paths (`/etc/x`, `C:/x`)
/// - backslash separators
/// - empty, `.` or `..` components
pub fn validate_relative_path(path: &str) -> Result<(), &'static str> {
    if path.is_empty() {
        return Err("path is empty");
    }
    if path.starts_with('/') {
        return Err("path is absolute");
    }
    if path.contains('\\') {
        return Err("path must use '/' separators");
    }
    // Drive prefix: `C:` alone or `C:/...`
    let bytes = path.as_bytes();
    if bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && bytes.get(2).is_none_or(|&b| b == b'/')
    {
        return Err("path is absolute");
    }
    for component in path.split('/') {
        match component {
            "" => return Err("path has an empty component"),
            "." | ".." => return Err("path has a relative component"),
            _ => {}
        }
    }
    Ok(())
}

// =============================================================================
// MATERIALIZATION RECORD
// =============================================================================

/// How an asset reached its final state during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Reconstructed from persisted state through the file fetcher.
    Loaded,
    /// Computed from its materialized dependencies.
    Generated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => f.write_str("loaded"),
            Self::Generated => f.write_str("generated"),
        }
    }
}

/// Per-asset materialization record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Identity of the materialized variant.
    pub id: AssetId,
    /// Human-readable asset name.
    pub name: String,
    /// Whether the asset was loaded or generated.
    pub outcome: Outcome,
    /// 0-based position in resolution order (dependencies first).
    pub sequence: usize,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Cause type returned by asset implementations from `load` and `generate`.
pub type AssetError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during a resolution pass.
///
/// - No silent failures
/// - A pass returns exactly one error naming the asset that caused it
/// - Configuration errors (cycles, collisions, bad paths) indicate broken
///   asset wiring, never bad user input
#[derive(Debug, Error)]
pub enum TesseraError {
    /// An asset depends on itself, directly or transitively.
    #[error("dependency cycle detected: {}", .chain.join(" -> "))]
    Cycle {
        /// Asset names along the cycle, closing on the repeated asset.
        chain: Vec<String>,
    },

    /// An asset declares the same dependency twice.
    #[error("asset \"{asset}\" declares dependency \"{dependency}\" more than once")]
    DuplicateDependency { asset: String, dependency: String },

    /// The dependency chain is deeper than the engine allows.
    #[error("dependency chain exceeds {limit} levels at asset \"{asset}\"")]
    DepthExceeded { asset: String, limit: usize },

    /// Two assets claim the same destination path.
    #[error("assets \"{first}\" and \"{second}\" both write \"{path}\"")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    /// An asset produced a file whose path escapes the output root.
    #[error("asset \"{asset}\" produced invalid path \"{path}\": {reason}")]
    InvalidPath {
        asset: String,
        path: String,
        reason: String,
    },

    /// Persisted state exists for an asset but could not be used.
    #[error("failed to load asset \"{asset}\": {source}")]
    Load {
        asset: String,
        #[source]
        source: AssetError,
    },

    /// An asset failed to compute its output.
    #[error("failed to generate asset \"{asset}\": {source}")]
    Generate {
        asset: String,
        #[source]
        source: AssetError,
    },

    /// The file fetcher could not read persisted state.
    #[error("failed to fetch \"{path}\": {reason}")]
    Fetch { path: String, reason: String },

    /// An I/O error occurred while writing output.
    #[error("I/O error: {0}")]
    Io(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TesseraError {
    /// True for errors caused by asset wiring rather than by state or input.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Cycle { .. }
                | Self::DuplicateDependency { .. }
                | Self::DepthExceeded { .. }
                | Self::PathCollision { .. }
                | Self::InvalidPath { .. }
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
