//! # File Set Aggregator
//!
//! Flattens the files of every writable asset in a materialized graph into
//! one deterministic list.
//!
//! - Order: resolution order (dependencies first), then each asset's own
//!   `files()` order.
//! - Every path must stay inside the output root.
//! - A path claimed twice is a configuration error naming both owners.
//!   Nothing is ever silently overwritten.

use crate::primitives::{CHECKSUM_OFFSET_BASIS, CHECKSUM_PRIME};
use crate::resolver::Materialized;
use crate::{File, TesseraError};
use std::collections::BTreeMap;

/// The aggregated output of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<File>,
    /// path -> name of the owning asset
    owners: BTreeMap<String, String>,
}

impl FileSet {
    /// Collect the files of every writable asset in `graph`.
    pub fn collect(graph: &Materialized) -> Result<Self, TesseraError> {
        let mut set = Self::default();

        for (record, asset) in graph.assets() {
            let Some(writable) = asset.as_writable() else {
                continue;
            };
            for file in writable.files() {
                set.push(&record.name, file.clone())?;
            }
        }

        tracing::debug!(files = set.len(), "aggregated file set");
        Ok(set)
    }

    /// Add one file owned by `owner`, enforcing path rules.
    pub fn push(&mut self, owner: &str, file: File) -> Result<(), TesseraError> {
        file.validate_path()
            .map_err(|reason| TesseraError::InvalidPath {
                asset: owner.to_string(),
                path: file.path.clone(),
                reason: reason.to_string(),
            })?;

        if let Some(first) = self.owners.get(&file.path) {
            return Err(TesseraError::PathCollision {
                path: file.path.clone(),
                first: first.clone(),
                second: owner.to_string(),
            });
        }

        self.owners.insert(file.path.clone(), owner.to_string());
        self.files.push(file);
        Ok(())
    }

    /// Files in aggregation order.
    #[must_use]
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Name of the asset that produced `path`.
    #[must_use]
    pub fn owner(&self, path: &str) -> Option<&str> {
        self.owners.get(path).map(String::as_str)
    }

    /// Look up a file by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&File> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total content size in bytes.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(File::len).sum()
    }

    /// Deterministic FNV-1a checksum over paths and contents, in order.
    ///
    /// Two passes over identical inputs produce identical checksums.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hash = CHECKSUM_OFFSET_BASIS;
        for chunk in self.canonical_chunks() {
            for byte in chunk.iter() {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(CHECKSUM_PRIME);
            }
        }
        hash
    }

    /// BLAKE3 hash over the same canonical stream as `checksum`.
    ///
    /// This function is only available with the `crypto-hash` feature enabled.
    #[cfg(feature = "crypto-hash")]
    #[must_use]
    pub fn blake3_hex(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for chunk in self.canonical_chunks() {
            hasher.update(&chunk);
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Length-prefixed stream: for each file, path, 0, length (LE), data.
    fn canonical_chunks(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        self.files.iter().map(|file| {
            let mut chunk = Vec::with_capacity(file.path.len() + 9 + file.data.len());
            chunk.extend_from_slice(file.path.as_bytes());
            chunk.push(0);
            chunk.extend_from_slice(&(file.data.len() as u64).to_le_bytes());
            chunk.extend_from_slice(&file.data);
            chunk
        })
    }
}

impl IntoIterator for FileSet {
    type Item = File;
    type IntoIter = std::vec::IntoIter<File>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
