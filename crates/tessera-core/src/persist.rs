//! # Persistence
//!
//! Writing an aggregated file set to an output directory, and the
//! diagnostic state report that accompanies it.
//!
//! Files are written atomically: content goes to a temporary file in the
//! destination directory which is then renamed into place. A reader never
//! observes a half-written manifest.

use crate::aggregate::FileSet;
use crate::primitives::{STATE_FILE_NAME, STATE_FORMAT_VERSION};
use crate::resolver::Materialized;
use crate::{File, Outcome, TesseraError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// =============================================================================
// FILE WRITING
// =============================================================================

/// Resolve a logical path under `root`.
fn destination(root: &Path, logical: &str) -> PathBuf {
    logical
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Atomically write `data` to `dest`, creating parent directories.
pub fn write_atomic(dest: &Path, data: &[u8]) -> Result<(), TesseraError> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| TesseraError::Io(format!("create {}: {}", dir.display(), e)))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| TesseraError::Io(format!("temp file in {}: {}", dir.display(), e)))?;
    tmp.write_all(data)
        .map_err(|e| TesseraError::Io(format!("write {}: {}", dest.display(), e)))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| TesseraError::Io(format!("sync {}: {}", dest.display(), e)))?;
    tmp.persist(dest)
        .map_err(|e| TesseraError::Io(format!("persist {}: {}", dest.display(), e.error)))?;
    Ok(())
}

/// Write one file under `root`.
pub fn write_file(root: &Path, file: &File) -> Result<PathBuf, TesseraError> {
    file.validate_path()
        .map_err(|reason| TesseraError::Io(format!("refusing to write {}: {}", file.path, reason)))?;
    let dest = destination(root, &file.path);
    write_atomic(&dest, &file.data)?;
    Ok(dest)
}

/// Write every file of `set` under `root`, in aggregation order.
///
/// Returns the absolute destinations written.
pub fn write_files(root: &Path, set: &FileSet) -> Result<Vec<PathBuf>, TesseraError> {
    let mut written = Vec::with_capacity(set.len());
    for file in set.files() {
        let dest = write_file(root, file)?;
        tracing::debug!(path = %file.path, bytes = file.len(), "wrote file");
        written.push(dest);
    }
    tracing::info!(count = written.len(), root = %root.display(), "files written");
    Ok(written)
}

// =============================================================================
// STATE REPORT
// =============================================================================

/// One asset entry of the state report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReport {
    pub name: String,
    pub type_name: String,
    pub outcome: Outcome,
    pub sequence: usize,
    pub files: Vec<String>,
}

/// One file entry of the state report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub owner: String,
    pub size: usize,
}

/// Summary of a pass: what was loaded, what was generated, what was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReport {
    pub version: u32,
    pub assets: Vec<AssetReport>,
    pub files: Vec<FileReport>,
    /// Hex FNV-1a checksum of the file set.
    pub checksum: String,
}

impl StateReport {
    /// Build a report from a materialized graph and its aggregated files.
    #[must_use]
    pub fn new(graph: &Materialized, set: &FileSet) -> Self {
        let assets = graph
            .assets()
            .map(|(record, asset)| AssetReport {
                name: record.name.clone(),
                type_name: record.id.type_name().to_string(),
                outcome: record.outcome,
                sequence: record.sequence,
                files: asset
                    .as_writable()
                    .map(|w| w.files().iter().map(|f| f.path.clone()).collect())
                    .unwrap_or_default(),
            })
            .collect();

        let files = set
            .files()
            .iter()
            .map(|f| FileReport {
                path: f.path.clone(),
                owner: set.owner(&f.path).unwrap_or_default().to_string(),
                size: f.len(),
            })
            .collect();

        Self {
            version: STATE_FORMAT_VERSION,
            assets,
            files,
            checksum: format!("{:016x}", set.checksum()),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, TesseraError> {
        let mut data = serde_json::to_vec_pretty(self)
            .map_err(|e| TesseraError::Serialization(e.to_string()))?;
        data.push(b'\n');
        Ok(data)
    }

    /// Parse a report, validating its version.
    pub fn from_json(data: &[u8]) -> Result<Self, TesseraError> {
        let report: Self = serde_json::from_slice(data)
            .map_err(|e| TesseraError::Serialization(e.to_string()))?;
        if report.version != STATE_FORMAT_VERSION {
            return Err(TesseraError::Serialization(format!(
                "Unsupported state report version: {} (expected {})",
                report.version, STATE_FORMAT_VERSION
            )));
        }
        Ok(report)
    }

    /// Write the report as `STATE_FILE_NAME` under `root`.
    pub fn write(&self, root: &Path) -> Result<PathBuf, TesseraError> {
        let dest = root.join(STATE_FILE_NAME);
        write_atomic(&dest, &self.to_json()?)?;
        Ok(dest)
    }

    /// Read a previously written report from `root`, if present.
    pub fn read(root: &Path) -> Result<Option<Self>, TesseraError> {
        let path = root.join(STATE_FILE_NAME);
        match std::fs::read(&path) {
            Ok(data) => Self::from_json(&data).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TesseraError::Io(format!("read {}: {}", path.display(), e))),
        }
    }

    /// Number of assets with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.assets.iter().filter(|a| a.outcome == outcome).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
