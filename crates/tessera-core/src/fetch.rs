//! # File Fetcher
//!
//! Read access to persisted state for `Asset::load`.
//!
//! The engine treats a fetcher as an opaque capability. Two implementations
//! ship with the crate:
//! - `DirFetcher`: files under a directory on the local filesystem
//! - `MemoryFetcher`: an in-memory fixture, used for tests and seeding
//!
//! Names and patterns are logical `/`-separated paths relative to the
//! fetcher's root. Patterns may use `*` and `?` in their final segment.

use crate::primitives::MAX_FETCH_FILE_SIZE;
use crate::types::validate_relative_path;
use crate::{File, TesseraError};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// =============================================================================
// FETCHER TRAIT
// =============================================================================

/// Read access to persisted files.
pub trait FileFetcher {
    /// Fetch a single file by its relative path.
    ///
    /// Returns `Ok(None)` when no such file exists.
    fn fetch_by_name(&self, name: &str) -> Result<Option<File>, TesseraError>;

    /// Fetch every file whose relative path matches `pattern`.
    ///
    /// Results are sorted by path. An empty vector means nothing matched.
    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<File>, TesseraError>;
}

/// Split a logical path into its directory part and final segment.
fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

fn validate_request(path: &str) -> Result<(), TesseraError> {
    validate_relative_path(path).map_err(|reason| TesseraError::Fetch {
        path: path.to_string(),
        reason: reason.to_string(),
    })
}

/// Wildcard match of a single path segment.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one character. Everything else matches literally.
#[must_use]
pub fn segment_matches(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0usize, 0usize);
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, c));
                p += 1;
            }
            Some(&ch) if ch == '?' || ch == candidate[c] => {
                p += 1;
                c += 1;
            }
            _ => match backtrack {
                Some((star_p, star_c)) => {
                    p = star_p + 1;
                    c = star_c + 1;
                    backtrack = Some((star_p, star_c + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}

// =============================================================================
// DIRECTORY FETCHER
// =============================================================================

/// Fetches persisted files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    /// Create a fetcher rooted at `root`. The directory need not exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are fetched from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        name.split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    fn read(&self, name: &str, path: &Path) -> Result<Option<File>, TesseraError> {
        let fetch_err = |reason: String| TesseraError::Fetch {
            path: name.to_string(),
            reason,
        };

        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(fetch_err(e.to_string())),
        };

        if !metadata.is_file() {
            return Err(fetch_err("not a regular file".to_string()));
        }

        if metadata.len() > MAX_FETCH_FILE_SIZE {
            return Err(fetch_err(format!(
                "file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_FETCH_FILE_SIZE
            )));
        }

        match std::fs::read(path) {
            Ok(data) => Ok(Some(File::new(name, data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(fetch_err(e.to_string())),
        }
    }
}

impl FileFetcher for DirFetcher {
    fn fetch_by_name(&self, name: &str) -> Result<Option<File>, TesseraError> {
        validate_request(name)?;
        let path = self.resolve(name);
        tracing::trace!(name, path = %path.display(), "fetch by name");
        self.read(name, &path)
    }

    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<File>, TesseraError> {
        validate_request(pattern)?;
        let (dir, file_pattern) = split_parent(pattern);
        let dir_path = if dir.is_empty() {
            self.root.clone()
        } else {
            self.resolve(dir)
        };

        let entries = match std::fs::read_dir(&dir_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(TesseraError::Fetch {
                    path: pattern.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TesseraError::Fetch {
                path: pattern.to_string(),
                reason: e.to_string(),
            })?;
            // Non UTF-8 names can never match a logical pattern
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && segment_matches(file_pattern, &file_name) {
                names.push(file_name);
            }
        }
        names.sort();

        let mut files = Vec::with_capacity(names.len());
        for file_name in names {
            let logical = if dir.is_empty() {
                file_name.clone()
            } else {
                format!("{dir}/{file_name}")
            };
            if let Some(file) = self.read(&logical, &dir_path.join(&file_name))? {
                files.push(file);
            }
        }
        tracing::trace!(pattern, matched = files.len(), "fetch by pattern");
        Ok(files)
    }
}

// =============================================================================
// MEMORY FETCHER
// =============================================================================

/// In-memory fetcher backed by a sorted map of path -> bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Create an empty fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    /// Insert or replace a file.
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), data.into());
    }

    /// Remove a file, returning its content.
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the fetcher holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileFetcher for MemoryFetcher {
    fn fetch_by_name(&self, name: &str) -> Result<Option<File>, TesseraError> {
        validate_request(name)?;
        Ok(self
            .files
            .get(name)
            .map(|data| File::new(name, data.clone())))
    }

    fn fetch_by_pattern(&self, pattern: &str) -> Result<Vec<File>, TesseraError> {
        validate_request(pattern)?;
        let (dir, file_pattern) = split_parent(pattern);
        Ok(self
            .files
            .iter()
            .filter(|(path, _)| {
                let (candidate_dir, candidate_name) = split_parent(path);
                candidate_dir == dir && segment_matches(file_pattern, candidate_name)
            })
            .map(|(path, data)| File::new(path.clone(), data.clone()))
            .collect())
    }
}

impl From<Vec<File>> for MemoryFetcher {
    fn from(files: Vec<File>) -> Self {
        Self {
            files: files.into_iter().map(|f| (f.path, f.data)).collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
