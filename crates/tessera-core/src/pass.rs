//! # Pass
//!
//! One complete run of the engine: resolve the requested targets, then
//! aggregate their files.
//!
//! A pass is built explicitly by the caller (no global registry of asset
//! types) and is fail-fast: if resolution fails the aggregator never runs,
//! and there is no partial output.

use crate::aggregate::FileSet;
use crate::asset::Asset;
use crate::fetch::FileFetcher;
use crate::persist::{write_files, StateReport};
use crate::resolver::{Materialized, Resolver};
use crate::{Outcome, TesseraError};
use std::path::{Path, PathBuf};

/// Builder for a single resolution pass.
pub struct Pass<'f> {
    fetcher: &'f dyn FileFetcher,
    targets: Vec<Box<dyn Asset>>,
}

impl<'f> Pass<'f> {
    /// Start a pass reading persisted state through `fetcher`.
    pub fn new(fetcher: &'f dyn FileFetcher) -> Self {
        Self {
            fetcher,
            targets: Vec::new(),
        }
    }

    /// Add a target asset.
    #[must_use]
    pub fn target<A: Asset>(mut self, asset: A) -> Self {
        self.targets.push(Box::new(asset));
        self
    }

    /// Add an already boxed target asset.
    #[must_use]
    pub fn target_boxed(mut self, asset: Box<dyn Asset>) -> Self {
        self.targets.push(asset);
        self
    }

    /// Number of requested targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Resolve every target, then aggregate files.
    pub fn run(self) -> Result<PassOutput, TesseraError> {
        let span = tracing::info_span!("pass", targets = self.targets.len());
        let _guard = span.enter();

        let mut resolver = Resolver::new(self.fetcher);
        resolver.resolve_all(self.targets)?;
        let graph = resolver.finish();

        let files = FileSet::collect(&graph)?;

        tracing::info!(
            assets = graph.len(),
            loaded = graph.count(Outcome::Loaded),
            generated = graph.count(Outcome::Generated),
            files = files.len(),
            "pass complete"
        );

        Ok(PassOutput { graph, files })
    }
}

/// The result of a successful pass.
#[derive(Debug)]
pub struct PassOutput {
    /// Every materialized asset, in resolution order.
    pub graph: Materialized,
    /// Aggregated output files.
    pub files: FileSet,
}

impl PassOutput {
    /// Diagnostic summary of this pass.
    #[must_use]
    pub fn report(&self) -> StateReport {
        StateReport::new(&self.graph, &self.files)
    }

    /// Write all files and the state report under `root`.
    ///
    /// Returns the destinations of the files (not including the report).
    pub fn write(&self, root: &Path) -> Result<Vec<PathBuf>, TesseraError> {
        let written = write_files(root, &self.files)?;
        self.report().write(root)?;
        Ok(written)
    }
}

// =============================================================================
// TESTS
// =============================================================================
