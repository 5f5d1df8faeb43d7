//! # tessera-core
//!
//! The asset graph engine for Tessera - THE ENGINE.
//!
//! Tessera produces a set of interdependent configuration files (manifests).
//! Each file comes from an *asset*; assets depend on other assets, and any
//! asset may already exist on disk from a previous run. This crate is the
//! small build system underneath:
//!
//! - discovers an asset's transitive dependencies
//! - materializes every asset exactly once per pass, dependencies first
//! - lets an asset be satisfied by loading persisted state instead of
//!   generating it
//! - aggregates the output files, refusing path collisions
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous; one pass either fully succeeds or
//!   reports exactly one error naming the failing asset
//! - Deterministic: `BTreeMap` only, resolution order is dependency-first
//!   and stable across runs
//! - No global registry: callers build the graph explicitly from root assets
//! - NO async, NO network dependencies
//!
//! ## Example
//!
//! ```
//! use tessera_core::{Asset, AssetError, File, FileFetcher, MemoryFetcher, Parents, Pass, WritableAsset};
//!
//! #[derive(Default)]
//! struct Motd {
//!     files: Vec<File>,
//! }
//!
//! impl Asset for Motd {
//!     fn name(&self) -> &str {
//!         "Message of the Day"
//!     }
//!
//!     fn dependencies(&self) -> Vec<Box<dyn Asset>> {
//!         Vec::new()
//!     }
//!
//!     fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
//!         self.files = vec![File::new("motd", "hello\n")];
//!         Ok(())
//!     }
//!
//!     fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
//!         Ok(false)
//!     }
//!
//!     fn as_writable(&self) -> Option<&dyn WritableAsset> {
//!         Some(self)
//!     }
//! }
//!
//! impl WritableAsset for Motd {
//!     fn files(&self) -> &[File] {
//!         &self.files
//!     }
//! }
//!
//! let fetcher = MemoryFetcher::new();
//! let output = Pass::new(&fetcher).target(Motd::default()).run().expect("pass");
//! assert_eq!(output.files.len(), 1);
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod asset;
pub mod fetch;
pub mod graph;
pub mod parents;
pub mod pass;
pub mod persist;
pub mod primitives;
pub mod resolver;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AssetError, AssetId, File, Outcome, Record, TesseraError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use aggregate::FileSet;
pub use asset::{AsAny, Asset, WritableAsset};
pub use fetch::{DirFetcher, FileFetcher, MemoryFetcher};
pub use graph::{DependencyGraph, GraphNode};
pub use parents::Parents;
pub use pass::{Pass, PassOutput};
pub use persist::{StateReport, write_files};
pub use resolver::{Materialized, Resolver, resolve_roots, resolve_target};
