//! # Resolver
//!
//! Depth-first materialization of an asset graph with memoization.
//!
//! For every asset reached from the requested roots the resolver:
//! 1. Returns immediately if the asset already has a record (idempotent).
//! 2. Materializes each declared dependency, in declaration order.
//! 3. Calls `load`; `Ok(true)` records `Loaded`.
//! 4. Aborts the pass if `load` fails. Persisted state is never silently
//!    regenerated.
//! 5. Otherwise calls `generate` with the Parent Set and records `Generated`.
//!
//! An in-progress stack detects cycles. The first failure aborts the whole
//! pass; there is no partial success.

use crate::asset::Asset;
use crate::fetch::FileFetcher;
use crate::parents::Parents;
use crate::primitives::MAX_RESOLUTION_DEPTH;
use crate::{AssetId, Outcome, Record, TesseraError};
use std::collections::BTreeMap;

// =============================================================================
// MATERIALIZED GRAPH
// =============================================================================

/// A materialized asset and its record.
struct Slot {
    asset: Box<dyn Asset>,
    record: Record,
}

/// The fully materialized result of a resolution pass.
///
/// Assets are kept in resolution order: every asset appears after all of
/// its transitive dependencies.
#[derive(Default)]
pub struct Materialized {
    slots: Vec<Slot>,
    index: BTreeMap<AssetId, usize>,
    roots: Vec<AssetId>,
}

impl Materialized {
    /// Get a materialized asset by its variant.
    #[must_use]
    pub fn get<T: Asset>(&self) -> Option<&T> {
        self.get_by_id(AssetId::of::<T>())
            .and_then(|asset| asset.downcast_ref::<T>())
    }

    /// Get a materialized asset by identity.
    #[must_use]
    pub fn get_by_id(&self, id: AssetId) -> Option<&dyn Asset> {
        let idx = *self.index.get(&id)?;
        self.slots.get(idx).map(|slot| slot.asset.as_ref())
    }

    /// Record of an asset, by identity.
    #[must_use]
    pub fn record(&self, id: AssetId) -> Option<&Record> {
        let idx = *self.index.get(&id)?;
        self.slots.get(idx).map(|slot| &slot.record)
    }

    /// Record of an asset, by variant.
    #[must_use]
    pub fn record_of<T: Asset>(&self) -> Option<&Record> {
        self.record(AssetId::of::<T>())
    }

    /// All records in resolution order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().map(|slot| &slot.record)
    }

    /// All assets with their records, in resolution order.
    pub fn assets(&self) -> impl Iterator<Item = (&Record, &dyn Asset)> {
        self.slots
            .iter()
            .map(|slot| (&slot.record, slot.asset.as_ref()))
    }

    /// Identities of the requested roots, in request order.
    #[must_use]
    pub fn roots(&self) -> &[AssetId] {
        &self.roots
    }

    /// Check whether an asset was materialized in this pass.
    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of materialized assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if nothing was materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of assets with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.records().filter(|r| r.outcome == outcome).count()
    }
}

impl std::fmt::Debug for Materialized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materialized")
            .field("records", &self.records().collect::<Vec<_>>())
            .field("roots", &self.roots)
            .finish()
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Walks and materializes asset graphs against one file fetcher.
///
/// A resolver is one pass: its memo table lives exactly as long as it does.
pub struct Resolver<'f> {
    fetcher: &'f dyn FileFetcher,
    graph: Materialized,
    /// Assets whose dependencies are currently being materialized.
    in_progress: Vec<(AssetId, String)>,
}

impl<'f> Resolver<'f> {
    /// Create a resolver for a new pass.
    pub fn new(fetcher: &'f dyn FileFetcher) -> Self {
        Self {
            fetcher,
            graph: Materialized::default(),
            in_progress: Vec::new(),
        }
    }

    /// Materialize `asset` and everything it depends on.
    ///
    /// Resolving an asset that is already materialized in this pass is a
    /// no-op returning the same identity.
    pub fn resolve(&mut self, asset: Box<dyn Asset>) -> Result<AssetId, TesseraError> {
        let id = self.materialize(asset)?;
        if !self.graph.roots.contains(&id) {
            self.graph.roots.push(id);
        }
        Ok(id)
    }

    /// Materialize several roots in order, sharing one memo table.
    pub fn resolve_all(
        &mut self,
        assets: impl IntoIterator<Item = Box<dyn Asset>>,
    ) -> Result<Vec<AssetId>, TesseraError> {
        assets.into_iter().map(|asset| self.resolve(asset)).collect()
    }

    /// Read-only view of what has been materialized so far.
    #[must_use]
    pub fn materialized(&self) -> &Materialized {
        &self.graph
    }

    /// Finish the pass and take ownership of the materialized graph.
    #[must_use]
    pub fn finish(self) -> Materialized {
        self.graph
    }

    fn materialize(&mut self, asset: Box<dyn Asset>) -> Result<AssetId, TesseraError> {
        let id = AssetId::of_asset(asset.as_ref());
        if self.graph.contains(id) {
            tracing::trace!(asset = asset.name(), "already materialized");
            return Ok(id);
        }

        if let Some(pos) = self.in_progress.iter().position(|(seen, _)| *seen == id) {
            let mut chain: Vec<String> = self.in_progress[pos..]
                .iter()
                .map(|(_, name)| name.clone())
                .collect();
            chain.push(asset.name().to_string());
            return Err(TesseraError::Cycle { chain });
        }

        if self.in_progress.len() >= MAX_RESOLUTION_DEPTH {
            return Err(TesseraError::DepthExceeded {
                asset: asset.name().to_string(),
                limit: MAX_RESOLUTION_DEPTH,
            });
        }

        self.in_progress.push((id, asset.name().to_string()));
        let result = self.materialize_fresh(id, asset);
        self.in_progress.pop();
        result
    }

    fn materialize_fresh(
        &mut self,
        id: AssetId,
        mut asset: Box<dyn Asset>,
    ) -> Result<AssetId, TesseraError> {
        let name = asset.name().to_string();
        let dependencies = asset.dependencies();

        let mut declared: Vec<AssetId> = Vec::with_capacity(dependencies.len());
        for dependency in &dependencies {
            let dep_id = AssetId::of_asset(dependency.as_ref());
            if declared.contains(&dep_id) {
                return Err(TesseraError::DuplicateDependency {
                    asset: name,
                    dependency: dependency.name().to_string(),
                });
            }
            declared.push(dep_id);
        }

        for dependency in dependencies {
            self.materialize(dependency)?;
        }

        let outcome = {
            let parents = Parents::new(
                name.as_str(),
                declared
                    .iter()
                    .filter_map(|dep_id| self.graph.get_by_id(*dep_id)),
            );

            match asset.load(self.fetcher) {
                Ok(true) => {
                    tracing::debug!(asset = %name, "loaded from persisted state");
                    Outcome::Loaded
                }
                Ok(false) => {
                    tracing::debug!(asset = %name, parents = parents.len(), "generating");
                    asset
                        .generate(&parents)
                        .map_err(|source| TesseraError::Generate {
                            asset: name.clone(),
                            source,
                        })?;
                    Outcome::Generated
                }
                Err(source) => {
                    return Err(TesseraError::Load {
                        asset: name,
                        source,
                    });
                }
            }
        };

        let sequence = self.graph.slots.len();
        self.graph.index.insert(id, sequence);
        self.graph.slots.push(Slot {
            asset,
            record: Record {
                id,
                name,
                outcome,
                sequence,
            },
        });

        Ok(id)
    }
}

// =============================================================================
// CONVENIENCE ENTRY POINTS
// =============================================================================

/// Materialize a single root variant in a fresh pass.
pub fn resolve_target<T: Asset + Default>(
    fetcher: &dyn FileFetcher,
) -> Result<Materialized, TesseraError> {
    let mut resolver = Resolver::new(fetcher);
    resolver.resolve(Box::new(T::default()))?;
    Ok(resolver.finish())
}

/// Materialize several roots in a fresh pass.
pub fn resolve_roots(
    roots: Vec<Box<dyn Asset>>,
    fetcher: &dyn FileFetcher,
) -> Result<Materialized, TesseraError> {
    let mut resolver = Resolver::new(fetcher);
    resolver.resolve_all(roots)?;
    Ok(resolver.finish())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use crate::AssetError;

    #[derive(Default)]
    struct Base {
        value: u32,
    }

    impl Asset for Base {
        fn name(&self) -> &str {
            "Base"
        }

        fn dependencies(&self) -> Vec<Box<dyn Asset>> {
            Vec::new()
        }

        fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
            self.value = 21;
            Ok(())
        }

        fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
            let Some(file) = fetcher.fetch_by_name("base")? else {
                return Ok(false);
            };
            let text = String::from_utf8(file.data)?;
            self.value = text.trim().parse()?;
            Ok(true)
        }
    }

    #[derive(Default)]
    struct Doubled {
        value: u32,
    }

    impl Asset for Doubled {
        fn name(&self) -> &str {
            "Doubled"
        }

        fn dependencies(&self) -> Vec<Box<dyn Asset>> {
            vec![Box::new(Base::default())]
        }

        fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
            self.value = parents.get::<Base>().value * 2;
            Ok(())
        }

        fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct Twice;

    impl Asset for Twice {
        fn name(&self) -> &str {
            "Twice"
        }

        fn dependencies(&self) -> Vec<Box<dyn Asset>> {
            vec![Box::new(Base::default()), Box::new(Base::default())]
        }

        fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
            Ok(())
        }

        fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
            Ok(false)
        }
    }

    #[test]
    fn generates_from_parents() {
        let fetcher = MemoryFetcher::new();
        let graph = resolve_target::<Doubled>(&fetcher).expect("resolve");

        assert_eq!(graph.get::<Doubled>().map(|d| d.value), Some(42));
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.count(Outcome::Generated), 2);
    }

    #[test]
    fn loaded_state_feeds_dependents() {
        let fetcher = MemoryFetcher::new().with_file("base", "5");
        let graph = resolve_target::<Doubled>(&fetcher).expect("resolve");

        assert_eq!(graph.get::<Doubled>().map(|d| d.value), Some(10));
        assert_eq!(
            graph.record_of::<Base>().map(|r| r.outcome),
            Some(Outcome::Loaded)
        );
    }

    #[test]
    fn corrupt_state_aborts_pass() {
        let fetcher = MemoryFetcher::new().with_file("base", "not a number");
        let err = resolve_target::<Doubled>(&fetcher).expect_err("should fail");

        assert!(matches!(&err, TesseraError::Load { asset, .. } if asset == "Base"));
    }

    #[test]
    fn dependencies_precede_dependents() {
        let fetcher = MemoryFetcher::new();
        let graph = resolve_target::<Doubled>(&fetcher).expect("resolve");
        let names: Vec<_> = graph.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Doubled"]);
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let fetcher = MemoryFetcher::new();
        let mut resolver = Resolver::new(&fetcher);
        let first = resolver.resolve(Box::new(Doubled::default())).expect("first");
        let second = resolver.resolve(Box::new(Doubled::default())).expect("second");

        assert_eq!(first, second);
        let graph = resolver.finish();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.roots(), &[AssetId::of::<Doubled>()]);
    }

    #[test]
    fn duplicate_declaration_rejected() {
        let fetcher = MemoryFetcher::new();
        let err = resolve_target::<Twice>(&fetcher).expect_err("should fail");
        assert!(matches!(err, TesseraError::DuplicateDependency { .. }));
        assert!(err.is_configuration_error());
    }
}
