//! # Asset Contract
//!
//! An asset is a named unit of work that produces configuration state. It
//! declares its direct dependencies, and reaches its final state either by
//! loading persisted files or by generating from its materialized parents.
//!
//! Asset variants are ordinary Rust types. Their identity is the concrete
//! type, so a `dependencies()` list simply returns fresh default instances
//! of the variants it needs.

use crate::fetch::FileFetcher;
use crate::parents::Parents;
use crate::{AssetError, AssetId, File};
use std::any::Any;

// =============================================================================
// TYPE ERASURE
// =============================================================================

/// Downcasting support for asset trait objects.
///
/// Blanket-implemented for every `'static` type; asset authors never
/// implement it by hand.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any` of the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Fully qualified name of the concrete type.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

// =============================================================================
// ASSET TRAIT
// =============================================================================

/// A unit of work in the asset graph.
///
/// Implementations must keep `name` and `dependencies` free of side effects:
/// the engine may call them before, and independently of, `load`/`generate`.
pub trait Asset: AsAny + 'static {
    /// Stable, human-readable name used in diagnostics and errors.
    fn name(&self) -> &str;

    /// Direct dependencies, in declaration order.
    ///
    /// Must return the same variants on every call and must not list a
    /// variant twice. The engine computes the transitive closure and
    /// rejects cycles.
    fn dependencies(&self) -> Vec<Box<dyn Asset>>;

    /// Compute this asset's state from its materialized direct dependencies.
    ///
    /// Called at most once per pass, and only after `load` reported that no
    /// persisted form exists.
    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError>;

    /// Reconstruct this asset's state from persisted files.
    ///
    /// - `Ok(false)`: nothing persisted, the engine falls through to `generate`
    /// - `Ok(true)`: state restored, `generate` is never called this pass
    /// - `Err(_)`: persisted state exists but is unusable; the pass aborts
    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool, AssetError>;

    /// View this asset as writable, if it produces output files.
    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        None
    }
}

/// An asset that contributes files to the final output.
pub trait WritableAsset: Asset {
    /// Files produced by the asset.
    ///
    /// Only meaningful after a successful `generate` or a `load` that
    /// returned `Ok(true)`.
    fn files(&self) -> &[File];
}

impl AssetId {
    /// Identity of the concrete variant behind an asset trait object.
    #[must_use]
    pub fn of_asset(asset: &dyn Asset) -> Self {
        Self::from_parts(asset.as_any().type_id(), asset.type_name())
    }
}

impl dyn Asset {
    /// Downcast to a concrete asset variant.
    #[must_use]
    pub fn downcast_ref<T: Asset>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Identity of this asset.
    #[must_use]
    pub fn id(&self) -> AssetId {
        AssetId::of_asset(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
