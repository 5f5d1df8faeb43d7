//! # Parent Set
//!
//! The read-only view of an asset's materialized direct dependencies,
//! handed to `Asset::generate`.
//!
//! A Parent Set is built fresh by the resolver for every asset and only
//! contains what that asset declared. Asking for anything else is a wiring
//! bug in the asset, so `get` fails loudly instead of returning an error.

use crate::asset::Asset;
use crate::AssetId;
use std::collections::BTreeMap;

/// Materialized direct dependencies of one asset.
pub struct Parents<'a> {
    /// Name of the asset these parents were built for.
    owner: String,
    /// Identity -> materialized instance.
    entries: BTreeMap<AssetId, &'a dyn Asset>,
    /// Identities in declaration order.
    order: Vec<AssetId>,
}

impl<'a> Parents<'a> {
    /// Build a Parent Set from materialized dependencies in declaration order.
    pub fn new(
        owner: impl Into<String>,
        parents: impl IntoIterator<Item = &'a dyn Asset>,
    ) -> Self {
        let mut entries = BTreeMap::new();
        let mut order = Vec::new();
        for parent in parents {
            let id = AssetId::of_asset(parent);
            if entries.insert(id, parent).is_none() {
                order.push(id);
            }
        }
        Self {
            owner: owner.into(),
            entries,
            order,
        }
    }

    /// An empty Parent Set, for assets without dependencies.
    pub fn empty(owner: impl Into<String>) -> Self {
        Self::new(owner, std::iter::empty())
    }

    /// Retrieve a declared dependency by its variant.
    ///
    /// # Panics
    ///
    /// Panics if `T` was not declared in the owner's `dependencies()`. This
    /// means the asset reads something it never declared, which is a bug in
    /// the asset rather than a runtime condition.
    #[allow(clippy::panic)]
    #[must_use]
    pub fn get<T: Asset>(&self) -> &T {
        match self.try_get::<T>() {
            Some(parent) => parent,
            None => panic!(
                "asset \"{}\" requested undeclared dependency {}",
                self.owner,
                std::any::type_name::<T>()
            ),
        }
    }

    /// Retrieve a dependency by its variant, if present.
    #[must_use]
    pub fn try_get<T: Asset>(&self) -> Option<&T> {
        self.entries
            .get(&AssetId::of::<T>())
            .and_then(|parent| parent.downcast_ref::<T>())
    }

    /// Retrieve a dependency by identity as a trait object.
    #[must_use]
    pub fn get_by_id(&self, id: AssetId) -> Option<&'a dyn Asset> {
        self.entries.get(&id).copied()
    }

    /// Check whether a variant is present.
    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Identities in declaration order.
    #[must_use]
    pub fn ids(&self) -> &[AssetId] {
        &self.order
    }

    /// Name of the asset this set was built for.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of parents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if there are no parents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for Parents<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parents")
            .field("owner", &self.owner)
            .field("parents", &self.order)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FileFetcher;
    use crate::AssetError;

    #[derive(Default)]
    struct Domain {
        value: String,
    }

    impl Asset for Domain {
        fn name(&self) -> &str {
            "Domain"
        }

        fn dependencies(&self) -> Vec<Box<dyn Asset>> {
            Vec::new()
        }

        fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
            Ok(())
        }

        fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct Region;

    impl Asset for Region {
        fn name(&self) -> &str {
            "Region"
        }

        fn dependencies(&self) -> Vec<Box<dyn Asset>> {
            Vec::new()
        }

        fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
            Ok(())
        }

        fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
            Ok(false)
        }
    }

    #[test]
    fn get_returns_declared_parent() {
        let domain = Domain {
            value: "example.com".into(),
        };
        let parents = Parents::new("Consumer", [&domain as &dyn Asset]);

        assert_eq!(parents.get::<Domain>().value, "example.com");
        assert_eq!(parents.len(), 1);
        assert_eq!(parents.ids(), &[AssetId::of::<Domain>()]);
    }

    #[test]
    fn try_get_missing_is_none() {
        let domain = Domain::default();
        let parents = Parents::new("Consumer", [&domain as &dyn Asset]);

        assert!(parents.try_get::<Region>().is_none());
        assert!(!parents.contains(AssetId::of::<Region>()));
    }

    #[test]
    #[should_panic(expected = "requested undeclared dependency")]
    fn get_undeclared_parent_panics() {
        let parents = Parents::empty("Consumer");
        let _ = parents.get::<Region>();
    }

    #[test]
    fn declaration_order_is_preserved() {
        let domain = Domain::default();
        let region = Region;
        let parents = Parents::new("Consumer", [&region as &dyn Asset, &domain as &dyn Asset]);

        assert_eq!(
            parents.ids(),
            &[AssetId::of::<Region>(), AssetId::of::<Domain>()]
        );
    }
}
