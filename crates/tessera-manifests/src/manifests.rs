//! # Manifests
//!
//! The group target. Depends on every cluster config manifest so that
//! resolving it produces the full `manifests/` directory. Writes nothing
//! itself.

use crate::dns::Dns;
use crate::infrastructure::Infrastructure;
use crate::ingress::Ingress;
use crate::network::Network;
use tessera_core::{Asset, AssetError, FileFetcher, Parents};

/// Every cluster config manifest.
#[derive(Debug, Default)]
pub struct Manifests;

impl Asset for Manifests {
    fn name(&self) -> &str {
        "Common Manifests"
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        vec![
            Box::new(Ingress::default()),
            Box::new(Dns::default()),
            Box::new(Infrastructure::default()),
            Box::new(Network::default()),
        ]
    }

    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
        tracing::debug!(manifests = parents.len(), "manifest group complete");
        Ok(())
    }

    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        Ok(false)
    }
}
