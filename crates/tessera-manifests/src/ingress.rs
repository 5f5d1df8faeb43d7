//! # Ingress Config
//!
//! Writes `manifests/cluster-ingress-02-config.yml`: the cluster Ingress
//! config whose `spec.domain` is the wildcard domain for application routes.

use crate::install_config::InstallConfig;
use crate::object::ConfigObject;
use serde::Serialize;
use tessera_core::{Asset, AssetError, File, FileFetcher, Parents, WritableAsset};

/// Output path of the ingress config.
pub const INGRESS_CONFIG_FILENAME: &str = "manifests/cluster-ingress-02-config.yml";

#[derive(Debug, Serialize)]
struct IngressSpec {
    domain: String,
}

/// The cluster-ingress config manifest.
#[derive(Debug, Default)]
pub struct Ingress {
    files: Vec<File>,
}

impl Asset for Ingress {
    fn name(&self) -> &str {
        "Ingress Config"
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        vec![Box::new(InstallConfig::default())]
    }

    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
        let config = parents.get::<InstallConfig>().require()?;
        let spec = IngressSpec {
            domain: format!("apps.{}", config.cluster_domain()),
        };
        let object: ConfigObject<IngressSpec> = ConfigObject::cluster("Ingress", spec, None);
        self.files = vec![object.render(INGRESS_CONFIG_FILENAME)?];
        Ok(())
    }

    /// Never persisted on its own; always regenerated from the install config.
    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        Ok(false)
    }

    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        Some(self)
    }
}

impl WritableAsset for Ingress {
    fn files(&self) -> &[File] {
        &self.files
    }
}
