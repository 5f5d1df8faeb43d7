//! # Infrastructure Config
//!
//! Writes `manifests/cluster-infrastructure-02-config.yml`. Unlike the other
//! config objects, its interesting fields live in `status`: the API server
//! URL and the infrastructure name used to tag cloud resources.

use crate::install_config::InstallConfig;
use crate::object::ConfigObject;
use serde::Serialize;
use tessera_core::{Asset, AssetError, File, FileFetcher, Parents, WritableAsset};

/// Output path of the infrastructure config.
pub const INFRASTRUCTURE_CONFIG_FILENAME: &str = "manifests/cluster-infrastructure-02-config.yml";

/// Port the Kubernetes API server listens on.
pub const API_SERVER_PORT: u16 = 6443;

#[derive(Debug, Serialize)]
struct InfrastructureSpec {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfrastructureStatus {
    #[serde(rename = "apiServerURL")]
    api_server_url: String,
    infrastructure_name: String,
}

/// The cluster-infrastructure config manifest.
#[derive(Debug, Default)]
pub struct Infrastructure {
    files: Vec<File>,
}

impl Asset for Infrastructure {
    fn name(&self) -> &str {
        "Infrastructure Config"
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        vec![Box::new(InstallConfig::default())]
    }

    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
        let config = parents.get::<InstallConfig>().require()?;
        let status = InfrastructureStatus {
            api_server_url: format!("https://api.{}:{}", config.cluster_domain(), API_SERVER_PORT),
            infrastructure_name: config.metadata.name.clone(),
        };
        let object = ConfigObject::cluster("Infrastructure", InfrastructureSpec {}, Some(status));
        self.files = vec![object.render(INFRASTRUCTURE_CONFIG_FILENAME)?];
        Ok(())
    }

    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        Ok(false)
    }

    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        Some(self)
    }
}

impl WritableAsset for Infrastructure {
    fn files(&self) -> &[File] {
        &self.files
    }
}
