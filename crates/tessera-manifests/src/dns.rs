//! # DNS Config
//!
//! Writes `manifests/cluster-dns-02-config.yml` with the cluster base domain.

use crate::install_config::InstallConfig;
use crate::object::ConfigObject;
use serde::Serialize;
use tessera_core::{Asset, AssetError, File, FileFetcher, Parents, WritableAsset};

/// Output path of the DNS config.
pub const DNS_CONFIG_FILENAME: &str = "manifests/cluster-dns-02-config.yml";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DnsSpec {
    base_domain: String,
}

/// The cluster-dns config manifest.
#[derive(Debug, Default)]
pub struct Dns {
    files: Vec<File>,
}

impl Asset for Dns {
    fn name(&self) -> &str {
        "DNS Config"
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        vec![Box::new(InstallConfig::default())]
    }

    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
        let config = parents.get::<InstallConfig>().require()?;
        let spec = DnsSpec {
            base_domain: config.cluster_domain(),
        };
        let object: ConfigObject<DnsSpec> = ConfigObject::cluster("DNS", spec, None);
        self.files = vec![object.render(DNS_CONFIG_FILENAME)?];
        Ok(())
    }

    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        Ok(false)
    }

    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        Some(self)
    }
}

impl WritableAsset for Dns {
    fn files(&self) -> &[File] {
        &self.files
    }
}
