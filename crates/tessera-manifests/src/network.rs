//! # Network Config
//!
//! Writes `manifests/cluster-network-02-config.yml` from the `networking`
//! section of the install config.

use crate::install_config::{ClusterNetworkEntry, InstallConfig};
use crate::object::ConfigObject;
use serde::Serialize;
use tessera_core::{Asset, AssetError, File, FileFetcher, Parents, WritableAsset};

/// Output path of the network config.
pub const NETWORK_CONFIG_FILENAME: &str = "manifests/cluster-network-02-config.yml";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NetworkSpec<'a> {
    cluster_network: &'a [ClusterNetworkEntry],
    service_network: &'a [String],
    network_type: &'a str,
}

/// The cluster-network config manifest.
#[derive(Debug, Default)]
pub struct Network {
    files: Vec<File>,
}

impl Asset for Network {
    fn name(&self) -> &str {
        "Network Config"
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        vec![Box::new(InstallConfig::default())]
    }

    fn generate(&mut self, parents: &Parents<'_>) -> Result<(), AssetError> {
        let networking = &parents.get::<InstallConfig>().require()?.networking;
        let spec = NetworkSpec {
            cluster_network: &networking.cluster_network,
            service_network: &networking.service_network,
            network_type: &networking.network_type,
        };
        let object: ConfigObject<NetworkSpec<'_>> = ConfigObject::cluster("Network", spec, None);
        self.files = vec![object.render(NETWORK_CONFIG_FILENAME)?];
        Ok(())
    }

    fn load(&mut self, _fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        Ok(false)
    }

    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        Some(self)
    }
}

impl WritableAsset for Network {
    fn files(&self) -> &[File] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install_config::INSTALL_CONFIG_FILENAME;
    use tessera_core::{MemoryFetcher, resolve_target};

    fn render(install_config: &str) -> String {
        let fetcher = MemoryFetcher::new().with_file(INSTALL_CONFIG_FILENAME, install_config);
        let graph = resolve_target::<Network>(&fetcher).expect("resolve");
        let network = graph.get::<Network>().expect("network");
        String::from_utf8_lossy(&network.files()[0].data).into_owned()
    }

    #[test]
    fn defaults_applied() {
        let text = render("baseDomain: example.com\nmetadata:\n  name: foo\n");

        assert!(text.contains("- cidr: 10.128.0.0/14\n    hostPrefix: 23\n"));
        assert!(text.contains("- 172.30.0.0/16\n"));
        assert!(text.contains("  networkType: OVNKubernetes\n"));
    }

    #[test]
    fn explicit_networking_used() {
        let text = render(
            "baseDomain: example.com\nmetadata:\n  name: foo\nnetworking:\n  networkType: Custom\n  serviceNetwork:\n  - 10.96.0.0/12\n",
        );

        assert!(text.contains("- 10.96.0.0/12\n"));
        assert!(text.contains("  networkType: Custom\n"));
        assert!(text.contains("10.128.0.0/14"));
    }
}
