//! # Install Config
//!
//! The user-supplied description of the cluster, read from
//! `install-config.yaml` in the asset directory.
//!
//! This is an input asset: `load` is the only way to satisfy it. When the
//! file is absent, `generate` fails with an error telling the user to
//! provide it. It writes nothing; the manifests derived from it do.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use tessera_core::{Asset, AssetError, FileFetcher, Parents};

/// File name of the install config in the asset directory.
pub const INSTALL_CONFIG_FILENAME: &str = "install-config.yaml";

/// Default pod network CIDR.
pub const DEFAULT_CLUSTER_NETWORK_CIDR: &str = "10.128.0.0/14";
/// Default per-node subnet prefix length within the pod network.
pub const DEFAULT_HOST_PREFIX: u8 = 23;
/// Default service network CIDR.
pub const DEFAULT_SERVICE_NETWORK_CIDR: &str = "172.30.0.0/16";
/// Default cluster network plugin.
pub const DEFAULT_NETWORK_TYPE: &str = "OVNKubernetes";

// =============================================================================
// DOCUMENT
// =============================================================================

/// Object metadata of the install config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
}

/// One pod network range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkEntry {
    pub cidr: String,
    pub host_prefix: u8,
}

/// Cluster networking settings. Omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(default = "default_cluster_network")]
    pub cluster_network: Vec<ClusterNetworkEntry>,
    #[serde(default = "default_service_network")]
    pub service_network: Vec<String>,
    #[serde(default = "default_network_type")]
    pub network_type: String,
}

impl Default for Networking {
    fn default() -> Self {
        Self {
            cluster_network: default_cluster_network(),
            service_network: default_service_network(),
            network_type: default_network_type(),
        }
    }
}

fn default_cluster_network() -> Vec<ClusterNetworkEntry> {
    vec![ClusterNetworkEntry {
        cidr: DEFAULT_CLUSTER_NETWORK_CIDR.to_string(),
        host_prefix: DEFAULT_HOST_PREFIX,
    }]
}

fn default_service_network() -> Vec<String> {
    vec![DEFAULT_SERVICE_NETWORK_CIDR.to_string()]
}

fn default_network_type() -> String {
    DEFAULT_NETWORK_TYPE.to_string()
}

/// Parsed contents of `install-config.yaml`.
///
/// Unknown keys (platform, pull secret, ...) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfigDocument {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub base_domain: String,
    #[serde(default)]
    pub networking: Networking,
}

impl InstallConfigDocument {
    /// Parse and validate YAML.
    pub fn from_yaml(data: &[u8]) -> Result<Self, ManifestError> {
        let doc: Self = serde_yaml_ng::from_slice(data).map_err(|e| ManifestError::Parse {
            file: INSTALL_CONFIG_FILENAME.to_string(),
            reason: e.to_string(),
        })?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check the fields every manifest depends on.
    pub fn validate(&self) -> Result<(), ManifestError> {
        validate_label("metadata.name", &self.metadata.name)?;
        validate_domain("baseDomain", &self.base_domain)?;

        if self.networking.cluster_network.is_empty() {
            return Err(ManifestError::invalid(
                "networking.clusterNetwork",
                "at least one entry is required",
            ));
        }
        for entry in &self.networking.cluster_network {
            validate_cidr("networking.clusterNetwork.cidr", &entry.cidr)?;
            if entry.host_prefix > 32 {
                return Err(ManifestError::invalid(
                    "networking.clusterNetwork.hostPrefix",
                    format!("{} exceeds 32", entry.host_prefix),
                ));
            }
        }
        if self.networking.service_network.is_empty() {
            return Err(ManifestError::invalid(
                "networking.serviceNetwork",
                "at least one entry is required",
            ));
        }
        for cidr in &self.networking.service_network {
            validate_cidr("networking.serviceNetwork", cidr)?;
        }
        if self.networking.network_type.trim().is_empty() {
            return Err(ManifestError::invalid(
                "networking.networkType",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// `<name>.<baseDomain>`
    #[must_use]
    pub fn cluster_domain(&self) -> String {
        format!("{}.{}", self.metadata.name, self.base_domain)
    }
}

fn validate_label(field: &'static str, value: &str) -> Result<(), ManifestError> {
    if value.is_empty() {
        return Err(ManifestError::invalid(field, "must not be empty"));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(ManifestError::invalid(
            field,
            format!("\"{value}\" must not start or end with '-'"),
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ManifestError::invalid(
            field,
            format!("\"{value}\" must be lowercase alphanumerics or '-'"),
        ));
    }
    Ok(())
}

fn validate_domain(field: &'static str, value: &str) -> Result<(), ManifestError> {
    if value.is_empty() {
        return Err(ManifestError::invalid(field, "must not be empty"));
    }
    if value.starts_with('.') || value.ends_with('.') || value.contains("..") {
        return Err(ManifestError::invalid(
            field,
            format!("\"{value}\" has an empty label"),
        ));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ManifestError::invalid(
            field,
            format!("\"{value}\" contains whitespace"),
        ));
    }
    Ok(())
}

/// Shape check only: `a.b.c.d/len` with octets and length in range.
fn validate_cidr(field: &'static str, value: &str) -> Result<(), ManifestError> {
    let bad = || ManifestError::invalid(field, format!("\"{value}\" is not an IPv4 CIDR"));
    let (addr, len) = value.split_once('/').ok_or_else(bad)?;
    let len: u8 = len.parse().map_err(|_| bad())?;
    if len > 32 {
        return Err(bad());
    }
    let octets: Vec<&str> = addr.split('.').collect();
    if octets.len() != 4 || octets.iter().any(|o| o.parse::<u8>().is_err()) {
        return Err(bad());
    }
    Ok(())
}

// =============================================================================
// ASSET
// =============================================================================

/// The install config asset.
#[derive(Debug, Default)]
pub struct InstallConfig {
    config: Option<InstallConfigDocument>,
}

impl InstallConfig {
    /// The loaded document.
    ///
    /// Always `Some` once the asset has been materialized by a pass.
    #[must_use]
    pub fn config(&self) -> Option<&InstallConfigDocument> {
        self.config.as_ref()
    }

    /// The loaded document, or the error a dependent should report.
    pub fn require(&self) -> Result<&InstallConfigDocument, ManifestError> {
        self.config
            .as_ref()
            .ok_or(ManifestError::MissingInstallConfig {
                file: INSTALL_CONFIG_FILENAME,
            })
    }
}

impl Asset for InstallConfig {
    fn name(&self) -> &str {
        "Install Config"
    }

    fn dependencies(&self) -> Vec<Box<dyn Asset>> {
        Vec::new()
    }

    fn generate(&mut self, _parents: &Parents<'_>) -> Result<(), AssetError> {
        Err(Box::new(ManifestError::MissingInstallConfig {
            file: INSTALL_CONFIG_FILENAME,
        }))
    }

    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool, AssetError> {
        let Some(file) = fetcher.fetch_by_name(INSTALL_CONFIG_FILENAME)? else {
            return Ok(false);
        };
        let doc = InstallConfigDocument::from_yaml(&file.data)?;
        tracing::debug!(
            cluster = %doc.metadata.name,
            base_domain = %doc.base_domain,
            "install config loaded"
        );
        self.config = Some(doc);
        Ok(true)
    }
}

// =============================================================================
// TESTS
// =============================================================================
