//! Cluster-scoped `config.openshift.io/v1` objects and their YAML rendering.

use crate::error::ManifestError;
use serde::Serialize;
use tessera_core::File;

/// Directory holding generated manifests, relative to the asset directory.
pub const MANIFEST_DIR: &str = "manifests";

/// API group version of every cluster config object.
pub const CONFIG_API_VERSION: &str = "config.openshift.io/v1";

/// Name shared by the cluster-scoped singleton config objects.
pub const CLUSTER_OBJECT_NAME: &str = "cluster";

#[derive(Debug, Serialize)]
pub(crate) struct ObjectMeta {
    pub name: &'static str,
}

/// A config object. `status` is omitted when `None`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigObject<S, T = ()> {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub metadata: ObjectMeta,
    pub spec: S,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<T>,
}

impl<S: Serialize, T: Serialize> ConfigObject<S, T> {
    /// The singleton `cluster` object of `kind`.
    pub fn cluster(kind: &'static str, spec: S, status: Option<T>) -> Self {
        Self {
            api_version: CONFIG_API_VERSION,
            kind,
            metadata: ObjectMeta {
                name: CLUSTER_OBJECT_NAME,
            },
            spec,
            status,
        }
    }

    /// Render as the file at `path`.
    pub fn render(&self, path: &'static str) -> Result<File, ManifestError> {
        let yaml = serde_yaml_ng::to_string(self).map_err(|e| ManifestError::Render {
            file: path,
            reason: e.to_string(),
        })?;
        Ok(File::new(path, yaml))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Empty {}

    #[test]
    fn status_omitted_when_absent() {
        let object: ConfigObject<Empty> = ConfigObject::cluster("Proxy", Empty {}, None);
        let file = object.render("manifests/proxy.yml").expect("render");
        let text = String::from_utf8(file.data).expect("utf8");

        assert_eq!(
            text,
            "apiVersion: config.openshift.io/v1\nkind: Proxy\nmetadata:\n  name: cluster\nspec: {}\n"
        );
    }
}
