use serde::{Deserialize, Serialize};

/// Container image metadata exported by the image collaborator.
///
/// Only used as an optional source of `oci:image:*` metadata properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProvenance {
    pub inspect_data: Option<ImageInspectData>,
    pub manifest: Vec<ImageManifest>,
    pub last_layer_config: Option<LastLayerConfig>,
    /// Package types of the OS components found in the image
    pub component_types: Vec<String>,
}

/// Subset of `docker inspect` output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ImageInspectData {
    pub id: Option<String>,
    pub repo_tags: Vec<String>,
    pub repo_digests: Vec<String>,
    pub created: Option<String>,
    pub architecture: Option<String>,
    pub os: Option<String>,
}

/// One entry of an image `manifest.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ImageManifest {
    pub config: Option<String>,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LastLayerConfig {
    pub id: Option<String>,
    pub parent: Option<String>,
    pub created: Option<String>,
    pub config: Option<LayerRuntimeConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LayerRuntimeConfig {
    pub env: Vec<String>,
    pub cmd: Vec<String>,
}
