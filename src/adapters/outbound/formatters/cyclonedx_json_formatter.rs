use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{
    Bom, Component, ComponentType, Composition, Dependency, ExternalReference, Hash,
    LicenseChoice, Property, SbomMetadata, Scope, Service, SpecVersion, ToolIdentity,
};
use crate::sbom_generation::services::{BomIdentity, ComponentTrimmer};
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBom {
    bom_format: &'static str,
    spec_version: &'static str,
    serial_number: String,
    version: u32,
    metadata: JsonMetadata,
    components: Vec<JsonComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    services: Vec<Service>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<Dependency>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    compositions: Vec<Composition>,
}

#[derive(Debug, Serialize)]
struct JsonMetadata {
    timestamp: String,
    tools: JsonTools,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<JsonContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<JsonComponent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

/// `tools` changed shape between schema 1.4 and 1.5
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum JsonTools {
    Components { components: Vec<JsonToolComponent> },
    Legacy(Vec<JsonLegacyTool>),
}

#[derive(Debug, Serialize)]
struct JsonToolComponent {
    #[serde(rename = "type")]
    component_type: ComponentType,
    publisher: String,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct JsonLegacyTool {
    vendor: String,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct JsonContact {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonComponent {
    #[serde(rename = "type")]
    component_type: ComponentType,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    authors: Vec<JsonContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<Scope>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<Hash>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<LicenseChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<ExternalReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    components: Vec<JsonComponent>,
}

impl BomIdentity for JsonComponent {
    fn purl(&self) -> Option<&str> {
        self.purl.as_deref()
    }

    fn bom_ref(&self) -> Option<&str> {
        Some(&self.bom_ref)
    }

    fn fallback_key(&self) -> Option<String> {
        Some(format!("{}@{}", self.name, self.version))
    }
}

/// CycloneDxJsonFormatter adapter producing the flat-record JSON tree
///
/// Every field is a plain key/value pair. Services, dependencies and
/// compositions appear only when non-empty; `components` is always present.
pub struct CycloneDxJsonFormatter;

impl CycloneDxJsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxJsonFormatter {
    fn format(&self, bom: &Bom) -> Result<String> {
        let json = self.project(bom);
        serde_json::to_string_pretty(&json).map_err(Into::into)
    }
}

impl CycloneDxJsonFormatter {
    fn project(&self, bom: &Bom) -> JsonBom {
        let spec = bom.spec_version();
        let components = bom
            .components()
            .iter()
            .map(|c| self.build_component(c, spec))
            .collect();
        let compositions = if spec.supports_compositions() {
            bom.compositions().to_vec()
        } else {
            Vec::new()
        };

        JsonBom {
            bom_format: Bom::FORMAT,
            spec_version: spec.as_str(),
            serial_number: bom.serial_number().to_string(),
            version: Bom::VERSION,
            metadata: self.build_metadata(bom.metadata(), spec),
            components: ComponentTrimmer::trim(components),
            services: ComponentTrimmer::trim(bom.services().to_vec()),
            dependencies: ComponentTrimmer::trim(bom.dependencies().to_vec()),
            compositions,
        }
    }

    fn build_metadata(&self, metadata: &SbomMetadata, spec: SpecVersion) -> JsonMetadata {
        JsonMetadata {
            timestamp: metadata.timestamp().to_string(),
            tools: self.build_tools(metadata.tool(), spec),
            authors: metadata
                .authors()
                .iter()
                .map(|name| JsonContact { name: name.clone() })
                .collect(),
            component: metadata
                .component()
                .map(|c| self.build_component(c, spec)),
            properties: metadata.properties().to_vec(),
        }
    }

    fn build_tools(&self, tool: &ToolIdentity, spec: SpecVersion) -> JsonTools {
        if spec.uses_tool_components() {
            JsonTools::Components {
                components: vec![JsonToolComponent {
                    component_type: ComponentType::Application,
                    publisher: tool.vendor().to_string(),
                    name: tool.name().to_string(),
                    version: tool.version().to_string(),
                }],
            }
        } else {
            JsonTools::Legacy(vec![JsonLegacyTool {
                vendor: tool.vendor().to_string(),
                name: tool.name().to_string(),
                version: tool.version().to_string(),
            }])
        }
    }

    fn build_component(&self, component: &Component, spec: SpecVersion) -> JsonComponent {
        // 1.6 replaced the free-text author with a list of contacts
        let (author, authors) = match component.author.as_deref() {
            Some(author) if spec == SpecVersion::V1_6 => (None, split_authors(author)),
            other => (other.map(str::to_string), Vec::new()),
        };
        let nested = component
            .components
            .iter()
            .map(|c| self.build_component(c, spec))
            .collect();

        JsonComponent {
            component_type: component.component_type,
            bom_ref: component.bom_ref.clone(),
            authors,
            author,
            publisher: component.publisher.clone(),
            group: component.group.clone(),
            name: component.name.clone(),
            version: component.version.clone(),
            description: component.description.clone(),
            scope: component.scope,
            hashes: component.hashes.clone(),
            licenses: component.licenses.clone(),
            purl: component.purl.clone(),
            external_references: component.external_references.clone(),
            properties: component.properties.clone(),
            evidence: component
                .evidence
                .clone()
                .filter(|_| spec.supports_evidence()),
            components: ComponentTrimmer::trim(nested),
        }
    }
}

fn split_authors(author: &str) -> Vec<JsonContact> {
    author
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| JsonContact {
            name: name.to_string(),
        })
        .collect()
}
