use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::{
    Bom, Component, Dependency, LicenseChoice, Property, SbomMetadata, Service, SpecVersion,
    ToolIdentity,
};
use crate::sbom_generation::services::{BomIdentity, ComponentTrimmer};
use crate::shared::Result;
use quick_xml::se::Serializer;
use serde::Serialize;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

// Field names starting with `@` become attributes and `$text` becomes the
// element's text node. Attribute fields must precede element fields.

#[derive(Debug, Serialize)]
struct XmlBom {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "@serialNumber")]
    serial_number: String,
    #[serde(rename = "@version")]
    version: u32,
    metadata: XmlMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<XmlComponents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    services: Option<XmlServices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependencies: Option<XmlDependencies>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compositions: Option<XmlCompositions>,
}

#[derive(Debug, Serialize)]
struct XmlMetadata {
    timestamp: String,
    tools: XmlTools,
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<XmlAuthors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<XmlComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<XmlProperties>,
}

#[derive(Debug, Serialize)]
struct XmlTools {
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<XmlToolComponents>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool: Vec<XmlLegacyTool>,
}

#[derive(Debug, Serialize)]
struct XmlToolComponents {
    component: Vec<XmlToolComponent>,
}

#[derive(Debug, Serialize)]
struct XmlToolComponent {
    #[serde(rename = "@type")]
    component_type: String,
    publisher: String,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct XmlLegacyTool {
    vendor: String,
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct XmlAuthors {
    author: Vec<XmlContact>,
}

#[derive(Debug, Serialize)]
struct XmlContact {
    name: String,
}

#[derive(Debug, Serialize)]
struct XmlComponents {
    component: Vec<XmlComponent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct XmlComponent {
    #[serde(rename = "@type")]
    component_type: String,
    #[serde(rename = "@bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<XmlAuthors>,
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
    scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hashes: Option<XmlHashes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    licenses: Option<XmlLicenses>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_references: Option<XmlExternalReferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<XmlProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<XmlComponents>,
}

impl BomIdentity for XmlComponent {
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

#[derive(Debug, Serialize)]
struct XmlHashes {
    hash: Vec<XmlHash>,
}

#[derive(Debug, Serialize)]
struct XmlHash {
    #[serde(rename = "@alg")]
    alg: String,
    #[serde(rename = "$text")]
    content: String,
}

#[derive(Debug, Serialize)]
struct XmlLicenses {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    license: Vec<XmlLicense>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    expression: Vec<String>,
}

#[derive(Debug, Serialize)]
struct XmlLicense {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct XmlExternalReferences {
    reference: Vec<XmlReference>,
}

#[derive(Debug, Serialize)]
struct XmlReference {
    #[serde(rename = "@type")]
    reference_type: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct XmlProperties {
    property: Vec<XmlProperty>,
}

#[derive(Debug, Serialize)]
struct XmlProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Debug, Serialize)]
struct XmlServices {
    service: Vec<XmlService>,
}

#[derive(Debug, Serialize)]
struct XmlService {
    #[serde(rename = "@bom-ref", skip_serializing_if = "Option::is_none")]
    bom_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoints: Option<XmlEndpoints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authenticated: Option<bool>,
    #[serde(rename = "x-trust-boundary", skip_serializing_if = "Option::is_none")]
    trust_boundary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<XmlProperties>,
}

#[derive(Debug, Serialize)]
struct XmlEndpoints {
    endpoint: Vec<String>,
}

#[derive(Debug, Serialize)]
struct XmlDependencies {
    dependency: Vec<XmlDependency>,
}

#[derive(Debug, Serialize)]
struct XmlDependency {
    #[serde(rename = "@ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependency: Vec<XmlRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    provides: Vec<XmlRef>,
}

#[derive(Debug, Serialize)]
struct XmlRef {
    #[serde(rename = "@ref")]
    bom_ref: String,
}

#[derive(Debug, Serialize)]
struct XmlCompositions {
    composition: Vec<XmlComposition>,
}

#[derive(Debug, Serialize)]
struct XmlComposition {
    aggregate: String,
    assemblies: XmlAssemblies,
}

#[derive(Debug, Serialize)]
struct XmlAssemblies {
    assembly: Vec<XmlRef>,
}

/// CycloneDxXmlFormatter adapter producing the attribute-style XML tree
///
/// Identity and type fields are attributes, descriptions and values are
/// text nodes. Empty sections are omitted entirely, including `<components>`.
///
/// Component evidence is not projected. It is held as untyped scan JSON with
/// no fixed element shape, so only the JSON tree emits it (schema 1.5+).
pub struct CycloneDxXmlFormatter;

impl CycloneDxXmlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxXmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxXmlFormatter {
    fn format(&self, bom: &Bom) -> Result<String> {
        let xml = self.project(bom);

        let mut body = String::new();
        let mut serializer = Serializer::with_root(&mut body, Some("bom"))
            .map_err(|e| anyhow::anyhow!("Failed to start XML document: {}", e))?;
        serializer.indent(' ', 2);
        xml.serialize(serializer)
            .map_err(|e| anyhow::anyhow!("Failed to serialize BOM as XML: {}", e))?;

        Ok(format!("{}{}\n", XML_DECLARATION, body))
    }
}

impl CycloneDxXmlFormatter {
    fn project(&self, bom: &Bom) -> XmlBom {
        let spec = bom.spec_version();
        let components: Vec<XmlComponent> = bom
            .components()
            .iter()
            .map(|c| self.build_component(c, spec))
            .collect();
        let services: Vec<XmlService> = ComponentTrimmer::trim(bom.services().to_vec())
            .iter()
            .map(build_service)
            .collect();
        let dependencies: Vec<XmlDependency> =
            ComponentTrimmer::trim(bom.dependencies().to_vec())
                .iter()
                .map(build_dependency)
                .collect();
        let compositions: Vec<XmlComposition> = if spec.supports_compositions() {
            bom.compositions()
                .iter()
                .map(|c| XmlComposition {
                    aggregate: c.aggregate.as_str().to_string(),
                    assemblies: XmlAssemblies {
                        assembly: c
                            .assemblies
                            .iter()
                            .map(|r| XmlRef { bom_ref: r.clone() })
                            .collect(),
                    },
                })
                .collect()
        } else {
            Vec::new()
        };

        XmlBom {
            xmlns: spec.xml_namespace(),
            serial_number: bom.serial_number().to_string(),
            version: Bom::VERSION,
            metadata: self.build_metadata(bom.metadata(), spec),
            components: wrap(ComponentTrimmer::trim(components), |component| {
                XmlComponents { component }
            }),
            services: wrap(services, |service| XmlServices { service }),
            dependencies: wrap(dependencies, |dependency| XmlDependencies { dependency }),
            compositions: wrap(compositions, |composition| XmlCompositions { composition }),
        }
    }

    fn build_metadata(&self, metadata: &SbomMetadata, spec: SpecVersion) -> XmlMetadata {
        XmlMetadata {
            timestamp: metadata.timestamp().to_string(),
            tools: build_tools(metadata.tool(), spec),
            authors: wrap(
                metadata
                    .authors()
                    .iter()
                    .map(|name| XmlContact { name: name.clone() })
                    .collect(),
                |author| XmlAuthors { author },
            ),
            component: metadata
                .component()
                .map(|c| self.build_component(c, spec)),
            properties: build_properties(metadata.properties()),
        }
    }

    fn build_component(&self, component: &Component, spec: SpecVersion) -> XmlComponent {
        let (author, authors) = match component.author.as_deref() {
            Some(author) if spec == SpecVersion::V1_6 => (
                None,
                wrap(
                    author
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(|name| XmlContact {
                            name: name.to_string(),
                        })
                        .collect(),
                    |author| XmlAuthors { author },
                ),
            ),
            other => (other.map(str::to_string), None),
        };
        let nested: Vec<XmlComponent> = component
            .components
            .iter()
            .map(|c| self.build_component(c, spec))
            .collect();

        XmlComponent {
            component_type: component.component_type.as_str().to_string(),
            bom_ref: component.bom_ref.clone(),
            authors,
            author,
            publisher: component.publisher.clone(),
            group: component.group.clone(),
            name: component.name.clone(),
            version: component.version.clone(),
            description: component.description.clone(),
            scope: component.scope.map(|s| s.as_str().to_string()),
            hashes: wrap(
                component
                    .hashes
                    .iter()
                    .map(|h| XmlHash {
                        alg: h.alg.as_str().to_string(),
                        content: h.content.clone(),
                    })
                    .collect(),
                |hash| XmlHashes { hash },
            ),
            licenses: build_licenses(&component.licenses),
            purl: component.purl.clone(),
            external_references: wrap(
                component
                    .external_references
                    .iter()
                    .map(|r| XmlReference {
                        reference_type: r.reference_type.clone(),
                        url: r.url.clone(),
                    })
                    .collect(),
                |reference| XmlExternalReferences { reference },
            ),
            properties: build_properties(&component.properties),
            components: wrap(ComponentTrimmer::trim(nested), |component| XmlComponents {
                component,
            }),
        }
    }
}

/// `None` for an empty list, so the enclosing element is left out
fn wrap<T, W>(items: Vec<T>, f: impl FnOnce(Vec<T>) -> W) -> Option<W> {
    if items.is_empty() {
        None
    } else {
        Some(f(items))
    }
}

fn build_tools(tool: &ToolIdentity, spec: SpecVersion) -> XmlTools {
    if spec.uses_tool_components() {
        XmlTools {
            components: Some(XmlToolComponents {
                component: vec![XmlToolComponent {
                    component_type: "application".to_string(),
                    publisher: tool.vendor().to_string(),
                    name: tool.name().to_string(),
                    version: tool.version().to_string(),
                }],
            }),
            tool: Vec::new(),
        }
    } else {
        XmlTools {
            components: None,
            tool: vec![XmlLegacyTool {
                vendor: tool.vendor().to_string(),
                name: tool.name().to_string(),
                version: tool.version().to_string(),
            }],
        }
    }
}

fn build_properties(properties: &[Property]) -> Option<XmlProperties> {
    wrap(
        properties
            .iter()
            .map(|p| XmlProperty {
                name: p.name.clone(),
                value: p.value.clone(),
            })
            .collect(),
        |property| XmlProperties { property },
    )
}

fn build_licenses(licenses: &[LicenseChoice]) -> Option<XmlLicenses> {
    if licenses.is_empty() {
        return None;
    }
    let mut xml = XmlLicenses {
        license: Vec::new(),
        expression: Vec::new(),
    };
    for choice in licenses {
        match choice {
            LicenseChoice::License { license } => xml.license.push(XmlLicense {
                id: license.id.clone(),
                name: license.name.clone(),
                url: license.url.clone(),
            }),
            LicenseChoice::Expression { expression } => xml.expression.push(expression.clone()),
        }
    }
    Some(xml)
}

fn build_service(service: &Service) -> XmlService {
    XmlService {
        bom_ref: service.bom_ref.clone(),
        group: service.group.clone(),
        name: service.name.clone(),
        version: service.version.clone(),
        description: service.description.clone(),
        endpoints: wrap(service.endpoints.clone(), |endpoint| XmlEndpoints { endpoint }),
        authenticated: service.authenticated,
        trust_boundary: service.trust_boundary,
        properties: build_properties(&service.properties),
    }
}

fn build_dependency(dependency: &Dependency) -> XmlDependency {
    let refs = |targets: &std::collections::BTreeSet<String>| -> Vec<XmlRef> {
        targets
            .iter()
            .map(|t| XmlRef { bom_ref: t.clone() })
            .collect()
    };
    XmlDependency {
        bom_ref: dependency.bom_ref.clone(),
        dependency: refs(&dependency.depends_on),
        provides: dependency.provides.as_ref().map(refs).unwrap_or_default(),
    }
}
