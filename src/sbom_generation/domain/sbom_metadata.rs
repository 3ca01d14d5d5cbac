use super::component::{Component, Property};

/// Identity of the tool producing the BOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolIdentity {
    vendor: String,
    name: String,
    version: String,
}

impl ToolIdentity {
    pub fn new(vendor: &str, name: &str, version: &str) -> Self {
        Self {
            vendor: vendor.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for ToolIdentity {
    fn default() -> Self {
        Self::new(
            "sbom-assembler",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        )
    }
}

/// SbomMetadata value object representing the BOM header
#[derive(Debug, Clone, PartialEq)]
pub struct SbomMetadata {
    timestamp: String,
    serial_number: String,
    tool: ToolIdentity,
    authors: Vec<String>,
    component: Option<Component>,
    properties: Vec<Property>,
}

impl SbomMetadata {
    pub fn new(
        timestamp: String,
        serial_number: String,
        tool: ToolIdentity,
        authors: Vec<String>,
    ) -> Self {
        Self {
            timestamp,
            serial_number,
            tool,
            authors,
            component: None,
            properties: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: Option<Component>) -> Self {
        self.component = component;
        self
    }

    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// Appends properties, keeping the ones already present
    pub fn extend_properties(&mut self, properties: impl IntoIterator<Item = Property>) {
        self.properties.extend(properties);
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn tool(&self) -> &ToolIdentity {
        &self.tool
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn component(&self) -> Option<&Component> {
        self.component.as_ref()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}
