use super::hash::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a component, decided by the type classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Application,
    Container,
    Framework,
    #[default]
    Library,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Application => "application",
            ComponentType::Container => "container",
            ComponentType::Framework => "framework",
            ComponentType::Library => "library",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "application" => Ok(ComponentType::Application),
            "container" => Ok(ComponentType::Container),
            "framework" => Ok(ComponentType::Framework),
            "library" => Ok(ComponentType::Library),
            other => anyhow::bail!(
                "Invalid component type: {}. Expected application, container, framework or library",
                other
            ),
        }
    }
}

/// Component scope. An absent scope means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Required,
    Optional,
    Excluded,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Required => "required",
            Scope::Optional => "optional",
            Scope::Excluded => "excluded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A license entry as it appears in a component's `licenses` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LicenseChoice {
    License { license: License },
    Expression { expression: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "type")]
    pub reference_type: String,
    pub url: String,
}

impl ExternalReference {
    pub fn new(reference_type: &str, url: &str) -> Self {
        Self {
            reference_type: reference_type.to_string(),
            url: url.to_string(),
        }
    }
}

/// Name/value pair carrying provenance such as the source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Canonical component of the BOM graph, identified by its purl
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub bom_ref: String,
    pub component_type: ComponentType,
    pub group: Option<String>,
    pub name: String,
    pub version: String,
    pub purl: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub scope: Option<Scope>,
    pub hashes: Vec<Hash>,
    pub licenses: Vec<LicenseChoice>,
    pub external_references: Vec<ExternalReference>,
    pub properties: Vec<Property>,
    pub evidence: Option<serde_json::Value>,
    pub components: Vec<Component>,
}

impl Component {
    pub fn new(
        component_type: ComponentType,
        name: impl Into<String>,
        version: impl Into<String>,
        bom_ref: impl Into<String>,
    ) -> Self {
        Self {
            bom_ref: bom_ref.into(),
            component_type,
            group: None,
            name: name.into(),
            version: version.into(),
            purl: None,
            description: None,
            author: None,
            publisher: None,
            scope: None,
            hashes: Vec::new(),
            licenses: Vec::new(),
            external_references: Vec::new(),
            properties: Vec::new(),
            evidence: None,
            components: Vec::new(),
        }
    }

    /// `group/name@version`, or `name@version` without a group
    pub fn full_name(&self) -> String {
        match self.group.as_deref().filter(|g| !g.is_empty()) {
            Some(group) => format!("{}/{}@{}", group, self.name, self.version),
            None => format!("{}@{}", self.name, self.version),
        }
    }

    /// Value of the first property with the given name
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}
