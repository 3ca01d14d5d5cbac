use super::component::{ExternalReference, LicenseChoice, Property, Scope};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Package record as handed over by an ecosystem parser.
///
/// Every field is optional on the wire; presence checks happen in the
/// normalizer, classifier and hash processor, in that precedence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPackage {
    pub name: String,
    pub version: String,
    pub group: Option<String>,
    pub purl: Option<String>,
    pub qualifiers: Option<BTreeMap<String, String>>,
    pub subpath: Option<String>,
    pub description: Option<String>,
    pub licenses: Vec<LicenseChoice>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub scope: Option<String>,
    #[serde(rename = "type")]
    pub declared_type: Option<String>,
    pub hashes: Option<Vec<RawHash>>,
    #[serde(rename = "_shasum")]
    pub shasum: Option<String>,
    #[serde(rename = "_integrity")]
    pub integrity: Option<String>,
    pub keywords: Vec<String>,
    pub properties: Vec<Property>,
    pub evidence: Option<serde_json::Value>,
    pub external_references: Option<Vec<ExternalReference>>,
    pub homepage: Option<RawUrl>,
    pub bugs: Option<RawUrl>,
    pub repository: Option<RawUrl>,
    pub distribution: Option<RawUrl>,
    pub dependencies: IndexMap<String, RawDependency>,
    pub components: Vec<RawPackage>,
}

impl RawPackage {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Declared scope; unrecognised values count as unset
    pub fn scope(&self) -> Option<Scope> {
        match self.scope.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("required") => Some(Scope::Required),
            Some("optional") => Some(Scope::Optional),
            Some("excluded") => Some(Scope::Excluded),
            _ => None,
        }
    }

    /// Adds a nested dependency record under `key`
    pub fn with_dependency(mut self, key: impl Into<String>, dependency: RawPackage) -> Self {
        self.dependencies
            .insert(key.into(), RawDependency::Record(Box::new(dependency)));
        self
    }

    /// Adds a back-reference to an already-resolved node
    pub fn with_back_reference(mut self, key: impl Into<String>, purl: impl Into<String>) -> Self {
        self.dependencies
            .insert(key.into(), RawDependency::BackReference(purl.into()));
        self
    }
}

/// Value of a raw `dependencies` entry.
///
/// String entries are cycle back-references inserted upstream and are never
/// visited as nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDependency {
    BackReference(String),
    Record(Box<RawPackage>),
}

/// Explicit `{alg, content}` digest; the algorithm stays a string until the
/// hash processor validates it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHash {
    #[serde(alias = "alg")]
    pub algorithm: String,
    pub content: String,
}

/// Url field that parsers emit either as a plain string or as `{ "url": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawUrl {
    Plain(String),
    Object { url: String },
}

impl RawUrl {
    pub fn url(&self) -> &str {
        match self {
            RawUrl::Plain(url) => url,
            RawUrl::Object { url } => url,
        }
    }
}
