use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

/// CycloneDX schema version a BOM is generated for.
///
/// Process-wide configuration that stays read-only during assembly. Several
/// sections are gated on it: evidence and compositions need 1.5 or later,
/// and the `tools` shape changed with 1.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecVersion {
    V1_4,
    V1_5,
    V1_6,
}

impl SpecVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::V1_4 => "1.4",
            SpecVersion::V1_5 => "1.5",
            SpecVersion::V1_6 => "1.6",
        }
    }

    /// XML namespace of the attribute-style encoding for this version
    pub fn xml_namespace(&self) -> String {
        format!("http://cyclonedx.org/schema/bom/{}", self.as_str())
    }

    pub fn supports_evidence(&self) -> bool {
        *self >= SpecVersion::V1_5
    }

    pub fn supports_compositions(&self) -> bool {
        *self >= SpecVersion::V1_5
    }

    /// Whether `metadata.tools` uses the object form with nested components
    pub fn uses_tool_components(&self) -> bool {
        *self >= SpecVersion::V1_5
    }
}

impl Default for SpecVersion {
    fn default() -> Self {
        SpecVersion::V1_6
    }
}

impl FromStr for SpecVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1.4" => Ok(SpecVersion::V1_4),
            "1.5" => Ok(SpecVersion::V1_5),
            "1.6" => Ok(SpecVersion::V1_6),
            other => anyhow::bail!(
                "Unsupported CycloneDX spec version: {}. Supported versions: 1.4, 1.5, 1.6",
                other
            ),
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
