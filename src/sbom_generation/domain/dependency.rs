use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dependency edge of the BOM graph.
///
/// `depends_on` and `provides` are sets: duplicates collapse and the
/// serialized order is sorted, independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "ref")]
    pub bom_ref: String,
    #[serde(rename = "dependsOn", default)]
    pub depends_on: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<BTreeSet<String>>,
}

impl Dependency {
    pub fn new<I, S>(bom_ref: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bom_ref: bom_ref.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            provides: None,
        }
    }

    pub fn with_provides<I, S>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides = Some(provides.into_iter().map(Into::into).collect());
        self
    }
}

/// Completeness marker for a set of assemblies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Complete,
    Incomplete,
    IncompleteFirstPartyOnly,
    Unknown,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Complete => "complete",
            Aggregate::Incomplete => "incomplete",
            Aggregate::IncompleteFirstPartyOnly => "incomplete_first_party_only",
            Aggregate::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub aggregate: Aggregate,
    pub assemblies: Vec<String>,
}
