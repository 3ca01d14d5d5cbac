use crate::sbom_generation::domain::{Component, Dependency, Service};
use std::collections::HashSet;

/// Identity accessors shared by every entry the trimmer can deduplicate.
///
/// Implemented by the domain types and by both serialization trees, so the
/// same trimming runs on each encoding independently.
pub trait BomIdentity {
    fn purl(&self) -> Option<&str>;

    fn bom_ref(&self) -> Option<&str>;

    /// Key used when an entry has neither purl nor bom-ref
    fn fallback_key(&self) -> Option<String> {
        None
    }
}

/// ComponentTrimmer service removing duplicate entries
///
/// Identity is the purl, falling back to the bom-ref, compared
/// case-insensitively. The first occurrence is kept and survivors keep
/// their relative order. Later duplicates are discarded, never merged.
pub struct ComponentTrimmer;

impl ComponentTrimmer {
    /// Identity key of an entry, `None` when it has no identity at all
    pub fn identity_key<T: BomIdentity>(item: &T) -> Option<String> {
        item.purl()
            .filter(|p| !p.is_empty())
            .or_else(|| item.bom_ref().filter(|r| !r.is_empty()))
            .map(str::to_lowercase)
            .or_else(|| item.fallback_key().map(|k| k.to_lowercase()))
    }

    /// Deduplicates a sequence, keeping first occurrences in order
    ///
    /// Entries without any identity are always kept.
    pub fn trim<T: BomIdentity>(items: Vec<T>) -> Vec<T> {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|item| match Self::identity_key(item) {
                Some(key) => seen.insert(key),
                None => true,
            })
            .collect()
    }
}

impl BomIdentity for Component {
    fn purl(&self) -> Option<&str> {
        self.purl.as_deref()
    }

    fn bom_ref(&self) -> Option<&str> {
        Some(&self.bom_ref)
    }

    fn fallback_key(&self) -> Option<String> {
        Some(self.full_name())
    }
}

impl BomIdentity for Service {
    fn purl(&self) -> Option<&str> {
        None
    }

    fn bom_ref(&self) -> Option<&str> {
        self.bom_ref.as_deref()
    }

    fn fallback_key(&self) -> Option<String> {
        let version = self.version.as_deref().unwrap_or_default();
        Some(format!("{}@{}", self.name, version))
    }
}

impl BomIdentity for Dependency {
    fn purl(&self) -> Option<&str> {
        None
    }

    fn bom_ref(&self) -> Option<&str> {
        Some(&self.bom_ref)
    }
}
