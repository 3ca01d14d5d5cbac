use crate::sbom_generation::domain::{Aggregate, Bom, Component, Composition, Dependency, Scope};
use crate::shared::Result;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};

/// Maximum number of include/exclude strings to prevent DoS attacks
const MAX_FILTER_PATTERNS: usize = 64;

/// Maximum length of a single include/exclude string
const MAX_PATTERN_LENGTH: usize = 255;

/// Criteria for the post-generation filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Drop components whose scope is optional or excluded
    pub required_only: bool,
    /// Keep only components whose purl contains every one of these strings
    pub only: Vec<String>,
    /// Drop components whose purl or any property value contains one of these strings
    pub filter: Vec<String>,
    /// Record an incomplete root composition when components were removed
    pub auto_compositions: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            required_only: false,
            only: Vec::new(),
            filter: Vec::new(),
            auto_compositions: true,
        }
    }
}

impl FilterCriteria {
    /// True when no criterion would remove anything
    pub fn is_empty(&self) -> bool {
        !self.required_only && self.only.is_empty() && self.filter.is_empty()
    }
}

/// BomFilter - removes components from an assembled BOM and keeps the graph consistent
///
/// When any component is removed the dependency list is rebuilt over the
/// surviving refs in the same pass. Components and dependencies are always
/// replaced together, never one without the other.
///
/// Matching is a case-insensitive substring test.
#[derive(Debug)]
pub struct BomFilter {
    required_only: bool,
    only: Vec<SubstringPattern>,
    exclude: Vec<SubstringPattern>,
    auto_compositions: bool,
}

impl BomFilter {
    /// Creates a new BomFilter from criteria
    ///
    /// # Errors
    /// - Too many include or exclude strings (> MAX_FILTER_PATTERNS)
    /// - An empty or overlong string
    pub fn new(criteria: FilterCriteria) -> Result<Self> {
        let only = compile_patterns(criteria.only, "--only")?;
        let exclude = compile_patterns(criteria.filter, "--filter")?;

        Ok(Self {
            required_only: criteria.required_only,
            only,
            exclude,
            auto_compositions: criteria.auto_compositions,
        })
    }

    /// Applies the filter to a BOM
    ///
    /// # Returns
    /// The BOM unchanged when nothing was removed; otherwise a BOM with the
    /// surviving components, a rebuilt dependency list and, for schema 1.5+
    /// with auto compositions enabled, an incomplete root composition.
    pub fn apply(&self, bom: Bom) -> Bom {
        let mut parts = bom.into_parts();
        let before = parts.components.len();
        parts.components.retain(|c| self.keeps(c));

        let removed = before - parts.components.len();
        if removed == 0 {
            return Bom::from_parts(parts);
        }
        tracing::debug!(removed, remaining = parts.components.len(), "filter removed components");

        let mut surviving: HashSet<&str> =
            parts.components.iter().map(|c| c.bom_ref.as_str()).collect();
        if let Some(root) = parts.metadata.component() {
            surviving.insert(root.bom_ref.as_str());
            surviving.extend(root.components.iter().map(|c| c.bom_ref.as_str()));
        }
        let dependencies = rebuild_dependencies(&parts.dependencies, &surviving);
        parts.dependencies = dependencies;

        if parts.spec_version.supports_compositions() && self.auto_compositions {
            if let Some(root) = parts.metadata.component() {
                parts.compositions.push(Composition {
                    aggregate: self.aggregate(),
                    assemblies: vec![root.bom_ref.clone()],
                });
            }
        }

        Bom::from_parts(parts)
    }

    /// Aggregate recorded when the filter changed the graph
    fn aggregate(&self) -> Aggregate {
        if self.only.is_empty() {
            Aggregate::Incomplete
        } else {
            Aggregate::IncompleteFirstPartyOnly
        }
    }

    fn keeps(&self, component: &Component) -> bool {
        if self.required_only
            && matches!(component.scope, Some(Scope::Optional) | Some(Scope::Excluded))
        {
            return false;
        }

        let purl = component
            .purl
            .as_deref()
            .unwrap_or(&component.bom_ref)
            .to_lowercase();

        if !self.only.is_empty() {
            // every pattern is tested so unmatched reporting stays accurate
            let hits = self.only.iter().filter(|p| p.matches(&purl)).count();
            if hits != self.only.len() {
                return false;
            }
        }

        if !self.exclude.is_empty() {
            let property_values: Vec<String> = component
                .properties
                .iter()
                .map(|p| p.value.to_lowercase())
                .collect();
            let excluded = self
                .exclude
                .iter()
                .filter(|p| p.matches(&purl) || property_values.iter().any(|v| p.matches(v)))
                .count();
            if excluded > 0 {
                return false;
            }
        }

        true
    }

    /// Returns the include/exclude strings that did not match any component
    ///
    /// Should be called after [`BomFilter::apply`].
    pub fn get_unmatched_patterns(&self) -> Vec<String> {
        self.only
            .iter()
            .chain(self.exclude.iter())
            .filter(|p| !*p.matched.borrow())
            .map(|p| p.original.clone())
            .collect()
    }
}

/// Keeps edges whose ref survived, intersecting dependsOn and provides with the survivors
fn rebuild_dependencies(dependencies: &[Dependency], surviving: &HashSet<&str>) -> Vec<Dependency> {
    let keep = |targets: &BTreeSet<String>| -> BTreeSet<String> {
        targets
            .iter()
            .filter(|t| surviving.contains(t.as_str()))
            .cloned()
            .collect()
    };

    dependencies
        .iter()
        .filter(|d| surviving.contains(d.bom_ref.as_str()))
        .map(|d| Dependency {
            bom_ref: d.bom_ref.clone(),
            depends_on: keep(&d.depends_on),
            provides: d.provides.as_ref().map(&keep).filter(|p| !p.is_empty()),
        })
        .collect()
}

/// A single include or exclude string with match tracking
#[derive(Debug)]
struct SubstringPattern {
    original: String,
    needle: String,
    matched: RefCell<bool>,
}

impl SubstringPattern {
    fn new(pattern: String, flag: &str) -> Result<Self> {
        validate_pattern(&pattern, flag)?;
        Ok(Self {
            needle: pattern.to_lowercase(),
            original: pattern,
            matched: RefCell::new(false),
        })
    }

    /// `haystack` must already be lowercased
    fn matches(&self, haystack: &str) -> bool {
        let is_match = haystack.contains(&self.needle);
        if is_match {
            *self.matched.borrow_mut() = true;
        }
        is_match
    }
}

fn compile_patterns(patterns: Vec<String>, flag: &str) -> Result<Vec<SubstringPattern>> {
    if patterns.len() > MAX_FILTER_PATTERNS {
        anyhow::bail!(
            "Too many {} values: {} (maximum: {})",
            flag,
            patterns.len(),
            MAX_FILTER_PATTERNS
        );
    }
    patterns
        .into_iter()
        .map(|p| SubstringPattern::new(p, flag))
        .collect()
}

fn validate_pattern(pattern: &str, flag: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        anyhow::bail!("{} value cannot be empty", flag);
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "{} value is too long: '{}' ({} chars). Maximum: {} chars",
            flag,
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    Ok(())
}
