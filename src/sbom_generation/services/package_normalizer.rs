use crate::sbom_generation::domain::{
    package_url, Component, ExternalReference, PackageUrl, RawPackage, SpecVersion,
};
use crate::sbom_generation::services::{HashProcessor, TypeClassifier};

/// Placeholder versions emitted by best-effort parsers
const SENTINEL_VERSIONS: [&str; 2] = ["dummy", "ignore"];

/// PackageNormalizer service turning raw records into canonical components
///
/// Holds the per-run settings that shape a component: the ecosystem purl
/// type used when a record carries no purl, and the schema version that
/// decides whether evidence is kept.
#[derive(Debug, Clone)]
pub struct PackageNormalizer {
    ecosystem: String,
    spec_version: SpecVersion,
}

impl PackageNormalizer {
    pub fn new(ecosystem: &str, spec_version: SpecVersion) -> Self {
        Self {
            ecosystem: ecosystem.trim().to_ascii_lowercase(),
            spec_version,
        }
    }

    pub fn ecosystem(&self) -> &str {
        &self.ecosystem
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    /// Returns true when a record must be skipped without producing a component
    pub fn should_skip(raw: &RawPackage) -> bool {
        raw.name.trim().is_empty()
            || raw.version.trim().is_empty()
            || SENTINEL_VERSIONS.contains(&raw.version.trim())
    }

    /// Normalizes one raw record
    ///
    /// # Returns
    /// `None` for records that are skipped silently (empty name or version,
    /// sentinel version) or whose purl cannot be built.
    pub fn normalize(&self, raw: &RawPackage) -> Option<Component> {
        if Self::should_skip(raw) {
            tracing::debug!(
                name = %raw.name,
                version = %raw.version,
                "skipping incomplete package record"
            );
            return None;
        }

        let (group, name) = self.split_scoped_name(raw);
        let purl = match raw.purl.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(purl) => purl.trim().to_string(),
            None => self.build_purl(raw, group.as_deref(), &name)?,
        };
        let bom_ref = package_url::decode_component(&purl);

        let component_type = TypeClassifier::classify(raw, Some(&purl));
        let mut component = Component::new(component_type, name, raw.version.trim(), bom_ref);
        component.group = group;
        component.purl = Some(purl);
        component.description = raw.description.clone();
        component.author = raw.author.clone().filter(|a| !a.trim().is_empty());
        component.publisher = raw.publisher.clone();
        component.scope = raw.scope();
        component.hashes = HashProcessor::process(raw);
        component.licenses = raw.licenses.clone();
        component.external_references = Self::external_references(raw);
        component.properties = raw.properties.clone();
        if self.spec_version.supports_evidence() {
            component.evidence = raw.evidence.clone();
        }
        component.components = raw
            .components
            .iter()
            .filter_map(|sub| self.normalize(sub))
            .collect();

        Some(component)
    }

    /// Splits npm `@scope/name` into group and name when no group is declared
    fn split_scoped_name(&self, raw: &RawPackage) -> (Option<String>, String) {
        let name = raw.name.trim();
        let group = raw.group.clone().filter(|g| !g.trim().is_empty());
        if group.is_none() && self.ecosystem == "npm" && name.starts_with('@') {
            if let Some((scope, bare)) = name.split_once('/') {
                if !bare.is_empty() {
                    return (Some(scope.to_string()), bare.to_string());
                }
            }
        }
        (group, name.to_string())
    }

    fn build_purl(&self, raw: &RawPackage, group: Option<&str>, name: &str) -> Option<String> {
        let purl = match PackageUrl::new(&self.ecosystem, name) {
            Ok(purl) => purl,
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "cannot build purl, skipping record");
                return None;
            }
        };

        let mut purl = purl
            .with_namespace(group)
            .with_version(Some(raw.version.trim()))
            .with_subpath(raw.subpath.as_deref());
        if let Some(qualifiers) = &raw.qualifiers {
            purl = purl.with_qualifiers(qualifiers.iter());
        }
        Some(purl.to_string())
    }

    /// Explicit references win; otherwise homepage, bugs, repository and distribution urls
    fn external_references(raw: &RawPackage) -> Vec<ExternalReference> {
        let mut references = Vec::new();
        if let Some(explicit) = &raw.external_references {
            references.extend(explicit.iter().cloned());
        } else {
            if let Some(homepage) = &raw.homepage {
                let reference_type = if homepage.url().contains("git") {
                    "vcs"
                } else {
                    "website"
                };
                references.push(ExternalReference::new(reference_type, homepage.url()));
            }
            if let Some(bugs) = &raw.bugs {
                references.push(ExternalReference::new("issue-tracker", bugs.url()));
            }
            if let Some(repository) = &raw.repository {
                references.push(ExternalReference::new("vcs", repository.url()));
            }
            if let Some(distribution) = &raw.distribution {
                references.push(ExternalReference::new("distribution", distribution.url()));
            }
        }

        references
            .into_iter()
            .map(|mut r| {
                r.url = r.url.trim().to_string();
                r
            })
            .filter(|r| !r.url.is_empty() && !r.url.contains(char::is_whitespace))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{ComponentType, RawUrl, Scope};
    use std::collections::BTreeMap;

    fn npm() -> PackageNormalizer {
        PackageNormalizer::new("npm", SpecVersion::V1_6)
    }

    #[test]
    fn test_normalize_builds_purl_and_bom_ref() {
        let component = npm().normalize(&RawPackage::new("lodash", "4.17.21")).unwrap();
        assert_eq!(component.purl.as_deref(), Some("pkg:npm/lodash@4.17.21"));
        assert_eq!(component.bom_ref, "pkg:npm/lodash@4.17.21");
        assert_eq!(component.component_type, ComponentType::Library);
    }

    #[test]
    fn test_normalize_scoped_npm_name() {
        let component = npm()
            .normalize(&RawPackage::new("@angular/core", "17.0.1"))
            .unwrap();
        assert_eq!(component.group.as_deref(), Some("@angular"));
        assert_eq!(component.name, "core");
        assert_eq!(component.purl.as_deref(), Some("pkg:npm/%40angular/core@17.0.1"));
        assert_eq!(component.bom_ref, "pkg:npm/@angular/core@17.0.1");
    }

    #[test]
    fn test_normalize_keeps_declared_purl() {
        let mut raw = RawPackage::new("core", "17.0.1");
        raw.purl = Some("pkg:npm/%40angular/core@17.0.1".to_string());
        let component = npm().normalize(&raw).unwrap();
        assert_eq!(component.purl.as_deref(), Some("pkg:npm/%40angular/core@17.0.1"));
        assert_eq!(component.bom_ref, "pkg:npm/@angular/core@17.0.1");
    }

    #[test]
    fn test_normalize_with_qualifiers_and_subpath() {
        let mut raw = RawPackage::new("guava", "32.1.3-jre");
        raw.group = Some("com.google.guava".to_string());
        let mut qualifiers = BTreeMap::new();
        qualifiers.insert("type".to_string(), "jar".to_string());
        raw.qualifiers = Some(qualifiers);
        raw.subpath = Some("lib".to_string());

        let component = PackageNormalizer::new("maven", SpecVersion::V1_6)
            .normalize(&raw)
            .unwrap();
        assert_eq!(
            component.purl.as_deref(),
            Some("pkg:maven/com.google.guava/guava@32.1.3-jre?type=jar#lib")
        );
    }

    #[test]
    fn test_skip_rules() {
        let normalizer = npm();
        assert!(normalizer.normalize(&RawPackage::new("", "1.0.0")).is_none());
        assert!(normalizer.normalize(&RawPackage::new("a", "")).is_none());
        assert!(normalizer.normalize(&RawPackage::new("a", "dummy")).is_none());
        assert!(normalizer.normalize(&RawPackage::new("a", "ignore")).is_none());
        assert!(normalizer.normalize(&RawPackage::new("a", "1.0.0")).is_some());
    }

    #[test]
    fn test_evidence_dropped_below_1_5() {
        let mut raw = RawPackage::new("a", "1.0.0");
        raw.evidence = Some(serde_json::json!({"identity": {"field": "purl"}}));

        let old = PackageNormalizer::new("npm", SpecVersion::V1_4).normalize(&raw).unwrap();
        assert!(old.evidence.is_none());

        let new = PackageNormalizer::new("npm", SpecVersion::V1_5).normalize(&raw).unwrap();
        assert!(new.evidence.is_some());
    }

    #[test]
    fn test_scope_hashes_and_nested_components() {
        let mut raw = RawPackage::new("app", "1.0.0");
        raw.scope = Some("optional".to_string());
        raw.shasum = Some("679591c564c3bffaae8454cf0b3df370c3d6911c".to_string());
        raw.components = vec![RawPackage::new("sub", "1.0.0"), RawPackage::new("bad", "dummy")];

        let component = npm().normalize(&raw).unwrap();
        assert_eq!(component.scope, Some(Scope::Optional));
        assert_eq!(component.hashes.len(), 1);
        assert_eq!(component.components.len(), 1);
        assert_eq!(component.components[0].name, "sub");
    }

    #[test]
    fn test_external_references_from_urls() {
        let mut raw = RawPackage::new("lodash", "4.17.21");
        raw.homepage = Some(RawUrl::Plain("https://lodash.com/".to_string()));
        raw.bugs = Some(RawUrl::Object {
            url: "https://github.com/lodash/lodash/issues".to_string(),
        });
        raw.repository = Some(RawUrl::Plain(
            " git+https://github.com/lodash/lodash.git ".to_string(),
        ));
        raw.distribution = Some(RawUrl::Plain(String::new()));

        let component = npm().normalize(&raw).unwrap();
        let refs: Vec<(&str, &str)> = component
            .external_references
            .iter()
            .map(|r| (r.reference_type.as_str(), r.url.as_str()))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("website", "https://lodash.com/"),
                ("issue-tracker", "https://github.com/lodash/lodash/issues"),
                ("vcs", "git+https://github.com/lodash/lodash.git"),
            ]
        );
    }

    #[test]
    fn test_git_homepage_is_vcs() {
        let mut raw = RawPackage::new("a", "1.0.0");
        raw.homepage = Some(RawUrl::Plain("https://github.com/a/a".to_string()));
        let component = npm().normalize(&raw).unwrap();
        assert_eq!(component.external_references[0].reference_type, "vcs");
    }
}
