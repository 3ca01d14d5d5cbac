use crate::sbom_generation::domain::{ComponentType, PackageUrl, RawPackage};
use crate::sbom_generation::policies::FrameworkPolicy;

/// TypeClassifier service assigning a component kind
///
/// Rules are evaluated in order and the first match wins:
/// 1. declared type `application`
/// 2. purl type `docker`, `oci` or `container` -> container
/// 3. purl type `github` -> application
/// 4. purl namespace or name matches a framework token -> framework
/// 5. group `actions` -> application
/// 6. keyword `framework` (any case) -> framework
/// 7. library
pub struct TypeClassifier;

impl TypeClassifier {
    /// Classifies a raw record
    ///
    /// # Arguments
    /// * `raw` - The raw package record
    /// * `derived_purl` - Purl built by the normalizer, used when the record has none
    ///
    /// # Returns
    /// The component type. Never fails: an unparsable purl skips rules 2-4.
    pub fn classify(raw: &RawPackage, derived_purl: Option<&str>) -> ComponentType {
        if raw.declared_type.as_deref() == Some("application") {
            return ComponentType::Application;
        }

        if let Some(purl_str) = raw.purl.as_deref().or(derived_purl) {
            match purl_str.parse::<PackageUrl>() {
                Ok(purl) => {
                    if let Some(component_type) = Self::classify_purl(&purl) {
                        return component_type;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        purl = purl_str,
                        error = %e,
                        "unparsable purl, skipping purl rules"
                    );
                }
            }
        }

        if raw.group.as_deref() == Some("actions") {
            return ComponentType::Application;
        }

        if raw
            .keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case("framework"))
        {
            return ComponentType::Framework;
        }

        ComponentType::Library
    }

    fn classify_purl(purl: &PackageUrl) -> Option<ComponentType> {
        match purl.purl_type() {
            "docker" | "oci" | "container" => return Some(ComponentType::Container),
            "github" => return Some(ComponentType::Application),
            _ => {}
        }

        let namespace_match = purl
            .namespace()
            .is_some_and(FrameworkPolicy::matches_namespace);
        if namespace_match || FrameworkPolicy::matches_name(purl.name()) {
            return Some(ComponentType::Framework);
        }

        None
    }
}
