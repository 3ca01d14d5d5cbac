use crate::sbom_generation::domain::{
    package_url, Component, Dependency, RawDependency, RawPackage,
};
use crate::sbom_generation::services::{ComponentTrimmer, PackageNormalizer};
use indexmap::IndexMap;

/// Maximum nesting depth followed while walking raw dependency trees.
/// Bounds stack use on adversarially deep input; finiteness already bounds the walk.
const MAX_TRAVERSAL_DEPTH: usize = 512;

/// Counters describing one or more registration passes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationStats {
    pub registered: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub back_references: usize,
}

/// ComponentRegistry - per-run registry of canonical components keyed by purl
///
/// The registry is the only cycle-breaking mechanism of the traversal: before
/// descending into a node's dependencies it checks whether the node's purl is
/// already registered, and stops there if so. Two different raw nodes that
/// normalize to the same purl therefore collapse into the first one seen.
///
/// Keys are the trimmer's identity keys, so purls differing only in case are
/// one component and every edge target names the first-registered bom-ref.
///
/// One registry is created per generation run and threaded through every
/// scan pass, so concurrent runs never share state.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, Component>,
    edges: Vec<Dependency>,
    stats: RegistrationStats,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks the dependencies of a root record without registering the root
    ///
    /// # Returns
    /// The bom-refs of the root's direct dependencies, in declaration order
    pub fn register_root(
        &mut self,
        normalizer: &PackageNormalizer,
        root: &RawPackage,
    ) -> Vec<String> {
        self.visit_dependencies(normalizer, root, 0)
    }

    /// Registers a package record and everything reachable from it
    ///
    /// # Returns
    /// The bom-ref of the record's component (new or previously registered),
    /// or `None` when the record was skipped
    pub fn register_package(
        &mut self,
        normalizer: &PackageNormalizer,
        package: &RawPackage,
    ) -> Option<String> {
        self.visit(normalizer, package, 0)
    }

    /// Registers every record of a flat package list
    pub fn register_all(&mut self, normalizer: &PackageNormalizer, packages: &[RawPackage]) {
        for package in packages {
            self.visit(normalizer, package, 0);
        }
    }

    fn visit(
        &mut self,
        normalizer: &PackageNormalizer,
        package: &RawPackage,
        depth: usize,
    ) -> Option<String> {
        if depth > MAX_TRAVERSAL_DEPTH {
            tracing::warn!(
                name = %package.name,
                max_depth = MAX_TRAVERSAL_DEPTH,
                "dependency tree too deep, not descending further"
            );
            return None;
        }

        let Some(component) = normalizer.normalize(package) else {
            self.stats.skipped += 1;
            self.visit_dependencies(normalizer, package, depth);
            return None;
        };

        let key = ComponentTrimmer::identity_key(&component)
            .unwrap_or_else(|| component.bom_ref.to_lowercase());
        if let Some(existing) = self.components.get(&key) {
            self.stats.duplicates += 1;
            tracing::debug!(purl = %key, "already registered, stopping traversal here");
            return Some(existing.bom_ref.clone());
        }

        let bom_ref = component.bom_ref.clone();
        self.components.insert(key, component);
        self.stats.registered += 1;

        let targets = self.visit_dependencies(normalizer, package, depth);
        if !targets.is_empty() {
            self.edges.push(Dependency::new(bom_ref.clone(), targets));
        }

        Some(bom_ref)
    }

    /// Visits nested records; string entries are back-references and are only
    /// recorded as edge targets
    fn visit_dependencies(
        &mut self,
        normalizer: &PackageNormalizer,
        package: &RawPackage,
        depth: usize,
    ) -> Vec<String> {
        let mut targets = Vec::new();
        for dependency in package.dependencies.values() {
            match dependency {
                RawDependency::Record(child) => {
                    if let Some(child_ref) = self.visit(normalizer, child, depth + 1) {
                        targets.push(child_ref);
                    }
                }
                RawDependency::BackReference(purl) => {
                    self.stats.back_references += 1;
                    if !purl.trim().is_empty() {
                        let target = package_url::decode_component(purl.trim());
                        targets.push(self.canonical_ref(target));
                    }
                }
            }
        }
        targets
    }

    /// Bom-ref of the registered component a reference resolves to, or the
    /// reference itself when nothing matching is registered yet
    fn canonical_ref(&self, reference: String) -> String {
        self.get(&reference)
            .map(|existing| existing.bom_ref.clone())
            .unwrap_or(reference)
    }

    pub fn contains(&self, purl: &str) -> bool {
        self.components.contains_key(&purl.to_lowercase())
    }

    pub fn get(&self, purl: &str) -> Option<&Component> {
        self.components.get(&purl.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn stats(&self) -> RegistrationStats {
        self.stats
    }

    /// Edges implied by nested `dependencies` maps, one per registered node
    pub fn edges(&self) -> &[Dependency] {
        &self.edges
    }

    /// Components in first-registration order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn into_parts(self) -> (Vec<Component>, Vec<Dependency>) {
        (self.components.into_values().collect(), self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::SpecVersion;

    fn npm() -> PackageNormalizer {
        PackageNormalizer::new("npm", SpecVersion::V1_6)
    }

    #[test]
    fn test_mutual_cycle_registers_each_node_once() {
        // A -> B -> A, the inner A being a second copy of the same record
        let inner_a = RawPackage::new("a", "1.0.0");
        let b = RawPackage::new("b", "1.0.0").with_dependency("a", inner_a);
        let a = RawPackage::new("a", "1.0.0").with_dependency("b", b);

        let mut registry = ComponentRegistry::new();
        let a_ref = registry.register_package(&npm(), &a);

        assert_eq!(a_ref.as_deref(), Some("pkg:npm/a@1.0.0"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.stats().duplicates, 1);
        let names: Vec<&str> = registry.components().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_self_cycle_terminates() {
        let a = RawPackage::new("a", "1.0.0").with_dependency("a", RawPackage::new("a", "1.0.0"));
        let mut registry = ComponentRegistry::new();
        registry.register_package(&npm(), &a);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_back_references_are_not_visited() {
        let a = RawPackage::new("a", "1.0.0")
            .with_back_reference("b", "pkg:npm/b@2.0.0")
            .with_dependency("c", RawPackage::new("c", "3.0.0"));

        let mut registry = ComponentRegistry::new();
        registry.register_package(&npm(), &a);

        assert_eq!(registry.len(), 2);
        assert!(!registry.contains("pkg:npm/b@2.0.0"));
        assert_eq!(registry.stats().back_references, 1);
        assert_eq!(
            registry.edges(),
            &[Dependency::new("pkg:npm/a@1.0.0", ["pkg:npm/b@2.0.0", "pkg:npm/c@3.0.0"])]
        );
    }

    #[test]
    fn test_first_registration_wins() {
        let mut first = RawPackage::new("lodash", "4.17.21");
        first.description = Some("from lockfile".to_string());
        let mut second = RawPackage::new("lodash", "4.17.21");
        second.description = Some("from node_modules".to_string());

        let mut registry = ComponentRegistry::new();
        registry.register_all(&npm(), &[first, second]);

        assert_eq!(registry.len(), 1);
        let lodash = registry.get("pkg:npm/lodash@4.17.21").unwrap();
        assert_eq!(lodash.description.as_deref(), Some("from lockfile"));
    }

    #[test]
    fn test_skipped_node_children_are_still_visited() {
        let placeholder = RawPackage::new("workspace", "dummy")
            .with_dependency("x", RawPackage::new("x", "1.0.0"));
        let mut registry = ComponentRegistry::new();
        let result = registry.register_package(&npm(), &placeholder);

        assert!(result.is_none());
        assert_eq!(registry.stats().skipped, 1);
        assert!(registry.contains("pkg:npm/x@1.0.0"));
    }

    #[test]
    fn test_register_root_does_not_register_root() {
        let root = RawPackage::new("app", "1.0.0")
            .with_dependency("a", RawPackage::new("a", "1.0.0"))
            .with_dependency("b", RawPackage::new("b", "2.0.0"));

        let mut registry = ComponentRegistry::new();
        let direct = registry.register_root(&npm(), &root);

        assert_eq!(direct, vec!["pkg:npm/a@1.0.0", "pkg:npm/b@2.0.0"]);
        assert!(!registry.contains("pkg:npm/app@1.0.0"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_depth_guard_stops_descent() {
        let mut chain = RawPackage::new("leaf", "1.0.0");
        for i in 0..(MAX_TRAVERSAL_DEPTH + 5) {
            chain = RawPackage::new(format!("n{}", i), "1.0.0").with_dependency("next", chain);
        }
        let mut registry = ComponentRegistry::new();
        registry.register_package(&npm(), &chain);

        assert_eq!(registry.len(), MAX_TRAVERSAL_DEPTH + 1);
        assert!(!registry.contains("pkg:npm/leaf@1.0.0"));
    }

    fn pypi_record(name: &str, purl: &str) -> RawPackage {
        let mut record = RawPackage::new(name, "4.2");
        record.purl = Some(purl.to_string());
        record
    }

    #[test]
    fn test_purl_case_variants_share_one_identity() {
        let root = RawPackage::new("app", "1.0.0")
            .with_dependency("Django", pypi_record("Django", "pkg:pypi/Django@4.2"))
            .with_dependency("django", pypi_record("django", "pkg:pypi/django@4.2"))
            .with_back_reference("django-ref", "pkg:pypi/DJANGO@4.2");

        let pypi = PackageNormalizer::new("pypi", SpecVersion::V1_6);
        let mut registry = ComponentRegistry::new();
        let direct = registry.register_root(&pypi, &root);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.stats().duplicates, 1);
        assert_eq!(direct, vec!["pkg:pypi/Django@4.2"; 3]);
        assert!(registry.contains("pkg:pypi/django@4.2"));
        assert_eq!(
            registry.get("pkg:pypi/django@4.2").map(|c| c.bom_ref.as_str()),
            Some("pkg:pypi/Django@4.2")
        );
    }

    #[test]
    fn test_into_parts_preserves_order() {
        let mut registry = ComponentRegistry::new();
        registry.register_all(
            &npm(),
            &[RawPackage::new("z", "1"), RawPackage::new("a", "1"), RawPackage::new("m", "1")],
        );
        let (components, edges) = registry.into_parts();
        let names: Vec<String> = components.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert!(edges.is_empty());
    }
}
