use crate::sbom_generation::domain::{Component, Dependency};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// DependencyMerger service unioning partial edge lists from several scan passes
///
/// Pure algorithm: no I/O, no registry access.
pub struct DependencyMerger;

#[derive(Default)]
struct MergedEdge {
    depends_on: BTreeSet<String>,
    provides: Option<BTreeSet<String>>,
}

impl DependencyMerger {
    /// Merges a new edge list into an accumulated one
    ///
    /// # Arguments
    /// * `existing` - Edges accumulated so far
    /// * `new_edges` - Edges reported by the latest pass
    /// * `parent` - The declared root component, if any
    ///
    /// # Returns
    /// One edge per distinct ref, in first-seen order. Targets that
    /// case-insensitively equal the root's bom-ref are dropped; without a
    /// root nothing is filtered and the result is reported as flattened.
    pub fn merge(
        existing: Vec<Dependency>,
        new_edges: Vec<Dependency>,
        parent: Option<&Component>,
    ) -> Vec<Dependency> {
        let parent_ref = parent.map(|p| p.bom_ref.to_lowercase());
        if parent_ref.is_none() {
            tracing::debug!(
                "Unable to determine parent component. Dependencies will be flattened."
            );
        }
        let is_root = |target: &str| {
            parent_ref
                .as_deref()
                .is_some_and(|root| target.to_lowercase() == root)
        };

        let mut merged: IndexMap<String, MergedEdge> = IndexMap::new();
        for edge in existing.into_iter().chain(new_edges) {
            let entry = merged.entry(edge.bom_ref).or_default();
            entry
                .depends_on
                .extend(edge.depends_on.into_iter().filter(|t| !is_root(t.as_str())));
            if let Some(provides) = edge.provides {
                entry
                    .provides
                    .get_or_insert_with(BTreeSet::new)
                    .extend(provides.into_iter().filter(|t| !is_root(t.as_str())));
            }
        }

        merged
            .into_iter()
            .map(|(bom_ref, edge)| Dependency {
                bom_ref,
                depends_on: edge.depends_on,
                provides: edge.provides.filter(|p| !p.is_empty()),
            })
            .collect()
    }

    /// Renames retired refs to the root's bom-ref
    ///
    /// Used when the root component changed identity after edges were merged.
    /// Renamed edges union with the root's own edge and targets naming the root
    /// are dropped, exactly as in [`DependencyMerger::merge`].
    pub fn rekey(
        edges: Vec<Dependency>,
        retired: &BTreeSet<String>,
        root: &Component,
    ) -> Vec<Dependency> {
        let rename = |reference: String| {
            if retired.contains(&reference) {
                root.bom_ref.clone()
            } else {
                reference
            }
        };
        let renamed = edges
            .into_iter()
            .map(|edge| Dependency {
                bom_ref: rename(edge.bom_ref),
                depends_on: edge.depends_on.into_iter().map(&rename).collect(),
                provides: edge.provides.map(|p| p.into_iter().map(&rename).collect()),
            })
            .collect();
        Self::merge(Vec::new(), renamed, Some(root))
    }
}
