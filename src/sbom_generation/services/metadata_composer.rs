use crate::sbom_generation::domain::{
    Bom, Component, ImageProvenance, PackageUrl, Property, SbomMetadata, ToolIdentity,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// Separator for multi-valued header properties: the two characters `\` and `n`
const LIST_SEPARATOR: &str = "\\n";

const SRC_FILE_PROPERTY: &str = "SrcFile";

/// MetadataComposer service building the BOM header
///
/// Only the header is produced or augmented; the component graph is never
/// touched. The timestamp and serial number are the two fields exempt from
/// deterministic output.
pub struct MetadataComposer;

impl MetadataComposer {
    /// Composes the BOM header
    ///
    /// # Arguments
    /// * `tool` - Identity of the generating tool
    /// * `authors` - Fixed author identities
    /// * `parent` - Declared root component, cleaned before it is attached
    /// * `provenance` - Optional container image metadata
    pub fn compose(
        tool: ToolIdentity,
        authors: Vec<String>,
        parent: Option<Component>,
        provenance: Option<&ImageProvenance>,
    ) -> SbomMetadata {
        let properties = provenance
            .map(Self::provenance_properties)
            .unwrap_or_default();

        SbomMetadata::new(
            Self::generate_timestamp(),
            Self::generate_serial_number(),
            tool,
            authors,
        )
        .with_component(parent.map(Self::clean_parent))
        .with_properties(properties)
    }

    pub fn generate_timestamp() -> String {
        Utc::now().to_rfc3339()
    }

    pub fn generate_serial_number() -> String {
        format!("urn:uuid:{}", Uuid::new_v4())
    }

    /// Prepares the root component for the header
    ///
    /// Evidence is dropped, sub-components identical to the root (by bom-ref
    /// or by full name) are removed and the rest deduplicated by bom-ref. A
    /// root left with exactly one sub-component of the same name collapses
    /// into that sub-component, unless the root is a container.
    pub fn clean_parent(mut parent: Component) -> Component {
        parent.evidence = None;

        let parent_name = parent.full_name();
        let mut seen = HashSet::new();
        let mut subcomponents: Vec<Component> = std::mem::take(&mut parent.components)
            .into_iter()
            .filter(|c| c.bom_ref != parent.bom_ref && c.full_name() != parent_name)
            .filter(|c| seen.insert(c.bom_ref.clone()))
            .collect();

        let is_container = parent
            .purl
            .as_deref()
            .is_some_and(|p| p.starts_with("pkg:container"));
        if subcomponents.len() == 1 && subcomponents[0].name == parent.name && !is_container {
            if let Some(mut only) = subcomponents.pop() {
                tracing::debug!(
                    bom_ref = %only.bom_ref,
                    "collapsing parent into its only sub-component"
                );
                only.evidence = None;
                return only;
            }
        }

        parent.components = subcomponents;
        parent
    }

    /// Header properties derived from container image metadata
    pub fn provenance_properties(provenance: &ImageProvenance) -> Vec<Property> {
        let mut properties = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                properties.push(Property::new(name, value));
            }
        };

        if let Some(inspect) = &provenance.inspect_data {
            push("oci:image:Id", inspect.id.clone());
            push("oci:image:RepoTag", inspect.repo_tags.first().cloned());
            push("oci:image:RepoDigest", inspect.repo_digests.first().cloned());
            push("oci:image:Created", inspect.created.clone());
            push("oci:image:Architecture", inspect.architecture.clone());
            push("oci:image:Os", inspect.os.clone());
        }
        if let Some(manifest) = provenance.manifest.first() {
            push("oci:image:manifest:Config", manifest.config.clone());
            push(
                "oci:image:manifest:Layers",
                Some(manifest.layers.join(LIST_SEPARATOR)),
            );
        }
        if let Some(last_layer) = &provenance.last_layer_config {
            push("oci:image:lastLayer:Id", last_layer.id.clone());
            push("oci:image:lastLayer:ParentId", last_layer.parent.clone());
            push("oci:image:lastLayer:Created", last_layer.created.clone());
            if let Some(config) = &last_layer.config {
                push("oci:image:lastLayer:Env", Some(config.env.join(LIST_SEPARATOR)));
                push("oci:image:lastLayer:Cmd", Some(config.cmd.join(" ")));
            }
        }
        let component_types: BTreeSet<String> =
            provenance.component_types.iter().cloned().collect();
        push(
            "oci:image:componentTypes",
            Some(join_sorted(component_types)),
        );

        properties
    }

    /// Aggregate summaries over a final component set
    ///
    /// Distinct purl types, namespaces and source files, each sorted.
    /// Empty summaries are left out.
    pub fn summary_properties(components: &[Component]) -> Vec<Property> {
        let mut types = BTreeSet::new();
        let mut namespaces = BTreeSet::new();
        let mut src_files = BTreeSet::new();

        for component in components {
            if let Some(purl) = component
                .purl
                .as_deref()
                .and_then(|p| p.parse::<PackageUrl>().ok())
            {
                types.insert(purl.purl_type().to_string());
                if let Some(namespace) = purl.namespace() {
                    namespaces.insert(namespace.to_string());
                }
            }
            if let Some(group) = component.group.as_deref().filter(|g| !g.is_empty()) {
                namespaces.insert(group.to_string());
            }
            src_files.extend(
                component
                    .properties
                    .iter()
                    .filter(|p| p.name == SRC_FILE_PROPERTY)
                    .map(|p| p.value.clone()),
            );
        }

        [
            ("cdx:bom:componentTypes", types),
            ("cdx:bom:componentNamespaces", namespaces),
            ("cdx:bom:componentSrcFiles", src_files),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| Property::new(name, join_sorted(values)))
        .collect()
    }

    /// Appends the summary properties of the BOM's final component set to its header
    pub fn apply_summary(bom: Bom) -> Bom {
        let mut parts = bom.into_parts();
        let summary = Self::summary_properties(&parts.components);
        parts.metadata.extend_properties(summary);
        Bom::from_parts(parts)
    }
}

fn join_sorted(values: BTreeSet<String>) -> String {
    values.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR)
}
