use crate::sbom_generation::domain::{Component, ComponentType, PackageUrl, RawPackage};
use crate::sbom_generation::services::PackageNormalizer;
use std::path::Path;

/// Version given to a root component whose version is unknown
const DEFAULT_ROOT_VERSION: &str = "latest";

/// Explicitly configured identity of the project under analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub name: String,
    pub group: Option<String>,
    pub version: Option<String>,
    pub component_type: Option<ComponentType>,
}

/// ParentComponentResolver service deciding the BOM's root component
///
/// Precedence: explicit project identity, then the declared root record of
/// the first scan, then a default derived from the project directory.
pub struct ParentComponentResolver;

impl ParentComponentResolver {
    pub fn resolve(
        identity: Option<&ProjectIdentity>,
        root: Option<&RawPackage>,
        project_dir: &Path,
        normalizer: &PackageNormalizer,
    ) -> Option<Component> {
        identity
            .and_then(|id| Self::from_identity(id, normalizer.ecosystem()))
            .or_else(|| root.and_then(|r| Self::from_root(r, normalizer)))
            .or_else(|| Self::from_directory(project_dir, normalizer.ecosystem()))
    }

    pub fn from_identity(identity: &ProjectIdentity, ecosystem: &str) -> Option<Component> {
        let name = identity.name.trim();
        if name.is_empty() {
            return None;
        }
        let version = identity
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ROOT_VERSION);
        let group = identity.group.as_deref().filter(|g| !g.trim().is_empty());
        let component_type = identity
            .component_type
            .unwrap_or(ComponentType::Application);

        Self::build(ecosystem, group, name, version, component_type)
    }

    /// Normalizes a scan's declared root record into a root component
    ///
    /// A root without a version gets `latest`; a root the classifier sees
    /// as a plain library is promoted to an application.
    pub fn from_root(root: &RawPackage, normalizer: &PackageNormalizer) -> Option<Component> {
        let mut record = root.clone();
        if record.version.trim().is_empty() {
            record.version = DEFAULT_ROOT_VERSION.to_string();
        }
        let mut component = normalizer.normalize(&record)?;
        if component.component_type == ComponentType::Library {
            component.component_type = ComponentType::Application;
        }
        Some(component)
    }

    /// Synthesizes a root from the project directory name
    ///
    /// Image tarballs (`*.tar`) become containers, anything else an application.
    pub fn from_directory(project_dir: &Path, ecosystem: &str) -> Option<Component> {
        let name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .or_else(|| {
                project_dir
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            })?;
        let component_type = if name.ends_with(".tar") {
            ComponentType::Container
        } else {
            ComponentType::Application
        };

        Self::build(ecosystem, None, &name, DEFAULT_ROOT_VERSION, component_type)
    }

    fn build(
        ecosystem: &str,
        group: Option<&str>,
        name: &str,
        version: &str,
        component_type: ComponentType,
    ) -> Option<Component> {
        let purl = match PackageUrl::new(ecosystem, name) {
            Ok(purl) => purl.with_namespace(group).with_version(Some(version)),
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "cannot build purl for root component");
                return None;
            }
        };

        let mut component = Component::new(component_type, name, version, purl.to_bom_ref());
        component.group = group.map(str::to_string);
        component.purl = Some(purl.to_string());
        Some(component)
    }
}
