use super::component::Component;
use super::dependency::{Composition, Dependency};
use super::sbom_metadata::SbomMetadata;
use super::service::Service;
use super::spec_version::SpecVersion;

/// Assembled BOM graph, the single representation both serializers project.
///
/// Built once per generation run. The post-generation filter consumes a
/// `Bom` and produces a new one rather than editing it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Bom {
    spec_version: SpecVersion,
    metadata: SbomMetadata,
    components: Vec<Component>,
    services: Vec<Service>,
    dependencies: Vec<Dependency>,
    compositions: Vec<Composition>,
}

/// Owned sections of a [`Bom`], used when a pass needs to rebuild it
#[derive(Debug, Clone, PartialEq)]
pub struct BomParts {
    pub spec_version: SpecVersion,
    pub metadata: SbomMetadata,
    pub components: Vec<Component>,
    pub services: Vec<Service>,
    pub dependencies: Vec<Dependency>,
    pub compositions: Vec<Composition>,
}

impl Bom {
    pub const FORMAT: &'static str = "CycloneDX";
    pub const VERSION: u32 = 1;

    pub fn new(
        spec_version: SpecVersion,
        metadata: SbomMetadata,
        components: Vec<Component>,
        services: Vec<Service>,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            spec_version,
            metadata,
            components,
            services,
            dependencies,
            compositions: Vec::new(),
        }
    }

    pub fn from_parts(parts: BomParts) -> Self {
        Self {
            spec_version: parts.spec_version,
            metadata: parts.metadata,
            components: parts.components,
            services: parts.services,
            dependencies: parts.dependencies,
            compositions: parts.compositions,
        }
    }

    pub fn into_parts(self) -> BomParts {
        BomParts {
            spec_version: self.spec_version,
            metadata: self.metadata,
            components: self.components,
            services: self.services,
            dependencies: self.dependencies,
            compositions: self.compositions,
        }
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    pub fn serial_number(&self) -> &str {
        self.metadata.serial_number()
    }

    pub fn metadata(&self) -> &SbomMetadata {
        &self.metadata
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{ComponentType, ToolIdentity};

    #[test]
    fn test_bom_parts_round_trip() {
        let metadata = SbomMetadata::new(
            "2024-01-01T00:00:00Z".to_string(),
            "urn:uuid:test".to_string(),
            ToolIdentity::default(),
            Vec::new(),
        );
        let bom = Bom::new(
            SpecVersion::V1_5,
            metadata,
            vec![Component::new(ComponentType::Library, "a", "1", "pkg:npm/a@1")],
            Vec::new(),
            vec![Dependency::new("pkg:npm/a@1", Vec::<String>::new())],
        );

        assert_eq!(bom.serial_number(), "urn:uuid:test");
        assert!(bom.compositions().is_empty());

        let rebuilt = Bom::from_parts(bom.clone().into_parts());
        assert_eq!(rebuilt, bom);
    }
}
