mod bom_filter;
mod component_registry;
mod component_trimmer;
mod dependency_merger;
mod hash_processor;
mod metadata_composer;
mod package_normalizer;
mod parent_component;
mod type_classifier;

pub use bom_filter::{BomFilter, FilterCriteria};
pub use component_registry::{ComponentRegistry, RegistrationStats};
pub use component_trimmer::{BomIdentity, ComponentTrimmer};
pub use dependency_merger::DependencyMerger;
pub use hash_processor::HashProcessor;
pub use metadata_composer::MetadataComposer;
pub use package_normalizer::PackageNormalizer;
pub use parent_component::{ParentComponentResolver, ProjectIdentity};
pub use type_classifier::TypeClassifier;
