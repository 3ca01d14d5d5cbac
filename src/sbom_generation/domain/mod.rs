pub mod bom;
pub mod component;
pub mod dependency;
pub mod hash;
pub mod package_url;
pub mod provenance;
pub mod raw_package;
pub mod sbom_metadata;
pub mod service;
pub mod spec_version;

pub use bom::{Bom, BomParts};
pub use component::{
    Component, ComponentType, ExternalReference, License, LicenseChoice, Property, Scope,
};
pub use dependency::{Aggregate, Composition, Dependency};
pub use hash::{Hash, HashAlgorithm};
pub use package_url::{PackageUrl, PurlError};
pub use provenance::{
    ImageInspectData, ImageManifest, ImageProvenance, LastLayerConfig, LayerRuntimeConfig,
};
pub use raw_package::{RawDependency, RawHash, RawPackage, RawUrl};
pub use sbom_metadata::{SbomMetadata, ToolIdentity};
pub use service::Service;
pub use spec_version::SpecVersion;
