//! sbom-assembler - CycloneDX BOM assembly engine
//!
//! Turns the raw package records produced by one or more ecosystem scans
//! into a single de-duplicated, cycle-safe component graph, and serializes it
//! as CycloneDX JSON or XML.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure assembly logic and domain models
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_assembler::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let use_case = GenerateSbomUseCase::new(JsonScanReader::new(), StderrProgressReporter::new());
//!
//! let request = SbomRequest::builder()
//!     .scan_path("npm-scan.json")
//!     .scan_path("pypi-scan.json")
//!     .format(OutputFormat::Xml)
//!     .build()?;
//! let response = use_case.execute(request)?;
//!
//! StdoutPresenter::new().present(&response.content)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, JsonScanReader, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{CycloneDxJsonFormatter, CycloneDxXmlFormatter};
    pub use crate::application::dto::{OutputFormat, SbomRequest, SbomResponse};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::inbound::BomGenerationPort;
    pub use crate::ports::outbound::{
        OutputPresenter, ProgressReporter, SbomFormatter, ScanResult, ScanSource,
    };
    pub use crate::sbom_generation::domain::{
        Bom, Component, ComponentType, Dependency, PackageUrl, RawPackage, SbomMetadata, Service,
        SpecVersion,
    };
    pub use crate::sbom_generation::services::{
        BomFilter, ComponentRegistry, ComponentTrimmer, DependencyMerger, FilterCriteria,
        MetadataComposer, PackageNormalizer, ProjectIdentity,
    };
    pub use crate::shared::Result;
}
