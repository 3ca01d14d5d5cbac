use super::OutputFormat;
use crate::sbom_generation::domain::SpecVersion;
use crate::sbom_generation::services::{FilterCriteria, ProjectIdentity};
use crate::shared::{Result, SbomError};
use std::path::PathBuf;

/// SbomRequest - Internal request DTO for one BOM generation run
///
/// Every path in `scan_paths` is one scan pass; they are assembled in order.
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Scan-result files, one per upstream parser pass
    pub scan_paths: Vec<PathBuf>,
    /// Directory of the project under analysis, used for the default root
    pub project_path: PathBuf,
    pub format: OutputFormat,
    pub spec_version: SpecVersion,
    pub criteria: FilterCriteria,
    /// Author names for the BOM header
    pub authors: Vec<String>,
    /// Explicit root identity, overriding any scan's declared root
    pub project: Option<ProjectIdentity>,
    /// Optional container image metadata JSON
    pub image_metadata: Option<PathBuf>,
}

impl SbomRequest {
    pub fn builder() -> SbomRequestBuilder {
        SbomRequestBuilder::default()
    }
}

/// Builder for [`SbomRequest`]
#[derive(Debug, Default)]
pub struct SbomRequestBuilder {
    scan_paths: Vec<PathBuf>,
    project_path: Option<PathBuf>,
    format: OutputFormat,
    spec_version: SpecVersion,
    criteria: FilterCriteria,
    authors: Vec<String>,
    project: Option<ProjectIdentity>,
    image_metadata: Option<PathBuf>,
}

impl SbomRequestBuilder {
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    pub fn scan_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.scan_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn spec_version(mut self, spec_version: SpecVersion) -> Self {
        self.spec_version = spec_version;
        self
    }

    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn project(mut self, project: Option<ProjectIdentity>) -> Self {
        self.project = project;
        self
    }

    pub fn image_metadata(mut self, path: Option<PathBuf>) -> Self {
        self.image_metadata = path;
        self
    }

    /// Builds the request
    ///
    /// # Errors
    /// Returns a validation error when no scan path was given
    pub fn build(self) -> Result<SbomRequest> {
        if self.scan_paths.is_empty() {
            return Err(SbomError::Validation {
                message: "At least one scan result file is required".to_string(),
            }
            .into());
        }

        Ok(SbomRequest {
            scan_paths: self.scan_paths,
            project_path: self.project_path.unwrap_or_else(|| PathBuf::from(".")),
            format: self.format,
            spec_version: self.spec_version,
            criteria: self.criteria,
            authors: self
                .authors
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            project: self.project,
            image_metadata: self.image_metadata,
        })
    }
}
