use crate::sbom_generation::domain::{Dependency, ImageProvenance, RawPackage, Service};
use crate::shared::Result;
use serde::Deserialize;
use std::path::Path;

/// Result of one upstream scan pass
///
/// Produced by an ecosystem parser: the declared root record, the flat
/// package list, optional partial dependency edges and optional services.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScanResult {
    /// Purl type used for records that carry no purl (`npm`, `pypi`, `maven`...)
    pub ecosystem: String,
    pub root: Option<RawPackage>,
    pub packages: Vec<RawPackage>,
    pub dependencies: Vec<Dependency>,
    pub services: Vec<Service>,
}

impl ScanResult {
    pub fn new(ecosystem: impl Into<String>, packages: Vec<RawPackage>) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            packages,
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: RawPackage) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Dependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }
}

/// ScanSource port for loading upstream scan results
///
/// Abstracts where parser output comes from (files, another process, memory).
pub trait ScanSource {
    /// Reads one scan result
    ///
    /// # Errors
    /// Returns an error if the scan cannot be read or is not valid scan JSON
    fn read_scan(&self, path: &Path) -> Result<ScanResult>;

    /// Reads container image metadata used for header provenance properties
    ///
    /// # Errors
    /// Returns an error if the metadata cannot be read or parsed
    fn read_image_metadata(&self, path: &Path) -> Result<ImageProvenance>;
}
