use sbom_assembler::prelude::*;
use sbom_assembler::sbom_generation::domain::ImageProvenance;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Mock ScanSource serving in-memory scan results keyed by path
#[derive(Default)]
pub struct MockScanSource {
    scans: HashMap<PathBuf, ScanResult>,
    provenance: Option<ImageProvenance>,
}

#[allow(dead_code)]
impl MockScanSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan(mut self, path: &str, scan: ScanResult) -> Self {
        self.scans.insert(PathBuf::from(path), scan);
        self
    }

    pub fn with_provenance(mut self, provenance: ImageProvenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}

impl ScanSource for MockScanSource {
    fn read_scan(&self, path: &Path) -> Result<ScanResult> {
        self.scans
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Scan result not found: {}", path.display()))
    }

    fn read_image_metadata(&self, path: &Path) -> Result<ImageProvenance> {
        self.provenance
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Image metadata not found: {}", path.display()))
    }
}
