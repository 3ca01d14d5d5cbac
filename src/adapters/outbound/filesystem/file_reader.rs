use crate::ports::outbound::{ScanResult, ScanSource};
use crate::sbom_generation::domain::ImageProvenance;
use crate::shared::error::SbomError;
use crate::shared::security::read_checked_file;
use crate::shared::Result;
use std::path::Path;

/// JsonScanReader adapter reading scan results written by ecosystem parsers
///
/// Each file is one scan pass:
/// `{ecosystem, root?, packages: [...], dependencies?: [...], services?: [...]}`.
pub struct JsonScanReader;

impl JsonScanReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonScanReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSource for JsonScanReader {
    fn read_scan(&self, path: &Path) -> Result<ScanResult> {
        if !path.exists() {
            return Err(SbomError::ScanFileNotFound {
                path: path.to_path_buf(),
                suggestion: "Run the ecosystem parser first, or check the path given with --input"
                    .to_string(),
            }
            .into());
        }

        let content = read_checked_file(path, "scan result")?;
        let scan: ScanResult =
            serde_json::from_str(&content).map_err(|e| SbomError::ScanParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        if scan.ecosystem.trim().is_empty() {
            return Err(SbomError::ScanParseError {
                path: path.to_path_buf(),
                details: "missing `ecosystem` field".to_string(),
            }
            .into());
        }

        tracing::debug!(
            path = %path.display(),
            ecosystem = %scan.ecosystem,
            packages = scan.packages.len(),
            "loaded scan result"
        );
        Ok(scan)
    }

    fn read_image_metadata(&self, path: &Path) -> Result<ImageProvenance> {
        let content = read_checked_file(path, "image metadata")?;
        serde_json::from_str(&content).map_err(|e| {
            SbomError::FileReadError {
                path: path.to_path_buf(),
                details: format!("invalid image metadata JSON: {}", e),
            }
            .into()
        })
    }
}
