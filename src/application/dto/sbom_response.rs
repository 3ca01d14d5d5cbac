use crate::sbom_generation::domain::Bom;
use crate::sbom_generation::services::RegistrationStats;

/// SbomResponse - Result of one BOM generation run
#[derive(Debug, Clone)]
pub struct SbomResponse {
    /// The assembled, filtered BOM
    pub bom: Bom,
    /// The BOM serialized in the requested format
    pub content: String,
    /// Component count before post-generation filtering
    pub original_component_count: usize,
    pub stats: RegistrationStats,
    /// `only`/`filter` strings that matched no component
    pub unmatched_patterns: Vec<String>,
}

impl SbomResponse {
    pub fn component_count(&self) -> usize {
        self.bom.components().len()
    }

    pub fn removed_count(&self) -> usize {
        self.original_component_count
            .saturating_sub(self.component_count())
    }
}
