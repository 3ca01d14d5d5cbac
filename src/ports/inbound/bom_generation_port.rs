use crate::application::dto::{SbomRequest, SbomResponse};
use crate::shared::Result;

/// BomGenerationPort - Inbound port for the BOM assembly use case
///
/// This is the interface drivers (the CLI, or an embedding service) use to
/// run one generation. Each call is an isolated run with its own registry.
pub trait BomGenerationPort {
    /// Assembles, filters and serializes a BOM from the requested scans
    ///
    /// # Errors
    /// Returns an error if:
    /// - A scan or image-metadata input cannot be read
    /// - The filter criteria are invalid
    /// - Filtering removed every component
    /// - Serialization fails
    fn generate_bom(&self, request: SbomRequest) -> Result<SbomResponse>;
}
